use serde::Serialize;
use std::collections::BTreeMap;

use crate::entry::{Entry, EntryKind};

/// Label used for payments logged without a client.
pub const NO_CLIENT: &str = "(no client)";

/// Totals over payment entries.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PaymentSummary {
    pub count: usize,
    pub total: f64,
    /// Per-client totals, ordered by client name.
    pub by_client: BTreeMap<String, f64>,
}

impl PaymentSummary {
    /// Client with the largest total, if any payments exist.
    pub fn top_client(&self) -> Option<(&str, f64)> {
        self.by_client
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(name, total)| (name.as_str(), *total))
    }
}

/// Sum payment amounts overall and per client. Non-payments are ignored.
pub fn summarize_payments<'a, I>(entries: I) -> PaymentSummary
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut summary = PaymentSummary::default();
    for entry in entries {
        if entry.kind != EntryKind::Payment {
            continue;
        }
        let amount = entry.amount.unwrap_or(0.0);
        let client = entry.client.as_deref().unwrap_or(NO_CLIENT);
        summary.count += 1;
        summary.total += amount;
        *summary.by_client.entry(client.to_string()).or_insert(0.0) += amount;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{new_entry, NewEntry};
    use time::macros::datetime;

    fn entry(kind: EntryKind, client: Option<&str>, amount: Option<f64>) -> Entry {
        new_entry(
            &NewEntry {
                kind,
                client,
                text: "x",
                amount,
            },
            datetime!(2026-03-02 10:00 UTC),
        )
        .unwrap()
    }

    #[test]
    fn sums_by_client() {
        let entries = vec![
            entry(EntryKind::Payment, Some("Acme"), Some(100.0)),
            entry(EntryKind::Payment, Some("Globex"), Some(250.5)),
            entry(EntryKind::Payment, Some("Acme"), Some(50.0)),
            entry(EntryKind::Task, Some("Acme"), None),
            entry(EntryKind::Payment, None, Some(20.0)),
        ];
        let summary = summarize_payments(&entries);
        assert_eq!(summary.count, 4);
        assert!((summary.total - 420.5).abs() < 1e-9);
        assert_eq!(summary.by_client["Acme"], 150.0);
        assert_eq!(summary.by_client["Globex"], 250.5);
        assert_eq!(summary.by_client[NO_CLIENT], 20.0);
        assert_eq!(summary.top_client(), Some(("Globex", 250.5)));
    }

    #[test]
    fn empty_summary() {
        let summary = summarize_payments(&Vec::<Entry>::new());
        assert_eq!(summary, PaymentSummary::default());
        assert!(summary.top_client().is_none());
    }
}
