use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::hashtag::{extract_hashtags, from_storage_format, to_storage_format};
use crate::types::{format_rfc3339, parse_rfc3339};

/// What a freelancer logged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Task,
    #[default]
    Note,
    Payment,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Note => write!(f, "note"),
            Self::Payment => write!(f, "payment"),
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "task" => Ok(Self::Task),
            "note" => Ok(Self::Note),
            "payment" => Ok(Self::Payment),
            other => Err(Error::UnknownEntryKind(other.to_string())),
        }
    }
}

/// A single logged item (one JSONL line in entries.jsonl).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Hashtags found in `text`, in storage format.
    #[serde(default)]
    pub tags: String,
    pub created_at: String,
}

impl Entry {
    /// Hashtags recorded for this entry.
    pub fn tag_list(&self) -> Vec<String> {
        from_storage_format(&self.tags)
    }

    pub fn created_at(&self) -> Result<OffsetDateTime> {
        parse_rfc3339(&self.created_at)
    }
}

/// Fields supplied by the user when logging something.
#[derive(Debug, Clone, Default)]
pub struct NewEntry<'a> {
    pub kind: EntryKind,
    pub client: Option<&'a str>,
    pub text: &'a str,
    pub amount: Option<f64>,
}

/// Build an entry stamped at `at`, with tags pulled from the text.
///
/// Payments must carry a finite, non-negative amount; other kinds must not
/// carry one at all.
pub fn new_entry(fields: &NewEntry<'_>, at: OffsetDateTime) -> Result<Entry> {
    match (fields.kind, fields.amount) {
        (EntryKind::Payment, None) => {
            return Err(Error::InvalidEntry {
                kind: fields.kind.to_string(),
                problem: "require an amount",
            })
        }
        (EntryKind::Payment, Some(a)) if !a.is_finite() || a < 0.0 => {
            return Err(Error::InvalidEntry {
                kind: fields.kind.to_string(),
                problem: "require a non-negative amount",
            })
        }
        (EntryKind::Task | EntryKind::Note, Some(_)) => {
            return Err(Error::InvalidEntry {
                kind: fields.kind.to_string(),
                problem: "cannot carry an amount",
            })
        }
        _ => {}
    }

    let client = fields
        .client
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(Entry {
        id: format!("ent_{}", ulid::Ulid::new().to_string().to_lowercase()),
        kind: fields.kind,
        client,
        text: fields.text.to_string(),
        amount: fields.amount,
        tags: to_storage_format(&extract_hashtags(fields.text)),
        created_at: format_rfc3339(at),
    })
}

/// Read-only view over logged entries, used to decide whether today has any.
pub trait EntryQuery {
    /// Number of entries created in `[start, end)`.
    fn count_entries_in_range(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<usize>;
}

/// Count entries whose timestamp falls in `[start, end)`.
/// Entries with unparseable timestamps are skipped.
pub fn count_in_range(entries: &[Entry], start: OffsetDateTime, end: OffsetDateTime) -> usize {
    entries
        .iter()
        .filter_map(|e| e.created_at().ok())
        .filter(|ts| *ts >= start && *ts < end)
        .count()
}

impl EntryQuery for [Entry] {
    fn count_entries_in_range(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<usize> {
        Ok(count_in_range(self, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn note(text: &str, at: OffsetDateTime) -> Entry {
        new_entry(
            &NewEntry {
                text,
                ..Default::default()
            },
            at,
        )
        .unwrap()
    }

    #[test]
    fn new_entry_extracts_tags() {
        let e = note("Kickoff with #acme about #design", datetime!(2026-03-02 10:00 UTC));
        assert!(e.id.starts_with("ent_"));
        assert_eq!(e.kind, EntryKind::Note);
        assert_eq!(e.tags, "#acme,#design");
        assert_eq!(e.tag_list(), vec!["#acme", "#design"]);
        assert_eq!(e.created_at, "2026-03-02T10:00:00Z");
    }

    #[test]
    fn payment_requires_amount() {
        let at = datetime!(2026-03-02 10:00 UTC);
        let missing = NewEntry {
            kind: EntryKind::Payment,
            text: "invoice 12",
            ..Default::default()
        };
        assert!(matches!(
            new_entry(&missing, at),
            Err(Error::InvalidEntry { .. })
        ));

        let negative = NewEntry {
            amount: Some(-5.0),
            ..missing.clone()
        };
        assert!(new_entry(&negative, at).is_err());

        let ok = NewEntry {
            amount: Some(450.0),
            client: Some("  Acme  "),
            ..missing
        };
        let e = new_entry(&ok, at).unwrap();
        assert_eq!(e.amount, Some(450.0));
        assert_eq!(e.client.as_deref(), Some("Acme"));
    }

    #[test]
    fn task_rejects_amount() {
        let fields = NewEntry {
            kind: EntryKind::Task,
            text: "draft logo",
            amount: Some(10.0),
            client: None,
        };
        assert!(new_entry(&fields, datetime!(2026-03-02 10:00 UTC)).is_err());
    }

    #[test]
    fn blank_client_is_dropped() {
        let fields = NewEntry {
            client: Some("   "),
            text: "call",
            ..Default::default()
        };
        let e = new_entry(&fields, datetime!(2026-03-02 10:00 UTC)).unwrap();
        assert!(e.client.is_none());
    }

    #[test]
    fn kind_parse() {
        assert_eq!("payment".parse::<EntryKind>().unwrap(), EntryKind::Payment);
        assert_eq!(
            "invoice".parse::<EntryKind>(),
            Err(Error::UnknownEntryKind("invoice".into()))
        );
    }

    #[test]
    fn count_is_half_open() {
        let entries = vec![
            note("yesterday", datetime!(2026-03-01 23:59:59 UTC)),
            note("midnight", datetime!(2026-03-02 00:00 UTC)),
            note("afternoon", datetime!(2026-03-02 15:00 UTC)),
            note("tomorrow", datetime!(2026-03-03 00:00 UTC)),
        ];
        let start = datetime!(2026-03-02 00:00 UTC);
        let end = datetime!(2026-03-03 00:00 UTC);
        assert_eq!(count_in_range(&entries, start, end), 2);
        assert_eq!(
            entries[..].count_entries_in_range(start, end).unwrap(),
            2
        );
    }

    #[test]
    fn count_compares_instants_across_offsets() {
        // 01:00 at +02:00 is still the previous UTC day.
        let entries = vec![note("early", datetime!(2026-03-02 01:00 +02:00))];
        let start = datetime!(2026-03-02 00:00 UTC);
        let end = datetime!(2026-03-03 00:00 UTC);
        assert_eq!(count_in_range(&entries, start, end), 0);
    }

    #[test]
    fn count_skips_bad_timestamps() {
        let mut e = note("x", datetime!(2026-03-02 10:00 UTC));
        e.created_at = "not a date".into();
        let start = datetime!(2026-03-02 00:00 UTC);
        let end = datetime!(2026-03-03 00:00 UTC);
        assert_eq!(count_in_range(&[e], start, end), 0);
    }
}
