//! File-backed notification center.
//!
//! Stands in for the platform notification API when running from the
//! command line: scheduled requests are kept in `.logbook/outbox.json`
//! until cancelled, and count as pending until their fire time passes.

use anyhow::Context;
use logbook_core::{format_rfc3339, parse_rfc3339};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use crate::clock::{Clock, SystemClock};
use crate::notifier::{NotificationCenter, NotificationRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutboxRecord {
    id: String,
    title: String,
    body: String,
    fire_at: String,
}

pub struct OutboxNotifier {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    fn read(&self) -> anyhow::Result<Vec<OutboxRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading outbox: {}", self.path.display()))?;
        let records = serde_json::from_str(&content)
            .with_context(|| format!("parsing outbox: {}", self.path.display()))?;
        Ok(records)
    }

    fn write(&self, records: &[OutboxRecord]) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        logbook_store::write_atomic(&self.path, data.as_bytes())
            .with_context(|| format!("saving outbox: {}", self.path.display()))
    }

    /// Requests that have not fired yet, earliest first.
    pub fn upcoming(&self) -> anyhow::Result<Vec<NotificationRequest>> {
        let now = self.clock.now();
        let mut out = Vec::new();
        for r in self.read()? {
            let fire_at = parse_rfc3339(&r.fire_at)?;
            if fire_at > now {
                out.push(NotificationRequest {
                    id: r.id,
                    title: r.title,
                    body: r.body,
                    fire_at,
                });
            }
        }
        out.sort_by_key(|r| r.fire_at);
        Ok(out)
    }
}

impl NotificationCenter for OutboxNotifier {
    fn schedule(&self, request: &NotificationRequest) -> anyhow::Result<()> {
        let now = self.clock.now();
        // Drop anything already delivered while we're rewriting the file.
        let mut records: Vec<OutboxRecord> = self
            .read()?
            .into_iter()
            .filter(|r| parse_rfc3339(&r.fire_at).is_ok_and(|t| t > now))
            .collect();
        records.push(OutboxRecord {
            id: request.id.clone(),
            title: request.title.clone(),
            body: request.body.clone(),
            fire_at: format_rfc3339(request.fire_at),
        });
        self.write(&records)
    }

    fn cancel(&self, ids: &[String]) -> anyhow::Result<()> {
        let mut records = self.read()?;
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        if records.len() != before {
            self.write(&records)?;
        }
        Ok(())
    }

    fn pending(&self) -> Vec<String> {
        match self.upcoming() {
            Ok(reqs) => reqs.into_iter().map(|r| r.id).collect(),
            Err(e) => {
                warn!(error = %e, "outbox unreadable, treating as empty");
                Vec::new()
            }
        }
    }
}
