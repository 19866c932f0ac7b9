use anyhow::Context;
use logbook_core::entry::{count_in_range, Entry, EntryQuery};
use std::io::Write;
use time::OffsetDateTime;

use crate::paths::LogbookPaths;

/// Append an entry to entries.jsonl.
pub fn append_entry(paths: &LogbookPaths, entry: &Entry) -> anyhow::Result<()> {
    paths.ensure_layout()?;
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.entries_jsonl)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Read all entries from entries.jsonl. Returns empty vec if file doesn't exist.
pub fn list_entries(paths: &LogbookPaths) -> anyhow::Result<Vec<Entry>> {
    if !paths.entries_jsonl.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&paths.entries_jsonl)?;
    let mut entries = Vec::new();
    for (n, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let e: Entry = serde_json::from_str(line)
            .with_context(|| format!("{}:{}", paths.entries_jsonl.display(), n + 1))?;
        entries.push(e);
    }
    Ok(entries)
}

/// File-backed entry store answering the "anything logged today?" query.
pub struct EntryLog {
    paths: LogbookPaths,
}

impl EntryLog {
    pub fn new(paths: LogbookPaths) -> Self {
        Self { paths }
    }

    pub fn append(&self, entry: &Entry) -> anyhow::Result<()> {
        append_entry(&self.paths, entry)
    }

    pub fn list(&self) -> anyhow::Result<Vec<Entry>> {
        list_entries(&self.paths)
    }
}

impl EntryQuery for EntryLog {
    fn count_entries_in_range(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<usize> {
        let entries = self.list()?;
        let n = count_in_range(&entries, start, end);
        tracing::debug!(count = n, "entries in range");
        Ok(n)
    }
}
