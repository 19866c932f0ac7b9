use std::path::PathBuf;

/// All well-known paths under `.logbook/`.
#[derive(Debug, Clone)]
pub struct LogbookPaths {
    pub root: PathBuf,
    pub logbook_dir: PathBuf,
    pub settings_json: PathBuf,
    pub state_json: PathBuf,
    pub entries_jsonl: PathBuf,
    pub outbox_json: PathBuf,
    pub lock_file: PathBuf,
}

impl LogbookPaths {
    /// Derive all paths from a store root. Pure computation, no I/O.
    pub fn discover(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let logbook_dir = root.join(".logbook");
        Self {
            settings_json: logbook_dir.join("settings.json"),
            state_json: logbook_dir.join("state.json"),
            entries_jsonl: logbook_dir.join("entries.jsonl"),
            outbox_json: logbook_dir.join("outbox.json"),
            lock_file: logbook_dir.join("LOCK"),
            logbook_dir,
            root,
        }
    }

    /// Create the `.logbook/` directory. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.logbook_dir)?;
        Ok(())
    }

    /// Check whether `.logbook/` exists.
    pub fn is_initialized(&self) -> bool {
        self.logbook_dir.is_dir()
    }
}
