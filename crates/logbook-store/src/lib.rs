pub mod entries;
pub mod kv;
pub mod lock;
pub mod paths;

pub use entries::{append_entry, list_entries, EntryLog};
pub use kv::KvFile;
pub use lock::{with_lock, with_lock_timeout, LOCK_WAIT};
pub use paths::LogbookPaths;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the store root.
pub const ROOT_ENV: &str = "LOGBOOK_ROOT";

/// Return the per-user store root.
/// `$LOGBOOK_ROOT` if set, else `<data_dir>/logbook` (falls back to `~/.logbook`).
pub fn store_root() -> PathBuf {
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        PathBuf::from(root)
    } else if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("logbook")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".logbook")
    } else {
        PathBuf::from(".logbook-store")
    }
}

/// Atomic write: write to temp file in same dir, then rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no parent dir for {}", path.display()))?;
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
