//! Serialises commands that write to the store.
//!
//! Settings, state, the entries log and the outbox are each rewritten or
//! appended independently, so a command that touches several of them runs
//! its whole read-modify-write under one `.logbook/LOCK`.

use crate::paths::LogbookPaths;
use anyhow::Context;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::time::{Duration, Instant};

/// How long a command waits for another one to finish before giving up.
pub const LOCK_WAIT: Duration = Duration::from_secs(2);

const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Run `f` while holding the store lock, waiting up to [`LOCK_WAIT`].
pub fn with_lock<T>(
    paths: &LogbookPaths,
    f: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    with_lock_timeout(paths, LOCK_WAIT, f)
}

/// Like [`with_lock`] with an explicit wait. The lock is released when `f`
/// returns, whether it succeeded or not.
pub fn with_lock_timeout<T>(
    paths: &LogbookPaths,
    wait: Duration,
    f: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    if !paths.is_initialized() {
        anyhow::bail!(
            "no store at {}; run `logbook init` first",
            paths.root.display()
        );
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&paths.lock_file)
        .with_context(|| format!("opening {}", paths.lock_file.display()))?;
    acquire(&file, wait)?;

    let result = f();
    if let Err(e) = FileExt::unlock(&file) {
        tracing::debug!(error = %e, "store unlock failed; released on close");
    }
    result
}

fn acquire(file: &File, wait: Duration) -> anyhow::Result<()> {
    let deadline = Instant::now() + wait;
    loop {
        if file.try_lock_exclusive().is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            anyhow::bail!("another logbook command is still running; try again");
        }
        std::thread::sleep(RETRY_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, LogbookPaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = LogbookPaths::discover(tmp.path());
        paths.ensure_layout().unwrap();
        (tmp, paths)
    }

    #[test]
    fn returns_closure_value() {
        let (_tmp, paths) = store();
        assert_eq!(with_lock(&paths, || Ok(7)).unwrap(), 7);
    }

    #[test]
    fn nested_command_is_refused() {
        let (_tmp, paths) = store();
        let outcome = with_lock(&paths, || {
            let inner = with_lock_timeout(&paths, Duration::ZERO, || Ok(()));
            Ok(inner.is_err())
        });
        assert!(outcome.unwrap());
    }

    #[test]
    fn released_after_failure() {
        let (_tmp, paths) = store();
        let failed: anyhow::Result<()> = with_lock(&paths, || anyhow::bail!("disk full"));
        assert_eq!(failed.unwrap_err().to_string(), "disk full");
        assert!(with_lock_timeout(&paths, Duration::ZERO, || Ok(())).is_ok());
    }

    #[test]
    fn uninitialized_store_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = LogbookPaths::discover(tmp.path());
        let err = with_lock(&paths, || Ok(())).unwrap_err();
        assert!(err.to_string().contains("logbook init"));
        assert!(!paths.lock_file.exists());
    }
}
