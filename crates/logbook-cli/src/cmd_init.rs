use logbook_nag::config::keys;
use logbook_store::{KvFile, LogbookPaths};
use serde_json::{json, Value};
use std::path::Path;

/// Settings written by `logbook init` when absent.
fn default_settings() -> [(&'static str, Value); 5] {
    [
        (keys::ENABLED, json!(false)),
        (keys::CUTOFF_HOUR, json!(logbook_core::DEFAULT_CUTOFF_HOUR)),
        (keys::INTENSITY, json!("gentle")),
        (keys::TONE, json!("friendly")),
        (keys::IN_APP, json!(true)),
    ]
}

pub fn execute(root: &Path) -> anyhow::Result<()> {
    let paths = LogbookPaths::discover(root);
    let already = paths.is_initialized();
    paths.ensure_layout()?;

    let settings = KvFile::new(&paths.settings_json);
    let existing = settings.read()?;
    let mut added = 0;
    for (key, value) in default_settings() {
        if !existing.contains_key(key) {
            settings.set(key, value)?;
            added += 1;
        }
    }

    if already {
        println!("Already initialized at {}", paths.logbook_dir.display());
    } else {
        println!("Initialized {}", paths.logbook_dir.display());
    }
    if added > 0 {
        println!("  wrote {added} default setting(s)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_defaults_once() {
        let tmp = tempfile::tempdir().unwrap();
        execute(tmp.path()).unwrap();
        let paths = LogbookPaths::discover(tmp.path());
        let kv = KvFile::new(&paths.settings_json);
        assert_eq!(kv.get(keys::ENABLED).unwrap(), Some(json!(false)));

        kv.set(keys::ENABLED, json!(true)).unwrap();
        execute(tmp.path()).unwrap();
        assert_eq!(kv.get(keys::ENABLED).unwrap(), Some(json!(true)));
    }
}
