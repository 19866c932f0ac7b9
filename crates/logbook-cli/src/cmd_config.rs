use clap::Subcommand;
use logbook_core::{cutoff_hour, NagIntensity, NagTone};
use logbook_nag::config::keys;
use logbook_store::kv::parse_value;
use logbook_store::{with_lock, KvFile, LogbookPaths};
use serde_json::Value;
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. nag_cutoff_hour)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Remove a config value (falls back to the default)
    Unset {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, root: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(root, &key, &value),
        ConfigCmd::Get { key } => get(root, &key),
        ConfigCmd::Unset { key } => unset(root, &key),
        ConfigCmd::List => list(root),
    }
}

// ── Command Implementations ──

fn settings(root: &Path) -> anyhow::Result<(LogbookPaths, KvFile)> {
    let paths = LogbookPaths::discover(root);
    if !paths.is_initialized() {
        anyhow::bail!("No .logbook/ store found. Run `logbook init` first.");
    }
    let kv = KvFile::new(&paths.settings_json);
    Ok((paths, kv))
}

/// Reject values the reminder settings could never use.
fn validate(key: &str, value: &Value) -> anyhow::Result<()> {
    match key {
        keys::ENABLED | keys::IN_APP => {
            if !value.is_boolean() {
                anyhow::bail!("{key} must be true or false");
            }
        }
        keys::CUTOFF_HOUR => {
            let raw = value
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("{key} must be an integer"))?;
            cutoff_hour(raw)?;
        }
        keys::INTENSITY => {
            value.as_str().unwrap_or_default().parse::<NagIntensity>()?;
        }
        keys::TONE => {
            value.as_str().unwrap_or_default().parse::<NagTone>()?;
        }
        _ => {}
    }
    Ok(())
}

/// `logbook config set <key> <value>`
pub fn set(root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let (paths, kv) = settings(root)?;
    // Buddy names are free text, even when they look like numbers.
    let parsed = if key == keys::BUDDY_NAME {
        Value::String(value.to_string())
    } else {
        parse_value(value)
    };
    validate(key, &parsed)?;
    with_lock(&paths, || kv.set(key, parsed))?;
    println!("{key} = {value}");
    Ok(())
}

/// `logbook config get <key>`
pub fn get(root: &Path, key: &str) -> anyhow::Result<()> {
    let (_, kv) = settings(root)?;
    match kv.get(key)? {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `logbook config unset <key>`
pub fn unset(root: &Path, key: &str) -> anyhow::Result<()> {
    let (paths, kv) = settings(root)?;
    if with_lock(&paths, || kv.remove(key))? {
        println!("{key} removed");
    } else {
        println!("{key} was not set");
    }
    Ok(())
}

/// `logbook config list`
pub fn list(root: &Path) -> anyhow::Result<()> {
    let (_, kv) = settings(root)?;
    let config = kv.read()?;
    if config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in &config {
            println!("{k} = {v}");
        }
    }
    Ok(())
}
