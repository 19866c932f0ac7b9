//! Flat JSON object file used for settings and small bits of state.
//!
//! One primitive (or array) per key. Every write rewrites the whole file
//! through [`write_atomic`](crate::write_atomic).

use anyhow::Context;
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct KvFile {
    path: PathBuf,
}

impl KvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole object. Missing file reads as empty.
    pub fn read(&self) -> anyhow::Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let val: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        match val {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn write(&self, map: &Map<String, Value>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(map)?;
        crate::write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.read()?.remove(key))
    }

    pub fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        let mut map = self.read()?;
        map.insert(key.to_string(), value);
        self.write(&map)
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let mut map = self.read()?;
        let existed = map.remove(key).is_some();
        if existed {
            self.write(&map)?;
        }
        Ok(existed)
    }
}

/// Parse a command-line string into a JSON value (bool/number/string).
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                Value::String(s.to_string())
            }
        }
    }
}
