//! Configuration bags carried by trigger inputs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single configuration entry.
///
/// Secret entries keep their value out of `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub secret: bool,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            secret: false,
        }
    }

    /// Mark this entry as secret; its value is redacted from `Debug`.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.secret = true;
        self
    }
}

impl std::fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("ConfigEntry");
        dbg.field("key", &self.key);
        if self.secret {
            dbg.field("value", &"<redacted>");
        } else {
            dbg.field("value", &self.value);
        }
        dbg.field("secret", &self.secret).finish()
    }
}

/// Ordered bag of configuration entries, global or per-component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    pub entries: Vec<ConfigEntry>,
}

impl Configuration {
    #[must_use]
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry, preserving insertion order
    #[must_use]
    pub fn with_entry(mut self, entry: ConfigEntry) -> Self {
        self.entries.push(entry);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_entry_redacts_value_in_debug() {
        let entry = ConfigEntry::new("global.adminPassword", "hunter2").sensitive();
        let rendered = format!("{entry:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn plain_entry_shows_value_in_debug() {
        let entry = ConfigEntry::new("global.domain", "platform.local");
        let rendered = format!("{entry:?}");
        assert!(rendered.contains("platform.local"));
    }
}
