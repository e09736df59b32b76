//! Override document assembly
//!
//! Global configuration entries and per-component override values are
//! merged into one nested document handed to the deployment engine.
//! Dotted keys create nested maps; per-component values are scoped under
//! the component name. A shape conflict between two entries (map vs.
//! scalar on the same key) fails the assembly.

use caravel_errors::{ConfigError, Result};
use caravel_types::{ComponentConfig, Configuration};
use serde_json::{Map, Value};

/// Merged override document for one deployment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overrides(Value);

impl Overrides {
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.as_object().is_none_or(Map::is_empty)
    }
}

/// Builds the merged override document entry by entry
#[derive(Debug, Clone, Default)]
pub struct OverridesBuilder {
    root: Map<String, Value>,
}

impl OverridesBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge all entries of the global configuration bag.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry's key is malformed or conflicts with a
    /// previously merged entry.
    pub fn add_global(&mut self, configuration: &Configuration) -> Result<()> {
        for entry in &configuration.entries {
            self.insert(&entry.key, entry.value.clone())?;
        }
        Ok(())
    }

    /// Merge a component's override values, scoped under the component
    /// name.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry's key is malformed or conflicts with a
    /// previously merged entry.
    pub fn add_component(&mut self, component: &ComponentConfig) -> Result<()> {
        for entry in &component.configuration.entries {
            let key = format!("{}.{}", component.component, entry.key);
            self.insert(&key, entry.value.clone())?;
        }
        Ok(())
    }

    /// Finish the assembly.
    #[must_use]
    pub fn build(self) -> Overrides {
        Overrides(Value::Object(self.root))
    }

    fn insert(&mut self, key: &str, value: Value) -> Result<()> {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ConfigError::InvalidOverride {
                key: key.to_string(),
                message: "empty key segment".to_string(),
            }
            .into());
        }

        let Some((leaf, branches)) = segments.split_last() else {
            return Ok(());
        };

        let mut current = &mut self.root;
        for segment in branches {
            let slot = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match slot {
                Value::Object(map) => current = map,
                _ => {
                    return Err(ConfigError::OverrideConflict {
                        key: key.to_string(),
                    }
                    .into())
                }
            }
        }

        merge_entry(current, key, (*leaf).to_string(), value)
    }
}

/// Merge one value into a map slot. Maps merge recursively, scalars
/// overwrite scalars (last writer wins), and a map/scalar shape mismatch
/// is a conflict.
fn merge_entry(
    target: &mut Map<String, Value>,
    key_path: &str,
    segment: String,
    value: Value,
) -> Result<()> {
    let Some(existing) = target.get_mut(&segment) else {
        target.insert(segment, value);
        return Ok(());
    };

    match (&mut *existing, value) {
        (Value::Object(existing_map), Value::Object(incoming)) => {
            for (key, nested) in incoming {
                merge_entry(existing_map, key_path, key, nested)?;
            }
            Ok(())
        }
        (Value::Object(_), _) | (_, Value::Object(_)) => Err(ConfigError::OverrideConflict {
            key: key_path.to_string(),
        }
        .into()),
        (slot, incoming) => {
            *slot = incoming;
            Ok(())
        }
    }
}

/// Assemble the override document for one installation: global entries
/// first, then each component's values scoped under its name.
///
/// # Errors
///
/// Returns an error if any entry's key is malformed or two entries
/// conflict.
pub fn build_overrides(
    components: &[ComponentConfig],
    global: &Configuration,
) -> Result<Overrides> {
    let mut builder = OverridesBuilder::new();
    builder.add_global(global)?;
    for component in components {
        builder.add_component(component)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_errors::Error;
    use caravel_types::ConfigEntry;
    use serde_json::json;

    #[test]
    fn dotted_keys_build_nested_maps() {
        let global = Configuration::default()
            .with_entry(ConfigEntry::new("global.domain", "platform.local"))
            .with_entry(ConfigEntry::new("global.tls.enabled", true));

        let overrides = build_overrides(&[], &global).unwrap();

        assert_eq!(
            overrides.as_value(),
            &json!({
                "global": {
                    "domain": "platform.local",
                    "tls": { "enabled": true }
                }
            })
        );
    }

    #[test]
    fn component_values_are_scoped_under_the_component_name() {
        let component = ComponentConfig::new("istio", "istio-system").with_configuration(
            Configuration::default().with_entry(ConfigEntry::new("gateway.replicas", 2)),
        );

        let overrides = build_overrides(&[component], &Configuration::default()).unwrap();

        assert_eq!(
            overrides.as_value(),
            &json!({ "istio": { "gateway": { "replicas": 2 } } })
        );
    }

    #[test]
    fn scalar_map_conflict_fails_assembly() {
        let global = Configuration::default()
            .with_entry(ConfigEntry::new("global.domain", "platform.local"))
            .with_entry(ConfigEntry::new("global.domain.suffix", "local"));

        let err = build_overrides(&[], &global).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::OverrideConflict { .. })
        ));
    }

    #[test]
    fn later_scalar_wins_over_earlier_scalar() {
        let global = Configuration::default()
            .with_entry(ConfigEntry::new("global.profile", "evaluation"))
            .with_entry(ConfigEntry::new("global.profile", "production"));

        let overrides = build_overrides(&[], &global).unwrap();
        assert_eq!(
            overrides.as_value(),
            &json!({ "global": { "profile": "production" } })
        );
    }

    #[test]
    fn empty_key_segment_is_rejected() {
        let global = Configuration::default().with_entry(ConfigEntry::new("global..domain", "x"));

        let err = build_overrides(&[], &global).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidOverride { .. })
        ));
    }

    #[test]
    fn empty_inputs_build_an_empty_document() {
        let overrides = build_overrides(&[], &Configuration::default()).unwrap();
        assert!(overrides.is_empty());
    }
}
