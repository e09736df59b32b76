//! Component declarations and the engine-facing component list

use serde::{Deserialize, Serialize};

use crate::Configuration;

/// One deployable unit declared for an installation.
///
/// Components are declared once at trigger time; the set never changes for
/// the lifetime of the tracked installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Component name, unique within one installation
    pub component: String,
    /// Target namespace on the runtime
    pub namespace: String,
    /// Prerequisites are applied before ordinary components
    #[serde(default)]
    pub prerequisite: bool,
    /// Per-component override values
    #[serde(default)]
    pub configuration: Configuration,
}

impl ComponentConfig {
    pub fn new(component: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            namespace: namespace.into(),
            prerequisite: false,
            configuration: Configuration::default(),
        }
    }

    /// Mark this component as a prerequisite
    #[must_use]
    pub fn as_prerequisite(mut self) -> Self {
        self.prerequisite = true;
        self
    }

    /// Attach override values for this component
    #[must_use]
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }
}

/// Name/namespace pair handed to the deployment engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub name: String,
    pub namespace: String,
}

/// Declared components split into prerequisites and ordinary components,
/// preserving declaration order within each group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentList {
    pub prerequisites: Vec<ComponentDefinition>,
    pub components: Vec<ComponentDefinition>,
}

impl ComponentList {
    /// Build the engine-facing list from the declared component configs.
    #[must_use]
    pub fn from_configs(configs: &[ComponentConfig]) -> Self {
        let mut list = Self::default();

        for config in configs {
            let definition = ComponentDefinition {
                name: config.component.clone(),
                namespace: config.namespace.clone(),
            };
            if config.prerequisite {
                list.prerequisites.push(definition);
            } else {
                list.components.push(definition);
            }
        }

        list
    }

    /// Total number of declared components across both groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.prerequisites.len() + self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prerequisites.is_empty() && self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_configs_splits_prerequisites_in_declaration_order() {
        let configs = vec![
            ComponentConfig::new("cluster-essentials", "platform-system").as_prerequisite(),
            ComponentConfig::new("istio", "istio-system").as_prerequisite(),
            ComponentConfig::new("core", "platform-system"),
            ComponentConfig::new("serverless", "platform-system"),
        ];

        let list = ComponentList::from_configs(&configs);

        assert_eq!(list.len(), 4);
        assert_eq!(
            list.prerequisites
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>(),
            vec!["cluster-essentials", "istio"]
        );
        assert_eq!(
            list.components
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>(),
            vec!["core", "serverless"]
        );
    }

    #[test]
    fn empty_config_list_produces_empty_component_list() {
        let list = ComponentList::from_configs(&[]);
        assert!(list.is_empty());
    }
}
