//! Configuration schema definitions

use super::defaults::OperatorDefaults;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Field manager recorded on every patch
    #[serde(default = "default_field_manager")]
    pub field_manager: String,

    /// Namespace used when a command does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Defaults for unset spec fields
    #[serde(default)]
    pub defaults: OperatorDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_manager: default_field_manager(),
            namespace: None,
            defaults: OperatorDefaults::default(),
        }
    }
}

fn default_field_manager() -> String {
    "openshift-ai-lightspeed-operator".to_string()
}
