//! Configuration loading and merging logic

use super::{defaults::OperatorDefaults, paths, schema::Config};
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::Path;

/// Field manager override
pub const FIELD_MANAGER_ENV: &str = "LIGHTSPEED_FIELD_MANAGER";

/// Namespace override
pub const NAMESPACE_ENV: &str = "LIGHTSPEED_NAMESPACE";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. `path`, or the root config file if no path is given
    /// 3. `defaults`, resolved once at startup with [`OperatorDefaults::from_env`]
    ///
    /// An explicit `path` must exist; the root config file is optional. Keys
    /// the file leaves out keep the value of the layer below.
    pub fn load(path: Option<&Path>, defaults: OperatorDefaults) -> Result<Config> {
        let base = Config {
            defaults,
            ..Config::default()
        };

        let config = match path {
            Some(path) => Self::load_file(path, base)?,
            None => {
                let root = paths::root_config_path();
                if root.exists() {
                    Self::load_file(&root, base)?
                } else {
                    base
                }
            }
        };

        let config = Self::apply_env_overrides(config);
        tracing::debug!(
            field_manager = %config.field_manager,
            namespace = ?config.namespace,
            rag_image = %config.defaults.rag_image_url,
            "loaded configuration"
        );
        Ok(config)
    }

    /// Layer a configuration file over `base`
    pub fn load_file(path: &Path, base: Config) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(base);
        }
        let overlay: Value = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        let mut merged =
            serde_yaml::to_value(&base).context("Failed to serialize base configuration")?;
        merge_values(&mut merged, overlay);

        serde_yaml::from_value(merged)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides(config, |name| std::env::var(name).ok())
    }

    fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(field_manager) = lookup(FIELD_MANAGER_ENV).filter(|v| !v.is_empty()) {
            config.field_manager = field_manager;
        }
        if let Some(namespace) = lookup(NAMESPACE_ENV).filter(|v| !v.is_empty()) {
            config.namespace = Some(namespace);
        }
        config
    }
}

/// Recursively merge mappings; any other overlay value replaces the base
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        // An empty file parses as null and changes nothing
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}
