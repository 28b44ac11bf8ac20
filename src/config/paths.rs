//! Configuration file location
//!
//! `LIGHTSPEED_CONFIG_DIR` wins; otherwise the platform config directory
//! (`~/.config/openshift-ai-lightspeed` on Linux).

use std::path::PathBuf;

const APP_NAME: &str = "openshift-ai-lightspeed";

/// Get the configuration directory path
pub fn config_dir() -> PathBuf {
    std::env::var("LIGHTSPEED_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            directories::ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
        })
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}
