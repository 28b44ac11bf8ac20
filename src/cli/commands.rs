//! CLI command handlers

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::condition::{ConditionType, Severity};
use crate::config::Config;
use crate::kube::{KubeStore, create_client};
use crate::models::{OpenShiftAILightspeed, ResourceStatus};
use crate::patch::{ObjectKey, ObjectStore, Scheme};

/// Print the resolved configuration as YAML
pub fn handle_defaults(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}

/// Fetch a resource and print its conditions and readiness
pub async fn handle_status(config: &Config, name: &str, namespace: Option<String>) -> Result<()> {
    let client = create_client().await?;
    let namespace = namespace
        .or_else(|| config.namespace.clone())
        .unwrap_or_else(|| client.default_namespace().to_string());

    let mut scheme = Scheme::new();
    scheme.register::<OpenShiftAILightspeed>();
    let store = KubeStore::new(client, scheme, config.field_manager.clone());

    let key = ObjectKey::of::<OpenShiftAILightspeed>(Some(namespace), name);
    let object = store
        .get(&key)
        .await
        .with_context(|| format!("Failed to fetch {}", key))?;
    let resource: OpenShiftAILightspeed = serde_json::from_value(object)
        .with_context(|| format!("Failed to decode {}", key))?;

    print!("{}", render_status(&resource));
    Ok(())
}

/// Human-readable condition summary
pub fn render_status(resource: &OpenShiftAILightspeed) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}/{}",
        resource.metadata.namespace.as_deref().unwrap_or_default(),
        resource.metadata.name.as_deref().unwrap_or_default()
    );

    let Some(conditions) = resource.conditions() else {
        let _ = writeln!(out, "  no status reported");
        return out;
    };

    for condition in conditions {
        let severity = match condition.severity {
            Severity::None => String::new(),
            severity => format!(" ({})", severity),
        };
        let _ = writeln!(
            out,
            "  {:<24} {:<8}{} {}: {}",
            condition.condition_type,
            condition.status,
            severity,
            condition.reason,
            condition.message
        );
    }

    let aggregate = conditions.mirror(ConditionType::READY);
    let _ = writeln!(
        out,
        "  aggregate: {} {}: {}",
        aggregate.status, aggregate.reason, aggregate.message
    );
    let _ = writeln!(out, "  ready: {}", resource.is_ready());
    out
}
