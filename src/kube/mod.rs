//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides the
//! [`KubeStore`] the patch helper writes through.

mod store;

pub use store::KubeStore;

use anyhow::{Context, Result};
use kube::{Client, Config};

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client() -> Result<Client> {
    let config = Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    tracing::debug!(cluster = %config.cluster_url, "connecting to cluster");

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}
