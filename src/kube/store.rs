//! Kubernetes-backed object store
//!
//! Addresses resources through `Api<DynamicObject>` so any kind registered in
//! the [`Scheme`] can be read and patched. Body writes go to the resource,
//! status writes to its status subresource; both are JSON merge patches that
//! carry the base `resourceVersion`, which makes the API server reject them
//! with 409 once another writer got in between.

use crate::patch::{ObjectKey, ObjectStore, PatchRequest, PatchTarget, Scheme, StoreError};
use kube::Client;
use kube::api::{Api, DynamicObject, Patch, PatchParams};
use kube::core::ApiResource;
use serde_json::{Value, json};

/// [`ObjectStore`] on top of the Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    scheme: Scheme,
    field_manager: String,
}

impl KubeStore {
    pub fn new(client: Client, scheme: Scheme, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            scheme,
            field_manager: field_manager.into(),
        }
    }

    fn api(&self, key: &ObjectKey) -> Api<DynamicObject> {
        let resource = self
            .scheme
            .api_resource(&key.kind)
            .cloned()
            .unwrap_or_else(|| ApiResource::from_gvk(&key.kind));
        match &key.namespace {
            Some(namespace) => Api::namespaced_with(self.client.clone(), namespace, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        }
    }

    fn params(&self) -> PatchParams {
        PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for KubeStore {
    async fn get(&self, key: &ObjectKey) -> Result<Value, StoreError> {
        let object = self.api(key).get(&key.name).await.map_err(classify)?;
        serde_json::to_value(&object).map_err(|e| StoreError::Other(e.into()))
    }

    async fn patch(&self, request: PatchRequest) -> Result<String, StoreError> {
        let api = self.api(&request.key);
        let body = with_resource_version(request.patch, request.base_version.as_deref());
        let patch = Patch::Merge(&body);
        let name = request.key.name.as_str();

        tracing::debug!(key = %request.key, section = %request.target, "sending merge patch");
        let object = match request.target {
            PatchTarget::Body => api.patch(name, &self.params(), &patch).await,
            PatchTarget::Status => api.patch_status(name, &self.params(), &patch).await,
        }
        .map_err(classify)?;

        Ok(object.metadata.resource_version.unwrap_or_default())
    }
}

/// Map API failures onto the outcomes the patch helper distinguishes
fn classify(err: kube::Error) -> StoreError {
    match err {
        kube::Error::Api(response) if response.code == 409 => {
            StoreError::Conflict(response.message)
        }
        kube::Error::Api(response) if response.code == 404 => StoreError::NotFound,
        other => StoreError::Other(other.into()),
    }
}

/// Pin the patch to `version` for optimistic concurrency
fn with_resource_version(mut patch: Value, version: Option<&str>) -> Value {
    let Some(version) = version else {
        return patch;
    };
    if let Value::Object(map) = &mut patch {
        let metadata = map.entry("metadata").or_insert_with(|| json!({}));
        if let Value::Object(metadata) = metadata {
            metadata.insert("resourceVersion".to_string(), json!(version));
        }
    }
    patch
}
