//! Resource scheme
//!
//! Registry of the resource kinds a controller manages. The patch helper
//! refuses to track kinds that were never registered, and the Kubernetes
//! store uses the registered [`ApiResource`] to address them.

use super::PatchError;
use super::store::gvk_of;
use kube::core::{ApiResource, GroupVersionKind};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Known resource kinds
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    kinds: HashMap<GroupVersionKind, ApiResource>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a statically typed resource kind
    pub fn register<K>(&mut self) -> &mut Self
    where
        K: kube::Resource,
        K::DynamicType: Default,
    {
        let resource = ApiResource::erase::<K>(&K::DynamicType::default());
        tracing::debug!(kind = %resource.kind, group = %resource.group, "registered kind");
        self.kinds.insert(gvk_of::<K>(), resource);
        self
    }

    /// Resolve the kind of `resource`
    pub fn resolve<K>(&self, _resource: &K) -> Result<GroupVersionKind, PatchError>
    where
        K: kube::Resource,
        K::DynamicType: Default,
    {
        let gvk = gvk_of::<K>();
        if self.kinds.contains_key(&gvk) {
            Ok(gvk)
        } else {
            Err(PatchError::SchemaResolution {
                group: gvk.group,
                version: gvk.version,
                kind: gvk.kind,
            })
        }
    }

    /// API coordinates of a registered kind
    pub fn api_resource(&self, gvk: &GroupVersionKind) -> Option<&ApiResource> {
        self.kinds.get(gvk)
    }
}

/// Convert a typed resource to its unstructured form
pub fn to_unstructured<K: Serialize>(resource: &K) -> Result<Value, serde_json::Error> {
    serde_json::to_value(resource)
}
