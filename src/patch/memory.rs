//! In-memory object store
//!
//! Versioned, thread-safe store with the same conflict semantics as the API
//! server: every accepted write bumps a store-wide revision and a patch whose
//! base version is stale is rejected. Intended for reconciler tests.

use super::diff::STATUS_SECTION;
use super::store::{ObjectKey, ObjectStore, PatchRequest, PatchTarget, StoreError};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A write attempt as seen by the store
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub key: ObjectKey,
    pub target: PatchTarget,
    pub accepted: bool,
}

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<ObjectKey, Value>,
    revision: u64,
    writes: Vec<WriteRecord>,
}

impl Inner {
    fn next_revision(&mut self) -> String {
        self.revision += 1;
        self.revision.to_string()
    }
}

/// Thread-safe in-memory store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an object, returning its new resource version
    pub fn insert(&self, key: &ObjectKey, mut object: Value) -> String {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let version = state.next_revision();
        set_resource_version(&mut object, &version);
        state.objects.insert(key.clone(), object);
        version
    }

    /// Remove an object
    pub fn remove(&self, key: &ObjectKey) -> Option<Value> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.objects.remove(key)
    }

    /// Simulate a write by another client, advancing the object's version
    pub fn touch(&self, key: &ObjectKey) -> Option<String> {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !state.objects.contains_key(key) {
            return None;
        }
        let version = state.next_revision();
        if let Some(object) = state.objects.get_mut(key) {
            set_resource_version(object, &version);
        }
        Some(version)
    }

    /// Current copy of an object
    pub fn object(&self, key: &ObjectKey) -> Option<Value> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.objects.get(key).cloned()
    }

    /// All write attempts in order, including rejected ones
    pub fn writes(&self) -> Vec<WriteRecord> {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.writes.clone()
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryStore {
    async fn get(&self, key: &ObjectKey) -> Result<Value, StoreError> {
        self.object(key).ok_or(StoreError::NotFound)
    }

    async fn patch(&self, request: PatchRequest) -> Result<String, StoreError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let state = &mut *guard;

        let current_version = match state.objects.get(&request.key) {
            Some(object) => resource_version(object),
            None => {
                state.writes.push(record(&request, false));
                return Err(StoreError::NotFound);
            }
        };

        if let Some(base) = &request.base_version {
            if current_version.as_deref() != Some(base.as_str()) {
                state.writes.push(record(&request, false));
                return Err(StoreError::Conflict(format!(
                    "{} has version {}, patch based on {}",
                    request.key,
                    current_version.unwrap_or_default(),
                    base
                )));
            }
        }

        let patch = restrict_to_target(&request.patch, request.target);
        let version = state.next_revision();
        if let Some(object) = state.objects.get_mut(&request.key) {
            json_patch::merge(object, &patch);
            set_resource_version(object, &version);
        }
        state.writes.push(record(&request, true));
        Ok(version)
    }
}

fn record(request: &PatchRequest, accepted: bool) -> WriteRecord {
    WriteRecord {
        key: request.key.clone(),
        target: request.target,
        accepted,
    }
}

/// A body write never touches status and a status write touches nothing else
fn restrict_to_target(patch: &Value, target: PatchTarget) -> Value {
    match target {
        PatchTarget::Body => {
            let mut body = patch.clone();
            if let Value::Object(map) = &mut body {
                map.remove(STATUS_SECTION);
            }
            body
        }
        PatchTarget::Status => match patch.get(STATUS_SECTION) {
            Some(status) => json!({ STATUS_SECTION: status }),
            None => json!({}),
        },
    }
}

fn resource_version(object: &Value) -> Option<String> {
    object
        .get("metadata")
        .and_then(|m| m.get("resourceVersion"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn set_resource_version(object: &mut Value, version: &str) {
    if let Value::Object(map) = object {
        let metadata = map
            .entry("metadata")
            .or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(metadata) = metadata {
            metadata.insert("resourceVersion".to_string(), json!(version));
        }
    }
}
