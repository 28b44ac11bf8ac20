//! Object store seam
//!
//! The patch helper only needs two calls from whatever persists resources:
//! read the current object and apply a merge patch guarded by a resource
//! version. Anything that speaks this trait can back a reconciler.

use kube::core::GroupVersionKind;
use serde_json::Value;
use std::fmt;

/// Identity of a stored resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub kind: GroupVersionKind,
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectKey {
    pub fn new(kind: GroupVersionKind, namespace: Option<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace,
            name: name.into(),
        }
    }

    /// Key for a typed resource kind
    pub fn of<K>(namespace: Option<String>, name: impl Into<String>) -> Self
    where
        K: kube::Resource,
        K::DynamicType: Default,
    {
        Self::new(gvk_of::<K>(), namespace, name)
    }
}

/// Formats as `kind:namespace:name`
impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind.kind,
            self.namespace.as_deref().unwrap_or_default(),
            self.name
        )
    }
}

/// Group/version/kind of a statically typed resource
pub fn gvk_of<K>() -> GroupVersionKind
where
    K: kube::Resource,
    K::DynamicType: Default,
{
    let dt = K::DynamicType::default();
    GroupVersionKind::gvk(&K::group(&dt), &K::version(&dt), &K::kind(&dt))
}

/// Which part of a resource a write targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchTarget {
    /// Everything except `status`
    Body,
    /// The status subresource
    Status,
}

impl fmt::Display for PatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchTarget::Body => f.write_str("body"),
            PatchTarget::Status => f.write_str("status"),
        }
    }
}

/// A single conflict-guarded merge patch
#[derive(Debug, Clone, PartialEq)]
pub struct PatchRequest {
    pub key: ObjectKey,
    pub target: PatchTarget,
    /// Resource version the patch was computed against
    pub base_version: Option<String>,
    /// RFC 7386 merge patch
    pub patch: Value,
}

/// Store failures the patch helper distinguishes
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("resource version conflict: {0}")]
    Conflict(String),

    #[error("resource not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Versioned object store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the current unstructured object
    async fn get(&self, key: &ObjectKey) -> Result<Value, StoreError>;

    /// Apply a merge patch, returning the new resource version
    ///
    /// Must fail with [`StoreError::Conflict`] when `base_version` is set and
    /// no longer matches the stored version.
    async fn patch(&self, request: PatchRequest) -> Result<String, StoreError>;
}
