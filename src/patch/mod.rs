//! Patch helper
//!
//! Tracks one resource across a reconcile pass and writes back only what the
//! pass changed. The body and the status subresource are written separately,
//! each as a merge patch guarded by the resource version observed when the
//! helper was opened.
//!
//! Structure:
//! - `store.rs` - The `ObjectStore` seam and request/error types
//! - `scheme.rs` - Registry of managed kinds
//! - `diff.rs` - Change sets and merge patch construction
//! - `memory.rs` - In-memory `ObjectStore` for tests

mod diff;
mod memory;
mod scheme;
mod store;

pub use diff::{ChangeSet, STATUS_SECTION, body_patch, merge_patch, status_patch};
pub use memory::{InMemoryStore, WriteRecord};
pub use scheme::{Scheme, to_unstructured};
pub use store::*;

use kube::ResourceExt;
use kube::core::GroupVersionKind;
use serde::Serialize;
use serde_json::Value;

/// Patch helper errors
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("kind {group}/{version}/{kind} is not registered in the scheme")]
    SchemaResolution {
        group: String,
        version: String,
        kind: String,
    },

    #[error("failed to convert {key} to unstructured form: {source}")]
    Serialization {
        key: ObjectKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("{section} update of {key} conflicted with a concurrent writer")]
    Conflict {
        key: ObjectKey,
        section: PatchTarget,
    },

    #[error("{section} update of {key} failed: {source}")]
    Store {
        key: ObjectKey,
        section: PatchTarget,
        #[source]
        source: StoreError,
    },
}

impl PatchError {
    /// Whether the caller should reload the resource and run the pass again
    pub fn is_conflict(&self) -> bool {
        matches!(self, PatchError::Conflict { .. })
    }
}

/// What happened to one section during [`PatchHelper::apply_patch`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SectionOutcome {
    /// Section unchanged, nothing written
    #[default]
    Skipped,
    /// Written; the store now holds `resource_version`
    Applied { resource_version: String },
    /// Resource was deleted concurrently; nothing to write to
    Gone,
}

/// Per-section result of a successful [`PatchHelper::apply_patch`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchReport {
    pub body: SectionOutcome,
    pub status: SectionOutcome,
}

/// Snapshot-diff patch helper for one reconcile pass
///
/// Open it before the reconciler mutates the resource, then call
/// [`apply_patch`](Self::apply_patch) with the mutated resource.
pub struct PatchHelper<'a, K> {
    store: &'a dyn ObjectStore,
    gvk: GroupVersionKind,
    key: ObjectKey,
    base_version: Option<String>,
    before_object: K,
    before: Value,
    after: Option<Value>,
    changes: ChangeSet,
    finalizer: String,
}

impl<'a, K> PatchHelper<'a, K>
where
    K: kube::Resource + Clone + Serialize,
    K::DynamicType: Default,
{
    /// Snapshot `resource` as the baseline for this pass
    pub fn open(
        resource: &K,
        store: &'a dyn ObjectStore,
        scheme: &Scheme,
    ) -> Result<Self, PatchError> {
        let gvk = scheme.resolve(resource)?;
        let key = ObjectKey::new(gvk.clone(), resource.namespace(), resource.name_any());
        let before = to_unstructured(resource).map_err(|source| PatchError::Serialization {
            key: key.clone(),
            source,
        })?;
        let base_version = resource.resource_version();
        if base_version.is_none() {
            tracing::warn!(%key, "no resourceVersion, writes will not be conflict-checked");
        }
        let finalizer = format!("openshift-ai.io/{}", gvk.kind).to_lowercase();

        tracing::debug!(%key, version = ?base_version, "captured snapshot before reconcile");

        Ok(Self {
            store,
            gvk,
            key,
            base_version,
            before_object: resource.clone(),
            before,
            after: None,
            changes: ChangeSet::default(),
            finalizer,
        })
    }

    /// Snapshot `resource` as the result of this pass and diff it
    pub fn capture_after(&mut self, resource: &K) -> Result<&ChangeSet, PatchError> {
        let after = to_unstructured(resource).map_err(|source| PatchError::Serialization {
            key: self.key.clone(),
            source,
        })?;
        self.changes = ChangeSet::between(&self.before, &after);
        self.after = Some(after);

        tracing::debug!(
            key = %self.key,
            sections = ?self.changes.sections().collect::<Vec<_>>(),
            "computed change set"
        );
        Ok(&self.changes)
    }

    /// Write the changed sections back to the store
    ///
    /// Captures `resource` as the after snapshot unless
    /// [`capture_after`](Self::capture_after) already ran. The body and the
    /// status are written independently: a failed body write does not stop
    /// the status write. A resource deleted mid-pass is not an error.
    ///
    /// Both writes are guarded by the version captured at open, except that
    /// a successful body write advances the object's single resource version,
    /// so the status write is then based on the version that write returned.
    ///
    /// When both writes fail the store error is returned in preference to a
    /// conflict; otherwise the first failure is returned. Successful writes
    /// are never rolled back.
    pub async fn apply_patch(&mut self, resource: &K) -> Result<PatchReport, PatchError> {
        if self.after.is_none() {
            self.capture_after(resource)?;
        }
        let after = match &self.after {
            Some(after) => after,
            None => return Ok(PatchReport::default()),
        };

        let mut report = PatchReport::default();
        let mut failures: Vec<PatchError> = Vec::new();
        let mut base_version = self.base_version.clone();

        if self.changes.body_changed() {
            let patch = body_patch(&self.before, after);
            match self.write(PatchTarget::Body, patch, base_version.clone()).await {
                Ok(outcome) => {
                    // Our own write advanced the version the status write is based on
                    if let SectionOutcome::Applied { resource_version } = &outcome {
                        base_version = Some(resource_version.clone());
                    }
                    report.body = outcome;
                }
                Err(err) => failures.push(err),
            }
        }

        if self.changes.status_changed() {
            let patch = status_patch(&self.before, after);
            match self.write(PatchTarget::Status, patch, base_version).await {
                Ok(outcome) => report.status = outcome,
                Err(err) => failures.push(err),
            }
        }

        let fatal = failures.iter().position(|e| !e.is_conflict()).unwrap_or(0);
        if failures.is_empty() {
            Ok(report)
        } else {
            Err(failures.swap_remove(fatal))
        }
    }

    async fn write(
        &self,
        section: PatchTarget,
        patch: Value,
        base_version: Option<String>,
    ) -> Result<SectionOutcome, PatchError> {
        let request = PatchRequest {
            key: self.key.clone(),
            target: section,
            base_version,
            patch,
        };

        match self.store.patch(request).await {
            Ok(resource_version) => {
                tracing::debug!(key = %self.key, %section, %resource_version, "patched");
                Ok(SectionOutcome::Applied { resource_version })
            }
            Err(StoreError::NotFound) => {
                tracing::info!(key = %self.key, %section, "resource gone, skipping update");
                Ok(SectionOutcome::Gone)
            }
            Err(StoreError::Conflict(message)) => {
                tracing::info!(key = %self.key, %section, %message, "update conflict");
                Err(PatchError::Conflict {
                    key: self.key.clone(),
                    section,
                })
            }
            Err(source) => {
                tracing::error!(key = %self.key, %section, error = %source, "update failed");
                Err(PatchError::Store {
                    key: self.key.clone(),
                    section,
                    source,
                })
            }
        }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    /// Unstructured snapshot taken at [`open`](Self::open)
    pub fn before(&self) -> &Value {
        &self.before
    }

    /// Unstructured snapshot of the pass result, once captured
    pub fn after(&self) -> Option<&Value> {
        self.after.as_ref()
    }

    /// Typed copy of the resource as it was at [`open`](Self::open)
    pub fn before_object(&self) -> &K {
        &self.before_object
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Finalizer name the operator uses for this kind
    pub fn finalizer(&self) -> &str {
        &self.finalizer
    }
}
