//! OpenShift AI Lightspeed operator core
//!
//! Condition bookkeeping with severity-based aggregation, and a patch helper
//! that writes back only what a reconcile pass changed, with the body and the
//! status subresource as separate conflict-guarded writes.

pub mod cli;
pub mod condition;
pub mod config;
pub mod kube;
pub mod models;
pub mod patch;

// Re-export commonly used types for convenience
pub use condition::{
    Condition, ConditionReason, ConditionStatus, ConditionType, Conditions, Severity,
};
pub use patch::{ObjectStore, PatchError, PatchHelper, PatchReport, Scheme, SectionOutcome};
