//! Condition records
//!
//! A condition is a typed, timestamped health record for one sub-aspect of a
//! resource. Reconcilers record the outcome of each sub-process as a
//! condition and then collapse the whole list into the reserved `Ready`
//! condition with [`Conditions::mirror`].
//!
//! Structure:
//! - `mod.rs` - Record and tag types shared by the other submodules
//! - `message.rs` - Verbatim vs. templated condition messages
//! - `list.rs` - The per-resource condition list and its operations
//! - `aggregate.rs` - Severity-ordered aggregation into one condition

mod aggregate;
mod list;
mod message;

pub use list::*;
pub use message::ConditionMessage;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Message shown when every sub-condition is satisfied
pub const READY_MESSAGE: &str = "Setup complete";

/// Initial message shown before the first reconcile finished
pub const READY_INIT_MESSAGE: &str = "Setup not started";

/// Message template used when a managed deployment does not become ready
pub const DEPLOYMENT_READY_ERROR_MESSAGE: &str = "Deployment not ready: %s";

/// Condition type tag
///
/// Types are open-ended (every reconciler defines its own), so this is a
/// string-backed newtype rather than a closed enum. Well-known types are
/// available as associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionType(Cow<'static, str>);

impl ConditionType {
    /// Reserved aggregate type summarizing the operational state of the object
    pub const READY: ConditionType = ConditionType(Cow::Borrowed("Ready"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Whether this is the reserved aggregate type
    pub fn is_ready(&self) -> bool {
        *self == Self::READY
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&'static str> for ConditionType {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ConditionType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Short machine-readable token explaining the current status
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionReason(Cow<'static, str>);

impl ConditionReason {
    /// Not in `True` because creation has been requested
    pub const REQUESTED: ConditionReason = ConditionReason(Cow::Borrowed("Requested"));
    /// Not in `True` because the underlying object is initializing
    pub const INIT: ConditionReason = ConditionReason(Cow::Borrowed("Init"));
    /// In `True` because the underlying object is ready
    pub const READY: ConditionReason = ConditionReason(Cow::Borrowed("Ready"));
    /// Not in `True` because the underlying object encountered an error
    pub const ERROR: ConditionReason = ConditionReason(Cow::Borrowed("Error"));

    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for ConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&'static str> for ConditionReason {
    fn from(reason: &'static str) -> Self {
        Self(Cow::Borrowed(reason))
    }
}

impl From<String> for ConditionReason {
    fn from(reason: String) -> Self {
        Self(Cow::Owned(reason))
    }
}

/// Tri-state condition status, serialized the way Kubernetes does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        };
        f.pad(s)
    }
}

/// How bad a non-`True` condition is
///
/// Only meaningful while the status is not `True`. `None` serializes as an
/// empty string and is omitted from the wire form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    #[serde(rename = "")]
    None,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Aggregation rank, lower is more severe
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
            Severity::None => 3,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Severity::None)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::None => "",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        f.pad(s)
    }
}

/// Condition record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "Severity::is_none")]
    pub severity: Severity,

    pub last_transition_time: DateTime<Utc>,

    #[serde(default)]
    pub reason: ConditionReason,

    #[serde(default)]
    pub message: String,
}

impl Condition {
    /// `True` condition; always carries reason `Ready` and no severity
    pub fn true_condition(condition_type: ConditionType, message: impl Into<String>) -> Self {
        Self {
            condition_type,
            status: ConditionStatus::True,
            severity: Severity::None,
            last_transition_time: now(),
            reason: ConditionReason::READY,
            message: message.into(),
        }
    }

    /// `False` condition with the given severity
    pub fn false_condition(
        condition_type: ConditionType,
        reason: ConditionReason,
        severity: Severity,
        message: impl Into<ConditionMessage>,
    ) -> Self {
        let message: ConditionMessage = message.into();
        Self {
            condition_type,
            status: ConditionStatus::False,
            severity,
            last_transition_time: now(),
            reason,
            message: message.render(),
        }
    }

    /// `Unknown` condition; severity is always `None`
    pub fn unknown_condition(
        condition_type: ConditionType,
        reason: ConditionReason,
        message: impl Into<String>,
    ) -> Self {
        Self {
            condition_type,
            status: ConditionStatus::Unknown,
            severity: Severity::None,
            last_transition_time: now(),
            reason,
            message: message.into(),
        }
    }
}

/// Current time at the precision Kubernetes stores for `metav1.Time`
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
