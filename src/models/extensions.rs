//! Status helpers for condition-carrying resources
//!
//! Implemented as a trait so reconcilers can query readiness without
//! knowing the concrete resource type.

use crate::condition::{Condition, ConditionStatus, ConditionType, Conditions, Severity};

/// Readiness queries over a resource's condition list
pub trait ResourceStatus {
    /// The resource's conditions, if it has a status yet
    fn conditions(&self) -> Option<&Conditions>;

    /// The aggregate `Ready` condition
    fn ready_condition(&self) -> Option<&Condition> {
        self.conditions()?.get(&ConditionType::READY)
    }

    /// Returns true if the aggregate `Ready` condition is `True`
    fn is_ready(&self) -> bool {
        self.conditions()
            .is_some_and(|c| c.is_true(&ConditionType::READY))
    }

    /// Returns true if the aggregate `Ready` condition reports an error
    fn is_failed(&self) -> bool {
        self.ready_condition().is_some_and(|c| {
            c.status == ConditionStatus::False && c.severity == Severity::Error
        })
    }
}
