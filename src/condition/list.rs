//! Per-resource condition list
//!
//! Holds at most one condition per type. Entries are overwritten, never
//! removed, so the list keeps the last known state of every sub-process.

use super::{
    Condition, ConditionMessage, ConditionReason, ConditionStatus, ConditionType, Severity,
};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered list of conditions, unique by type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    /// Build a list from the given conditions
    ///
    /// Later entries replace earlier ones of the same type.
    pub fn new(conditions: impl IntoIterator<Item = Condition>) -> Self {
        conditions.into_iter().collect()
    }

    /// Seed the list with `initial` if it is still empty
    pub fn init(&mut self, initial: &Conditions) {
        if self.0.is_empty() {
            self.0 = initial.0.clone();
        }
    }

    /// Insert or replace the condition with the same type
    pub fn set(&mut self, condition: Condition) {
        match self
            .0
            .iter_mut()
            .find(|existing| existing.condition_type == condition.condition_type)
        {
            Some(existing) => *existing = condition,
            None => self.0.push(condition),
        }
    }

    /// Get the condition with the given type
    pub fn get(&self, condition_type: &ConditionType) -> Option<&Condition> {
        self.0
            .iter()
            .find(|c| &c.condition_type == condition_type)
    }

    /// Whether the condition exists and is `True`
    pub fn is_true(&self, condition_type: &ConditionType) -> bool {
        self.get(condition_type)
            .is_some_and(|c| c.status == ConditionStatus::True)
    }

    /// Whether the condition exists and is `False`
    pub fn is_false(&self, condition_type: &ConditionType) -> bool {
        self.get(condition_type)
            .is_some_and(|c| c.status == ConditionStatus::False)
    }

    /// Whether the condition is `Unknown`
    ///
    /// A missing condition counts as unknown.
    pub fn is_unknown(&self, condition_type: &ConditionType) -> bool {
        self.get(condition_type)
            .is_none_or(|c| c.status == ConditionStatus::Unknown)
    }

    pub fn mark_true(&mut self, condition_type: ConditionType, message: impl Into<String>) {
        self.set(Condition::true_condition(condition_type, message));
    }

    /// Record a failure
    ///
    /// `message` is either a verbatim string or a
    /// [`ConditionMessage::template`] with its arguments.
    pub fn mark_false(
        &mut self,
        condition_type: ConditionType,
        reason: ConditionReason,
        severity: Severity,
        message: impl Into<ConditionMessage>,
    ) {
        self.set(Condition::false_condition(
            condition_type,
            reason,
            severity,
            message,
        ));
    }

    pub fn mark_unknown(
        &mut self,
        condition_type: ConditionType,
        reason: ConditionReason,
        message: impl Into<String>,
    ) {
        self.set(Condition::unknown_condition(condition_type, reason, message));
    }

    /// Whether every condition other than `Ready` is `True`
    pub fn all_sub_conditions_true(&self) -> bool {
        self.0
            .iter()
            .filter(|c| !c.condition_type.is_ready())
            .all(|c| c.status == ConditionStatus::True)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }
}

impl Deref for Conditions {
    type Target = [Condition];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut conditions = Conditions::default();
        for condition in iter {
            conditions.set(condition);
        }
        conditions
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Carry saved transition times over to conditions whose status is unchanged
///
/// Reconcilers rebuild their conditions from scratch on every pass. Without
/// this the transition time of a condition would move on every pass even
/// though its status never changed.
pub fn restore_last_transition_times(conditions: &mut Conditions, saved: &Conditions) {
    for condition in conditions.0.iter_mut() {
        if let Some(previous) = saved.get(&condition.condition_type) {
            if previous.status == condition.status {
                condition.last_transition_time = previous.last_transition_time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{DEPLOYMENT_READY_ERROR_MESSAGE, READY_INIT_MESSAGE};
    use chrono::{TimeZone, Utc};

    fn deployed() -> ConditionType {
        ConditionType::new("Deployed")
    }

    #[test]
    fn test_set_appends_then_replaces() {
        let mut conditions = Conditions::default();
        conditions.mark_unknown(deployed(), ConditionReason::INIT, "waiting");
        assert_eq!(conditions.len(), 1);

        conditions.mark_true(deployed(), "done");
        assert_eq!(conditions.len(), 1);
        let c = conditions.get(&deployed()).unwrap();
        assert_eq!(c.status, ConditionStatus::True);
        assert_eq!(c.message, "done");
    }

    #[test]
    fn test_missing_condition_predicates() {
        let conditions = Conditions::default();
        assert!(conditions.is_unknown(&deployed()));
        assert!(!conditions.is_true(&deployed()));
        assert!(!conditions.is_false(&deployed()));
    }

    #[test]
    fn test_init_only_seeds_empty_list() {
        let initial = Conditions::new([Condition::unknown_condition(
            ConditionType::READY,
            ConditionReason::INIT,
            READY_INIT_MESSAGE,
        )]);

        let mut empty = Conditions::default();
        empty.init(&initial);
        assert_eq!(empty, initial);

        let mut populated = Conditions::default();
        populated.mark_true(deployed(), "done");
        populated.init(&initial);
        assert_eq!(populated.len(), 1);
        assert!(populated.get(&ConditionType::READY).is_none());
    }

    #[test]
    fn test_mark_false_templated_message() {
        let mut conditions = Conditions::default();
        conditions.mark_false(
            deployed(),
            ConditionReason::ERROR,
            Severity::Error,
            ConditionMessage::template(DEPLOYMENT_READY_ERROR_MESSAGE, ["ols-api"]),
        );
        let c = conditions.get(&deployed()).unwrap();
        assert_eq!(c.message, "Deployment not ready: ols-api");
        assert_eq!(c.severity, Severity::Error);
    }

    #[test]
    fn test_restore_ignores_types_missing_from_saved() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut current = Conditions::default();
        current.mark_true(deployed(), "done");
        let before = current.get(&deployed()).unwrap().last_transition_time;

        let saved = Conditions::new([Condition {
            last_transition_time: t0,
            ..Condition::true_condition(ConditionType::new("Other"), "x")
        }]);
        restore_last_transition_times(&mut current, &saved);
        assert_eq!(
            current.get(&deployed()).unwrap().last_transition_time,
            before
        );
    }
}
