//! Condition aggregation
//!
//! Collapses a condition list into a single summary condition. Precedence:
//! `False`/`Error`, then `False`/`Warning`, then any `Unknown`, otherwise
//! `True`.
//!
//! `False` conditions with severity `Info` or `None` are not escalated and
//! fall through to the `True` result. This is the established behavior of
//! the aggregate and is kept as-is, even though it can hide such failures
//! behind a ready summary.

use super::{Condition, ConditionStatus, ConditionType, Conditions, READY_MESSAGE, Severity, now};

/// Grouping key for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GroupKey {
    status: ConditionStatus,
    severity: Severity,
}

/// Conditions sharing the same status and severity, in list order
#[derive(Debug)]
struct ConditionGroup<'a> {
    key: GroupKey,
    conditions: Vec<&'a Condition>,
}

impl ConditionGroup<'_> {
    /// First member in list order; supplies reason and message
    fn representative(&self) -> Option<&Condition> {
        self.conditions.first().copied()
    }
}

impl Conditions {
    /// Summarize the list into one condition of `aggregate_type`
    ///
    /// Only the reserved `Ready` type is left out of the inputs. Mirroring
    /// into any other type still reads an existing entry of that type.
    pub fn mirror(&self, aggregate_type: ConditionType) -> Condition {
        let groups = self.group();

        let escalated = [
            (ConditionStatus::False, Some(Severity::Error)),
            (ConditionStatus::False, Some(Severity::Warning)),
            (ConditionStatus::Unknown, None),
        ];

        for (status, severity) in escalated {
            let found = groups
                .iter()
                .filter(|g| g.key.status == status)
                .filter(|g| severity.is_none_or(|s| g.key.severity == s))
                .find_map(|g| g.representative());

            if let Some(source) = found {
                return Condition {
                    condition_type: aggregate_type,
                    status,
                    // Unknown aggregates never carry a severity
                    severity: severity.unwrap_or(Severity::None),
                    last_transition_time: now(),
                    reason: source.reason.clone(),
                    message: source.message.clone(),
                };
            }
        }

        Condition::true_condition(aggregate_type, READY_MESSAGE)
    }

    /// Group conditions by (status, severity), most severe group first
    fn group(&self) -> Vec<ConditionGroup<'_>> {
        let mut groups: Vec<ConditionGroup<'_>> = Vec::new();

        for condition in self
            .iter()
            .filter(|c| !c.condition_type.is_ready())
        {
            let key = GroupKey {
                status: condition.status,
                severity: condition.severity,
            };
            match groups.iter_mut().find(|g| g.key == key) {
                Some(group) => group.conditions.push(condition),
                None => groups.push(ConditionGroup {
                    key,
                    conditions: vec![condition],
                }),
            }
        }

        // Stable, so groups of equal rank keep first-seen order
        groups.sort_by_key(|g| g.key.severity.rank());
        groups
    }
}
