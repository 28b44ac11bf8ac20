//! Snapshot diffing
//!
//! Works on unstructured snapshots: a structural RFC 6902 diff decides which
//! top-level sections changed, and RFC 7386 merge patches carry only the
//! changed fields to the store.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Name of the independently written status section
pub const STATUS_SECTION: &str = "status";

/// Top-level sections that differ between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    sections: BTreeSet<String>,
}

impl ChangeSet {
    /// Diff two snapshots
    ///
    /// Every changed leaf flags the top-level section containing it.
    pub fn between(before: &Value, after: &Value) -> Self {
        let diff = json_patch::diff(before, after);
        let sections = diff
            .0
            .iter()
            .filter_map(|op| top_level_section(operation_path(op)))
            .collect();
        Self { sections }
    }

    /// Whether `section` changed
    pub fn get(&self, section: &str) -> bool {
        self.sections.contains(section)
    }

    pub fn status_changed(&self) -> bool {
        self.get(STATUS_SECTION)
    }

    /// Whether any section other than `status` changed
    pub fn body_changed(&self) -> bool {
        self.sections.iter().any(|s| s != STATUS_SECTION)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(String::as_str)
    }
}

fn operation_path(op: &json_patch::PatchOperation) -> &str {
    use json_patch::PatchOperation;
    match op {
        PatchOperation::Add(add_op) => add_op.path.as_str(),
        PatchOperation::Remove(remove_op) => remove_op.path.as_str(),
        PatchOperation::Replace(replace_op) => replace_op.path.as_str(),
        PatchOperation::Move(move_op) => move_op.path.as_str(),
        PatchOperation::Copy(copy_op) => copy_op.path.as_str(),
        PatchOperation::Test(test_op) => test_op.path.as_str(),
    }
}

/// First reference token of a JSON pointer, unescaped
fn top_level_section(pointer: &str) -> Option<String> {
    let token = pointer.strip_prefix('/')?.split('/').next()?;
    Some(token.replace("~1", "/").replace("~0", "~"))
}

/// RFC 7386 merge patch turning `before` into `after`
pub fn merge_patch(before: &Value, after: &Value) -> Value {
    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut patch = Map::new();
            for key in old.keys().filter(|k| !new.contains_key(*k)) {
                patch.insert(key.clone(), Value::Null);
            }
            for (key, value) in new {
                match old.get(key) {
                    Some(previous) if previous == value => {}
                    Some(previous) => {
                        patch.insert(key.clone(), merge_patch(previous, value));
                    }
                    None => {
                        patch.insert(key.clone(), value.clone());
                    }
                }
            }
            Value::Object(patch)
        }
        _ => after.clone(),
    }
}

/// Merge patch for every section except `status`
pub fn body_patch(before: &Value, after: &Value) -> Value {
    merge_patch(&without_status(before), &without_status(after))
}

/// Merge patch restricted to `status`
pub fn status_patch(before: &Value, after: &Value) -> Value {
    let old = before.get(STATUS_SECTION).unwrap_or(&Value::Null);
    let new = after.get(STATUS_SECTION).unwrap_or(&Value::Null);
    let mut patch = Map::new();
    patch.insert(STATUS_SECTION.to_string(), merge_patch(old, new));
    Value::Object(patch)
}

fn without_status(snapshot: &Value) -> Value {
    let mut copy = snapshot.clone();
    if let Value::Object(map) = &mut copy {
        map.remove(STATUS_SECTION);
    }
    copy
}
