use serde::{Deserialize, Serialize};

use super::{new_id, now_millis};

/// A task parked for later, optionally remembering the stack it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashItem {
    pub id: String,
    pub name: String,
    /// Preferred destination stack
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sub_stack_id: Option<String>,
    pub timestamp: i64,
}

impl StashItem {
    pub fn new(name: impl Into<String>, target_sub_stack_id: Option<String>) -> Self {
        StashItem {
            id: new_id(),
            name: name.into(),
            target_sub_stack_id,
            timestamp: now_millis(),
        }
    }

    /// "Specific Stack" when a target is remembered, "General" otherwise
    pub fn target_label(&self) -> &'static str {
        if self.target_sub_stack_id.is_some() {
            "Specific Stack"
        } else {
            "General"
        }
    }
}
