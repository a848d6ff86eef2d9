use serde::{Deserialize, Serialize};

use super::{new_id, now_millis};

/// Task lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// A single entry on a sub-stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    /// The task this one breaks down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub status: TaskStatus,
    /// Epoch milliseconds
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Create a new pending task stamped with the current time
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            id: new_id(),
            name: name.into(),
            parent_id: None,
            status: TaskStatus::Pending,
            created_at: now_millis(),
            completed_at: None,
        }
    }

    /// Builder-style parent assignment
    pub fn with_parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Mark completed, stamping `completed_at`
    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now_millis());
    }
}
