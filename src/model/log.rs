use serde::{Deserialize, Serialize};

use super::{new_id, now_millis};

/// Category of an activity log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Add,
    Modify,
    StatusChange,
    Stash,
    Freeze,
    Archive,
}

impl LogKind {
    /// Wire name, as shown in `[type]` columns
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Add => "add",
            LogKind::Modify => "modify",
            LogKind::StatusChange => "status_change",
            LogKind::Stash => "stash",
            LogKind::Freeze => "freeze",
            LogKind::Archive => "archive",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the user-visible activity history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        LogEntry {
            id: new_id(),
            timestamp: now_millis(),
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_under_type_key() {
        let entry = LogEntry {
            id: "l1".into(),
            timestamp: 7,
            kind: LogKind::StatusChange,
            message: "Completed task: x".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "status_change");
        assert_eq!(entry.kind.to_string(), "status_change");
    }
}
