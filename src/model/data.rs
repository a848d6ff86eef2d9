use serde::{Deserialize, Serialize};

use super::log::{LogEntry, LogKind};
use super::stack::{ParentTask, SubStackStatus};
use super::stash::StashItem;

/// Everything that is persisted: the project, its activity log, and the stash.
/// This is also the export/import document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub parent_task: ParentTask,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub stash: Vec<StashItem>,
}

impl AppData {
    /// Append an activity log entry
    pub fn log(&mut self, kind: LogKind, message: impl Into<String>) {
        self.logs.push(LogEntry::new(kind, message));
    }

    /// Repair loaded or imported data so at most one stack is active, and one is
    /// active whenever an open stack exists.
    pub fn normalize(&mut self) {
        let mut seen_active = false;
        for stack in &mut self.parent_task.sub_stacks {
            if stack.status == SubStackStatus::Active {
                if seen_active {
                    stack.status = SubStackStatus::Pending;
                }
                seen_active = true;
            }
        }
        self.parent_task.ensure_active();
    }
}
