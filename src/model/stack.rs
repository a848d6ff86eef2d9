use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::new_id;
use super::task::Task;

/// Lifecycle state of a sub-stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubStackStatus {
    Active,
    Frozen,
    Completed,
    Pending,
    Archived,
}

impl SubStackStatus {
    /// Active or pending: the stack can receive work and take part in cycling
    pub fn is_open(self) -> bool {
        matches!(self, SubStackStatus::Active | SubStackStatus::Pending)
    }

    /// Upper-case label used in views and CLI output
    pub fn label(self) -> &'static str {
        match self {
            SubStackStatus::Active => "ACTIVE",
            SubStackStatus::Frozen => "FROZEN",
            SubStackStatus::Completed => "DONE",
            SubStackStatus::Pending => "PENDING",
            SubStackStatus::Archived => "ARCHIVED",
        }
    }
}

/// A named LIFO list of tasks. Index 0 is the bottom; the last task is the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubStack {
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
    pub status: SubStackStatus,
    /// 0 is highest priority
    pub priority: u32,
}

impl SubStack {
    pub fn new(name: impl Into<String>, priority: u32, status: SubStackStatus) -> Self {
        SubStack {
            id: new_id(),
            name: name.into(),
            tasks: Vec::new(),
            status,
            priority,
        }
    }

    /// The current (top) task
    pub fn top(&self) -> Option<&Task> {
        self.tasks.last()
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Index of the focused task: the task with id `focus` if present, else the top.
    /// `None` only when the stack is empty.
    pub fn focused_index(&self, focus: Option<&str>) -> Option<usize> {
        focus
            .and_then(|id| self.task_index(id))
            .or_else(|| self.tasks.len().checked_sub(1))
    }

    /// Whether any task in this stack names `task_id` as its parent
    pub fn has_children(&self, task_id: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.parent_id.as_deref() == Some(task_id))
    }

    /// Breakdown depth for every task, aligned with `tasks`.
    ///
    /// Tasks without a parent sit at depth 0. A task whose parent is not in this stack
    /// sits at depth 1. A parent cycle ends at the first repeated task.
    pub fn task_depths(&self) -> Vec<usize> {
        let index: HashMap<&str, usize> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();
        let mut depths: Vec<Option<usize>> = vec![None; self.tasks.len()];

        for start in 0..self.tasks.len() {
            if depths[start].is_some() {
                continue;
            }
            let mut chain = vec![start];
            let mut current = start;
            let base = loop {
                let Some(parent_id) = self.tasks[current].parent_id.as_deref() else {
                    break 0;
                };
                let Some(&p) = index.get(parent_id) else {
                    break 1;
                };
                if let Some(d) = depths[p] {
                    break d + 1;
                }
                if chain.contains(&p) {
                    break 0;
                }
                chain.push(p);
                current = p;
            };
            for (offset, &i) in chain.iter().rev().enumerate() {
                depths[i] = Some(base + offset);
            }
        }

        depths.into_iter().map(|d| d.unwrap_or(0)).collect()
    }
}

/// The project: owner of all sub-stacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentTask {
    pub id: String,
    pub name: String,
    pub sub_stacks: Vec<SubStack>,
}

impl Default for ParentTask {
    fn default() -> Self {
        ParentTask {
            id: "root".to_string(),
            name: "New Project".to_string(),
            sub_stacks: Vec::new(),
        }
    }
}

impl ParentTask {
    pub fn active_index(&self) -> Option<usize> {
        self.sub_stacks
            .iter()
            .position(|s| s.status == SubStackStatus::Active)
    }

    pub fn active(&self) -> Option<&SubStack> {
        self.active_index().map(|i| &self.sub_stacks[i])
    }

    pub fn active_mut(&mut self) -> Option<&mut SubStack> {
        let idx = self.active_index()?;
        self.sub_stacks.get_mut(idx)
    }

    pub fn stack_index(&self, stack_id: &str) -> Option<usize> {
        self.sub_stacks.iter().position(|s| s.id == stack_id)
    }

    pub fn stack(&self, stack_id: &str) -> Option<&SubStack> {
        self.sub_stacks.iter().find(|s| s.id == stack_id)
    }

    /// (completed stacks, all stacks)
    pub fn progress(&self) -> (usize, usize) {
        let completed = self
            .sub_stacks
            .iter()
            .filter(|s| s.status == SubStackStatus::Completed)
            .count();
        (completed, self.sub_stacks.len())
    }

    /// The pending stack that should be activated next: lowest priority, earliest on ties
    pub fn next_pending_index(&self) -> Option<usize> {
        self.sub_stacks
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SubStackStatus::Pending)
            .min_by_key(|(i, s)| (s.priority, *i))
            .map(|(i, _)| i)
    }

    /// Elect an active stack if none is active and a pending one exists.
    /// Returns the index of the newly activated stack.
    pub fn ensure_active(&mut self) -> Option<usize> {
        if self.active_index().is_some() {
            return None;
        }
        let next = self.next_pending_index()?;
        self.sub_stacks[next].status = SubStackStatus::Active;
        Some(next)
    }

    /// Make `idx` the only active stack. The previously active stack becomes pending.
    pub fn set_active(&mut self, idx: usize) {
        for (i, stack) in self.sub_stacks.iter_mut().enumerate() {
            if i == idx {
                stack.status = SubStackStatus::Active;
            } else if stack.status == SubStackStatus::Active {
                stack.status = SubStackStatus::Pending;
            }
        }
    }
}
