use crate::model::{AppData, LogKind, SubStack, SubStackStatus};

use super::{OpError, clean_name, match_id};

/// Cycling direction for `[` / `]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

fn status_word(status: SubStackStatus) -> &'static str {
    match status {
        SubStackStatus::Active => "active",
        SubStackStatus::Frozen => "frozen",
        SubStackStatus::Completed => "completed",
        SubStackStatus::Pending => "pending",
        SubStackStatus::Archived => "archived",
    }
}

fn stack_idx(data: &AppData, stack_id: &str) -> Result<usize, OpError> {
    data.parent_task
        .stack_index(stack_id)
        .ok_or_else(|| OpError::StackNotFound(stack_id.to_string()))
}

/// Log the election of a new active stack, if one happened
fn log_activation(data: &mut AppData, activated: Option<usize>) {
    if let Some(idx) = activated {
        let name = data.parent_task.sub_stacks[idx].name.clone();
        data.log(
            LogKind::StatusChange,
            format!("Activated next stack: {}", name),
        );
    }
}

/// Add a new sub-stack. It becomes active when no other stack is.
/// Returns the new stack's ID.
pub fn add_sub_stack(data: &mut AppData, name: &str) -> Result<String, OpError> {
    let name = clean_name(name)?;
    let status = if data.parent_task.active_index().is_none() {
        SubStackStatus::Active
    } else {
        SubStackStatus::Pending
    };
    let priority = data.parent_task.sub_stacks.len() as u32;
    let stack = SubStack::new(name.clone(), priority, status);
    let id = stack.id.clone();
    data.parent_task.sub_stacks.push(stack);
    data.log(LogKind::Add, format!("Added sub-stack: {}", name));
    Ok(id)
}

/// Make a stack the active one. Frozen stacks thaw; completed and archived ones are rejected.
pub fn activate(data: &mut AppData, stack_id: &str) -> Result<(), OpError> {
    let idx = stack_idx(data, stack_id)?;
    let status = data.parent_task.sub_stacks[idx].status;
    match status {
        SubStackStatus::Active => Ok(()),
        SubStackStatus::Completed | SubStackStatus::Archived => {
            Err(OpError::InvalidTransition {
                action: "activate",
                name: data.parent_task.sub_stacks[idx].name.clone(),
                status: status_word(status),
            })
        }
        SubStackStatus::Pending | SubStackStatus::Frozen => {
            data.parent_task.set_active(idx);
            Ok(())
        }
    }
}

/// Move activation to the previous/next open stack, wrapping around.
/// Returns the ID of the stack that is active afterwards, if any.
pub fn cycle(data: &mut AppData, direction: Direction) -> Option<String> {
    let eligible: Vec<usize> = data
        .parent_task
        .sub_stacks
        .iter()
        .enumerate()
        .filter(|(_, s)| s.status.is_open())
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return None;
    }

    let current = eligible
        .iter()
        .position(|&i| data.parent_task.sub_stacks[i].status == SubStackStatus::Active);
    let target = match current {
        None => eligible[0],
        Some(_) if eligible.len() == 1 => eligible[0],
        Some(pos) => {
            let len = eligible.len();
            let next = match direction {
                Direction::Next => (pos + 1) % len,
                Direction::Prev => (pos + len - 1) % len,
            };
            eligible[next]
        }
    };
    data.parent_task.set_active(target);
    Some(data.parent_task.sub_stacks[target].id.clone())
}

/// Freeze an open stack, or thaw a frozen one back to pending.
/// Returns the new status.
pub fn toggle_freeze(data: &mut AppData, stack_id: &str) -> Result<SubStackStatus, OpError> {
    let idx = stack_idx(data, stack_id)?;
    let stack = &mut data.parent_task.sub_stacks[idx];
    let (new_status, verb) = match stack.status {
        SubStackStatus::Frozen => (SubStackStatus::Pending, "Unfroze"),
        SubStackStatus::Active | SubStackStatus::Pending => (SubStackStatus::Frozen, "Froze"),
        other => {
            return Err(OpError::InvalidTransition {
                action: "freeze",
                name: stack.name.clone(),
                status: status_word(other),
            });
        }
    };
    stack.status = new_status;
    let message = format!("{} stack: {}", verb, stack.name);
    data.log(LogKind::Freeze, message);

    let activated = data.parent_task.ensure_active();
    log_activation(data, activated);
    let status = data.parent_task.sub_stacks[idx].status;
    Ok(status)
}

/// Move a stack to the archive
pub fn archive(data: &mut AppData, stack_id: &str) -> Result<(), OpError> {
    let idx = stack_idx(data, stack_id)?;
    let stack = &mut data.parent_task.sub_stacks[idx];
    if stack.status == SubStackStatus::Archived {
        return Err(OpError::InvalidTransition {
            action: "archive",
            name: stack.name.clone(),
            status: "archived",
        });
    }
    stack.status = SubStackStatus::Archived;
    let message = format!("Archived stack: {}", stack.name);
    data.log(LogKind::Archive, message);

    let activated = data.parent_task.ensure_active();
    log_activation(data, activated);
    Ok(())
}

/// Bring an archived stack back: pending if it still holds tasks, completed otherwise
pub fn unarchive(data: &mut AppData, stack_id: &str) -> Result<SubStackStatus, OpError> {
    let idx = stack_idx(data, stack_id)?;
    let stack = &mut data.parent_task.sub_stacks[idx];
    if stack.status != SubStackStatus::Archived {
        return Err(OpError::InvalidTransition {
            action: "restore",
            name: stack.name.clone(),
            status: status_word(stack.status),
        });
    }
    stack.status = if stack.tasks.is_empty() {
        SubStackStatus::Completed
    } else {
        SubStackStatus::Pending
    };
    let message = format!("Restored stack from archive: {}", stack.name);
    data.log(LogKind::Archive, message);

    data.parent_task.ensure_active();
    Ok(data.parent_task.sub_stacks[idx].status)
}

/// Rename the parent project
pub fn rename_project(data: &mut AppData, name: &str) -> Result<(), OpError> {
    let name = clean_name(name)?;
    data.parent_task.name = name.clone();
    data.log(LogKind::Modify, format!("Renamed project to \"{}\"", name));
    Ok(())
}

/// Find a stack by exact ID, unique ID prefix, 1-based position, or case-insensitive name.
/// Returns its index.
pub fn resolve_stack(data: &AppData, query: &str) -> Option<usize> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let stacks = &data.parent_task.sub_stacks;
    if let Ok(n) = query.parse::<usize>()
        && n >= 1
        && n <= stacks.len()
    {
        return Some(n - 1);
    }
    if let Some(i) = stacks.iter().position(|s| s.name.eq_ignore_ascii_case(query)) {
        return Some(i);
    }
    match_id(stacks.iter().map(|s| s.id.as_str()), query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use pretty_assertions::assert_eq;

    fn statuses(data: &AppData) -> Vec<SubStackStatus> {
        data.parent_task
            .sub_stacks
            .iter()
            .map(|s| s.status)
            .collect()
    }

    fn three_stacks() -> (AppData, Vec<String>) {
        let mut data = AppData::default();
        let ids = ["alpha", "beta", "gamma"]
            .iter()
            .map(|n| add_sub_stack(&mut data, n).unwrap())
            .collect();
        (data, ids)
    }

    #[test]
    fn first_stack_is_active_rest_pending() {
        let (data, _) = three_stacks();
        use SubStackStatus::*;
        assert_eq!(statuses(&data), vec![Active, Pending, Pending]);
        let priorities: Vec<u32> = data
            .parent_task
            .sub_stacks
            .iter()
            .map(|s| s.priority)
            .collect();
        assert_eq!(priorities, vec![0, 1, 2]);
        assert_eq!(data.logs[0].message, "Added sub-stack: alpha");
    }

    #[test]
    fn new_stack_active_when_all_others_closed() {
        let (mut data, ids) = three_stacks();
        for id in &ids {
            toggle_freeze(&mut data, id).unwrap();
        }
        assert!(data.parent_task.active().is_none());
        add_sub_stack(&mut data, "delta").unwrap();
        assert_eq!(
            data.parent_task.active().map(|s| s.name.as_str()),
            Some("delta")
        );
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut data = AppData::default();
        assert_eq!(add_sub_stack(&mut data, "  "), Err(OpError::EmptyName));
        assert!(data.parent_task.sub_stacks.is_empty());
        assert!(data.logs.is_empty());
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let (mut data, ids) = three_stacks();
        assert_eq!(cycle(&mut data, Direction::Next), Some(ids[1].clone()));
        assert_eq!(cycle(&mut data, Direction::Next), Some(ids[2].clone()));
        assert_eq!(cycle(&mut data, Direction::Next), Some(ids[0].clone()));
        assert_eq!(cycle(&mut data, Direction::Prev), Some(ids[2].clone()));
        let active: Vec<_> = statuses(&data)
            .into_iter()
            .filter(|s| *s == SubStackStatus::Active)
            .collect();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn cycle_skips_frozen_and_completed() {
        let (mut data, ids) = three_stacks();
        toggle_freeze(&mut data, &ids[1]).unwrap();
        data.parent_task.sub_stacks[2].status = SubStackStatus::Completed;
        assert_eq!(cycle(&mut data, Direction::Next), Some(ids[0].clone()));
        assert_eq!(
            data.parent_task.sub_stacks[1].status,
            SubStackStatus::Frozen
        );
    }

    #[test]
    fn cycle_with_nothing_open_is_noop() {
        let mut data = AppData::default();
        assert_eq!(cycle(&mut data, Direction::Next), None);
    }

    #[test]
    fn cycle_with_single_open_stack_keeps_it_active() {
        let (mut data, ids) = three_stacks();
        toggle_freeze(&mut data, &ids[1]).unwrap();
        data.parent_task.sub_stacks[2].status = SubStackStatus::Completed;
        let logs = data.logs.len();

        use SubStackStatus::*;
        for direction in [Direction::Next, Direction::Prev] {
            assert_eq!(cycle(&mut data, direction), Some(ids[0].clone()));
            assert_eq!(statuses(&data), vec![Active, Frozen, Completed]);
        }
        assert_eq!(data.logs.len(), logs);
    }

    #[test]
    fn activate_thaws_frozen_and_rejects_completed() {
        let (mut data, ids) = three_stacks();
        toggle_freeze(&mut data, &ids[2]).unwrap();
        activate(&mut data, &ids[2]).unwrap();
        use SubStackStatus::*;
        assert_eq!(statuses(&data), vec![Pending, Pending, Active]);

        data.parent_task.sub_stacks[0].status = Completed;
        assert!(matches!(
            activate(&mut data, &ids[0]),
            Err(OpError::InvalidTransition { .. })
        ));
        assert!(matches!(
            activate(&mut data, "nope"),
            Err(OpError::StackNotFound(_))
        ));
    }

    #[test]
    fn freezing_active_elects_next_pending() {
        let (mut data, ids) = three_stacks();
        let status = toggle_freeze(&mut data, &ids[0]).unwrap();
        assert_eq!(status, SubStackStatus::Frozen);
        use SubStackStatus::*;
        assert_eq!(statuses(&data), vec![Frozen, Active, Pending]);
        assert!(
            data.logs
                .iter()
                .any(|l| l.kind == LogKind::Freeze && l.message == "Froze stack: alpha")
        );
    }

    #[test]
    fn unfreezing_with_no_active_reactivates() {
        let mut data = AppData::default();
        let id = add_sub_stack(&mut data, "solo").unwrap();
        toggle_freeze(&mut data, &id).unwrap();
        assert!(data.parent_task.active().is_none());
        let status = toggle_freeze(&mut data, &id).unwrap();
        assert_eq!(status, SubStackStatus::Active);
        assert_eq!(data.logs.last().unwrap().message, "Activated next stack: solo");
    }

    #[test]
    fn freeze_rejects_completed() {
        let (mut data, ids) = three_stacks();
        data.parent_task.sub_stacks[1].status = SubStackStatus::Completed;
        assert!(toggle_freeze(&mut data, &ids[1]).is_err());
    }

    #[test]
    fn archive_and_restore() {
        let (mut data, ids) = three_stacks();
        data.parent_task.sub_stacks[0].tasks.push(Task::new("keep"));
        archive(&mut data, &ids[0]).unwrap();
        use SubStackStatus::*;
        assert_eq!(statuses(&data), vec![Archived, Active, Pending]);
        assert!(archive(&mut data, &ids[0]).is_err());

        assert_eq!(unarchive(&mut data, &ids[0]).unwrap(), Pending);
        archive(&mut data, &ids[2]).unwrap();
        assert_eq!(unarchive(&mut data, &ids[2]).unwrap(), Completed);
        assert!(unarchive(&mut data, &ids[1]).is_err());
    }

    #[test]
    fn rename_logs_modify() {
        let mut data = AppData::default();
        rename_project(&mut data, " Launch ").unwrap();
        assert_eq!(data.parent_task.name, "Launch");
        assert_eq!(data.logs[0].kind, LogKind::Modify);
    }

    #[test]
    fn resolve_by_position_name_and_prefix() {
        let (data, ids) = three_stacks();
        assert_eq!(resolve_stack(&data, "2"), Some(1));
        assert_eq!(resolve_stack(&data, "GAMMA"), Some(2));
        assert_eq!(resolve_stack(&data, &ids[0]), Some(0));
        assert_eq!(resolve_stack(&data, "9"), None);
        assert_eq!(resolve_stack(&data, ""), None);
    }
}
