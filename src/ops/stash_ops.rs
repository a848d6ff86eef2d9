use crate::model::{AppData, LogKind, StashItem, Task};

use super::{OpError, clean_name, match_id};

/// Stash a task for later, remembering the active stack as its target.
/// Returns the stash item ID.
pub fn stash_task(data: &mut AppData, name: &str) -> Result<String, OpError> {
    let name = clean_name(name)?;
    let target = data.parent_task.active().map(|s| s.id.clone());
    let item = StashItem::new(name.clone(), target);
    let id = item.id.clone();
    data.stash.push(item);
    data.log(LogKind::Stash, format!("Stashed task: {}", name));
    Ok(id)
}

fn stash_idx(data: &AppData, item_id: &str) -> Result<usize, OpError> {
    data.stash
        .iter()
        .position(|i| i.id == item_id)
        .ok_or_else(|| OpError::StashNotFound(item_id.to_string()))
}

/// Restore a stash item onto the top of its target stack (when that stack is still open
/// or frozen) or else the active stack. The destination becomes active.
/// Returns the destination stack ID.
pub fn restore_stash(data: &mut AppData, item_id: &str) -> Result<String, OpError> {
    let pos = stash_idx(data, item_id)?;
    let item = &data.stash[pos];

    let target = item
        .target_sub_stack_id
        .as_deref()
        .and_then(|id| data.parent_task.stack_index(id))
        .filter(|&i| {
            let status = data.parent_task.sub_stacks[i].status;
            status.is_open() || status == crate::model::SubStackStatus::Frozen
        });
    let dest = match target.or_else(|| data.parent_task.active_index()) {
        Some(i) => i,
        None if data.parent_task.sub_stacks.is_empty() => return Err(OpError::NoSubStacks),
        None => return Err(OpError::NoActiveStack),
    };

    let item = data.stash.remove(pos);
    data.parent_task.set_active(dest);
    let stack = &mut data.parent_task.sub_stacks[dest];
    stack.tasks.push(Task::new(item.name.clone()));
    let dest_id = stack.id.clone();
    let message = format!("Restored stash \"{}\" to \"{}\"", item.name, stack.name);
    data.log(LogKind::Add, message);
    Ok(dest_id)
}

/// Drop a stash item without restoring it
pub fn discard_stash(data: &mut AppData, item_id: &str) -> Result<(), OpError> {
    let pos = stash_idx(data, item_id)?;
    let item = data.stash.remove(pos);
    data.log(LogKind::Stash, format!("Discarded stash: {}", item.name));
    Ok(())
}

/// Find a stash item by exact ID, unique ID prefix, or 1-based position.
/// Returns its index.
pub fn resolve_stash(data: &AppData, query: &str) -> Option<usize> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if let Ok(n) = query.parse::<usize>()
        && n >= 1
        && n <= data.stash.len()
    {
        return Some(n - 1);
    }
    match_id(data.stash.iter().map(|i| i.id.as_str()), query)
}
