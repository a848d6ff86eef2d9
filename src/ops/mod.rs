pub mod log_ops;
pub mod stack_ops;
pub mod stash_ops;
pub mod task_ops;

/// Error type for state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("Please create a sub-stack first (press 'n')")]
    NoSubStacks,
    #[error("No active stack. Use '[' or ']' to select a stack.")]
    NoActiveStack,
    #[error("the active stack has no tasks")]
    EmptyStack,
    #[error("stack not found: {0}")]
    StackNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("stash item not found: {0}")]
    StashNotFound(String),
    #[error("\"{0}\" still has open subtasks")]
    OpenSubtasks(String),
    #[error("cannot {action} stack \"{name}\" while it is {status}")]
    InvalidTransition {
        action: &'static str,
        name: String,
        status: &'static str,
    },
}

/// Trim and reject blank names
pub(crate) fn clean_name(name: &str) -> Result<String, OpError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(OpError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Match `query` against candidate ids: exact id first, then a unique id prefix
pub(crate) fn match_id<'a, I>(ids: I, query: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: Vec<&str> = ids.into_iter().collect();
    if let Some(i) = ids.iter().position(|id| *id == query) {
        return Some(i);
    }
    let mut prefixed = ids
        .iter()
        .enumerate()
        .filter(|(_, id)| id.starts_with(query));
    match (prefixed.next(), prefixed.next()) {
        (Some((i, _)), None) => Some(i),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_name_trims() {
        assert_eq!(clean_name("  hello ").unwrap(), "hello");
        assert_eq!(clean_name("   "), Err(OpError::EmptyName));
    }

    #[test]
    fn match_id_requires_unique_prefix() {
        let ids = ["abc123", "abd456", "ffff"];
        assert_eq!(match_id(ids, "ffff"), Some(2));
        assert_eq!(match_id(ids, "abc"), Some(0));
        assert_eq!(match_id(ids, "ab"), None);
        assert_eq!(match_id(ids, "zz"), None);
    }
}
