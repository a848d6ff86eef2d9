use regex::Regex;

use crate::model::LogEntry;

/// Entries ordered newest first. Entries sharing a timestamp keep the later one first.
pub fn newest_first(logs: &[LogEntry]) -> Vec<&LogEntry> {
    let mut sorted: Vec<(usize, &LogEntry)> = logs.iter().enumerate().collect();
    sorted.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
    sorted.into_iter().map(|(_, e)| e).collect()
}

/// Case-insensitive regex; an invalid pattern is matched literally instead
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Entries (newest first) whose message or type matches `pattern`
pub fn search<'a>(logs: &'a [LogEntry], pattern: &str) -> Vec<&'a LogEntry> {
    let Some(re) = compile_pattern(pattern) else {
        return Vec::new();
    };
    newest_first(logs)
        .into_iter()
        .filter(|e| re.is_match(&e.message) || re.is_match(e.kind.as_str()))
        .collect()
}

/// Keep only the newest `limit` entries, preserving insertion order.
/// Returns how many were dropped.
pub fn trim(logs: &mut Vec<LogEntry>, limit: usize) -> usize {
    if logs.len() <= limit {
        return 0;
    }
    let excess = logs.len() - limit;
    logs.drain(..excess);
    excess
}
