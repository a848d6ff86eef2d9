use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The state file was written by another process.
    Changed(PathBuf),
}

/// Watches a data directory for changes to its state file.
pub struct StateWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

/// Whether a notify event touches the state file
fn is_state_change(event: &Event, state_file: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p.file_name() == state_file.file_name())
}

impl StateWatcher {
    /// Start watching `data_dir` for writes to `state_file`.
    /// Call `poll()` each tick.
    pub fn start(data_dir: &Path, state_file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let state_file = state_file.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                if is_state_change(&event, &state_file) {
                    let _ = tx.send(FileEvent::Changed(state_file.clone()));
                }
            },
            Config::default(),
        )?;

        // Atomic writes replace the file, so watch the directory rather than the file
        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StateWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking: true when the state file changed since the last poll.
    /// Bursts of events collapse into one.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::Changed(_)) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_state_file_counts() {
        let state = Path::new("/data/state.json");
        assert!(is_state_change(
            &event(EventKind::Modify(ModifyKind::Any), "/data/state.json"),
            state
        ));
        assert!(is_state_change(
            &event(EventKind::Create(CreateKind::File), "/data/state.json"),
            state
        ));
        assert!(!is_state_change(
            &event(EventKind::Modify(ModifyKind::Any), "/data/.lock"),
            state
        ));
        assert!(!is_state_change(
            &event(EventKind::Access(notify::event::AccessKind::Any), "/data/state.json"),
            state
        ));
    }
}
