use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::config_io::read_config;
use crate::io::store::{Store, StoreError, resolve_data_dir};
use crate::io::watcher::StateWatcher;
use crate::io::logging;
use crate::model::{AppData, Config, LogEntry, SubStack, SubStackStatus, Task, now_millis};
use crate::ops::{OpError, log_ops};

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Tree,
    Stash,
    Logs,
    Archive,
    System,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Home,
        View::Tree,
        View::Stash,
        View::Logs,
        View::Archive,
        View::System,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Tree => "Tree",
            View::Stash => "Stash",
            View::Logs => "Logs",
            View::Archive => "Archive",
            View::System => "System",
        }
    }

    /// View for a number key `1`-`6`
    pub fn from_digit(c: char) -> Option<View> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| View::ALL.get(i).copied())
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Shortcuts active
    Command,
    /// Shortcuts disabled until Ctrl-O
    Off,
    /// Prompt modal open
    Input,
    /// Typing a log filter
    Search,
    /// Alert or confirm dialog open
    Popup,
}

/// What a prompt's submitted text is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewStack,
    Interrupt,
    Queue,
    Stash,
    Breakdown,
    Rename,
    Import,
    Export,
}

/// Single-line input modal state. `cursor` is a byte offset on a grapheme boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub label: String,
    pub buffer: String,
    pub cursor: usize,
}

impl Prompt {
    pub fn new(kind: PromptKind, label: impl Into<String>, initial: impl Into<String>) -> Self {
        let buffer = initial.into();
        Prompt {
            kind,
            label: label.into(),
            cursor: buffer.len(),
            buffer,
        }
    }
}

/// Action run when a confirm popup is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Import(PathBuf),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    Alert(String),
    Confirm {
        message: String,
        action: ConfirmAction,
    },
}

/// Main application state
pub struct App {
    pub data: AppData,
    /// `None` when running without a backing file (tests)
    pub store: Option<Store>,
    pub config: Config,
    pub theme: Theme,
    pub view: View,
    pub mode: Mode,
    pub prompt: Option<Prompt>,
    pub popup: Option<Popup>,
    /// Focused task in the active stack; `None` means the top
    pub focus: Option<String>,
    /// Cursor over `tree_stacks()`
    pub tree_cursor: usize,
    pub stash_cursor: usize,
    /// Cursor over `archived_stacks()`
    pub archive_cursor: usize,
    pub log_scroll: usize,
    /// Applied log filter pattern
    pub log_filter: Option<String>,
    /// Filter being typed in Search mode
    pub search_input: String,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Unsaved changes exist
    pub dirty: bool,
    pub last_change: Option<Instant>,
    /// Epoch millis of the last successful save
    pub last_saved_at: Option<i64>,
}

impl App {
    pub fn new(data: AppData, config: Config) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            data,
            store: None,
            config,
            theme,
            view: View::Home,
            mode: Mode::Command,
            prompt: None,
            popup: None,
            focus: None,
            tree_cursor: 0,
            stash_cursor: 0,
            archive_cursor: 0,
            log_scroll: 0,
            log_filter: None,
            search_input: String::new(),
            status_message: None,
            show_help: false,
            should_quit: false,
            dirty: false,
            last_change: None,
            last_saved_at: None,
        }
    }

    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub fn active_stack(&self) -> Option<&SubStack> {
        self.data.parent_task.active()
    }

    /// Focused task id when it still exists in the active stack
    pub fn focus_id(&self) -> Option<&str> {
        let focus = self.focus.as_deref()?;
        self.active_stack()?.task_index(focus).map(|_| focus)
    }

    pub fn focused_task(&self) -> Option<&Task> {
        let stack = self.active_stack()?;
        let idx = stack.focused_index(self.focus_id())?;
        stack.tasks.get(idx)
    }

    /// Indices of stacks shown in the Tree view (everything not archived)
    pub fn tree_stacks(&self) -> Vec<usize> {
        self.stacks_where(|s| s.status != SubStackStatus::Archived)
    }

    /// Indices of archived stacks
    pub fn archived_stacks(&self) -> Vec<usize> {
        self.stacks_where(|s| s.status == SubStackStatus::Archived)
    }

    fn stacks_where(&self, pred: impl Fn(&SubStack) -> bool) -> Vec<usize> {
        self.data
            .parent_task
            .sub_stacks
            .iter()
            .enumerate()
            .filter(|(_, s)| pred(s))
            .map(|(i, _)| i)
            .collect()
    }

    /// The filter pattern to highlight: the one being typed in Search mode, else the applied one
    pub fn active_log_pattern(&self) -> Option<&str> {
        match self.mode {
            Mode::Search if !self.search_input.is_empty() => Some(&self.search_input),
            Mode::Search => None,
            _ => self.log_filter.as_deref(),
        }
    }

    pub fn active_log_re(&self) -> Option<Regex> {
        self.active_log_pattern().and_then(log_ops::compile_pattern)
    }

    /// Log entries for the Logs view: newest first, filtered when a pattern is active
    pub fn visible_logs(&self) -> Vec<&LogEntry> {
        match self.active_log_pattern() {
            Some(p) => log_ops::search(&self.data.logs, p),
            None => log_ops::newest_first(&self.data.logs),
        }
    }

    /// Record a state change: trim logs, keep cursors in range, schedule a save
    pub fn mark_changed(&mut self) {
        log_ops::trim(&mut self.data.logs, self.config.storage.log_limit);
        self.clamp_cursors();
        self.dirty = true;
        self.last_change = Some(Instant::now());
    }

    /// Run an op result through the UI: changes are marked, errors become an alert
    pub fn apply<T>(&mut self, result: Result<T, OpError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.mark_changed();
                Some(value)
            }
            Err(e) => {
                self.alert(e.to_string());
                None
            }
        }
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.popup = Some(Popup::Alert(message.into()));
        self.mode = Mode::Popup;
    }

    pub fn confirm(&mut self, message: impl Into<String>, action: ConfirmAction) {
        self.popup = Some(Popup::Confirm {
            message: message.into(),
            action,
        });
        self.mode = Mode::Popup;
    }

    pub fn clamp_cursors(&mut self) {
        let clamp = |cursor: usize, len: usize| cursor.min(len.saturating_sub(1));
        self.tree_cursor = clamp(self.tree_cursor, self.tree_stacks().len());
        self.archive_cursor = clamp(self.archive_cursor, self.archived_stacks().len());
        self.stash_cursor = clamp(self.stash_cursor, self.data.stash.len());
        self.log_scroll = clamp(self.log_scroll, self.visible_logs().len());
        if self.focus.is_some() && self.focus_id().is_none() {
            self.focus = None;
        }
    }

    /// Replace all state, e.g. after import or reset
    pub fn replace_data(&mut self, data: AppData) {
        self.data = data;
        self.focus = None;
        self.tree_cursor = 0;
        self.stash_cursor = 0;
        self.archive_cursor = 0;
        self.log_scroll = 0;
        self.clamp_cursors();
    }

    /// Whether the debounce window since the last change has passed
    pub fn save_due(&self, now: Instant) -> bool {
        let debounce = Duration::from_millis(self.config.storage.save_debounce_ms);
        self.dirty
            && self
                .last_change
                .is_none_or(|at| now.saturating_duration_since(at) >= debounce)
    }

    /// Write state to disk now. Failures are reported in the status row and retried on
    /// the next change.
    pub fn save_now(&mut self) {
        let Some(store) = &self.store else {
            self.dirty = false;
            return;
        };
        match store.save(&self.data) {
            Ok(()) => {
                self.dirty = false;
                self.last_saved_at = Some(now_millis());
            }
            Err(e) => {
                tracing::error!(error = %e, "save failed");
                self.status_message = Some(format!("Save failed: {}", e));
                self.last_change = Some(Instant::now());
            }
        }
    }

    /// Pick up a state file written by another process. Unsaved local changes win.
    pub fn reload_from_disk(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        if self.dirty {
            tracing::warn!("state file changed on disk while local changes are unsaved; keeping local state");
            return;
        }
        match store.load() {
            Ok(Some(data)) if data != self.data => {
                tracing::info!("reloaded state changed on disk");
                self.data = data;
                self.clamp_cursors();
                self.status_message = Some("Reloaded external changes".to_string());
            }
            Ok(None) if self.data != AppData::default() => {
                tracing::info!("state file removed on disk; starting empty");
                self.replace_data(AppData::default());
                self.status_message = Some("Data was reset externally".to_string());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.status_message = Some(format!("Reload failed: {}", e));
            }
        }
    }

    pub fn state_path(&self) -> Option<PathBuf> {
        self.store.as_ref().map(Store::state_path)
    }

    /// Export what is saved on disk (flushing pending changes first) to `path`
    pub fn export_to(&mut self, path: &Path) {
        if self.dirty {
            self.save_now();
        }
        let json = match &self.store {
            Some(store) => store.export_json(),
            None => serde_json::to_string_pretty(&self.data).map_err(StoreError::from),
        };
        let result = json.and_then(|json| {
            std::fs::write(path, json).map_err(|e| StoreError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })
        });
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "exported state");
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "export failed");
                self.alert(format!("Export failed: {}", e));
            }
        }
    }

    /// Replace all state with an exported file
    pub fn import_from(&mut self, path: &Path) {
        let result = std::fs::read_to_string(path)
            .map_err(|e| StoreError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
            .and_then(|json| match &self.store {
                Some(store) => store.import_json(&json),
                None => crate::io::store::parse_import(&json),
            });
        match result {
            Ok(data) => {
                self.replace_data(data);
                self.dirty = false;
                self.last_saved_at = Some(now_millis());
                self.status_message = Some("Data imported successfully".to_string());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "import failed");
                self.alert(format!("Failed to import data: {}", e));
            }
        }
    }

    /// Delete saved state and start over
    pub fn reset_all(&mut self) {
        let cleared = self.store.as_ref().map_or(Ok(()), Store::clear);
        if let Err(e) = cleared {
            self.alert(format!("Reset failed: {}", e));
            return;
        }
        self.replace_data(AppData::default());
        self.dirty = false;
        self.view = View::Home;
        self.status_message = Some("All data cleared".to_string());
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config()?;
    let dir = resolve_data_dir(data_dir, config.storage.data_dir.as_deref());
    logging::init(&dir);
    let store = Store::open(&dir)?;

    let (data, load_error) = match store.load() {
        Ok(data) => (data.unwrap_or_default(), None),
        Err(e @ StoreError::Corrupt { .. }) => (AppData::default(), Some(e.to_string())),
        Err(e) => return Err(e.into()),
    };
    tracing::info!(dir = %dir.display(), "starting tui");

    let mut app = App::new(data, config).with_store(store.clone());
    if let Some(message) = load_error {
        app.alert(message);
    }

    let watcher = match StateWatcher::start(store.dir(), &store.state_path()) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watcher unavailable");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    if app.dirty {
        app.save_now();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("tui exited");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StateWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick = Duration::from_millis(app.config.storage.save_debounce_ms.clamp(50, 250));
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(tick)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if watcher.is_some_and(StateWatcher::poll) {
            app.reload_from_disk();
        }

        if app.save_due(Instant::now()) {
            app.save_now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::stack_ops::add_sub_stack;
    use crate::ops::task_ops::push_task;
    use tempfile::TempDir;

    fn app() -> App {
        App::new(AppData::default(), Config::default())
    }

    #[test]
    fn view_digits() {
        assert_eq!(View::from_digit('1'), Some(View::Home));
        assert_eq!(View::from_digit('6'), Some(View::System));
        assert_eq!(View::from_digit('0'), None);
        assert_eq!(View::from_digit('7'), None);
    }

    #[test]
    fn errors_become_alerts() {
        let mut app = app();
        let result = push_task(&mut app.data, "x", None);
        assert!(app.apply(result).is_none());
        assert_eq!(app.mode, Mode::Popup);
        assert_eq!(
            app.popup,
            Some(Popup::Alert(
                "Please create a sub-stack first (press 'n')".into()
            ))
        );
        assert!(!app.dirty);
    }

    #[test]
    fn save_waits_for_debounce() {
        let mut app = app();
        app.config.storage.save_debounce_ms = 500;
        let result = add_sub_stack(&mut app.data, "a");
        app.apply(result);
        let changed = app.last_change.unwrap();
        assert!(!app.save_due(changed + Duration::from_millis(100)));
        assert!(app.save_due(changed + Duration::from_millis(500)));
    }

    #[test]
    fn stale_focus_falls_back_to_top() {
        let mut app = app();
        add_sub_stack(&mut app.data, "a").unwrap();
        push_task(&mut app.data, "bottom", None).unwrap();
        push_task(&mut app.data, "top", None).unwrap();
        app.focus = Some("missing".into());
        assert_eq!(app.focused_task().unwrap().name, "top");
        app.mark_changed();
        assert_eq!(app.focus, None);
    }

    #[test]
    fn logs_are_trimmed_on_change() {
        let mut app = app();
        app.config.storage.log_limit = 2;
        for name in ["a", "b", "c"] {
            let result = add_sub_stack(&mut app.data, name);
            app.apply(result);
        }
        assert_eq!(app.data.logs.len(), 2);
        assert_eq!(app.data.logs[1].message, "Added sub-stack: c");
    }

    #[test]
    fn save_and_external_reload() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let mut app = app().with_store(store.clone());
        let result = add_sub_stack(&mut app.data, "mine");
        app.apply(result);
        app.save_now();
        assert!(!app.dirty);
        assert!(app.last_saved_at.is_some());

        let mut other = store.load().unwrap().unwrap();
        add_sub_stack(&mut other, "theirs").unwrap();
        store.save(&other).unwrap();

        app.reload_from_disk();
        assert_eq!(app.data.parent_task.sub_stacks.len(), 2);
    }

    #[test]
    fn external_reset_empties_clean_state() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let mut app = app().with_store(store.clone());
        let result = add_sub_stack(&mut app.data, "mine");
        app.apply(result);
        app.save_now();

        store.clear().unwrap();
        app.reload_from_disk();
        assert!(app.data.parent_task.sub_stacks.is_empty());
        assert!(!app.dirty);

        // Nothing from before the reset comes back on the next save
        let result = add_sub_stack(&mut app.data, "fresh");
        app.apply(result);
        app.save_now();
        let saved = store.load().unwrap().unwrap();
        let names: Vec<&str> = saved
            .parent_task
            .sub_stacks
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["fresh"]);
    }

    #[test]
    fn dirty_state_wins_over_reload() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path()).unwrap();
        let mut app = app().with_store(store.clone());
        store.save(&AppData::default()).unwrap();

        let result = add_sub_stack(&mut app.data, "unsaved");
        app.apply(result);
        app.reload_from_disk();
        assert_eq!(app.data.parent_task.sub_stacks.len(), 1);
    }

    #[test]
    fn export_import_reset_round() {
        let tmp = TempDir::new().unwrap();
        let store = Store::open(tmp.path().join("data")).unwrap();
        let mut app = app().with_store(store);
        let result = add_sub_stack(&mut app.data, "keep");
        app.apply(result);

        let file = tmp.path().join("out.json");
        app.export_to(&file);
        assert!(!app.dirty);
        assert!(file.exists());

        app.reset_all();
        assert!(app.data.parent_task.sub_stacks.is_empty());

        app.import_from(&file);
        assert_eq!(app.data.parent_task.sub_stacks[0].name, "keep");
        assert_eq!(
            app.status_message.as_deref(),
            Some("Data imported successfully")
        );
    }

    #[test]
    fn import_of_bad_file_alerts() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("bad.json");
        std::fs::write(&file, r#"{"logs": []}"#).unwrap();
        let mut app = app();
        app.import_from(&file);
        assert!(matches!(app.popup, Some(Popup::Alert(ref m)) if m.contains("Invalid data format")));
    }
}
