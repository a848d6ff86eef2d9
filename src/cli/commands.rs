use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stk", about = concat!("[>] stacktree v", env!("CARGO_PKG_VERSION"), " - a stack of stacks for interrupted work"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the active stack, top task first
    Status,
    /// Show every stack and its tasks
    Tree,
    /// Create a sub-stack
    New(NameArgs),
    /// Interrupt: push a task above the focused one
    Push(NameArgs),
    /// Queue a task to run right after the focused one
    Queue(NameArgs),
    /// Break a task down into a subtask
    Breakdown(BreakdownArgs),
    /// Complete the top task (or the one given)
    Done(DoneArgs),
    /// Make a stack the active one
    Activate(StackArgs),
    /// Activate the next open stack
    Next,
    /// Activate the previous open stack
    Prev,
    /// Freeze or thaw a stack (default: the active one)
    Freeze(FreezeArgs),
    /// Move a stack to the archive
    Archive(StackArgs),
    /// Bring a stack back from the archive
    Unarchive(StackArgs),
    /// Rename the project
    Rename(NameArgs),
    /// Park tasks for later
    Stash(StashCmd),
    /// Show the activity log
    Log(LogArgs),
    /// Write all data to a JSON file
    Export(ExportArgs),
    /// Replace all data with an exported JSON file
    Import(ImportArgs),
    /// Delete all data
    Reset(ResetArgs),
    /// View or edit config.toml
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Stack and task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NameArgs {
    /// Name (quote names with spaces)
    pub name: String,
}

#[derive(Args)]
pub struct StackArgs {
    /// Stack ID, ID prefix, 1-based position, or name
    pub stack: String,
}

#[derive(Args)]
pub struct FreezeArgs {
    /// Stack ID, ID prefix, 1-based position, or name
    pub stack: Option<String>,
}

#[derive(Args)]
pub struct BreakdownArgs {
    /// Subtask name
    pub name: String,
    /// Task to break down: ID, ID prefix, or position from the top (default: top)
    #[arg(long)]
    pub task: Option<String>,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task to complete: ID, ID prefix, or position from the top (default: top)
    #[arg(long)]
    pub task: Option<String>,
}

// ---------------------------------------------------------------------------
// Stash
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StashCmd {
    #[command(subcommand)]
    pub action: StashAction,
}

#[derive(Subcommand)]
pub enum StashAction {
    /// Stash a task, remembering the active stack
    Add(NameArgs),
    /// List stashed tasks
    List,
    /// Restore an item onto its stack
    Restore(StashItemArgs),
    /// Drop an item
    Discard(StashItemArgs),
}

#[derive(Args)]
pub struct StashItemArgs {
    /// Item ID, ID prefix, or 1-based position
    pub item: String,
}

// ---------------------------------------------------------------------------
// Log and data
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LogArgs {
    /// Only entries whose message or type matches this regex (case-insensitive)
    #[arg(long)]
    pub grep: Option<String>,
    /// Maximum number of entries, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: stacktree-export-YYYY-MM-DD.json, `-` for stdout)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// File produced by `stk export`
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Confirm deleting all data
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective config
    Show,
    /// Set a key, e.g. `ui.colors.highlight "#22C55E"`
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key
    pub key: String,
    pub value: String,
}
