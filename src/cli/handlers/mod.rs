use std::error::Error;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::logging;
use crate::io::store::{Store, resolve_data_dir};
use crate::model::AppData;
use crate::ops::stack_ops::{self, Direction};
use crate::ops::{OpError, log_ops, stash_ops, task_ops};
use crate::util::time::export_file_name;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let Some(command) = cli.command else {
        return Ok(());
    };

    // Config commands work without a data directory
    let command = match command {
        Commands::Config(args) => return cmd_config(args, json),
        other => other,
    };

    let ctx = Context::open(cli.data_dir.as_deref())?;
    match command {
        // Read commands
        Commands::Status => cmd_status(&ctx, json),
        Commands::Tree => cmd_tree(&ctx, json),
        Commands::Log(args) => cmd_log(&ctx, args, json),

        // Stacks
        Commands::New(args) => {
            let id = ctx.mutate(|data| stack_ops::add_sub_stack(data, &args.name))?;
            println!("{}", id);
            Ok(())
        }
        Commands::Activate(args) => {
            let name = ctx.mutate(|data| {
                let (id, name) = find_stack(data, &args.stack)?;
                stack_ops::activate(data, &id)?;
                Ok(name)
            })?;
            println!("active: {}", name);
            Ok(())
        }
        Commands::Next => cmd_cycle(&ctx, Direction::Next),
        Commands::Prev => cmd_cycle(&ctx, Direction::Prev),
        Commands::Freeze(args) => {
            let (name, status) = ctx.mutate(|data| {
                let (id, name) = match &args.stack {
                    Some(query) => find_stack(data, query)?,
                    None => active_stack(data)?,
                };
                Ok((name, stack_ops::toggle_freeze(data, &id)?))
            })?;
            println!("{}: {}", name, status.label());
            Ok(())
        }
        Commands::Archive(args) => {
            let name = ctx.mutate(|data| {
                let (id, name) = find_stack(data, &args.stack)?;
                stack_ops::archive(data, &id)?;
                Ok(name)
            })?;
            println!("archived: {}", name);
            Ok(())
        }
        Commands::Unarchive(args) => {
            let (name, status) = ctx.mutate(|data| {
                let (id, name) = find_stack(data, &args.stack)?;
                Ok((name, stack_ops::unarchive(data, &id)?))
            })?;
            println!("{}: {}", name, status.label());
            Ok(())
        }
        Commands::Rename(args) => {
            ctx.mutate(|data| stack_ops::rename_project(data, &args.name))?;
            println!("renamed to {}", args.name.trim());
            Ok(())
        }

        // Tasks
        Commands::Push(args) => {
            let id = ctx.mutate(|data| task_ops::push_task(data, &args.name, None))?;
            println!("{}", id);
            Ok(())
        }
        Commands::Queue(args) => {
            let id = ctx.mutate(|data| task_ops::queue_task(data, &args.name, None))?;
            println!("{}", id);
            Ok(())
        }
        Commands::Breakdown(args) => {
            let id = ctx.mutate(|data| {
                let focus = find_task(data, args.task.as_deref())?;
                task_ops::breakdown_task(data, &args.name, focus.as_deref())
            })?;
            println!("{}", id);
            Ok(())
        }
        Commands::Done(args) => cmd_done(&ctx, args),

        // Stash and data
        Commands::Stash(args) => cmd_stash(&ctx, args, json),
        Commands::Export(args) => cmd_export(&ctx, args),
        Commands::Import(args) => cmd_import(&ctx, args),
        Commands::Reset(args) => cmd_reset(&ctx, args),

        Commands::Config(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Data directory access for one command
struct Context {
    store: Store,
    log_limit: usize,
}

impl Context {
    fn open(data_dir: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let config = config_io::read_config()?;
        let dir = resolve_data_dir(data_dir, config.storage.data_dir.as_deref());
        logging::init(&dir);
        Ok(Context {
            store: Store::open(&dir)?,
            log_limit: config.storage.log_limit,
        })
    }

    fn load(&self) -> Result<AppData, Box<dyn Error>> {
        Ok(self.store.load()?.unwrap_or_default())
    }

    /// Load, apply `op`, trim the log and save, all under the directory lock
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut AppData) -> Result<T, OpError>,
    ) -> Result<T, Box<dyn Error>> {
        let _lock = self.store.lock()?;
        let mut data = self.load()?;
        let value = op(&mut data)?;
        let dropped = log_ops::trim(&mut data.logs, self.log_limit);
        if dropped > 0 {
            tracing::debug!(dropped, "trimmed activity log");
        }
        self.store.save_locked(&data)?;
        Ok(value)
    }
}

/// (id, name) of the stack matching `query`
fn find_stack(data: &AppData, query: &str) -> Result<(String, String), OpError> {
    let idx = stack_ops::resolve_stack(data, query)
        .ok_or_else(|| OpError::StackNotFound(query.to_string()))?;
    let stack = &data.parent_task.sub_stacks[idx];
    Ok((stack.id.clone(), stack.name.clone()))
}

fn active_stack(data: &AppData) -> Result<(String, String), OpError> {
    match data.parent_task.active() {
        Some(stack) => Ok((stack.id.clone(), stack.name.clone())),
        None if data.parent_task.sub_stacks.is_empty() => Err(OpError::NoSubStacks),
        None => Err(OpError::NoActiveStack),
    }
}

/// Task id in the active stack for an optional `--task` query
fn find_task(data: &AppData, query: Option<&str>) -> Result<Option<String>, OpError> {
    let Some(query) = query else {
        return Ok(None);
    };
    let (stack_id, _) = active_stack(data)?;
    let stack = data
        .parent_task
        .stack(&stack_id)
        .ok_or_else(|| OpError::StackNotFound(stack_id.clone()))?;
    let idx = task_ops::resolve_task(stack, query)
        .ok_or_else(|| OpError::TaskNotFound(query.to_string()))?;
    Ok(Some(stack.tasks[idx].id.clone()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_status(ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let data = ctx.load()?;
    if json {
        return print_json(&status_to_json(&data));
    }
    println!("{}", format_status(&data));
    Ok(())
}

fn cmd_tree(ctx: &Context, json: bool) -> Result<(), Box<dyn Error>> {
    let data = ctx.load()?;
    if json {
        return print_json(&tree_to_json(&data));
    }
    println!("{}", format_tree(&data));
    Ok(())
}

fn cmd_log(ctx: &Context, args: LogArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let data = ctx.load()?;
    let entries = match &args.grep {
        Some(pattern) => log_ops::search(&data.logs, pattern),
        None => log_ops::newest_first(&data.logs),
    };
    let entries: Vec<_> = entries.into_iter().take(args.limit).collect();
    if json {
        return print_json(&entries);
    }
    for entry in entries {
        println!("{}", format_log_entry(entry));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_cycle(ctx: &Context, direction: Direction) -> Result<(), Box<dyn Error>> {
    let name = ctx.mutate(|data| {
        let id = stack_ops::cycle(data, direction).ok_or(if data.parent_task.sub_stacks.is_empty() {
            OpError::NoSubStacks
        } else {
            OpError::NoActiveStack
        })?;
        Ok(data
            .parent_task
            .stack(&id)
            .map(|s| s.name.clone())
            .unwrap_or(id))
    })?;
    println!("active: {}", name);
    Ok(())
}

fn cmd_done(ctx: &Context, args: DoneArgs) -> Result<(), Box<dyn Error>> {
    let outcome = ctx.mutate(|data| {
        let focus = find_task(data, args.task.as_deref())?;
        task_ops::complete_task(data, focus.as_deref())
    })?;
    println!("completed: {}", outcome.task_name);
    if outcome.stack_completed {
        println!("stack completed");
    }
    if let Some(next) = outcome.activated {
        println!("active: {}", next);
    }
    Ok(())
}

fn cmd_stash(ctx: &Context, args: StashCmd, json: bool) -> Result<(), Box<dyn Error>> {
    match args.action {
        StashAction::List => {
            let data = ctx.load()?;
            if json {
                return print_json(&stash_to_json(&data.stash));
            }
            println!("{}", format_stash(&data.stash));
        }
        StashAction::Add(args) => {
            let id = ctx.mutate(|data| stash_ops::stash_task(data, &args.name))?;
            println!("{}", id);
        }
        StashAction::Restore(args) => {
            let stack = ctx.mutate(|data| {
                let id = stash_item_id(data, &args.item)?;
                let dest = stash_ops::restore_stash(data, &id)?;
                Ok(data
                    .parent_task
                    .stack(&dest)
                    .map(|s| s.name.clone())
                    .unwrap_or(dest))
            })?;
            println!("restored to {}", stack);
        }
        StashAction::Discard(args) => {
            ctx.mutate(|data| {
                let id = stash_item_id(data, &args.item)?;
                stash_ops::discard_stash(data, &id)
            })?;
            println!("discarded");
        }
    }
    Ok(())
}

fn stash_item_id(data: &AppData, query: &str) -> Result<String, OpError> {
    stash_ops::resolve_stash(data, query)
        .map(|i| data.stash[i].id.clone())
        .ok_or_else(|| OpError::StashNotFound(query.to_string()))
}

fn cmd_export(ctx: &Context, args: ExportArgs) -> Result<(), Box<dyn Error>> {
    let json = ctx.store.export_json()?;
    let path = args.path.unwrap_or_else(|| PathBuf::from(export_file_name()));
    if path.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }
    std::fs::write(&path, json)
        .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
    tracing::info!(path = %path.display(), "exported state");
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(ctx: &Context, args: ImportArgs) -> Result<(), Box<dyn Error>> {
    let text = std::fs::read_to_string(&args.path)
        .map_err(|e| format!("could not read {}: {}", args.path.display(), e))?;
    let data = ctx.store.import_json(&text)?;
    println!(
        "imported {} stacks, {} stashed, {} log entries",
        data.parent_task.sub_stacks.len(),
        data.stash.len(),
        data.logs.len()
    );
    Ok(())
}

fn cmd_reset(ctx: &Context, args: ResetArgs) -> Result<(), Box<dyn Error>> {
    if !args.yes {
        return Err("reset deletes all data; pass --yes to confirm".into());
    }
    ctx.store.clear()?;
    println!("all data cleared");
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, json: bool) -> Result<(), Box<dyn Error>> {
    let path = config_io::config_path();
    match args.action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => {
            let config = config_io::read_config_from(&path)?;
            if json {
                return print_json(&config);
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set(set) => {
            config_io::set_value_in(&path, &set.key, &set.value)?;
            println!("{} = {}", set.key, set.value);
        }
    }
    Ok(())
}
