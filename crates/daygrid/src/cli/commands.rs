//! # CLI Layer
//!
//! This module is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the logging subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! Library code logs through `tracing` macros; nothing is printed unless the
//! subscriber installed here lets it through. The default level is `warn`,
//! `--verbose` raises it to `debug`, and `RUST_LOG` overrides both.

use super::picker::PromptPicker;
use super::render::{current_year, render_result};
use super::setup::{BackupCommands, Cli, Commands, StorageCommands};
use anyhow::{bail, Context};
use clap::Parser;
use daygridapp::commands::settings::SettingsUpdate;
use daygridapp::commands::CmdResult;
use daygridapp::config::JournalConfig;
use daygridapp::init::{self, initialize, JournalContext};
use daygridapp::store::directory::{DirectoryPicker, FixedPicker};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Config) = &cli.command {
        return handle_config(cli.data.clone());
    }

    let mut ctx = initialize(cli.data.clone()).context("failed to open the journal")?;
    tracing::debug!(
        data_dir = %ctx.data_dir.display(),
        mode = %ctx.api.mode(),
        "journal ready"
    );
    let (result, grid_year) = dispatch(&mut ctx, cli.command)?;

    print!("{}", render_result(&result, grid_year));
    if result.has_errors() {
        bail!("command failed");
    }
    Ok(())
}

/// Sends log events to stderr so they never mix with rendered output.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn picker_for(dir: Option<PathBuf>) -> Box<dyn DirectoryPicker> {
    match dir {
        Some(path) => Box::new(FixedPicker::path(path)),
        None => Box::new(PromptPicker),
    }
}

fn dispatch(
    ctx: &mut JournalContext,
    command: Option<Commands>,
) -> anyhow::Result<(CmdResult, Option<i32>)> {
    let api = &mut ctx.api;
    let result = match command {
        None => {
            let year = current_year();
            return Ok((api.list_entries(Some(year))?, Some(year)));
        }
        Some(Commands::Write { day, text }) => api.write_entry(&day.day_ref(), &text.join(" "))?,
        Some(Commands::Show { day }) => api.show_entry(&day.day_ref())?,
        Some(Commands::List { year }) => return Ok((api.list_entries(year)?, year)),
        Some(Commands::Delete { day }) => api.delete_entry(&day.day_ref())?,
        Some(Commands::Storage { action }) => match action {
            StorageCommands::Status => api.storage_status()?,
            StorageCommands::Migrate { dir } => api.migrate_to_directory(picker_for(dir).as_ref())?,
            StorageCommands::Change { dir } => api.change_directory(picker_for(dir).as_ref())?,
            StorageCommands::Local => api.use_local_storage()?,
        },
        Some(Commands::Backup { action }) => match action {
            BackupCommands::Export { output } => {
                let cwd = std::env::current_dir().context("cannot read the current directory")?;
                api.export_backup(output, &cwd)?
            }
            BackupCommands::Import { path } => api.import_backup(&path)?,
        },
        Some(Commands::Settings {
            sound,
            notifications,
            time,
        }) => api.settings(SettingsUpdate {
            sound_effects: sound.map(bool::from),
            notifications: notifications.map(bool::from),
            time,
        })?,
        Some(Commands::Config) => CmdResult::default(),
    };
    Ok((result, None))
}

/// Prints the effective configuration as `key = value` lines.
fn handle_config(data_override: Option<PathBuf>) -> anyhow::Result<()> {
    let data_dir = init::data_dir(data_override)?;
    let config = JournalConfig::load(&data_dir);

    println!("# data directory: {}", data_dir.display());
    let value = toml::Value::try_from(&config).context("cannot display configuration")?;
    if let toml::Value::Table(table) = value {
        for (key, value) in table {
            println!("{} = {}", key, value);
        }
    }
    Ok(())
}
