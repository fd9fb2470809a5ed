use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod logging;
mod plan;
mod state;

use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "rockwater",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ROCKWATER_BUILD_SHA"), ")"),
    about = "Rock-and-water day planner"
)]
struct Cli {
    /// Log level (overrides ROCKWATER_LOG)
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schedule a JSON task snapshot and print the day
    Plan {
        /// Path to a JSON array of tasks
        #[arg(long)]
        tasks: PathBuf,

        /// Local "YYYY-MM-DD HH:MM" to plan from (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Print the scheduled tasks as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show a task's total duration including open subtasks
    Rollup {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        id: String,
    },

    /// Change a task's own duration (clamped by config limits) and replan
    Rescale {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long)]
        minutes: i32,

        #[arg(long)]
        now: Option<String>,
    },

    /// Write a default ~/.rockwater/config.toml
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level)?;

    match cli.command {
        Command::Plan { tasks, now, json } => {
            let cfg = config::load_config()?;
            plan::run_plan(&tasks, now.as_deref(), json, &cfg)?;
        }

        Command::Rollup { tasks, id } => {
            plan::run_rollup(&tasks, &id)?;
        }

        Command::Rescale {
            tasks,
            id,
            minutes,
            now,
        } => {
            let cfg = config::load_config()?;
            plan::run_rescale(&tasks, &id, minutes, now.as_deref(), &cfg)?;
        }

        Command::InitConfig => {
            config::init_config()?;
        }
    }

    Ok(())
}
