use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Run batches of tasks concurrently and report per-task timing.
#[derive(Parser, Debug)]
#[command(name = "fanout", version, about = "Concurrent fan-out task runner")]
pub struct CliArgs {
    /// Scheduler config TOML (overrides FANOUT_* env vars)
    #[arg(long, global = true, env = "FANOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a synthetic batch of sleeping tasks
    Run(RunArgs),
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of tasks to register
    #[arg(long, default_value_t = 10)]
    pub tasks: usize,

    /// How long each task sleeps, in milliseconds
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Make every K-th task panic (0 = never)
    #[arg(long, default_value_t = 0)]
    pub fault_every: usize,

    /// Cap on concurrently running tasks (0 = one thread per task)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
