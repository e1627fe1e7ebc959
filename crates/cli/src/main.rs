mod batch;
mod cli;
mod report;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use fanout_core::{Config, SchedulerConfig};
use fanout_scheduler::Scheduler;

use crate::batch::BatchSpec;
use crate::cli::{CliArgs, Command, RunArgs};

fn main() -> Result<()> {
    fanout_core::load_dotenv();
    let mut config = Config::from_env();
    fanout_core::init_tracing(&config.log.filter);

    let args = CliArgs::parse();

    if let Some(path) = &args.config {
        config.scheduler = SchedulerConfig::from_toml_file(path)
            .with_context(|| format!("failed to load scheduler config: {}", path.display()))?;
        info!(path = %path.display(), "loaded scheduler config");
    }

    match args.command {
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(())
        }
        Command::Run(run) => run_batch(config, run),
    }
}

fn run_batch(mut config: Config, run: RunArgs) -> Result<()> {
    if let Some(cap) = run.max_concurrency {
        config.scheduler.max_concurrency = cap;
    }
    config.log_summary();

    // Faulting tasks are expected here; keep their panics out of the table.
    std::panic::set_hook(Box::new(|info| {
        debug!(panic = %info, "task panic contained");
    }));

    let spec = BatchSpec {
        tasks: run.tasks,
        delay: Duration::from_millis(run.delay_ms),
        fault_every: run.fault_every,
    };

    let mut scheduler = Scheduler::with_config(config.scheduler.clone());
    spec.populate(&mut scheduler).context("failed to register tasks")?;

    let results = scheduler.start().context("scheduler run failed")?;

    if run.json {
        report::print_json(&results, scheduler.metrics())?;
    } else {
        report::print_table(&results, scheduler.metrics())?;
    }
    Ok(())
}
