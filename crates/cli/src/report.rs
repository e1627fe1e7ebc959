use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use fanout_scheduler::{SchedulerMetrics, TaskResult};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const OK: Color = Color::Green;
    const FAULT: Color = Color::Red;
    const HEADER: Color = Color::Magenta;
    const DIM: Color = Color::DarkGrey;
}

/// One table row: name, status, duration and fault message if any.
pub fn format_row(result: &TaskResult) -> String {
    let status = if result.completed { "ok" } else { "FAULT" };
    let mut row = format!(
        "{:<24} {:<6} {:>10.3} ms",
        result.task_name,
        status,
        result.duration.as_secs_f64() * 1000.0
    );
    if let Some(fault) = &result.fault {
        row.push_str("  ");
        row.push_str(fault);
    }
    row
}

pub fn format_summary(metrics: &SchedulerMetrics) -> String {
    let slowest = metrics
        .slowest
        .as_ref()
        .map(|(name, d)| format!("{} ({:.3} ms)", name, d.as_secs_f64() * 1000.0))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} tasks: {} completed, {} faulted | wall {:.3} ms | slowest {}",
        metrics.results_collected,
        metrics.completed_count(),
        metrics.faulted_count(),
        metrics.wall_time.as_secs_f64() * 1000.0,
        slowest
    )
}

/// Print results in arrival order followed by the run summary.
pub fn print_table(results: &[TaskResult], metrics: &SchedulerMetrics) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Colors::HEADER),
        Print(format!("{:<24} {:<6} {:>13}\n", "TASK", "STATUS", "DURATION")),
        ResetColor,
    )?;

    for result in results {
        let color = if result.completed { Colors::OK } else { Colors::FAULT };
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("{}\n", format_row(result))),
            ResetColor,
        )?;
    }

    execute!(
        stdout,
        SetForegroundColor(Colors::DIM),
        Print(format!("---\n{}\n", format_summary(metrics))),
        ResetColor,
    )?;
    stdout.flush()?;
    Ok(())
}

/// Print results and metrics as one JSON document.
pub fn print_json(results: &[TaskResult], metrics: &SchedulerMetrics) -> Result<()> {
    let doc = serde_json::json!({
        "results": results,
        "metrics": metrics,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
