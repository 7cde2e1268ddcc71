use clap::Parser;
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use task_timeline::agenda::{build_timeline, parse_tasks, today_in};
use task_timeline::config::Config;
use task_timeline::error::{Error, Result};
use task_timeline::render::{render_days_html, render_days_json, render_days_markdown};
use task_timeline::types::Task;

mod cli;

use cli::Cli;

fn main() {
    // Tracing is opt-in via RUST_LOG and goes to stderr
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(tz) = cli.tz {
        config.timezone = tz;
    }
    if let Some(show) = cli.show_completed {
        config.timeline.show_completed_tasks = show;
    }
    if let Some(abandoned) = cli.abandoned {
        config.task_statuses.abandoned = abandoned;
    }

    let tz = config.tz()?;
    let today = match cli.date.as_deref() {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(date.to_string()))?,
        None => today_in(&tz),
    };

    let tasks = read_tasks(&cli.input)?;
    info!(tasks = tasks.len(), %today, timezone = %config.timezone, "building timeline");
    let days = build_timeline(tasks, &config, today, &tz);

    let output = match cli.format.as_str() {
        "json" => render_days_json(&days, today)?,
        "md" => render_days_markdown(&days, today),
        "html" => render_days_html(&days, today),
        other => return Err(Error::InvalidArgument(format!("unknown format '{other}'"))),
    };

    if let Some(out_path) = cli.output {
        fs::write(out_path, output)?;
    } else {
        io::stdout().write_all(output.as_bytes())?;
    }

    Ok(())
}

fn read_tasks(input: &Path) -> Result<Vec<Task>> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input).map_err(|source| Error::ReadFile {
            path: input.to_path_buf(),
            source,
        })?
    };
    parse_tasks(&raw)
}
