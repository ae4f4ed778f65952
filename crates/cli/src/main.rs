//! Habitboard CLI - habit progress dashboards for e-ink displays.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use habitboard_core::GoalStatus;
use habitboard_dashboard::{AppConfig, Orchestrator, DEFAULT_CONFIG_PATH};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "habitboard")]
#[command(about = "Habit progress dashboards for e-ink displays", long_about = None)]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH, env = "HABITBOARD_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard once
    Render {
        /// Render as of this local time (YYYY-MM-DDTHH:MM) instead of now
        #[arg(long, value_parser = parse_local_time)]
        at: Option<NaiveDateTime>,
    },
    /// Print progress for every goal
    Status {
        /// Report as of this local time (YYYY-MM-DDTHH:MM) instead of now
        #[arg(long, value_parser = parse_local_time)]
        at: Option<NaiveDateTime>,
    },
    /// Re-render on the configured interval
    Watch {
        /// Seconds between refreshes, overriding the config
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    config.apply_env();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let orchestrator = Orchestrator::from_config(&config)?;

    match cli.command {
        Commands::Render { at } => {
            let outcome = orchestrator.refresh(at.unwrap_or_else(local_now)).await?;
            if outcome.stale {
                println!("Stale: {}", outcome.artifact.path.display());
            } else {
                println!("Rendered: {}", outcome.artifact.path.display());
            }
        }
        Commands::Status { at } => {
            let report = orchestrator.progress(at.unwrap_or_else(local_now)).await?;
            let period = report.period;

            println!(
                "Period {} - {} ({} days)",
                period.start.format("%Y-%m-%d"),
                period.end().format("%Y-%m-%d"),
                period.length_days
            );
            if report.goals.is_empty() {
                println!("  No goals configured");
            }
            for goal in &report.goals {
                let p = &goal.progress;
                println!(
                    "  {:<24} {:>3}/{:<5} expected {:>5.2}  {:<8} {}d left",
                    goal.label(),
                    p.current_count,
                    format!("{:.1}", p.period_target),
                    p.expected_by_now,
                    format_status(p.status),
                    p.days_remaining,
                );
            }
        }
        Commands::Watch { interval } => {
            let every = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| config.output.refresh_interval());
            info!("Refreshing every {:?} into {}", every, orchestrator.store().dir().display());

            tokio::select! {
                _ = orchestrator.watch(every, None, local_now) => {}
                _ = tokio::signal::ctrl_c() => info!("Stopping"),
            }
        }
    }

    Ok(())
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_local_time(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {}", e))
}

fn format_status(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Behind => "BEHIND",
        GoalStatus::OnTrack => "ON TRACK",
        GoalStatus::Ahead => "AHEAD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_time() {
        let at = parse_local_time("2026-10-21T12:00").unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M:%S").to_string(), "2026-10-21 12:00:00");
        assert!(parse_local_time("2026-10-21T12:00:30").is_ok());
        assert!(parse_local_time("yesterday").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["habitboard", "--config", "x.toml", "watch", "--interval", "60"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Commands::Watch { interval: Some(60) }));
    }
}
