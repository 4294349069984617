mod config;
mod eval_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use natplan_core::{CalendarDomain, CalendarMode, MeetingDomain, TripDomain};

use config::ResolvedEval;

#[derive(Parser)]
#[command(name = "natplan", about = "Score natural-language planning answers")]
struct Cli {
    /// Config file (defaults to ~/.config/natplan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score multi-city trip itineraries
    Trip(EvalArgs),
    /// Score meeting plans around a city
    Meeting(EvalArgs),
    /// Score calendar scheduling answers
    Calendar {
        #[command(flatten)]
        args: EvalArgs,
        /// Scoring mode: exact (match the reference slot) or feasible
        #[arg(long)]
        mode: Option<CalendarMode>,
    },
}

/// Options shared by every evaluation subcommand.
#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Dataset file (JSON object keyed by id, JSON array, or JSON lines)
    #[arg(long)]
    pub data_path: Option<PathBuf>,
    /// Record field holding the model answer (overrides NATPLAN_PRED_FIELD)
    #[arg(long)]
    pub pred_field: Option<String>,
    /// Write per-example results as JSON lines (overrides NATPLAN_OUTPUT)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// List every failing example and log progress
    #[arg(long, short)]
    pub verbose: bool,
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Trip(args) | Self::Meeting(args) | Self::Calendar { args, .. } => args.verbose,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.command.verbose() { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let file = config::load_for_cli(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Trip(args) => {
            let resolved = ResolvedEval::resolve("trip", &args, None, &file)?;
            eval_cmd::run_eval(&TripDomain, &resolved.eval)?;
        }
        Commands::Meeting(args) => {
            let resolved = ResolvedEval::resolve("meeting", &args, None, &file)?;
            eval_cmd::run_eval(&MeetingDomain, &resolved.eval)?;
        }
        Commands::Calendar { args, mode } => {
            let resolved = ResolvedEval::resolve("calendar", &args, mode, &file)?;
            eval_cmd::run_eval(&CalendarDomain::new(resolved.mode), &resolved.eval)?;
        }
    }

    Ok(())
}
