use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use pinchcal_core::EngineConfig;
use pinchcal_view::{CalendarCursor, MonthIndex};

use crate::error::{HarnessError, Result};
use crate::layout::GridLayout;
use crate::replay::{ReplayOptions, replay};
use crate::script::load_script;

#[derive(Debug, Parser)]
#[command(
    name = "pinchcal-harness",
    about = "Replay pinch-calendar input scripts and print the view timeline",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSONL input script; prints one JSON line per notification.
    Replay(ReplayArgs),

    /// Print the default engine configuration as JSON.
    Defaults,

    /// Load a TOML or JSON config and report validation problems.
    #[command(name = "check-config")]
    CheckConfig {
        /// Config file (`.json` is parsed as JSON, anything else as TOML).
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Script to replay.
    pub script: PathBuf,

    /// Engine configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Month shown initially, as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    pub start: Option<String>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Dispatch `cli`, writing results to `out`.
pub fn run_with_output(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(&args, out),
        Commands::Defaults => {
            let json = EngineConfig::default().to_json_pretty()?;
            writeln!(out, "{json}")?;
            Ok(())
        }
        Commands::CheckConfig { path } => {
            load_config(&path)?;
            writeln!(out, "ok: {}", path.display())?;
            Ok(())
        }
    }
}

fn run_replay(args: &ReplayArgs, out: &mut impl Write) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    let start = match &args.start {
        Some(text) => parse_month(text)?,
        None => CalendarCursor::containing(chrono::Local::now().date_naive().into()),
    };
    let steps = load_script(&args.script)?;
    tracing::debug!(
        target: "pinchcal.harness",
        steps = steps.len(),
        script = %args.script.display(),
        "replaying"
    );

    let timeline = replay(
        &steps,
        ReplayOptions {
            config,
            start,
            layout: GridLayout::default(),
        },
    );
    for entry in &timeline {
        serde_json::to_writer(&mut *out, entry)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Load and validate an engine config.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?
    } else {
        EngineConfig::from_toml_file(path)?
    };
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(HarnessError::InvalidConfig {
            path: path.to_path_buf(),
            problems: problems.join("; "),
        });
    }
    Ok(config)
}

/// Parse `YYYY-MM` into a cursor.
pub fn parse_month(text: &str) -> Result<CalendarCursor> {
    let date = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d")
        .map_err(|e| HarnessError::invalid(format!("--start {text:?}: {e}")))?;
    let month = u8::try_from(date.month0())
        .ok()
        .and_then(MonthIndex::new)
        .ok_or_else(|| HarnessError::invalid(format!("--start {text:?}: bad month")))?;
    Ok(CalendarCursor::new(date.year(), month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_month_accepts_year_month() {
        let cursor = parse_month("2024-03").unwrap();
        assert_eq!(cursor, CalendarCursor::new(2024, MonthIndex::new(2).unwrap()));
    }

    #[test]
    fn parse_month_rejects_garbage() {
        for bad in ["2024-13", "March", "2024-03-15", ""] {
            let err = parse_month(bad).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{bad}");
        }
    }

    #[test]
    fn defaults_command_prints_json() {
        let mut out = Vec::new();
        run_with_output(
            Cli {
                command: Commands::Defaults,
            },
            &mut out,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["gesture"]["pinch_cooldown_ms"], 500);
        assert_eq!(value["transition"]["leave_phase_ms"], 300);
    }

    #[test]
    fn cli_parses_replay_flags() {
        let cli = Cli::try_parse_from([
            "pinchcal-harness",
            "replay",
            "script.jsonl",
            "--config",
            "engine.toml",
            "--start",
            "2024-03",
        ])
        .unwrap();
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.script, PathBuf::from("script.jsonl"));
        assert_eq!(args.config, Some(PathBuf::from("engine.toml")));
        assert_eq!(args.start.as_deref(), Some("2024-03"));
    }
}
