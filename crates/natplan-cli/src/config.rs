//! Configuration file management for natplan.
//!
//! Provides a TOML config file at `~/.config/natplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.
//!
//! ```toml
//! [defaults]
//! pred_field = "pred_5shot_pro"
//!
//! [trip]
//! data_path = "data/trip_planning.json"
//!
//! [calendar]
//! data_path = "data/calendar_scheduling.json"
//! mode = "feasible"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::Deserialize;
use thiserror::Error;

use natplan_core::{CalendarMode, EvalConfig};

use crate::EvalArgs;

pub const PRED_FIELD_ENV: &str = "NATPLAN_PRED_FIELD";
pub const OUTPUT_ENV: &str = "NATPLAN_OUTPUT";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: Section,
    #[serde(default)]
    pub trip: Section,
    #[serde(default)]
    pub meeting: Section,
    #[serde(default)]
    pub calendar: Section,
}

/// Settings for one domain, or shared defaults.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub data_path: Option<PathBuf>,
    pub pred_field: Option<String>,
    pub output: Option<PathBuf>,
    /// Calendar only.
    pub mode: Option<CalendarMode>,
}

impl ConfigFile {
    fn section(&self, domain: &str) -> Option<&Section> {
        match domain {
            "trip" => Some(&self.trip),
            "meeting" => Some(&self.meeting),
            "calendar" => Some(&self.calendar),
            _ => None,
        }
    }

    /// Domain value if set, else the `[defaults]` value.
    fn lookup<T: Clone>(&self, domain: &str, field: impl Fn(&Section) -> &Option<T>) -> Option<T> {
        self.section(domain)
            .and_then(|s| field(s).clone())
            .or_else(|| field(&self.defaults).clone())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the natplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/natplan` or `~/.config/natplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("natplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("natplan")
}

/// Return the path to the natplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read
// -----------------------------------------------------------------------

/// Load and parse a config file.
pub fn load_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Load the config file named on the command line, or the default one.
///
/// An explicit path must exist. A missing default file means "no config".
pub fn load_for_cli(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let path = config_path();
            if path.exists() {
                load_config(&path)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved settings for one subcommand.
#[derive(Debug)]
pub struct ResolvedEval {
    pub eval: EvalConfig,
    pub mode: CalendarMode,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ResolvedEval {
    /// Resolve settings for `domain` using the chain: CLI flag > env var >
    /// config file (`[domain]`, then `[defaults]`) > default.
    ///
    /// - data path: `--data-path` > config file > error
    /// - prediction field: `--pred-field` > `NATPLAN_PRED_FIELD` > config file > `pred_5shot_pro`
    /// - output: `--output` > `NATPLAN_OUTPUT` > config file > none
    /// - calendar mode: `--mode` > config file > `exact`
    pub fn resolve(
        domain: &str,
        args: &EvalArgs,
        cli_mode: Option<CalendarMode>,
        file: &ConfigFile,
    ) -> Result<Self> {
        let data_path = match args
            .data_path
            .clone()
            .or_else(|| file.lookup(domain, |s| &s.data_path))
        {
            Some(path) => path,
            None => bail!(
                "no dataset given; pass --data-path or set data_path under [{domain}] in {}",
                config_path().display()
            ),
        };

        let pred_field = args
            .pred_field
            .clone()
            .or_else(|| env_value(PRED_FIELD_ENV))
            .or_else(|| file.lookup(domain, |s| &s.pred_field))
            .unwrap_or_else(|| EvalConfig::DEFAULT_PRED_FIELD.to_owned());

        let output = args
            .output
            .clone()
            .or_else(|| env_value(OUTPUT_ENV).map(PathBuf::from))
            .or_else(|| file.lookup(domain, |s| &s.output));

        let mode = cli_mode
            .or_else(|| file.lookup(domain, |s| &s.mode))
            .unwrap_or_default();

        let mut eval = EvalConfig::new(data_path)
            .pred_field(pred_field)
            .verbose(args.verbose);
        if let Some(path) = output {
            eval = eval.output(path);
        }

        Ok(Self { eval, mode })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
