// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{crate_version, Parser};
use colored::Colorize;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use formportal::Configuration;
use serde::Serialize;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of environment variables overriding configuration values.
const ENV_PREFIX: &str = "FORMPORTAL_";

/// Log verbosity when nothing else was configured.
const DEFAULT_LOG_LEVEL: &str = "info";

pub type ConfigFilePath = Option<PathBuf>;

/// Configuration derived from command line arguments.
///
/// All arguments are optional and don't get serialized to Figment when they're None. This is to
/// assure that default values do not overwrite settings from the config file or environment.
#[derive(Parser, Serialize, Debug, Default)]
#[command(
    name = "formportal",
    about = "Dynamic forms, submissions and reference data behind a REST API",
    long_about = None,
    version
)]
pub struct Cli {
    /// Path to an optional "config.toml" file for further configuration.
    ///
    /// When not set the program will try to find a `config.toml` file in the same folder the
    /// program is executed in and otherwise in the regarding operation systems XDG config
    /// directory ("$HOME/.config/formportal/config.toml" on Linux).
    #[arg(short = 'c', long, value_name = "PATH")]
    #[serde(skip_serializing)]
    pub config: Option<PathBuf>,

    /// HTTP port serving the REST API. Defaults to 2020.
    #[arg(short = 'p', long, value_name = "PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,

    /// Path of the JSON file all tables get persisted to.
    ///
    /// WARNING: By default nothing is persisted after shutdown. Set a path for production
    /// settings to not lose data.
    #[arg(short = 's', long, value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,

    /// Fill an empty data types table with the known data kinds on start. Enabled by default.
    #[arg(
        long,
        value_name = "BOOL",
        default_missing_value = "true",
        num_args = 0..=1,
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_data_types: Option<bool>,

    /// Number of messages buffered on the internal service bus.
    #[arg(long, value_name = "NUMBER")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_capacity: Option<usize>,

    /// Set log verbosity. Possible log levels are: ERROR, WARN, INFO, DEBUG, TRACE. They are
    /// scoped to "formportal" by default.
    ///
    /// If you want to adjust the scope for deeper inspection use a filter value, for example
    /// "=TRACE" for logging _everything_ or "formportal=DEBUG,tower_http=DEBUG" etc.
    #[arg(short = 'l', long, value_name = "LEVEL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Configuration and log level resolved from all sources.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config_file_path: ConfigFilePath,
    pub config: Configuration,
    pub log_level: String,
}

/// Get configuration from 1. .toml file, 2. environment variables and 3. command line arguments
/// (in that order, meaning that later configuration sources take precedence over the earlier
/// ones).
pub fn load_config(cli: Cli) -> Result<LoadedConfig> {
    let config_file_path: ConfigFilePath = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }

            Some(path.clone())
        }
        None => try_determine_config_file_path(),
    };

    let mut figment = Figment::from(Serialized::defaults(Configuration::default()));
    if let Some(path) = &config_file_path {
        figment = figment.merge(Toml::file(path));
    }

    let figment = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(cli));

    let config: Configuration = figment.extract()?;
    if config.bus_capacity == 0 {
        bail!("Bus capacity needs to be at least 1");
    }

    let log_level = figment
        .find_value("log_level")
        .ok()
        .and_then(|value| value.into_string())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into());

    Ok(LoadedConfig {
        config_file_path,
        config,
        log_level,
    })
}

fn try_determine_config_file_path() -> ConfigFilePath {
    let current_dir = std::env::current_dir()
        .ok()
        .map(|dir| dir.join(CONFIG_FILE_NAME));

    let xdg_config_dir = ProjectDirs::from("", "", "formportal")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME));

    [current_dir, xdg_config_dir]
        .into_iter()
        .flatten()
        .find(|path| path.exists())
}

/// Makes a relative path absolute for display, keeps it as is when that fails.
fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

pub fn print_config(config_file_path: &ConfigFilePath, config: &Configuration) -> String {
    println!("{} v{}\n", "formportal".underline(), crate_version!());

    match config_file_path {
        Some(path) => {
            println!(
                "Loading config file from {}",
                absolute_path(path).display().to_string().blue()
            );
        }
        None => {
            println!("No config file provided");
        }
    }

    println!();
    println!("{}\n", "Configuration".underline());

    let snapshot = match &config.snapshot_path {
        Some(path) => absolute_path(path).display().to_string(),
        None => "memory (data is not persisted)".into(),
    };

    let seed_data_types = if config.seed_data_types {
        "enabled"
    } else {
        "disabled"
    };

    format!(
        r"HTTP port: {}
Snapshot: {}
Seed data types: {}

Portal is ready!
",
        config.http_port.to_string().blue(),
        snapshot.blue(),
        seed_data_types.blue(),
    )
}
