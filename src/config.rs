//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgcheck/orgcheck.toml`
//! 3. Local config: `<dir>/.orgcheck.toml` (current directory by default)
//! 4. Environment variables: `ORGCHECK_*` prefix, `__` between nested keys
//!    (e.g. `ORGCHECK_SALARY__MIN_PERCENT=10`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::report::{
    DEFAULT_MAX_PERCENT, DEFAULT_MIN_PERCENT, DEFAULT_REPORTING_LINES_THRESHOLD,
};
use crate::domain::ReportPolicy;

/// Default input file, looked up relative to the working directory.
pub const DEFAULT_INPUT_FILE: &str = "SampleData.csv";

const LOCAL_CONFIG_FILE: &str = ".orgcheck.toml";

/// Salary band settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SalaryConfig {
    /// Minimum percentage above the subordinate mean
    pub min_percent: i32,
    /// Maximum percentage above the subordinate mean
    pub max_percent: i32,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        Self {
            min_percent: DEFAULT_MIN_PERCENT,
            max_percent: DEFAULT_MAX_PERCENT,
        }
    }
}

/// Reporting line settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportingConfig {
    /// Deepest allowed reporting line below the root
    pub max_depth: i32,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_REPORTING_LINES_THRESHOLD,
        }
    }
}

/// Unified configuration for orgcheck.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Employee CSV file used when none is given on the command line
    pub input: PathBuf,
    /// Whether the first CSV line is a header
    pub has_header: bool,
    pub salary: SalaryConfig,
    pub reporting: ReportingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_FILE),
            has_header: true,
            salary: SalaryConfig::default(),
            reporting: ReportingConfig::default(),
        }
    }
}

/// Get the XDG config directory for orgcheck.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgcheck").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgcheck.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

impl Settings {
    /// Report parameters carried by these settings.
    pub fn policy(&self) -> ReportPolicy {
        ReportPolicy {
            min_percent: self.salary.min_percent,
            max_percent: self.salary.max_percent,
            max_depth: self.reporting.max_depth,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let raw = self.input.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.input = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.orgcheck.toml` (default: cwd)
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("input", defaults.input.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("has_header", defaults.has_header)
            .map_err(config_err)?
            .set_default("salary.min_percent", i64::from(defaults.salary.min_percent))
            .map_err(config_err)?
            .set_default("salary.max_percent", i64::from(defaults.salary.max_percent))
            .map_err(config_err)?
            .set_default("reporting.max_depth", i64::from(defaults.reporting.max_depth))
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        let local_dir = local_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            builder = builder.add_source(File::from(local_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("ORGCHECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        settings.expand_paths();

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Commented template written by `orgcheck config init`.
    pub fn template() -> String {
        format!(
            r#"# orgcheck configuration
#
# Precedence (lowest to highest):
#   defaults < global ({global}) < local (.orgcheck.toml) < ORGCHECK_* env vars

# Employee CSV file used when no file argument is given
# input = "{input}"

# First line of the CSV names the columns
# has_header = true

[salary]
# Managers must earn at least this percentage above their reports' mean salary
# min_percent = {min}

# ... and at most this percentage above it
# max_percent = {max}

[reporting]
# Deepest allowed reporting line below the CEO
# max_depth = {depth}
"#,
            global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "~/.config/orgcheck/orgcheck.toml".into()),
            input = DEFAULT_INPUT_FILE,
            min = DEFAULT_MIN_PERCENT,
            max = DEFAULT_MAX_PERCENT,
            depth = DEFAULT_REPORTING_LINES_THRESHOLD,
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_building_policy_then_uses_default_bounds() {
        let policy = Settings::default().policy();
        assert_eq!(policy, ReportPolicy::default());
        assert_eq!(policy.min_percent, 20);
        assert_eq!(policy.max_percent, 50);
        assert_eq!(policy.max_depth, 4);
    }

    #[test]
    fn given_tilde_in_input_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            input: PathBuf::from("~/data/employees.csv"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let input = settings.input.to_string_lossy();
        assert!(input.starts_with(&home), "input should start with home dir: {input}");
        assert!(!input.contains('~'), "input should not contain tilde: {input}");
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_toml() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml_with_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
