//! Configuration loading and typed config structures for the causal universe.
//!
//! The canonical configuration lives in `spacetime-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file. Semantic validation
//! (positive energy strength, probabilities in range) happens when a
//! [`CausalUniverse`](crate::universe::CausalUniverse) is built from it.

use std::path::Path;

use serde::Deserialize;

use crate::analysis::AnalysisMode;
use crate::growth::GrowthPolicy;

/// Environment variable overriding `universe.seed`.
pub const SEED_ENV: &str = "SPACETIME_SEED";

/// Environment variable overriding `run.steps`.
pub const STEPS_ENV: &str = "SPACETIME_STEPS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unparsable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidOverride {
        /// The environment variable.
        name: &'static str,
        /// Its raw value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `spacetime-config.yaml`. Every field has a
/// default, so an empty file yields the canonical toy universe.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UniverseConfig {
    /// Initialization parameters and seed.
    #[serde(default)]
    pub universe: UniverseSection,

    /// Creation and massiveness probabilities.
    #[serde(default)]
    pub growth: GrowthPolicy,

    /// Run length.
    #[serde(default)]
    pub run: RunConfig,

    /// Which derived report to produce after the run.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl UniverseConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SPACETIME_SEED` overrides `universe.seed`
    /// - `SPACETIME_STEPS` overrides `run.steps`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides are
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides looked up by variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if a present value does not
    /// parse as an unsigned integer.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = parse_override(&lookup, SEED_ENV)? {
            self.universe.seed = seed;
        }
        if let Some(steps) = parse_override(&lookup, STEPS_ENV)? {
            self.run.steps = steps;
        }
        Ok(())
    }
}

fn parse_override<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_err| ConfigError::InvalidOverride { name, value })
        })
        .transpose()
}

/// Universe initialization parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UniverseSection {
    /// Minimum number of causes drawn for every new event ("causal speed").
    #[serde(default = "default_base_causes")]
    pub base_causes: u32,

    /// Scale applied to massive-event multipliers ("gravity").
    #[serde(default = "default_energy_strength")]
    pub energy_strength: f64,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for UniverseSection {
    fn default() -> Self {
        Self {
            base_causes: default_base_causes(),
            energy_strength: default_energy_strength(),
            seed: default_seed(),
        }
    }
}

/// Run-length configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Number of growth steps to execute.
    #[serde(default = "default_steps")]
    pub steps: u64,

    /// Steps between progress log lines; 0 disables them.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            progress_interval: default_progress_interval(),
        }
    }
}

/// Post-run analysis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisConfig {
    /// Which report to produce.
    #[serde(default)]
    pub mode: AnalysisMode,

    /// Hop bound for light cones in the curvature and energy reports.
    #[serde(default = "default_cone_depth")]
    pub cone_depth: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::default(),
            cone_depth: default_cone_depth(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_base_causes() -> u32 {
    1
}

const fn default_energy_strength() -> f64 {
    1.0
}

const fn default_seed() -> u64 {
    42
}

const fn default_steps() -> u64 {
    100
}

const fn default_progress_interval() -> u64 {
    25
}

const fn default_cone_depth() -> u32 {
    6
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_canonical_universe() {
        let config = UniverseConfig::default();
        assert_eq!(config.universe.base_causes, 1);
        assert_eq!(config.universe.seed, 42);
        assert_eq!(config.run.steps, 100);
        assert_eq!(config.analysis.cone_depth, 6);
        assert_eq!(config.growth, GrowthPolicy::default());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
universe:
  base_causes: 3
  energy_strength: 2.5
  seed: 123

growth:
  creation_probability: 0.8
  massive_probability: 0.2
  massive_multipliers: [3.0, 7.0]

run:
  steps: 250
  progress_interval: 50

analysis:
  mode: energy
  cone_depth: 4

logging:
  level: debug
  format: json
";

        let config = UniverseConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.universe.base_causes, 3);
        assert_eq!(config.universe.seed, 123);
        assert_eq!(config.growth.massive_multipliers, vec![3.0, 7.0]);
        assert_eq!(config.run.steps, 250);
        assert_eq!(config.run.progress_interval, 50);
        assert_eq!(config.analysis.mode, AnalysisMode::Energy);
        assert_eq!(config.analysis.cone_depth, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "universe:\n  seed: 7\n";
        let config = UniverseConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        // Seed is overridden
        assert_eq!(config.universe.seed, 7);
        // Everything else uses defaults
        assert_eq!(config.universe.base_causes, 1);
        assert_eq!(config.run.steps, 100);
        assert_eq!(config.growth, GrowthPolicy::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = UniverseConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn unknown_analysis_mode_rejected() {
        let config = UniverseConfig::parse("analysis:\n  mode: plot\n");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn overrides_replace_seed_and_steps() {
        let mut config = UniverseConfig::default();
        let result = config.apply_overrides(|name| match name {
            SEED_ENV => Some("9".to_owned()),
            STEPS_ENV => Some(" 1000 ".to_owned()),
            _ => None,
        });
        assert!(result.is_ok());
        assert_eq!(config.universe.seed, 9);
        assert_eq!(config.run.steps, 1000);
    }

    #[test]
    fn missing_overrides_keep_values() {
        let mut config = UniverseConfig::default();
        assert!(config.apply_overrides(|_| None).is_ok());
        assert_eq!(config, UniverseConfig::default());
    }

    #[test]
    fn unparsable_override_rejected() {
        let mut config = UniverseConfig::default();
        let result = config.apply_overrides(|name| (name == SEED_ENV).then(|| "abc".to_owned()));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOverride { name: SEED_ENV, .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("spacetime-config.yaml");
        if path.exists() {
            let config = UniverseConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
