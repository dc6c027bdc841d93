//! Engine binary for the causal toy universe.
//!
//! Loads configuration, grows a seeded universe for the configured number of
//! steps, and logs the selected geometry report. There is no interactive
//! prompt and no plotting; every input comes from `spacetime-config.yaml`
//! (or the file named by `SPACETIME_CONFIG`) plus environment overrides.
//!
//! # Startup Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Build the universe from config with a seeded random source
//! 4. Run the growth loop with progress logging
//! 5. Compute and log the analysis report

mod error;
mod report;

use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use spacetime_core::CausalUniverse;
use spacetime_core::analysis;
use spacetime_core::config::{LogFormat, LoggingConfig, UniverseConfig};
use spacetime_core::runner;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report::ProgressLogger;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "SPACETIME_CONFIG";

/// Configuration file used when `SPACETIME_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "spacetime-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, construction, the run, or the report
/// fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, config_source) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("spacetime-engine starting");
    info!(
        source = %config_source,
        seed = config.universe.seed,
        steps = config.run.steps,
        base_causes = config.universe.base_causes,
        energy_strength = config.universe.energy_strength,
        mode = ?config.analysis.mode,
        "Configuration loaded"
    );

    // 3. Build the universe.
    let rng = StdRng::seed_from_u64(config.universe.seed);
    let mut universe = CausalUniverse::from_config(&config, rng)?;
    info!("Universe initialized with origin event");

    // 4. Run.
    let mut progress = ProgressLogger::new(config.run.progress_interval);
    let summary = runner::run_universe(&mut universe, config.run.steps, &mut progress)?;
    runner::log_run_end(&summary);
    debug!(progress_lines = progress.emitted(), "Progress logging finished");

    // 5. Analyze.
    let report = analysis::analyze(
        universe.graph(),
        config.analysis.mode,
        config.analysis.cone_depth,
    )?;
    report::log_report(&report);

    info!("spacetime-engine shutdown complete");
    Ok(())
}

/// Load configuration from `SPACETIME_CONFIG` or `spacetime-config.yaml`.
///
/// Falls back to defaults (with environment overrides) when the file does
/// not exist. Returns the config and a description of where it came from.
fn load_config() -> Result<(UniverseConfig, String), EngineError> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_err| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = UniverseConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        let mut config = UniverseConfig::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok((config, "defaults".to_owned()))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_err| EnvFilter::try_new(&logging.level))
        .map_err(|e| EngineError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?;

    let installed = match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })
}
