//! # Run Driver
//!
//! Ties the other modules into one entry point: build the site table,
//! build its decision thresholds, drive the step kernel for the
//! requested number of ticks, and package the result.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::beam::BeamParams;
use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::probability::{build_thresholds, CrossSections};
use crate::recorder::EvolutionRecorder;
use crate::site::SiteTable;

/// Complete, validated description of one run.
///
/// Produced either directly or via [`crate::config::RunConfigFile`];
/// both paths funnel through the same validation in
/// `RunConfigFile::try_from`, so a `RunConfig` constructed here has
/// the same guarantees as one loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub re_positions: Vec<(f64, f64)>,
    pub et_positions: Vec<(f64, f64)>,
    pub pump: BeamParams,
    pub sted: BeamParams,
    pub cross_sections: CrossSections,
    pub travel_radius: f64,
    pub ticks: u64,
    pub seed: Option<u64>,
}

/// Everything a run produces, serialized as the on-disk result format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub config: RunConfig,
    pub re_series: Vec<EvolutionRecorder>,
    /// Mean of the second half of the primary (first) RE's excited
    /// residence series; one pixel of a point-spread-function image
    /// when a run is swept over RE or beam position.
    pub excited_state_average: f64,
    pub population_heatmap: Vec<f64>,
    pub electron_lost_count: u64,
    pub valence_band_donations: u64,
}

/// Runs one simulation to completion.
pub fn run(config: RunConfig) -> Result<ResultRecord> {
    if config.re_positions.is_empty() {
        return Err(EngineError::ConfigurationInvalid(
            "re_positions must contain at least one site".to_string(),
        ));
    }
    if config.travel_radius <= 0.0 {
        return Err(EngineError::ConfigurationInvalid(
            "travel_radius must be positive".to_string(),
        ));
    }
    if config.ticks == 0 {
        return Err(EngineError::ConfigurationInvalid(
            "ticks must be nonzero".to_string(),
        ));
    }

    let mut table = SiteTable::new(&config.et_positions, &config.re_positions);
    build_thresholds(&mut table, &config.pump, &config.sted, config.cross_sections)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut engine = Engine::new(table, config.travel_radius, rng, config.ticks);
    engine.run(config.ticks + 1);

    let re_series = engine.recorders().to_vec();
    let excited_state_average = re_series[0].excited_state_average();

    Ok(ResultRecord {
        excited_state_average,
        population_heatmap: engine.population_heatmap().to_vec(),
        electron_lost_count: engine.electron_lost_count(),
        valence_band_donations: engine.valence_band_donations(),
        re_series,
        config,
    })
}

/// Serializes a result record to its binary on-disk form.
pub fn to_bincode(record: &ResultRecord) -> Result<Vec<u8>> {
    bincode::serialize(record)
        .map_err(|e| EngineError::ConfigurationInvalid(format!("bincode encode failed: {e}")))
}

/// Reads a result record back from its binary on-disk form.
pub fn from_bincode(bytes: &[u8]) -> Result<ResultRecord> {
    bincode::deserialize(bytes)
        .map_err(|e| EngineError::ConfigurationInvalid(format!("bincode decode failed: {e}")))
}

/// Runs an independent batch of configurations in parallel.
///
/// Each run is embarrassingly parallel with every other: no shared
/// mutable state crosses run boundaries. Sweep construction (which
/// configurations to generate) is the caller's responsibility; this
/// is only the fan-out.
pub fn run_sweep(configs: Vec<RunConfig>) -> Vec<Result<ResultRecord>> {
    configs.into_par_iter().map(run).collect()
}
