//! # Configuration Layer
//!
//! The on-disk, serde/toml-facing mirror of [`crate::run::RunConfig`].
//! Kept as a separate type rather than deriving `Deserialize` directly
//! on `RunConfig` so that file parsing and semantic validation are two
//! distinct, independently testable steps: a `RunConfigFile` can parse
//! successfully and still fail to become a `RunConfig`.

use serde::{Deserialize, Serialize};

use crate::beam::BeamParams;
use crate::error::EngineError;
use crate::probability::CrossSections;
use crate::run::RunConfig;

/// File-shaped run configuration, loaded with `toml::from_str`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfigFile {
    pub re_positions: Vec<(f64, f64)>,
    pub et_positions: Vec<(f64, f64)>,
    pub pump: BeamParams,
    pub sted: BeamParams,
    pub cross_sections: CrossSections,
    pub travel_radius: f64,
    pub ticks: u64,
    pub seed: Option<u64>,
}

impl TryFrom<RunConfigFile> for RunConfig {
    type Error = EngineError;

    fn try_from(file: RunConfigFile) -> Result<Self, Self::Error> {
        if file.re_positions.is_empty() {
            return Err(EngineError::ConfigurationInvalid(
                "re_positions must contain at least one site".to_string(),
            ));
        }
        if file.travel_radius <= 0.0 {
            return Err(EngineError::ConfigurationInvalid(
                "travel_radius must be positive".to_string(),
            ));
        }
        if file.ticks == 0 {
            return Err(EngineError::ConfigurationInvalid(
                "ticks must be nonzero".to_string(),
            ));
        }
        if file.pump.amplitude < 0.0 || file.sted.amplitude < 0.0 {
            return Err(EngineError::ConfigurationInvalid(
                "beam amplitudes must be non-negative".to_string(),
            ));
        }
        if file.pump.wavelength <= 0.0
            || file.pump.numerical_aperture <= 0.0
            || file.sted.wavelength <= 0.0
            || file.sted.numerical_aperture <= 0.0
        {
            return Err(EngineError::ConfigurationInvalid(
                "wavelength and numerical aperture must be positive".to_string(),
            ));
        }

        Ok(RunConfig {
            re_positions: file.re_positions,
            et_positions: file.et_positions,
            pump: file.pump,
            sted: file.sted,
            cross_sections: file.cross_sections,
            travel_radius: file.travel_radius,
            ticks: file.ticks,
            seed: file.seed,
        })
    }
}

pub fn load_from_str(contents: &str) -> Result<RunConfig, EngineError> {
    let file: RunConfigFile = toml::from_str(contents)
        .map_err(|e| EngineError::ConfigurationInvalid(e.to_string()))?;
    RunConfig::try_from(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> BeamParams {
        BeamParams {
            center: (0.0, 0.0),
            amplitude: 1.0,
            wavelength: 470e-9,
            numerical_aperture: 1.3,
        }
    }

    fn sample_toml() -> String {
        toml::to_string(&RunConfigFile {
            re_positions: vec![(0.0, 0.0)],
            et_positions: vec![(10e-9, 0.0)],
            pump: beam(),
            sted: beam(),
            cross_sections: CrossSections {
                gamma: 0.5,
                sigma_pump: 1.0,
                sigma_ionize: 1.0,
                sigma_repump: 1.0,
                sigma_sted: 1.0,
            },
            travel_radius: 20e-9,
            ticks: 1000,
            seed: Some(7),
        })
        .unwrap()
    }

    #[test]
    fn round_trips_through_toml() {
        let text = sample_toml();
        let config = load_from_str(&text).unwrap();
        assert_eq!(config.ticks, 1000);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn rejects_empty_re_positions() {
        let mut file_value: toml::Value = toml::from_str(&sample_toml()).unwrap();
        file_value["re_positions"] = toml::Value::Array(vec![]);
        let text = toml::to_string(&file_value).unwrap();
        let result = load_from_str(&text);
        assert!(matches!(result, Err(EngineError::ConfigurationInvalid(_))));
    }

    #[test]
    fn rejects_zero_ticks() {
        let mut file_value: toml::Value = toml::from_str(&sample_toml()).unwrap();
        file_value["ticks"] = toml::Value::Integer(0);
        let text = toml::to_string(&file_value).unwrap();
        let result = load_from_str(&text);
        assert!(matches!(result, Err(EngineError::ConfigurationInvalid(_))));
    }
}
