use crate::daemon::DEFAULT_PROBABILITY;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("housekeeping probability must be within 0.0..=1.0, got {0}")]
    ProbabilityOutOfRange(f64),
}

/// Controller configuration
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ControllerConfig {
    /// Directory whose immediate entries define the installable plant set.
    /// When unset, routability is decided by the compiled-in registry alone.
    #[serde(default)]
    pub discovery_root: Option<PathBuf>,
    #[serde(default)]
    pub housekeeping: HousekeepingConfig,
}

/// Background housekeeping trigger configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct HousekeepingConfig {
    /// Chance that one controller construction schedules a run
    pub probability: f64,
}

impl Default for HousekeepingConfig {
    fn default() -> Self {
        Self {
            probability: DEFAULT_PROBABILITY,
        }
    }
}

impl ControllerConfig {
    /// Validates the controller configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let probability = self.housekeeping.probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ValidationError::ProbabilityOutOfRange(probability));
        }
        Ok(())
    }
}
