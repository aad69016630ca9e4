use crate::core::models::records::InvalidRecordPolicy;
use thiserror::Error;

/// Green-area floor below which a non-growing element is forced dead (m²).
pub const MIN_GREEN_AREA: f64 = 0.5e-4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{parameter}' is out of range: {value}")]
    OutOfRange { parameter: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Timestep of the simulation (s).
    pub delta_t: f64,
    /// Selects the post-flowering root turnover regime.
    pub postflowering_stages: bool,
    /// Forced-death threshold on the green area of non-growing elements (m²).
    /// Zero disables forced death.
    pub min_green_area: f64,
    /// What to do with records that fail validation.
    pub invalid_records: InvalidRecordPolicy,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    delta_t: Option<f64>,
    postflowering_stages: bool,
    min_green_area: Option<f64>,
    invalid_records: InvalidRecordPolicy,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta_t(mut self, seconds: f64) -> Self {
        self.delta_t = Some(seconds);
        self
    }
    pub fn postflowering_stages(mut self, postflowering: bool) -> Self {
        self.postflowering_stages = postflowering;
        self
    }
    pub fn min_green_area(mut self, area: f64) -> Self {
        self.min_green_area = Some(area);
        self
    }
    pub fn invalid_records(mut self, policy: InvalidRecordPolicy) -> Self {
        self.invalid_records = policy;
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let delta_t = self
            .delta_t
            .ok_or(ConfigError::MissingParameter("delta_t"))?;
        if !delta_t.is_finite() || delta_t <= 0.0 {
            return Err(ConfigError::OutOfRange {
                parameter: "delta_t",
                value: delta_t,
            });
        }
        let min_green_area = self.min_green_area.unwrap_or(MIN_GREEN_AREA);
        if !min_green_area.is_finite() || min_green_area < 0.0 {
            return Err(ConfigError::OutOfRange {
                parameter: "min_green_area",
                value: min_green_area,
            });
        }
        Ok(SimulationConfig {
            delta_t,
            postflowering_stages: self.postflowering_stages,
            min_green_area,
            invalid_records: self.invalid_records,
        })
    }
}
