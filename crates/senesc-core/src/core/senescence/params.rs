use crate::core::models::ids::PhotosyntheticOrgan;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Ratio between the senescence rates at 12 °C and 20 °C, from a modified
/// Arrhenius equation.
const CONVERSION_FACTOR_20_TO_12: f64 = 0.45;

/// Built-in N content in total organ mass (senesced + green) by phytomer rank
/// (g N g⁻¹ mstruct), below which remaining blade proteins are no longer
/// exported as amino acids.
static RATIO_N_MSTRUCT_BY_RANK: Map<u32, f64> = phf_map! {
    1u32 => 0.02,
    2u32 => 0.02,
    3u32 => 0.02,
    4u32 => 0.02,
    5u32 => 0.0175,
    6u32 => 0.015,
    7u32 => 0.01,
    8u32 => 0.005,
    9u32 => 0.005,
    10u32 => 0.005,
    11u32 => 0.005,
};

/// One rank entry overriding the built-in residual nitrogen table.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RankNitrogenRatio {
    /// Phytomer rank the ratio applies to.
    pub rank: u32,
    /// N content in total organ mass (g N g⁻¹ mstruct).
    pub ratio: f64,
}

/// Species parameters of the senescence model.
///
/// The defaults are the published wheat parameterisation, expressed at a
/// reference temperature of 12 °C. A partial TOML file can override any
/// subset of them through [`SenescenceParameters::load`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SenescenceParameters {
    /// Molar mass of nitrogen (g mol⁻¹).
    pub n_molar_mass: f64,
    /// Ratio between the rates at 12 °C and 20 °C. The rate constants below
    /// already include it.
    pub conversion_factor_20_to_12: f64,
    /// Root turnover rate before flowering (s⁻¹). Zero in Asseng et al.
    /// (1997), not null in Johnson and Thornley (1985).
    pub senescence_roots_preflowering: f64,
    /// Root turnover rate after flowering at 12 °C (s⁻¹). Value at 20 °C from
    /// Johnson and Thornley (1985), see also Asseng et al. (1997).
    pub senescence_roots_postflowering: f64,
    /// Threshold of ([proteins] / [proteins]max) below which tissue death is
    /// triggered in laminae.
    pub fraction_n_max_blade: f64,
    /// Threshold of ([proteins] / [proteins]max) below which tissue death is
    /// triggered in stem-like organs.
    pub fraction_n_max_stem: f64,
    /// Maximal areal senescence rate at 12 °C (m² s⁻¹).
    pub senescence_max_rate: f64,
    /// Maximal senescence rate along the organ axis at 12 °C (m s⁻¹).
    /// Derived from `senescence_max_rate` for the default lamina width.
    pub senescence_length_max_rate: f64,
    /// Age-induced senescence threshold (degree-days at 12 °C).
    pub age_effect_senescence: f64,
    /// Fallback N content in total organ mass when the phytomer rank is not
    /// listed (g N g⁻¹ mstruct).
    pub default_ratio_n_mstruct: f64,
    /// Rank-specific overrides of the built-in residual nitrogen table.
    pub ratio_n_mstruct: Vec<RankNitrogenRatio>,
}

impl Default for SenescenceParameters {
    fn default() -> Self {
        let senescence_max_rate = 0.2e-8 * CONVERSION_FACTOR_20_TO_12;
        Self {
            n_molar_mass: 14.0,
            conversion_factor_20_to_12: CONVERSION_FACTOR_20_TO_12,
            senescence_roots_preflowering: 0.0,
            senescence_roots_postflowering: 3.5e-7 * CONVERSION_FACTOR_20_TO_12,
            fraction_n_max_blade: 0.5,
            fraction_n_max_stem: 0.425,
            senescence_max_rate,
            senescence_length_max_rate: senescence_max_rate / 3.5e-3,
            age_effect_senescence: 400.0,
            default_ratio_n_mstruct: 0.005,
            ratio_n_mstruct: Vec::new(),
        }
    }
}

/// Errors raised while loading a parameter file.
#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl SenescenceParameters {
    /// Reads parameters from a TOML file.
    ///
    /// Keys absent from the file keep their default values, so a file only
    /// needs to list the parameters it changes.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Tissue-death threshold for the given organ class.
    pub fn fraction_n_max(&self, organ: PhotosyntheticOrgan) -> f64 {
        match organ {
            PhotosyntheticOrgan::Blade => self.fraction_n_max_blade,
            _ => self.fraction_n_max_stem,
        }
    }

    /// N content in total organ mass for the given phytomer rank
    /// (g N g⁻¹ mstruct).
    ///
    /// Lookup order: file overrides, then the built-in rank table, then
    /// `default_ratio_n_mstruct`.
    pub fn ratio_n_mstruct(&self, rank: u32) -> f64 {
        self.ratio_n_mstruct
            .iter()
            .find(|entry| entry.rank == rank)
            .map(|entry| entry.ratio)
            .or_else(|| RATIO_N_MSTRUCT_BY_RANK.get(&rank).copied())
            .unwrap_or(self.default_ratio_n_mstruct)
    }
}
