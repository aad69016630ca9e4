use super::params::SenescenceParameters;
use crate::core::models::ids::PhotosyntheticOrgan;
use thiserror::Error;

/// Precondition violations in the senescence rules.
///
/// Every division in this module is guarded; callers get an error instead of
/// a silent NaN or infinity.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ModelError {
    #[error("structural mass must be strictly positive, got {0} g")]
    NonPositiveMass(f64),
    #[error("green area must be strictly positive, got {0} m2")]
    NonPositiveGreenArea(f64),
    #[error("senesced length {senesced} m exceeds organ length {length} m")]
    SenescedLengthExceedsLength { senesced: f64, length: f64 },
}

/// Rates of structural matter loss by root turnover (g s⁻¹).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootsSenescenceRates {
    pub rate_mstruct_death: f64,
    pub rate_nstruct_death: f64,
}

/// Outcome of the green-area senescence rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenAreaLoss {
    /// Green area after senescence (m²).
    pub new_green_area: f64,
    /// Fraction of the previous green area that senesced (dimensionless).
    pub relative_delta: f64,
    /// Updated maximum protein concentration (µmol N g⁻¹ mstruct).
    pub max_proteins: f64,
}

/// Outcome of the length-based senescence rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SenescedLengthLoss {
    /// Senesced length after this step (m).
    pub new_senesced_length: f64,
    /// Fraction of the remaining green length that senesced (dimensionless).
    pub relative_delta: f64,
    /// Updated maximum protein concentration (µmol N g⁻¹ mstruct).
    pub max_proteins: f64,
}

/// Split of remobilised proteins between exported and locked nitrogen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProteinRemobilisation {
    /// Proteins leaving the protein pool (µmol N).
    pub remobilised: f64,
    /// Share exported as amino acids (µmol N).
    pub to_amino_acids: f64,
    /// Share locked into the senescent tissue as residual nitrogen (g).
    pub residual_n: f64,
}

/// Rates of mstruct and Nstruct loss by root turnover.
///
/// Before flowering the turnover rate is usually zero; after flowering it is
/// the constant bulk rate of the parameter set.
pub fn roots_senescence_rates(
    params: &SenescenceParameters,
    mstruct: f64,
    nstruct: f64,
    postflowering_stages: bool,
) -> RootsSenescenceRates {
    let rate_senescence = if postflowering_stages {
        params.senescence_roots_postflowering
    } else {
        params.senescence_roots_preflowering
    };
    RootsSenescenceRates {
        rate_mstruct_death: mstruct * rate_senescence,
        rate_nstruct_death: nstruct * rate_senescence,
    }
}

/// Fraction of the root structural mass lost over `delta_t` (dimensionless).
pub fn relative_mstruct_loss_roots(
    rate_mstruct_death: f64,
    root_mstruct: f64,
    delta_t: f64,
) -> Result<f64, ModelError> {
    if root_mstruct <= 0.0 {
        return Err(ModelError::NonPositiveMass(root_mstruct));
    }
    Ok(rate_mstruct_death * delta_t / root_mstruct)
}

/// Green-area loss of one element over `delta_t`.
///
/// `proteins` and `max_proteins` are concentrations (µmol N g⁻¹ mstruct).
/// When `update_max_proteins` is set, a concentration above the tracked
/// maximum raises the maximum instead of triggering senescence.
pub fn green_area_loss(
    params: &SenescenceParameters,
    organ: PhotosyntheticOrgan,
    prev_green_area: f64,
    proteins: f64,
    max_proteins: f64,
    delta_t: f64,
    update_max_proteins: bool,
) -> Result<GreenAreaLoss, ModelError> {
    if prev_green_area <= 0.0 {
        return Err(ModelError::NonPositiveGreenArea(prev_green_area));
    }
    let fraction_n_max = params.fraction_n_max(organ);

    // Overwrite max proteins
    if update_max_proteins && proteins > max_proteins {
        return Ok(GreenAreaLoss {
            new_green_area: prev_green_area,
            relative_delta: 0.0,
            max_proteins: proteins,
        });
    }
    // Senescence if (actual proteins / max proteins) < fraction_n_max
    if max_proteins == 0.0 || proteins / max_proteins < fraction_n_max {
        let senesced_area = (params.senescence_max_rate * delta_t).min(prev_green_area);
        return Ok(GreenAreaLoss {
            new_green_area: (prev_green_area - senesced_area).max(0.0),
            relative_delta: senesced_area / prev_green_area,
            max_proteins,
        });
    }
    Ok(GreenAreaLoss {
        new_green_area: prev_green_area,
        relative_delta: 0.0,
        max_proteins,
    })
}

/// Length-based variant of the senescence rule, for organs tracked by their
/// senesced length rather than their green area.
pub fn senesced_length_loss(
    params: &SenescenceParameters,
    organ: PhotosyntheticOrgan,
    prev_senesced_length: f64,
    length: f64,
    proteins: f64,
    max_proteins: f64,
    delta_t: f64,
    update_max_proteins: bool,
) -> Result<SenescedLengthLoss, ModelError> {
    if prev_senesced_length > length {
        return Err(ModelError::SenescedLengthExceedsLength {
            senesced: prev_senesced_length,
            length,
        });
    }
    let fraction_n_max = params.fraction_n_max(organ);

    // Overwrite max proteins
    if update_max_proteins && proteins > max_proteins {
        return Ok(SenescedLengthLoss {
            new_senesced_length: prev_senesced_length,
            relative_delta: 0.0,
            max_proteins: proteins,
        });
    }
    // Senescence if (actual proteins / max proteins) < fraction_n_max
    if max_proteins == 0.0 || proteins / max_proteins < fraction_n_max {
        let new_senesced_length =
            (prev_senesced_length + params.senescence_length_max_rate * delta_t).min(length);
        let relative_delta = if new_senesced_length == length {
            1.0
        } else {
            1.0 - (length - new_senesced_length) / (length - prev_senesced_length)
        };
        return Ok(SenescedLengthLoss {
            new_senesced_length,
            relative_delta,
            max_proteins,
        });
    }
    Ok(SenescedLengthLoss {
        new_senesced_length: prev_senesced_length,
        relative_delta: 0.0,
        max_proteins,
    })
}

/// Relative green-area loss for an externally imposed area trajectory.
pub fn forced_green_area_loss(
    prev_green_area: f64,
    new_green_area: f64,
) -> Result<f64, ModelError> {
    if prev_green_area <= 0.0 {
        return Err(ModelError::NonPositiveGreenArea(prev_green_area));
    }
    Ok((prev_green_area - new_green_area) / prev_green_area)
}

/// Structural mass and structural N after a relative green-area loss (g).
pub fn structural_mass_loss(
    relative_delta_green_area: f64,
    prev_mstruct: f64,
    prev_nstruct: f64,
) -> (f64, f64) {
    (
        prev_mstruct - prev_mstruct * relative_delta_green_area,
        prev_nstruct - prev_nstruct * relative_delta_green_area,
    )
}

/// Amount of a metabolite remobilised out of the senescing structure (µmol).
pub fn remobilisation(metabolite: f64, relative_delta_structure: f64) -> f64 {
    metabolite * relative_delta_structure
}

/// Protein remobilisation of a senescing element over one step.
///
/// `proteins` is the protein amount of the element (µmol N) and
/// `n_content_total` the N content of the whole element, green and senesced
/// tissues together (g N g⁻¹ mstruct, see [`total_nitrogen_content`]).
/// Outside laminae, or under `full_remobilisation`, everything leaving the
/// protein pool is exported as amino acids. In laminae, once the N content
/// has dropped to the rank-dependent floor, the remaining proteins are
/// locked into the dead tissue as residual nitrogen instead.
pub fn protein_remobilisation(
    params: &SenescenceParameters,
    organ: PhotosyntheticOrgan,
    phytomer_rank: u32,
    proteins: f64,
    relative_delta_green_area: f64,
    n_content_total: f64,
    full_remobilisation: bool,
) -> ProteinRemobilisation {
    let n_to_grams = 1e-6 * params.n_molar_mass;

    if full_remobilisation || organ != PhotosyntheticOrgan::Blade {
        let remobilised = proteins * relative_delta_green_area;
        return ProteinRemobilisation {
            remobilised,
            to_amino_acids: remobilised,
            residual_n: 0.0,
        };
    }
    if n_content_total <= params.ratio_n_mstruct(phytomer_rank) {
        // Everything left goes to the residual pool of the dead tissue.
        return ProteinRemobilisation {
            remobilised: proteins,
            to_amino_acids: 0.0,
            residual_n: proteins * n_to_grams,
        };
    }
    let remobilised = proteins * relative_delta_green_area;
    let to_amino_acids = remobilised * 2.0 / 3.0;
    ProteinRemobilisation {
        remobilised,
        to_amino_acids,
        residual_n: (remobilised - to_amino_acids) * n_to_grams,
    }
}

/// N content of the whole element, green and senesced tissues together
/// (g N g⁻¹ mstruct).
///
/// `proteins`, `amino_acids` and `nitrates` are concentrations
/// (µmol N g⁻¹ mstruct), `max_mstruct` the structural mass of the element
/// before any senescence (g), and `n_residual` the N mass locked in the
/// senescent tissue (g).
pub fn total_nitrogen_content(
    params: &SenescenceParameters,
    proteins: f64,
    amino_acids: f64,
    nitrates: f64,
    nstruct: f64,
    max_mstruct: f64,
    mstruct: f64,
    n_residual: f64,
) -> Result<f64, ModelError> {
    if max_mstruct <= 0.0 {
        return Err(ModelError::NonPositiveMass(max_mstruct));
    }
    if mstruct <= 0.0 {
        return Err(ModelError::NonPositiveMass(mstruct));
    }
    Ok(
        ((proteins + amino_acids + nitrates) * 1e-6 * params.n_molar_mass + n_residual)
            / max_mstruct
            + nstruct / mstruct,
    )
}
