use thiserror::Error;

/// Errors raised when assembling or validating an input record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecordError {
    /// A required input is absent from every source that was consulted.
    #[error("Missing required input: {0}")]
    MissingField(&'static str),

    /// A quantity is negative or not finite.
    #[error("Input '{field}' is out of domain: {value}")]
    OutOfDomain { field: &'static str, value: f64 },

    /// A flag cell holds text that is not a recognizable boolean.
    #[error("Cannot read '{value}' as a boolean for '{field}'")]
    InvalidBool { field: &'static str, value: String },

    /// An organ label outside the modeled photosynthetic organ set.
    #[error("Unknown organ label: '{0}'")]
    UnknownOrgan(String),
}

/// How to treat records that are incomplete or fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidRecordPolicy {
    /// Abort with an error naming the offending record.
    #[default]
    Fail,
    /// Log a warning and leave the record out of the outputs.
    SkipWithWarning,
}

/// State of the root compartment of one axis.
///
/// Roots senesce as bulk turnover of structural matter rather than through
/// the green-area mechanism of photosynthetic elements, so the record only
/// carries masses and metabolite pools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootsRecord {
    /// Structural dry mass (g).
    pub mstruct: f64,
    /// Structural nitrogen mass (g).
    pub nstruct: f64,
    /// Cytokinin content (µmol).
    pub cytokinins: f64,
    /// Sucrose content (µmol C).
    pub sucrose: f64,
    /// Amino acid content (µmol N).
    pub amino_acids: f64,
}

/// State of one photosynthetic element.
///
/// All metabolite fields are amounts for the whole element, not
/// concentrations. `max_proteins` is the highest protein concentration the
/// element has experienced; tissue death is triggered by the decline of the
/// current concentration relative to that maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRecord {
    /// Green (photosynthetically active) area (m²).
    pub green_area: f64,
    /// Structural dry mass (g).
    pub mstruct: f64,
    /// Structural nitrogen mass (g).
    pub nstruct: f64,
    /// Protein content (µmol N).
    pub proteins: f64,
    /// Highest protein concentration observed so far (µmol N g⁻¹ mstruct).
    pub max_proteins: f64,
    /// Amino acid content (µmol N).
    pub amino_acids: f64,
    /// Nitrate content (µmol N).
    pub nitrates: f64,
    /// Starch content (µmol C).
    pub starch: f64,
    /// Fructan content (µmol C).
    pub fructan: f64,
    /// Sucrose content (µmol C).
    pub sucrose: f64,
    /// Cytokinin content (µmol).
    pub cytokinins: f64,
    /// Whether the element is still elongating. Growing elements are immune
    /// to the forced write-off of residual green area.
    pub is_growing: bool,
}

/// Per-step outputs for one root compartment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootsOutput {
    /// Structural dry mass after turnover loss (g).
    pub mstruct: f64,
    /// Rate of structural mass loss (g s⁻¹).
    pub rate_mstruct_death: f64,
    /// Structural nitrogen mass after turnover loss (g).
    pub nstruct: f64,
    /// Cytokinin content after remobilisation (µmol).
    pub cytokinins: f64,
}

/// Per-step outputs for one photosynthetic element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementOutput {
    /// Green area after senescence (m²).
    pub green_area: f64,
    /// Structural dry mass after senescence (g).
    pub mstruct: f64,
    /// Structural nitrogen mass after senescence (g).
    pub nstruct: f64,
    /// Starch left after remobilisation (µmol C).
    pub starch: f64,
    /// Sucrose, increased by remobilised starch and fructan (µmol C).
    pub sucrose: f64,
    /// Fructan left after remobilisation (µmol C).
    pub fructan: f64,
    /// Proteins left after remobilisation (µmol N).
    pub proteins: f64,
    /// Amino acids, increased by remobilised proteins (µmol N).
    pub amino_acids: f64,
    /// Cytokinins left after the senescence loss (µmol).
    pub cytokinins: f64,
    /// Updated maximum protein concentration (µmol N g⁻¹ mstruct).
    pub max_proteins: f64,
}

impl RootsRecord {
    /// Checks that every quantity is finite and non-negative.
    pub fn validate(&self) -> Result<(), RecordError> {
        for (field, value) in [
            ("mstruct", self.mstruct),
            ("Nstruct", self.nstruct),
            ("cytokinins", self.cytokinins),
            ("sucrose", self.sucrose),
            ("amino_acids", self.amino_acids),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RecordError::OutOfDomain { field, value });
            }
        }
        Ok(())
    }

    /// Writes a step's outputs back into the record.
    ///
    /// Only the state carried by [`RootsOutput`] is overwritten; sucrose and
    /// amino acids pass through unchanged (their senescence losses are
    /// neglected by the model).
    pub fn apply(&mut self, output: &RootsOutput) {
        self.mstruct = output.mstruct;
        self.nstruct = output.nstruct;
        self.cytokinins = output.cytokinins;
    }
}

impl ElementRecord {
    /// Checks that every quantity is finite and non-negative.
    pub fn validate(&self) -> Result<(), RecordError> {
        for (field, value) in [
            ("green_area", self.green_area),
            ("mstruct", self.mstruct),
            ("Nstruct", self.nstruct),
            ("proteins", self.proteins),
            ("max_proteins", self.max_proteins),
            ("amino_acids", self.amino_acids),
            ("nitrates", self.nitrates),
            ("starch", self.starch),
            ("fructan", self.fructan),
            ("sucrose", self.sucrose),
            ("cytokinins", self.cytokinins),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RecordError::OutOfDomain { field, value });
            }
        }
        Ok(())
    }

    /// Writes a step's outputs back into the record.
    ///
    /// `is_growing` and nitrates are left untouched: the growth status is
    /// owned by the host pipeline, and nitrate losses are neglected.
    pub fn apply(&mut self, output: &ElementOutput) {
        self.green_area = output.green_area;
        self.mstruct = output.mstruct;
        self.nstruct = output.nstruct;
        self.starch = output.starch;
        self.sucrose = output.sucrose;
        self.fructan = output.fructan;
        self.proteins = output.proteins;
        self.amino_acids = output.amino_acids;
        self.cytokinins = output.cytokinins;
        self.max_proteins = output.max_proteins;
    }
}

impl ElementOutput {
    /// Output that carries the input state through unchanged.
    pub fn passthrough(record: &ElementRecord) -> Self {
        Self {
            green_area: record.green_area,
            mstruct: record.mstruct,
            nstruct: record.nstruct,
            starch: record.starch,
            sucrose: record.sucrose,
            fructan: record.fructan,
            proteins: record.proteins,
            amino_acids: record.amino_acids,
            cytokinins: record.cytokinins,
            max_proteins: record.max_proteins,
        }
    }

    /// Output of an element whose residual green area is written off.
    pub fn dead(record: &ElementRecord) -> Self {
        Self {
            green_area: 0.0,
            ..Self::passthrough(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roots() -> RootsRecord {
        RootsRecord {
            mstruct: 10.0,
            nstruct: 0.2,
            cytokinins: 150.0,
            sucrose: 800.0,
            amino_acids: 60.0,
        }
    }

    fn sample_element() -> ElementRecord {
        ElementRecord {
            green_area: 1e-3,
            mstruct: 0.1,
            nstruct: 0.005,
            proteins: 400.0,
            max_proteins: 5000.0,
            amino_acids: 25.0,
            nitrates: 3.0,
            starch: 120.0,
            fructan: 90.0,
            sucrose: 200.0,
            cytokinins: 40.0,
            is_growing: false,
        }
    }

    #[test]
    fn validate_accepts_well_formed_records() {
        assert_eq!(sample_roots().validate(), Ok(()));
        assert_eq!(sample_element().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_quantities() {
        let mut roots = sample_roots();
        roots.nstruct = -0.1;
        assert_eq!(
            roots.validate(),
            Err(RecordError::OutOfDomain {
                field: "Nstruct",
                value: -0.1
            })
        );
    }

    #[test]
    fn validate_rejects_non_finite_quantities() {
        let mut element = sample_element();
        element.proteins = f64::NAN;
        assert!(matches!(
            element.validate(),
            Err(RecordError::OutOfDomain {
                field: "proteins",
                ..
            })
        ));

        element = sample_element();
        element.starch = f64::INFINITY;
        assert!(matches!(
            element.validate(),
            Err(RecordError::OutOfDomain { field: "starch", .. })
        ));
    }

    #[test]
    fn validate_accepts_zero_quantities() {
        let mut element = sample_element();
        element.green_area = 0.0;
        element.proteins = 0.0;
        assert_eq!(element.validate(), Ok(()));
    }

    #[test]
    fn apply_overwrites_roots_state_but_not_untracked_pools() {
        let mut roots = sample_roots();
        let output = RootsOutput {
            mstruct: 9.5,
            rate_mstruct_death: 1e-6,
            nstruct: 0.19,
            cytokinins: 140.0,
        };
        roots.apply(&output);
        assert_eq!(roots.mstruct, 9.5);
        assert_eq!(roots.nstruct, 0.19);
        assert_eq!(roots.cytokinins, 140.0);
        assert_eq!(roots.sucrose, 800.0);
        assert_eq!(roots.amino_acids, 60.0);
    }

    #[test]
    fn apply_overwrites_element_state_but_not_growth_status() {
        let mut element = sample_element();
        let output = ElementOutput {
            green_area: 9e-4,
            mstruct: 0.09,
            nstruct: 0.0045,
            starch: 100.0,
            sucrose: 230.0,
            fructan: 80.0,
            proteins: 360.0,
            amino_acids: 65.0,
            cytokinins: 36.0,
            max_proteins: 5200.0,
        };
        element.apply(&output);
        assert_eq!(element.green_area, 9e-4);
        assert_eq!(element.max_proteins, 5200.0);
        assert_eq!(element.amino_acids, 65.0);
        assert_eq!(element.nitrates, 3.0);
        assert!(!element.is_growing);
    }

    #[test]
    fn dead_output_zeroes_green_area_only() {
        let element = sample_element();
        let output = ElementOutput::dead(&element);
        assert_eq!(output.green_area, 0.0);
        assert_eq!(output.mstruct, element.mstruct);
        assert_eq!(output.proteins, element.proteins);
        assert_eq!(output.max_proteins, element.max_proteins);
    }

    #[test]
    fn passthrough_output_matches_the_input_state() {
        let element = sample_element();
        let output = ElementOutput::passthrough(&element);
        assert_eq!(output.green_area, element.green_area);
        assert_eq!(output.sucrose, element.sucrose);
        assert_eq!(output.cytokinins, element.cytokinins);
    }
}
