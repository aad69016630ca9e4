use super::records::{ElementRecord, RecordError, RootsRecord};

/// Assembles a [`RootsRecord`] from one or more partial sources.
///
/// Host pipelines usually hold the model inputs in two places at once (a
/// plant graph and tabular data). Each source fills its own builder, the
/// builders are merged with the precedence the caller wants, and `build`
/// reports exactly which input is still missing instead of silently
/// dropping the record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RootsRecordBuilder {
    mstruct: Option<f64>,
    nstruct: Option<f64>,
    cytokinins: Option<f64>,
    sucrose: Option<f64>,
    amino_acids: Option<f64>,
}

impl RootsRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mstruct(mut self, value: f64) -> Self {
        self.mstruct = Some(value);
        self
    }
    pub fn nstruct(mut self, value: f64) -> Self {
        self.nstruct = Some(value);
        self
    }
    pub fn cytokinins(mut self, value: f64) -> Self {
        self.cytokinins = Some(value);
        self
    }
    pub fn sucrose(mut self, value: f64) -> Self {
        self.sucrose = Some(value);
        self
    }
    pub fn amino_acids(mut self, value: f64) -> Self {
        self.amino_acids = Some(value);
        self
    }

    /// Fills every unset field from `fallback`. Values already present win.
    pub fn merge(mut self, fallback: &Self) -> Self {
        self.mstruct = self.mstruct.or(fallback.mstruct);
        self.nstruct = self.nstruct.or(fallback.nstruct);
        self.cytokinins = self.cytokinins.or(fallback.cytokinins);
        self.sucrose = self.sucrose.or(fallback.sucrose);
        self.amino_acids = self.amino_acids.or(fallback.amino_acids);
        self
    }

    pub fn build(self) -> Result<RootsRecord, RecordError> {
        Ok(RootsRecord {
            mstruct: self.mstruct.ok_or(RecordError::MissingField("mstruct"))?,
            nstruct: self.nstruct.ok_or(RecordError::MissingField("Nstruct"))?,
            cytokinins: self
                .cytokinins
                .ok_or(RecordError::MissingField("cytokinins"))?,
            sucrose: self.sucrose.ok_or(RecordError::MissingField("sucrose"))?,
            amino_acids: self
                .amino_acids
                .ok_or(RecordError::MissingField("amino_acids"))?,
        })
    }
}

/// Assembles an [`ElementRecord`] from one or more partial sources.
///
/// Same contract as [`RootsRecordBuilder`]: merge keeps already-set values,
/// `build` names the first missing input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ElementRecordBuilder {
    green_area: Option<f64>,
    mstruct: Option<f64>,
    nstruct: Option<f64>,
    proteins: Option<f64>,
    max_proteins: Option<f64>,
    amino_acids: Option<f64>,
    nitrates: Option<f64>,
    starch: Option<f64>,
    fructan: Option<f64>,
    sucrose: Option<f64>,
    cytokinins: Option<f64>,
    is_growing: Option<bool>,
}

impl ElementRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn green_area(mut self, value: f64) -> Self {
        self.green_area = Some(value);
        self
    }
    pub fn mstruct(mut self, value: f64) -> Self {
        self.mstruct = Some(value);
        self
    }
    pub fn nstruct(mut self, value: f64) -> Self {
        self.nstruct = Some(value);
        self
    }
    pub fn proteins(mut self, value: f64) -> Self {
        self.proteins = Some(value);
        self
    }
    pub fn max_proteins(mut self, value: f64) -> Self {
        self.max_proteins = Some(value);
        self
    }
    pub fn amino_acids(mut self, value: f64) -> Self {
        self.amino_acids = Some(value);
        self
    }
    pub fn nitrates(mut self, value: f64) -> Self {
        self.nitrates = Some(value);
        self
    }
    pub fn starch(mut self, value: f64) -> Self {
        self.starch = Some(value);
        self
    }
    pub fn fructan(mut self, value: f64) -> Self {
        self.fructan = Some(value);
        self
    }
    pub fn sucrose(mut self, value: f64) -> Self {
        self.sucrose = Some(value);
        self
    }
    pub fn cytokinins(mut self, value: f64) -> Self {
        self.cytokinins = Some(value);
        self
    }
    pub fn is_growing(mut self, value: bool) -> Self {
        self.is_growing = Some(value);
        self
    }

    /// Fills every unset field from `fallback`. Values already present win.
    pub fn merge(mut self, fallback: &Self) -> Self {
        self.green_area = self.green_area.or(fallback.green_area);
        self.mstruct = self.mstruct.or(fallback.mstruct);
        self.nstruct = self.nstruct.or(fallback.nstruct);
        self.proteins = self.proteins.or(fallback.proteins);
        self.max_proteins = self.max_proteins.or(fallback.max_proteins);
        self.amino_acids = self.amino_acids.or(fallback.amino_acids);
        self.nitrates = self.nitrates.or(fallback.nitrates);
        self.starch = self.starch.or(fallback.starch);
        self.fructan = self.fructan.or(fallback.fructan);
        self.sucrose = self.sucrose.or(fallback.sucrose);
        self.cytokinins = self.cytokinins.or(fallback.cytokinins);
        self.is_growing = self.is_growing.or(fallback.is_growing);
        self
    }

    pub fn build(self) -> Result<ElementRecord, RecordError> {
        Ok(ElementRecord {
            green_area: self
                .green_area
                .ok_or(RecordError::MissingField("green_area"))?,
            mstruct: self.mstruct.ok_or(RecordError::MissingField("mstruct"))?,
            nstruct: self.nstruct.ok_or(RecordError::MissingField("Nstruct"))?,
            proteins: self.proteins.ok_or(RecordError::MissingField("proteins"))?,
            max_proteins: self
                .max_proteins
                .ok_or(RecordError::MissingField("max_proteins"))?,
            amino_acids: self
                .amino_acids
                .ok_or(RecordError::MissingField("amino_acids"))?,
            nitrates: self.nitrates.ok_or(RecordError::MissingField("nitrates"))?,
            starch: self.starch.ok_or(RecordError::MissingField("starch"))?,
            fructan: self.fructan.ok_or(RecordError::MissingField("fructan"))?,
            sucrose: self.sucrose.ok_or(RecordError::MissingField("sucrose"))?,
            cytokinins: self
                .cytokinins
                .ok_or(RecordError::MissingField("cytokinins"))?,
            is_growing: self
                .is_growing
                .ok_or(RecordError::MissingField("is_growing"))?,
        })
    }
}
