use std::collections::HashMap;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::core::models::builder::{ElementRecordBuilder, RootsRecordBuilder};
use crate::core::models::ids::{ElementId, PhotosyntheticOrgan, RootsId};
use crate::core::models::records::{
    ElementOutput, ElementRecord, InvalidRecordPolicy, RecordError, RootsOutput, RootsRecord,
};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid record '{id}' in '{path}': {source}")]
    InvalidRecord {
        path: String,
        id: String,
        source: RecordError,
    },
}

/// Outcome of a validation pass over one input table.
#[derive(Debug, Default)]
pub struct TableAudit {
    /// Number of rows that parsed and validated cleanly.
    pub valid: usize,
    /// One entry per rejected row.
    pub problems: Vec<TableProblem>,
}

#[derive(Debug)]
pub struct TableProblem {
    pub id: String,
    pub error: RecordError,
}

#[derive(Debug, Deserialize)]
struct RootsRow {
    plant: u32,
    axis: String,
    mstruct: Option<f64>,
    #[serde(rename = "Nstruct")]
    nstruct: Option<f64>,
    cytokinins: Option<f64>,
    amino_acids: Option<f64>,
    sucrose: Option<f64>,
}

impl RootsRow {
    fn id(&self) -> RootsId {
        RootsId {
            plant: self.plant,
            axis: self.axis.clone(),
        }
    }

    fn into_record(self) -> Result<RootsRecord, RecordError> {
        let mut builder = RootsRecordBuilder::new();
        if let Some(value) = self.mstruct {
            builder = builder.mstruct(value);
        }
        if let Some(value) = self.nstruct {
            builder = builder.nstruct(value);
        }
        if let Some(value) = self.cytokinins {
            builder = builder.cytokinins(value);
        }
        if let Some(value) = self.amino_acids {
            builder = builder.amino_acids(value);
        }
        if let Some(value) = self.sucrose {
            builder = builder.sucrose(value);
        }
        builder.build()
    }
}

#[derive(Debug, Deserialize)]
struct ElementsRow {
    plant: u32,
    axis: String,
    metamer: u32,
    organ: String,
    element: String,
    green_area: Option<f64>,
    proteins: Option<f64>,
    mstruct: Option<f64>,
    max_proteins: Option<f64>,
    #[serde(rename = "Nstruct")]
    nstruct: Option<f64>,
    nitrates: Option<f64>,
    amino_acids: Option<f64>,
    starch: Option<f64>,
    fructan: Option<f64>,
    cytokinins: Option<f64>,
    sucrose: Option<f64>,
    is_growing: Option<String>,
}

impl ElementsRow {
    fn organ(&self) -> Result<PhotosyntheticOrgan, RecordError> {
        self.organ
            .parse()
            .map_err(|()| RecordError::UnknownOrgan(self.organ.clone()))
    }

    fn id(&self, organ: PhotosyntheticOrgan) -> ElementId {
        ElementId {
            plant: self.plant,
            axis: self.axis.clone(),
            metamer: self.metamer,
            organ,
            element: self.element.clone(),
        }
    }

    /// Topology label usable even when the organ is not a modeled one.
    fn raw_id(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.plant, self.axis, self.metamer, self.organ, self.element
        )
    }

    fn into_record(self) -> Result<ElementRecord, RecordError> {
        let is_growing = match self.is_growing {
            None => return Err(RecordError::MissingField("is_growing")),
            Some(raw) => match parse_growing_flag(&raw) {
                Some(flag) => flag,
                None => {
                    return Err(RecordError::InvalidBool {
                        field: "is_growing",
                        value: raw,
                    });
                }
            },
        };
        let mut builder = ElementRecordBuilder::new().is_growing(is_growing);
        if let Some(value) = self.green_area {
            builder = builder.green_area(value);
        }
        if let Some(value) = self.proteins {
            builder = builder.proteins(value);
        }
        if let Some(value) = self.mstruct {
            builder = builder.mstruct(value);
        }
        if let Some(value) = self.max_proteins {
            builder = builder.max_proteins(value);
        }
        if let Some(value) = self.nstruct {
            builder = builder.nstruct(value);
        }
        if let Some(value) = self.nitrates {
            builder = builder.nitrates(value);
        }
        if let Some(value) = self.amino_acids {
            builder = builder.amino_acids(value);
        }
        if let Some(value) = self.starch {
            builder = builder.starch(value);
        }
        if let Some(value) = self.fructan {
            builder = builder.fructan(value);
        }
        if let Some(value) = self.cytokinins {
            builder = builder.cytokinins(value);
        }
        if let Some(value) = self.sucrose {
            builder = builder.sucrose(value);
        }
        builder.build()
    }
}

/// Boolean parsing for the `is_growing` column. Upstream tools emit
/// `True`/`False` as well as `true`/`false`/`1`/`0`.
fn parse_growing_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Reads a roots input table. The first row per identifier wins; later
/// duplicates are ignored.
pub fn read_roots_table(
    path: &Path,
    policy: InvalidRecordPolicy,
) -> Result<HashMap<RootsId, RootsRecord>, TableError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| TableError::Csv {
        path: display_path(path),
        source: e,
    })?;

    let mut records = HashMap::new();
    for result in reader.deserialize::<RootsRow>() {
        let row = result.map_err(|e| TableError::Csv {
            path: display_path(path),
            source: e,
        })?;
        let id = row.id();
        match row.into_record() {
            Ok(record) => {
                records.entry(id).or_insert(record);
            }
            Err(error) => match policy {
                InvalidRecordPolicy::Fail => {
                    return Err(TableError::InvalidRecord {
                        path: display_path(path),
                        id: id.to_string(),
                        source: error,
                    });
                }
                InvalidRecordPolicy::SkipWithWarning => {
                    warn!(id = %id, %error, "Skipping invalid roots record");
                }
            },
        }
    }
    Ok(records)
}

/// Reads an elements input table. Rows whose organ label is not one of the
/// modeled photosynthetic organs (e.g. grains) are skipped with a warning,
/// whatever the policy. The first row per identifier wins.
pub fn read_elements_table(
    path: &Path,
    policy: InvalidRecordPolicy,
) -> Result<HashMap<ElementId, ElementRecord>, TableError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| TableError::Csv {
        path: display_path(path),
        source: e,
    })?;

    let mut records = HashMap::new();
    for result in reader.deserialize::<ElementsRow>() {
        let row = result.map_err(|e| TableError::Csv {
            path: display_path(path),
            source: e,
        })?;
        let organ = match row.organ() {
            Ok(organ) => organ,
            Err(error) => {
                warn!(id = %row.raw_id(), %error, "Skipping row with unmodeled organ");
                continue;
            }
        };
        let id = row.id(organ);
        match row.into_record() {
            Ok(record) => {
                records.entry(id).or_insert(record);
            }
            Err(error) => match policy {
                InvalidRecordPolicy::Fail => {
                    return Err(TableError::InvalidRecord {
                        path: display_path(path),
                        id: id.to_string(),
                        source: error,
                    });
                }
                InvalidRecordPolicy::SkipWithWarning => {
                    warn!(id = %id, %error, "Skipping invalid element record");
                }
            },
        }
    }
    Ok(records)
}

/// Parses and validates every row of a roots table without building a record
/// collection. Every row is audited, duplicates included.
pub fn audit_roots_table(path: &Path) -> Result<TableAudit, TableError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| TableError::Csv {
        path: display_path(path),
        source: e,
    })?;

    let mut audit = TableAudit::default();
    for result in reader.deserialize::<RootsRow>() {
        let row = result.map_err(|e| TableError::Csv {
            path: display_path(path),
            source: e,
        })?;
        let id = row.id().to_string();
        match row.into_record().and_then(|record| {
            record.validate()?;
            Ok(record)
        }) {
            Ok(_) => audit.valid += 1,
            Err(error) => audit.problems.push(TableProblem { id, error }),
        }
    }
    Ok(audit)
}

/// Parses and validates every row of an elements table. Unmodeled organ
/// labels are reported as problems here, unlike [`read_elements_table`]
/// which silently skips them.
pub fn audit_elements_table(path: &Path) -> Result<TableAudit, TableError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| TableError::Csv {
        path: display_path(path),
        source: e,
    })?;

    let mut audit = TableAudit::default();
    for result in reader.deserialize::<ElementsRow>() {
        let row = result.map_err(|e| TableError::Csv {
            path: display_path(path),
            source: e,
        })?;
        let id = row.raw_id();
        if let Err(error) = row.organ() {
            audit.problems.push(TableProblem { id, error });
            continue;
        }
        match row.into_record().and_then(|record| {
            record.validate()?;
            Ok(record)
        }) {
            Ok(_) => audit.valid += 1,
            Err(error) => audit.problems.push(TableProblem { id, error }),
        }
    }
    Ok(audit)
}

#[derive(Debug, Serialize)]
struct RootsOutputRow<'a> {
    plant: u32,
    axis: &'a str,
    mstruct: f64,
    rate_mstruct_death: f64,
    #[serde(rename = "Nstruct")]
    nstruct: f64,
    cytokinins: f64,
}

#[derive(Debug, Serialize)]
struct ElementsOutputRow<'a> {
    plant: u32,
    axis: &'a str,
    metamer: u32,
    organ: &'static str,
    element: &'a str,
    green_area: f64,
    mstruct: f64,
    #[serde(rename = "Nstruct")]
    nstruct: f64,
    starch: f64,
    sucrose: f64,
    fructan: f64,
    proteins: f64,
    amino_acids: f64,
    cytokinins: f64,
    max_proteins: f64,
}

/// Writes roots outputs, rows ordered by plant then axis.
pub fn write_roots_outputs(
    path: &Path,
    outputs: &HashMap<RootsId, RootsOutput>,
) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| TableError::Csv {
        path: display_path(path),
        source: e,
    })?;

    // Header even when there are no rows.
    if outputs.is_empty() {
        writer
            .write_record([
                "plant",
                "axis",
                "mstruct",
                "rate_mstruct_death",
                "Nstruct",
                "cytokinins",
            ])
            .map_err(|e| TableError::Csv {
                path: display_path(path),
                source: e,
            })?;
    }

    for (id, output) in outputs.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        writer
            .serialize(RootsOutputRow {
                plant: id.plant,
                axis: &id.axis,
                mstruct: output.mstruct,
                rate_mstruct_death: output.rate_mstruct_death,
                nstruct: output.nstruct,
                cytokinins: output.cytokinins,
            })
            .map_err(|e| TableError::Csv {
                path: display_path(path),
                source: e,
            })?;
    }
    writer.flush().map_err(|e| TableError::Io {
        path: display_path(path),
        source: e,
    })
}

/// Writes elements outputs, rows ordered by topology (plant, axis, metamer,
/// organ, element).
pub fn write_elements_outputs(
    path: &Path,
    outputs: &HashMap<ElementId, ElementOutput>,
) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| TableError::Csv {
        path: display_path(path),
        source: e,
    })?;

    // Header even when there are no rows.
    if outputs.is_empty() {
        writer
            .write_record([
                "plant",
                "axis",
                "metamer",
                "organ",
                "element",
                "green_area",
                "mstruct",
                "Nstruct",
                "starch",
                "sucrose",
                "fructan",
                "proteins",
                "amino_acids",
                "cytokinins",
                "max_proteins",
            ])
            .map_err(|e| TableError::Csv {
                path: display_path(path),
                source: e,
            })?;
    }

    for (id, output) in outputs.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        writer
            .serialize(ElementsOutputRow {
                plant: id.plant,
                axis: &id.axis,
                metamer: id.metamer,
                organ: id.organ.as_str(),
                element: &id.element,
                green_area: output.green_area,
                mstruct: output.mstruct,
                nstruct: output.nstruct,
                starch: output.starch,
                sucrose: output.sucrose,
                fructan: output.fructan,
                proteins: output.proteins,
                amino_acids: output.amino_acids,
                cytokinins: output.cytokinins,
                max_proteins: output.max_proteins,
            })
            .map_err(|e| TableError::Csv {
                path: display_path(path),
                source: e,
            })?;
    }
    writer.flush().map_err(|e| TableError::Io {
        path: display_path(path),
        source: e,
    })
}
