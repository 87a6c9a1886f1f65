use crate::core::models::protein::{BackboneAtoms, ModelError, Protein};
use nalgebra::Point3;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid structure in '{path}': {source}")]
    Model { path: String, source: ModelError },
    #[error("Structure file '{path}' contains no residues")]
    Empty { path: String },
}

#[derive(Debug, Deserialize)]
struct BackboneRecord {
    n_x: f64,
    n_y: f64,
    n_z: f64,
    ca_x: f64,
    ca_y: f64,
    ca_z: f64,
    c_x: f64,
    c_y: f64,
    c_z: f64,
}

impl From<BackboneRecord> for BackboneAtoms {
    fn from(r: BackboneRecord) -> Self {
        Self {
            n: Point3::new(r.n_x, r.n_y, r.n_z),
            ca: Point3::new(r.ca_x, r.ca_y, r.ca_z),
            c: Point3::new(r.c_x, r.c_y, r.c_z),
        }
    }
}

/// Reads a protein backbone from a CSV file with one row per residue.
///
/// The expected header is `residue,n_x,n_y,n_z,ca_x,ca_y,ca_z,c_x,c_y,c_z`; the residue
/// label column is informational only. The protein is named after the file stem.
pub fn read_protein(path: &Path) -> Result<Protein, StructureLoadError> {
    let path_str = path.to_string_lossy().to_string();
    let reader = csv::Reader::from_path(path).map_err(|e| StructureLoadError::Csv {
        path: path_str.clone(),
        source: e,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path_str.clone());
    read_records(name, reader, &path_str)
}

pub fn read_protein_from(name: &str, source: impl Read) -> Result<Protein, StructureLoadError> {
    read_records(name.to_string(), csv::Reader::from_reader(source), name)
}

fn read_records<R: Read>(
    name: String,
    mut reader: csv::Reader<R>,
    path: &str,
) -> Result<Protein, StructureLoadError> {
    let atoms = reader
        .deserialize::<BackboneRecord>()
        .map(|record| {
            record.map(BackboneAtoms::from).map_err(|e| StructureLoadError::Csv {
                path: path.to_string(),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if atoms.is_empty() {
        return Err(StructureLoadError::Empty {
            path: path.to_string(),
        });
    }

    Protein::from_backbone(name, &atoms).map_err(|e| StructureLoadError::Model {
        path: path.to_string(),
        source: e,
    })
}
