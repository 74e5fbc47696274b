use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::calculation::{CalculationRequest, ResultArtifact};

pub fn report_file_name(ligand_name: &str) -> String {
    format!("{ligand_name}_report.txt")
}

pub fn steric_map_file_name(ligand_name: &str) -> String {
    format!("{ligand_name}_steric_map.png")
}

pub fn archive_file_name(ligand_name: &str) -> String {
    format!("{ligand_name}_results.zip")
}

/// Render the text report.
///
/// The layout is fixed: six `key: value` lines with the ligand name, the
/// fraction, the three reference indices, and the reverse-z flag.
/// Identical inputs produce identical bytes.
pub fn render_report(ligand_name: &str, fraction: f64, request: &CalculationRequest) -> String {
    format!(
        "Ligand name: {ligand_name}\n\
         Fraction buried volume: {fraction}\n\
         metal_index: {center}\n\
         z_axis_atoms_index: {z_axis}\n\
         xz_plane_atoms_index: {xz_plane}\n\
         Reverse_z: {reverse_z}",
        center = request.center_index,
        z_axis = request.z_axis_index,
        xz_plane = request.xz_plane_index,
        reverse_z = request.reverse_z,
    )
}

#[derive(Error, Debug)]
pub enum PackagingError {
    #[error("Could not build the result archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Could not write into the result archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Bundle the report and the steric map into an in-memory ZIP archive.
///
/// The archive holds exactly two entries, named after the ligand, with
/// the same bytes as the standalone artifacts.
pub fn bundle_archive(artifact: &ResultArtifact) -> Result<Vec<u8>, PackagingError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    writer.start_file(report_file_name(&artifact.ligand_name), options)?;
    writer.write_all(&artifact.report)?;
    writer.start_file(steric_map_file_name(&artifact.ligand_name), options)?;
    writer.write_all(&artifact.steric_map_png)?;
    Ok(writer.finish()?.into_inner())
}
