use std::io::Cursor;

use buried_volume::{BuriedVolume, BuriedVolumeOptions, ElementId, EngineError, Position};
use log::{debug, info};
use thiserror::Error;

use crate::parsers::errors::XyzReadError;
use crate::parsers::xyz::parse_xyz;
use crate::report::render_report;
use crate::session::UploadedGeometry;

/// Color map used for the steric map.
pub const STERIC_MAP_COLOR_MAP: &str = "jet";

/// User parameters for one run, bound to the currently loaded file.
///
/// Indices are 0-based positions in the parsed atom sequence. A request is
/// built fresh on every submission and never outlives the run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub center_index: usize,
    pub z_axis_index: usize,
    pub xz_plane_index: usize,
    pub excluded_atoms: Vec<usize>,
    pub sphere_radius: f64,
    pub include_hs: bool,
    pub reverse_z: bool,
}

impl Default for CalculationRequest {
    fn default() -> Self {
        CalculationRequest {
            center_index: 0,
            z_axis_index: 0,
            xz_plane_index: 0,
            excluded_atoms: Vec::new(),
            sphere_radius: 3.5,
            include_hs: false,
            reverse_z: false,
        }
    }
}

/// Everything produced by one successful run, kept in memory until the
/// next upload or session reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultArtifact {
    pub ligand_name: String,
    pub fraction_buried_volume: f64,
    pub steric_map_png: Vec<u8>,
    pub report: Vec<u8>,
}

impl ResultArtifact {
    pub fn percent_buried_volume(&self) -> f64 {
        self.fraction_buried_volume * 100.0
    }
}

#[derive(Error, Debug)]
pub enum CalculationError {
    #[error("{0}")]
    Read(#[from] XyzReadError),
    #[error("{0}")]
    Engine(#[from] EngineError),
}

/// Run one buried-volume calculation for the loaded geometry.
///
/// The geometry text is parsed in full here; both parse failures and
/// engine failures surface as a [`CalculationError`] instead of tearing
/// the interface down.
pub fn run_calculation(
    geometry: &UploadedGeometry,
    request: &CalculationRequest,
) -> Result<ResultArtifact, CalculationError> {
    let atoms = parse_xyz(&geometry.content)?;
    debug!(
        "Parsed {} atoms for {} ({} declared)",
        atoms.len(),
        geometry.ligand_name,
        geometry.declared_atom_count
    );
    let (elements, coordinates): (Vec<ElementId>, Vec<Position>) = atoms
        .iter()
        .map(|atom| (atom.element.clone(), atom.position))
        .unzip();
    let options = BuriedVolumeOptions {
        excluded_atoms: request.excluded_atoms.clone(),
        z_axis_atoms: vec![request.z_axis_index],
        xz_plane_atoms: vec![request.xz_plane_index],
        radius: request.sphere_radius,
        include_hs: request.include_hs,
        reverse_z: request.reverse_z,
    };
    let buried = BuriedVolume::new(&elements, &coordinates, request.center_index, &options)?;
    let mut image = Cursor::new(Vec::new());
    buried.plot_steric_map(&mut image, STERIC_MAP_COLOR_MAP)?;
    let report = render_report(
        &geometry.ligand_name,
        buried.fraction_buried_volume(),
        request,
    );
    info!(
        "Buried volume for {}: {:.2}%",
        geometry.ligand_name,
        buried.percent_buried_volume()
    );
    Ok(ResultArtifact {
        ligand_name: geometry.ligand_name.clone(),
        fraction_buried_volume: buried.fraction_buried_volume(),
        steric_map_png: image.into_inner(),
        report: report.into_bytes(),
    })
}
