//! Buried-volume integration over a sampling sphere.

use std::io::{Seek, Write};

use thiserror::Error;

use crate::elements::{vdw_radius, ElementId, UnknownElement, HYDROGEN};
use crate::steric_map::{self, ColorMap};

pub type Position = [f64; 3];

/// Scaling applied to tabulated van der Waals radii before occupancy tests.
const RADII_SCALE: f64 = 1.17;
/// Edge length of one sampling cell, in ångström.
const GRID_SPACING: f64 = 0.1;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Atom index {0} is out of range for a molecule of {1} atoms.")]
    AtomIndexOutOfRange(usize, usize),
    #[error("Got {0} element identifiers for {1} coordinates.")]
    MismatchedInput(usize, usize),
    #[error("The sphere radius must be strictly positive.")]
    NonPositiveRadius,
    #[error("{0}")]
    UnknownElement(#[from] UnknownElement),
    #[error("Unknown color map {0:?}.")]
    UnknownColorMap(String),
    #[error("Could not encode the steric map: {0}")]
    ImageEncoding(#[from] image::ImageError),
}

/// Parameters for one buried-volume run.
///
/// Indices refer to the 0-based position of an atom in the input sequence.
/// The center atom never occupies volume; excluded indices that point
/// outside the molecule exclude nothing.
#[derive(Debug, Clone)]
pub struct BuriedVolumeOptions {
    pub excluded_atoms: Vec<usize>,
    pub z_axis_atoms: Vec<usize>,
    pub xz_plane_atoms: Vec<usize>,
    pub radius: f64,
    pub include_hs: bool,
    pub reverse_z: bool,
}

impl Default for BuriedVolumeOptions {
    fn default() -> Self {
        BuriedVolumeOptions {
            excluded_atoms: Vec::new(),
            z_axis_atoms: Vec::new(),
            xz_plane_atoms: Vec::new(),
            radius: 3.5,
            include_hs: false,
            reverse_z: false,
        }
    }
}

/// One atom retained for occupancy tests: oriented position and scaled radius.
pub(crate) struct OccupiedSphere {
    pub(crate) position: Position,
    pub(crate) radius: f64,
}

impl OccupiedSphere {
    fn contains(&self, point: Position) -> bool {
        squared_norm(sub(point, self.position)) <= self.radius * self.radius
    }
}

/// The buried volume around a center atom.
///
/// The molecule is translated so the center atom sits at the origin and
/// rotated into the frame defined by the z-axis and xz-plane reference
/// atoms. The fraction itself does not depend on the orientation; the
/// steric map does.
pub struct BuriedVolume {
    fraction: f64,
    spheres: Vec<OccupiedSphere>,
    radius: f64,
}

impl BuriedVolume {
    pub fn new(
        elements: &[ElementId],
        coordinates: &[Position],
        center_index: usize,
        options: &BuriedVolumeOptions,
    ) -> Result<BuriedVolume, EngineError> {
        if elements.len() != coordinates.len() {
            return Err(EngineError::MismatchedInput(
                elements.len(),
                coordinates.len(),
            ));
        }
        if options.radius <= 0.0 {
            return Err(EngineError::NonPositiveRadius);
        }
        let atom_count = coordinates.len();
        check_index(center_index, atom_count)?;
        for index in options.z_axis_atoms.iter().chain(&options.xz_plane_atoms) {
            check_index(*index, atom_count)?;
        }
        let numbers = elements
            .iter()
            .map(ElementId::atomic_number)
            .collect::<Result<Vec<usize>, UnknownElement>>()?;

        let center = coordinates[center_index];
        let centered: Vec<Position> = coordinates.iter().map(|p| sub(*p, center)).collect();
        let frame = orientation_frame(
            &centered,
            &options.z_axis_atoms,
            &options.xz_plane_atoms,
            options.reverse_z,
        );
        let oriented: Vec<Position> = centered.iter().map(|p| rotate(&frame, *p)).collect();

        let mut spheres = Vec::new();
        for (index, (position, number)) in oriented.iter().zip(&numbers).enumerate() {
            if index == center_index || options.excluded_atoms.contains(&index) {
                continue;
            }
            if *number == HYDROGEN && !options.include_hs {
                continue;
            }
            let radius = vdw_radius(*number).unwrap_or(0.0) * RADII_SCALE;
            spheres.push(OccupiedSphere {
                position: *position,
                radius,
            });
        }

        let fraction = sample_buried_fraction(&spheres, options.radius);
        Ok(BuriedVolume {
            fraction,
            spheres,
            radius: options.radius,
        })
    }

    /// The buried fraction of the sampling sphere, in [0, 1].
    pub fn fraction_buried_volume(&self) -> f64 {
        self.fraction
    }

    pub fn percent_buried_volume(&self) -> f64 {
        self.fraction * 100.0
    }

    /// Render the top-view steric map as a PNG into `sink`.
    pub fn plot_steric_map<W>(&self, sink: &mut W, color_map: &str) -> Result<(), EngineError>
    where
        W: Write + Seek,
    {
        let color_map = ColorMap::from_name(color_map)
            .ok_or_else(|| EngineError::UnknownColorMap(color_map.to_string()))?;
        steric_map::render(&self.spheres, self.radius, color_map, sink)?;
        Ok(())
    }
}

fn check_index(index: usize, atom_count: usize) -> Result<(), EngineError> {
    if index >= atom_count {
        return Err(EngineError::AtomIndexOutOfRange(index, atom_count));
    }
    Ok(())
}

/// Count grid points of the sampling sphere that fall inside an atom.
fn sample_buried_fraction(spheres: &[OccupiedSphere], radius: f64) -> f64 {
    let steps = (2.0 * radius / GRID_SPACING).ceil() as i64;
    let mut total: u64 = 0;
    let mut buried: u64 = 0;
    for i in 0..=steps {
        let x = -radius + i as f64 * GRID_SPACING;
        for j in 0..=steps {
            let y = -radius + j as f64 * GRID_SPACING;
            for k in 0..=steps {
                let z = -radius + k as f64 * GRID_SPACING;
                let point = [x, y, z];
                if squared_norm(point) > radius * radius {
                    continue;
                }
                total += 1;
                if spheres.iter().any(|sphere| sphere.contains(point)) {
                    buried += 1;
                }
            }
        }
    }
    if total == 0 {
        return 0.0;
    }
    buried as f64 / total as f64
}

/// Orthonormal frame with z along the z-axis reference atoms and the
/// xz-plane reference atoms at y = 0. Degenerate references fall back to
/// the input axes.
fn orientation_frame(
    positions: &[Position],
    z_axis_atoms: &[usize],
    xz_plane_atoms: &[usize],
    reverse_z: bool,
) -> [Position; 3] {
    let z_axis = mean_position(positions, z_axis_atoms)
        .and_then(normalize)
        .unwrap_or([0.0, 0.0, 1.0]);
    let z_axis = if reverse_z { negate(z_axis) } else { z_axis };
    let x_axis = mean_position(positions, xz_plane_atoms)
        .map(|target| sub(target, scale(z_axis, dot(target, z_axis))))
        .and_then(normalize)
        .unwrap_or_else(|| perpendicular(z_axis));
    let y_axis = cross(z_axis, x_axis);
    [x_axis, y_axis, z_axis]
}

fn mean_position(positions: &[Position], indices: &[usize]) -> Option<Position> {
    if indices.is_empty() {
        return None;
    }
    let mut mean = [0.0; 3];
    for index in indices {
        mean = add(mean, positions[*index]);
    }
    Some(scale(mean, 1.0 / indices.len() as f64))
}

fn rotate(frame: &[Position; 3], point: Position) -> Position {
    [
        dot(point, frame[0]),
        dot(point, frame[1]),
        dot(point, frame[2]),
    ]
}

fn perpendicular(axis: Position) -> Position {
    normalize(cross(axis, [0.0, 0.0, 1.0])).unwrap_or([1.0, 0.0, 0.0])
}

fn add(a: Position, b: Position) -> Position {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Position, b: Position) -> Position {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: Position, factor: f64) -> Position {
    [a[0] * factor, a[1] * factor, a[2] * factor]
}

fn negate(a: Position) -> Position {
    scale(a, -1.0)
}

fn dot(a: Position, b: Position) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Position, b: Position) -> Position {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn squared_norm(a: Position) -> f64 {
    dot(a, a)
}

fn normalize(a: Position) -> Option<Position> {
    let norm = squared_norm(a).sqrt();
    if norm < 1e-9 {
        return None;
    }
    Some(scale(a, 1.0 / norm))
}
