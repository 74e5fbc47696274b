//! Buried-volume calculation and steric-map rendering.
//!
//! The crate exposes a single entry point, [`BuriedVolume`]: it takes
//! element identifiers, coordinates, the index of the center atom, and a
//! set of [`BuriedVolumeOptions`]; it answers with the fraction of a
//! sampling sphere occupied by the atoms and can draw the corresponding
//! top-view steric map into any in-memory or on-disk sink.
//!
//! ```
//! use buried_volume::{BuriedVolume, BuriedVolumeOptions, ElementId};
//!
//! let elements = vec![ElementId::from_token("Pd"), ElementId::from_token("C")];
//! let coordinates = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 2.0]];
//! let buried = BuriedVolume::new(&elements, &coordinates, 0, &BuriedVolumeOptions::default())
//!     .unwrap();
//! assert!(buried.fraction_buried_volume() > 0.0);
//! assert!(buried.fraction_buried_volume() < 1.0);
//! ```

pub mod elements;
mod steric_map;
mod volume;

pub use elements::{ElementId, UnknownElement};
pub use volume::{BuriedVolume, BuriedVolumeOptions, EngineError, Position};
