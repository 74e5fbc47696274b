use thiserror::Error;

/// Why an uploaded file was rejected before any atom record was built.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum XyzHeaderError {
    #[error("An XYZ file needs at least an atom count line and a title line.")]
    TooShort,
    #[error("The first line must be the number of atoms, got {0:?}.")]
    NotACount(String),
}

/// What went wrong with one atom line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least 4 fields, got {0}")]
    NotEnoughFields(usize),
    #[error("coordinate {0:?} is not a number")]
    BadCoordinate(String),
}

/// What went wrong while reading an XYZ file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum XyzReadError {
    #[error("{0}")]
    Header(#[from] XyzHeaderError),
    #[error("Malformed atom record on line {1}: {0}.")]
    Record(RecordError, usize),
}
