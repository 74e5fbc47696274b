use crate::parsers::errors::{RecordError, XyzHeaderError, XyzReadError};
use crate::parsers::Position;
use buried_volume::ElementId;

/// One atom from an XYZ file: the element as it was written, plus the
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub element: ElementId,
    pub position: Position,
}

/// Check the XYZ header and return the declared atom count.
///
/// The count is feedback for the user; it is not checked against the
/// number of data lines.
pub fn validate_header(content: &str) -> Result<usize, XyzHeaderError> {
    let mut lines = content.lines();
    let Some(first) = lines.next() else {
        return Err(XyzHeaderError::TooShort);
    };
    if lines.next().is_none() {
        return Err(XyzHeaderError::TooShort);
    }
    let first = first.trim();
    first
        .parse()
        .map_err(|_| XyzHeaderError::NotACount(first.to_string()))
}

/// Parse a whole XYZ file into atom records, in file order.
///
/// The first line is the atom count, the second line a title that gets
/// discarded. Every other non-blank line is one atom. Parameters elsewhere
/// refer to atoms by their 0-based position in the returned sequence.
pub fn parse_xyz(content: &str) -> Result<Vec<AtomRecord>, XyzReadError> {
    validate_header(content)?;
    let mut records = Vec::new();
    for (lineno, line) in content.lines().enumerate().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        let record =
            parse_atom_line(line).map_err(|error| XyzReadError::Record(error, lineno + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn parse_atom_line(line: &str) -> Result<AtomRecord, RecordError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(RecordError::NotEnoughFields(fields.len()));
    }
    let element = ElementId::from_token(fields[0]);
    let mut position = [0.0; 3];
    for (axis, field) in fields[1..4].iter().enumerate() {
        position[axis] = field
            .parse()
            .map_err(|_| RecordError::BadCoordinate(field.to_string()))?;
    }
    Ok(AtomRecord { element, position })
}
