use std::error::Error;
use std::fmt;
use std::io;
use std::num::ParseFloatError;

/// An error type indicating a malformed or
/// unreadable dataset.
#[derive(Debug)]
pub enum DatasetError {
    /// The underlying reader failed.
    Io(io::Error),
    /// The dataset holds no samples.
    Empty,
    /// A record has too few fields to hold a non-empty
    /// point and the label. Contains the line number
    /// and the field count.
    TooFewFields(usize, usize),
    /// A record's field count differs from the first record's.
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A field could not be parsed as a floating point number.
    /// Contains the line number, the 1-based column, and the cause.
    InvalidNumber(usize, usize, ParseFloatError),
    /// A sample has no point values or no label values.
    /// Contains the 1-based sample position and the empty part.
    EmptyVector(usize, &'static str),
    /// The samples do not fit a topology's input or output layer.
    TopologyMismatch {
        layer: &'static str,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read dataset: {}", e),
            Self::Empty => write!(f, "dataset contains no samples"),
            Self::TooFewFields(line, count) => write!(
                f,
                "line {}: {} fields cannot hold both a point and a label",
                line, count
            ),
            Self::FieldCountMismatch {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: expected {} fields, found {}",
                line, expected, found
            ),
            Self::InvalidNumber(line, column, e) => {
                write!(f, "line {}, column {}: {}", line, column, e)
            }
            Self::EmptyVector(line, part) => write!(f, "line {}: sample has an empty {}", line, part),
            Self::TopologyMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "topology {} layer has {} units, but samples have {} values",
                layer, expected, found
            ),
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidNumber(_, _, e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(e: io::Error) -> DatasetError {
        DatasetError::Io(e)
    }
}
