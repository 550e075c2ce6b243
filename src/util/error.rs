//! Error types for the VTK writer.

use thiserror::Error;

/// Main error type for VTK write operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset name would break the line-oriented header
    #[error("Invalid dataset name: {0:?}")]
    InvalidName(String),

    /// Field names must be a single non-empty token
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),

    /// Structured grid with a zero cell count on some axis
    #[error("Invalid grid dimensions: {0:?} (every axis needs at least one cell)")]
    InvalidDimensions([u32; 3]),

    /// Operation not available for the writer's dataset kind
    #[error("{operation} is not supported for {dataset} datasets")]
    DatasetMismatch {
        operation: &'static str,
        dataset: &'static str,
    },

    /// Box appenders consume min/max corner pairs
    #[error("Expected min/max corner pairs, got {0} corners")]
    UnpairedCorner(usize),

    /// Index tuple shorter than the cell type requires
    #[error("{cell_type} cell needs {expected} indices, got {actual}")]
    ShortCell {
        cell_type: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Cell references a point that does not exist
    #[error("Cell index {index} out of range (point count: {point_count})")]
    IndexOutOfRange { index: i64, point_count: usize },

    /// Field element count diverged from its domain's element count
    #[error("Field {name:?} has {count} {domain} values, expected {expected}")]
    FieldCountMismatch {
        name: String,
        domain: &'static str,
        count: usize,
        expected: usize,
    },

    /// Same field name re-used with another shape
    #[error("Field {name:?} already registered as {existing}, cannot append {requested}")]
    FieldShapeMismatch {
        name: String,
        existing: &'static str,
        requested: &'static str,
    },

    /// Structured grids carry exactly one default field
    #[error("Structured grid needs exactly one default field, got {0}")]
    DefaultFieldCount(usize),

    /// A field's count disagrees with the declared group count
    #[error("{domain} field {name:?} has {count} values but the group declares {declared}")]
    GroupCountMismatch {
        domain: &'static str,
        name: String,
        count: usize,
        declared: usize,
    },

    /// A previous append hit a fatal invariant violation
    #[error("Writer is poisoned: {0}")]
    Poisoned(String),

    /// Writer already finalized
    #[error("Writer is closed and cannot be modified")]
    Closed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error leaves the file content unrecoverable.
    ///
    /// Fatal errors abort the process when they surface from an implicit
    /// finalization in `Drop`.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::FieldCountMismatch { .. }
                | Self::DefaultFieldCount(_)
                | Self::GroupCountMismatch { .. }
                | Self::Poisoned(_)
                | Self::Io(_)
        )
    }
}

/// Result type alias for VTK write operations.
pub type Result<T> = std::result::Result<T, Error>;
