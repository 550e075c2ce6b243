//! Legacy VTK output.
//!
//! - [`format`] - Keywords, cell tags and field shapes
//! - [`encode`] - Big-endian scalar encoding
//! - [`sources`] - Input element traits and generated sequences
//! - [`writer`] - The buffered [`VtkWriter`]
//! - [`export`] - Ready-made grid and boundary-condition dumps

pub mod encode;
pub mod export;
pub mod format;
pub mod sources;
pub mod writer;

pub use encode::{Endianness, Real, Scalar, ScalarEncoder, ScalarKind};
pub use format::{CellType, Encoding, FieldDomain, FieldShape};
pub use writer::{DatasetKind, GridSpec, VtkWriter, WriterOptions, WriterState};
