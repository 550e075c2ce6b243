//! # vtk-legacy
//!
//! Writer for the legacy VTK file format (`# vtk DataFile Version 1.0`),
//! in ASCII or big-endian binary encoding.
//!
//! Two dataset layouts are supported: unstructured grids built from
//! points, typed cells and per-cell or per-point fields, and structured
//! point grids carrying one default scalar field plus named point fields.
//! Every section is buffered in memory and the file is assembled when the
//! writer is finished, so counts in section headers are always exact.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math re-exports, bounding boxes
//! - [`vtk`] - Format constants, encoding, the writer and export helpers
//!
//! ## Example
//!
//! ```no_run
//! use vtk_legacy::prelude::*;
//!
//! # fn main() -> vtk_legacy::Result<()> {
//! let mut writer = VtkWriter::<f32>::create("mesh.vtk", WriterOptions::unstructured("mesh").binary())?;
//! writer
//!     .append_points([[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])?
//!     .append_cells([[0i32, 1, 2]], CellType::Triangle, false)?
//!     .append_field_data("id", FieldDomain::Cell, [7])?;
//! writer.finish()?;
//! # Ok(())
//! # }
//! ```

pub mod util;
pub mod vtk;

// Re-export commonly used types
pub use util::{Error, Result};
pub use vtk::{CellType, Encoding, FieldDomain, VtkWriter, WriterOptions};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{BBox3d, BBox3f, DVec3, Error, Result, UVec3, Vec3};
    pub use crate::vtk::export::{write_grid_vtk, write_vert_vtk};
    pub use crate::vtk::sources::{Components, FieldValue, IndexTuple};
    pub use crate::vtk::{CellType, Encoding, FieldDomain, GridSpec, VtkWriter, WriterOptions};
}
