//! Utility types shared by the writer.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and axis-aligned boxes

mod error;
mod math;

pub use error::*;
pub use math::*;
