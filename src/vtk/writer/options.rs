//! Writer configuration.

use crate::util::{BBox3d, DVec3, Error, Result, UVec3};
use crate::vtk::encode::Real;
use crate::vtk::format::{Encoding, FILE_SIGNATURE, STRUCTURED_POINTS, UNSTRUCTURED_GRID};

/// Geometry of a structured regular grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Box covered by the grid.
    pub bbox: BBox3d,
    /// Number of cells along each axis.
    pub cells: UVec3,
    /// Sample cell centers instead of cell corners.
    pub centered: bool,
}

impl GridSpec {
    pub fn new(bbox: impl Into<BBox3d>, cells: UVec3, centered: bool) -> Self {
        Self { bbox: bbox.into(), cells, centered }
    }

    #[inline]
    pub fn spacing(&self) -> DVec3 {
        self.bbox.spacing(self.cells)
    }

    /// Number of samples along each axis.
    #[inline]
    pub fn dimensions(&self) -> UVec3 {
        if self.centered {
            self.cells
        } else {
            self.cells + UVec3::ONE
        }
    }

    /// Position of the first sample.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        if self.centered {
            self.bbox.min + self.spacing() * 0.5
        } else {
            self.bbox.min
        }
    }

    /// Total number of samples.
    #[inline]
    pub fn num_samples(&self) -> u64 {
        let d = self.dimensions().as_u64vec3();
        d.x * d.y * d.z
    }
}

/// Layout of the dataset written to the file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DatasetKind {
    /// Explicit points and cell connectivity.
    Unstructured,
    /// Implicit regular grid carrying one default point field.
    StructuredPoints(GridSpec),
}

impl DatasetKind {
    /// Keyword on the `DATASET` header line.
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Unstructured => UNSTRUCTURED_GRID,
            Self::StructuredPoints(_) => STRUCTURED_POINTS,
        }
    }

    #[inline]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::StructuredPoints(_))
    }
}

/// Options fixed for the lifetime of a writer.
#[derive(Clone, Debug, PartialEq)]
pub struct WriterOptions {
    name: String,
    encoding: Encoding,
    dataset: DatasetKind,
}

impl WriterOptions {
    /// Unstructured grid named `name`, text encoded.
    pub fn unstructured(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            encoding: Encoding::Ascii,
            dataset: DatasetKind::Unstructured,
        }
    }

    /// Structured grid over `bbox` with `cells` cells per axis, text encoded.
    pub fn structured(name: impl Into<String>, bbox: impl Into<BBox3d>, cells: UVec3, centered: bool) -> Self {
        Self {
            name: name.into(),
            encoding: Encoding::Ascii,
            dataset: DatasetKind::StructuredPoints(GridSpec::new(bbox, cells, centered)),
        }
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn binary(self) -> Self {
        self.encoding(Encoding::Binary)
    }

    pub fn ascii(self) -> Self {
        self.encoding(Encoding::Ascii)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn get_encoding(&self) -> Encoding {
        self.encoding
    }

    #[inline]
    pub fn dataset(&self) -> &DatasetKind {
        &self.dataset
    }

    /// Reject options that cannot produce a well-formed header.
    pub fn validate(&self) -> Result<()> {
        if self.name.contains(['\n', '\r']) {
            return Err(Error::InvalidName(self.name.clone()));
        }
        if let DatasetKind::StructuredPoints(grid) = &self.dataset {
            if grid.cells.min_element() == 0 {
                return Err(Error::InvalidDimensions(grid.cells.to_array()));
            }
        }
        Ok(())
    }

    /// Header text, from the signature line through the grid geometry.
    pub(crate) fn header<T: Real>(&self) -> String {
        let mut header = format!(
            "{FILE_SIGNATURE}\n{}\n{}\nDATASET {}\n",
            self.name,
            self.encoding.keyword(),
            self.dataset.keyword()
        );
        if let DatasetKind::StructuredPoints(grid) = &self.dataset {
            let dims = grid.dimensions();
            let origin = grid.origin();
            let spacing = grid.spacing();
            header.push_str(&format!("DIMENSIONS {} {} {}\n", dims.x, dims.y, dims.z));
            header.push_str(&format!(
                "ORIGIN {} {} {}\n",
                T::from_f64(origin.x),
                T::from_f64(origin.y),
                T::from_f64(origin.z)
            ));
            header.push_str(&format!(
                "SPACING {} {} {}\n",
                T::from_f64(spacing.x),
                T::from_f64(spacing.y),
                T::from_f64(spacing.z)
            ));
        }
        header
    }
}
