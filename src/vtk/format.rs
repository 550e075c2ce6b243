//! Legacy VTK format constants and tags.

use std::fmt;

/// First line of every legacy VTK file.
pub const FILE_SIGNATURE: &str = "# vtk DataFile Version 1.0";

/// Dataset keyword for explicit point/cell geometry.
pub const UNSTRUCTURED_GRID: &str = "UNSTRUCTURED_GRID";

/// Dataset keyword for implicit regular grids.
pub const STRUCTURED_POINTS: &str = "STRUCTURED_POINTS";

/// Name of the single unnamed field of a structured grid.
pub const DEFAULT_FIELD_NAME: &str = "data";

/// Lookup table line following every `SCALARS` header.
pub const LOOKUP_TABLE_DEFAULT: &str = "LOOKUP_TABLE default";

/// Number of components written per color.
pub const COLOR_COMPONENTS: usize = 4;

/// Number of components written per point and per vector.
pub const SPATIAL_COMPONENTS: usize = 3;

/// Payload encoding of a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Human-readable decimal text.
    #[default]
    Ascii,
    /// Big-endian binary payloads.
    Binary,
}

impl Encoding {
    /// Keyword written on the third header line.
    #[inline]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Binary => "BINARY",
        }
    }

    #[inline]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Binary)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Cell topology tag.
///
/// The discriminant is the integer written to the `CELL_TYPES` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CellType {
    Vertex = 1,
    Line = 3,
    PolyLine = 4,
    Triangle = 5,
    /// Axis-aligned quad with raw (lexicographic) vertex order.
    Pixel = 8,
    Quad = 9,
    Tetra = 10,
    /// Axis-aligned hexahedron with raw (lexicographic) vertex order.
    Voxel = 11,
    Hexahedron = 12,
    QuadraticEdge = 21,
}

impl CellType {
    /// Integer tag written to `CELL_TYPES`.
    #[inline]
    pub const fn tag(self) -> i32 {
        self as i32
    }

    /// Number of indices per cell, `None` for variable-length cells.
    #[inline]
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            Self::Vertex => Some(1),
            Self::Line => Some(2),
            Self::Triangle | Self::QuadraticEdge => Some(3),
            Self::Tetra | Self::Pixel | Self::Quad => Some(4),
            Self::Voxel | Self::Hexahedron => Some(8),
            Self::PolyLine => None,
        }
    }

    /// Index-count prefix for a cell whose tuple holds `tuple_len` indices.
    #[inline]
    pub const fn index_count(self, tuple_len: usize) -> usize {
        match self.fixed_len() {
            Some(n) => n,
            None => tuple_len,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Line => "line",
            Self::PolyLine => "polyline",
            Self::Triangle => "triangle",
            Self::Pixel => "pixel",
            Self::Quad => "quad",
            Self::Tetra => "tetra",
            Self::Voxel => "voxel",
            Self::Hexahedron => "hexahedron",
            Self::QuadraticEdge => "quadratic edge",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entity set a named field is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldDomain {
    Cell,
    Point,
}

impl FieldDomain {
    /// Keyword opening the field group of this domain.
    #[inline]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Cell => "CELL_DATA",
            Self::Point => "POINT_DATA",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for FieldDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element shape of a named field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldShape {
    Scalar,
    Vector,
    Color,
}

impl FieldShape {
    /// Header line announcing a field of this shape.
    pub fn header(self, name: &str, precision: &str) -> String {
        match self {
            Self::Scalar => format!("SCALARS {name} {precision}\n{LOOKUP_TABLE_DEFAULT}\n"),
            Self::Vector => format!("VECTORS {name} {precision}\n"),
            Self::Color => format!("COLOR_SCALARS {name} {COLOR_COMPONENTS}\n"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vector => "vector",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Check that a field name is one whitespace-free token.
#[inline]
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}
