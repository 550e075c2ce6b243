//! Math type re-exports and axis-aligned boxes.
//!
//! Vectors come from `glam`. The box types are `Pod` so a slice of boxes
//! can be viewed as the alternating min/max corner sequence consumed by the
//! pixel and voxel appenders.

pub use glam::{DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec3A, Vec4};

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// 3D axis-aligned box with single precision.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3f {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3f {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

impl fmt::Debug for BBox3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3f({:?} - {:?})", self.min, self.max)
    }
}

/// 3D axis-aligned box with double precision.
///
/// This is the box type the writer works with internally; single precision
/// boxes convert losslessly through `From`.
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BBox3d {
    pub min: DVec3,
    pub max: DVec3,
}

impl BBox3d {
    /// Unit cube `[0, 1]^3`.
    pub const UNIT: Self = Self {
        min: DVec3::ZERO,
        max: DVec3::ONE,
    };

    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Point at normalized coordinates `t` inside the box (`t = 0` is `min`).
    #[inline]
    pub fn lerp(&self, t: DVec3) -> DVec3 {
        self.min * (DVec3::ONE - t) + self.max * t
    }

    /// Per-axis cell size when the box is split into `cells` cells.
    #[inline]
    pub fn spacing(&self, cells: UVec3) -> DVec3 {
        self.size() / cells.as_dvec3()
    }
}

impl fmt::Debug for BBox3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox3d({:?} - {:?})", self.min, self.max)
    }
}

impl From<BBox3f> for BBox3d {
    fn from(b: BBox3f) -> Self {
        Self {
            min: b.min.as_dvec3(),
            max: b.max.as_dvec3(),
        }
    }
}

/// View boxes as their alternating `min, max, min, max, ...` corners.
#[inline]
pub fn corner_pairs(boxes: &[BBox3d]) -> &[DVec3] {
    bytemuck::cast_slice(boxes)
}
