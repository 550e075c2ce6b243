//! Point and cell appenders.

use std::io::Write;

use smallvec::SmallVec;

use super::VtkWriter;
use crate::util::{corner_pairs, BBox3d, DVec3, Error, Result};
use crate::vtk::encode::{Real, Scalar};
use crate::vtk::format::{CellType, SPATIAL_COMPONENTS};
use crate::vtk::sources::{self, Components, IndexTuple};

/// Unit offsets of the four pixel corners.
const PIXEL_CORNERS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];

/// Unit offsets of the eight voxel corners, bottom face first.
const VOXEL_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

const PIXEL_ORDER: [i64; 4] = [0, 1, 2, 3];
const QUAD_ORDER: [i64; 4] = [0, 1, 3, 2];
const VOXEL_ORDER: [i64; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
const HEX_ORDER: [i64; 8] = [0, 1, 3, 2, 4, 5, 7, 6];

/// Expand min/max corner pairs into box corners and batch-local cells.
///
/// `corners.len()` must be even.
pub(crate) fn expand_boxes<const N: usize>(
    corners: &[DVec3],
    unit: &[[f64; 3]; N],
    order: &[i64; N],
) -> (Vec<DVec3>, Vec<[i64; N]>) {
    let num_boxes = corners.len() / 2;
    let mut points = Vec::with_capacity(num_boxes * N);
    let mut cells = Vec::with_capacity(num_boxes);

    for pair in corners.chunks_exact(2) {
        let (min, max) = (pair[0], pair[1]);
        let ext = max - min;

        let first = points.len() as i64;
        cells.push((*order).map(|i| first + i));
        points.extend(unit.iter().map(|u| min + ext * DVec3::from_array(*u)));
    }
    (points, cells)
}

fn collect_corners<I>(corners: I) -> Result<Vec<DVec3>>
where
    I: IntoIterator,
    I::Item: Components,
{
    let corners: Vec<DVec3> = corners
        .into_iter()
        .map(|c| DVec3::from_array(c.padded::<3>()))
        .collect();
    if corners.len() % 2 != 0 {
        return Err(Error::UnpairedCorner(corners.len()));
    }
    Ok(corners)
}

impl<T: Real, W: Write> VtkWriter<T, W> {
    /// Append points; components past the third are dropped, missing ones are zero.
    pub fn append_points<I>(&mut self, points: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Components,
    {
        self.ensure_unstructured("append_points")?;
        self.push_points(points);
        Ok(self)
    }

    /// Append the element-wise sums of two point sequences.
    pub fn append_points_by_add<A, B>(&mut self, a: A, b: B) -> Result<&mut Self>
    where
        A: IntoIterator,
        A::Item: Components,
        B: IntoIterator,
        B::Item: Components,
    {
        self.append_points(sources::sum(a, b))
    }

    fn push_points<I>(&mut self, points: I)
    where
        I: IntoIterator,
        I::Item: Components,
    {
        let encoding = self.options.get_encoding();
        let mut n = 0;
        for p in points {
            let row: [Scalar; SPATIAL_COMPONENTS] = p.padded::<SPATIAL_COMPONENTS>().map(|v| T::from_f64(v).scalar());
            self.points.push_row(&self.encoder, encoding, &row);
            n += 1;
        }
        self.points.bump(n);
        self.point_count += n;
        tracing::trace!(added = n, total = self.point_count, "points appended");
    }

    /// Append cells of one topology.
    ///
    /// Each cell is written as its index-count prefix followed by its
    /// indices. With `use_relative_index` the current relative index base is
    /// added to every index. Tuples longer than the topology needs are
    /// truncated; shorter ones reject the whole batch.
    pub fn append_cells<I>(&mut self, cells: I, cell_type: CellType, use_relative_index: bool) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IndexTuple,
    {
        self.ensure_unstructured("append_cells")?;

        let point_count = self.point_count;
        let out_of_range = |index: i64| Error::IndexOutOfRange { index, point_count };
        let base = if use_relative_index {
            i64::try_from(self.relative_index_base).map_err(|_| out_of_range(i64::MAX))?
        } else {
            0
        };
        let mut tuples: Vec<SmallVec<[i64; 8]>> = Vec::new();
        for cell in cells {
            let len = cell.len();
            let n = cell_type.index_count(len);
            if len < n {
                return Err(Error::ShortCell {
                    cell_type: cell_type.name(),
                    expected: n,
                    actual: len,
                });
            }
            let indices = (0..n)
                .map(|i| base.checked_add(cell.index(i)).ok_or_else(|| out_of_range(i64::MAX)))
                .collect::<Result<SmallVec<[i64; 8]>>>()?;
            if let Some(&bad) = indices.iter().find(|&&i| i < 0 || i > i32::MAX as i64) {
                return Err(out_of_range(bad));
            }
            tuples.push(indices);
        }

        let encoding = self.options.get_encoding();
        let tag = [Scalar::I32(cell_type.tag())];
        let mut row: SmallVec<[Scalar; 9]> = SmallVec::new();
        for indices in &tuples {
            row.clear();
            row.push(Scalar::I32(indices.len() as i32));
            row.extend(indices.iter().map(|&i| Scalar::I32(i as i32)));
            self.cells.push_row(&self.encoder, encoding, &row);
            self.cell_types.push_row(&self.encoder, encoding, &tag);

            self.cell_index_word_count += indices.len() + 1;
            if let Some(&m) = indices.iter().max() {
                self.max_index = Some(self.max_index.map_or(m, |cur| cur.max(m)));
            }
        }

        let n = tuples.len();
        self.cells.bump(n);
        self.cell_types.bump(n);
        self.cell_count += n;
        tracing::trace!(
            cell_type = cell_type.name(),
            added = n,
            cells = self.cell_count,
            words = self.cell_index_word_count,
            "cells appended"
        );
        Ok(self)
    }

    /// Append one axis-aligned pixel per min/max corner pair.
    ///
    /// `quad` selects the quad winding and [`CellType::Quad`] instead of the
    /// raw pixel order and [`CellType::Pixel`]. The relative index base is
    /// moved to the current point count first, so with `use_relative_index`
    /// the new cells address the new points.
    pub fn append_pixels<I>(&mut self, corners: I, quad: bool, use_relative_index: bool) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Components,
    {
        self.ensure_unstructured("append_pixels")?;
        let corners = collect_corners(corners)?;
        let (order, cell_type) = if quad {
            (&QUAD_ORDER, CellType::Quad)
        } else {
            (&PIXEL_ORDER, CellType::Pixel)
        };
        let (points, cells) = expand_boxes(&corners, &PIXEL_CORNERS, order);

        self.set_relative_index(None);
        self.push_points(points);
        self.append_cells(cells, cell_type, use_relative_index)
    }

    /// Append one axis-aligned voxel per min/max corner pair.
    ///
    /// `hex` selects the hexahedron winding and [`CellType::Hexahedron`]
    /// instead of the raw voxel order and [`CellType::Voxel`].
    pub fn append_voxels<I>(&mut self, corners: I, hex: bool, use_relative_index: bool) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: Components,
    {
        self.ensure_unstructured("append_voxels")?;
        let corners = collect_corners(corners)?;
        let (order, cell_type) = if hex {
            (&HEX_ORDER, CellType::Hexahedron)
        } else {
            (&VOXEL_ORDER, CellType::Voxel)
        };
        let (points, cells) = expand_boxes(&corners, &VOXEL_CORNERS, order);

        self.set_relative_index(None);
        self.push_points(points);
        self.append_cells(cells, cell_type, use_relative_index)
    }

    /// [`append_pixels`](Self::append_pixels) for a slice of boxes.
    pub fn append_pixel_boxes(&mut self, boxes: &[BBox3d], quad: bool, use_relative_index: bool) -> Result<&mut Self> {
        self.append_pixels(corner_pairs(boxes), quad, use_relative_index)
    }

    /// [`append_voxels`](Self::append_voxels) for a slice of boxes.
    pub fn append_voxel_boxes(&mut self, boxes: &[BBox3d], hex: bool, use_relative_index: bool) -> Result<&mut Self> {
        self.append_voxels(corner_pairs(boxes), hex, use_relative_index)
    }
}
