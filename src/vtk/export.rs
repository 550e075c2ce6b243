//! Ready-made dumps of common solver state.

use std::path::Path;

use crate::util::{BBox3d, DVec3, Result, UVec3};
use crate::vtk::format::{CellType, FieldDomain};
use crate::vtk::sources::{index_tuples, offset_indices, repeated};
use crate::vtk::writer::{VtkWriter, WriterOptions};

/// Write every solid cell of a voxel grid as a hexahedron.
///
/// `solid_bits` is a bitset over the `resolution` grid, x fastest: cell
/// `(x, y, z)` is bit `x + y * rx + z * rx * ry`. Cells are placed inside
/// `bbox`. Returns the number of voxels written.
pub fn write_grid_vtk(
    path: impl AsRef<Path>,
    solid_bits: &[u32],
    resolution: UVec3,
    bbox: impl Into<BBox3d>,
) -> Result<usize> {
    let bbox = bbox.into();
    let res = resolution.as_dvec3();
    let (rx, ry) = (resolution.x as usize, resolution.y as usize);

    let mut boxes = Vec::new();
    for x in 0..resolution.x {
        for y in 0..resolution.y {
            for z in 0..resolution.z {
                let off = x as usize + y as usize * rx + z as usize * rx * ry;
                let word = solid_bits.get(off / 32).copied().unwrap_or(0);
                if word & (1 << (off % 32)) == 0 {
                    continue;
                }
                let cell = UVec3::new(x, y, z).as_dvec3();
                boxes.push(BBox3d::new(
                    bbox.lerp(cell / res),
                    bbox.lerp((cell + DVec3::ONE) / res),
                ));
            }
        }
    }

    let mut writer = VtkWriter::<f32>::create(path, WriterOptions::unstructured("grid").binary())?;
    writer.append_voxel_boxes(&boxes, true, true)?;
    writer.finish()?;
    tracing::debug!(voxels = boxes.len(), "grid written");
    Ok(boxes.len())
}

/// Write boundary conditions: supports as vertices, loads as line segments.
///
/// Each load becomes a segment from its position to position + force. The
/// point field `type` tags supports `0`, load origins `1` and load tips `2`.
pub fn write_vert_vtk(
    path: impl AsRef<Path>,
    supports: &[DVec3],
    loads: &[DVec3],
    forces: &[DVec3],
) -> Result<()> {
    let num_supports = supports.len();
    let num_loads = loads.len().min(forces.len());

    let mut points = Vec::with_capacity(num_supports + 2 * num_loads);
    points.extend_from_slice(supports);
    for (pos, force) in loads.iter().zip(forces) {
        points.push(*pos);
        points.push(*pos + *force);
    }

    let mut types: Vec<f32> = repeated(0.0, num_supports).collect();
    for _ in 0..num_loads {
        types.extend([1.0, 2.0]);
    }

    let mut writer = VtkWriter::<f32>::create(path, WriterOptions::unstructured("vert").binary())?;
    writer
        .append_points(&points)?
        .append_cells(index_tuples::<1>(0..num_supports as i64, 1, 0), CellType::Vertex, false)?
        .append_cells(
            offset_indices(index_tuples::<2>(0..num_loads as i64, 2, 0), num_supports as i64),
            CellType::Line,
            false,
        )?
        .append_field_data("type", FieldDomain::Point, &types)?;
    writer.finish()?;
    Ok(())
}
