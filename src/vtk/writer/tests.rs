use byteorder::{BigEndian, ByteOrder};

use super::*;
use crate::util::{BBox3d, DVec3, UVec3, Vec3};
use crate::vtk::format::CellType;

fn ascii(name: &str) -> WriterOptions {
    WriterOptions::unstructured(name)
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_single_line() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("line")).unwrap();
    w.append_points([[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0]])
        .unwrap()
        .append_cells([[0i32, 1]], CellType::Line, false)
        .unwrap();
    assert_eq!(w.cell_index_word_count(), 3);

    let out = text(w.finish().unwrap());
    assert_eq!(
        out,
        "# vtk DataFile Version 1.0\nline\nASCII\nDATASET UNSTRUCTURED_GRID\n\
         POINTS 2 float\n0 0 0\n1 0 0\n\
         CELLS 1 3\n2 0 1\n\
         CELL_TYPES 1\n3\n"
    );
}

#[test]
fn test_voxel_hex_offsets() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("vox")).unwrap();
    w.append_points([Vec3::ZERO, Vec3::ONE]).unwrap();
    w.append_voxels([DVec3::ZERO, DVec3::ONE], true, true).unwrap();
    assert_eq!(w.point_count(), 10);
    assert_eq!(w.cell_count(), 1);
    assert_eq!(w.cell_index_word_count(), 9);
    assert_eq!(w.relative_index_base(), 2);

    let out = text(w.finish().unwrap());
    assert!(out.contains("CELLS 1 9\n8 2 3 5 4 6 7 9 8\n"));
    assert!(out.contains("CELL_TYPES 1\n12\n"));
}

#[test]
fn test_pixels_without_relative_index() {
    let mut w = VtkWriter::<f64, _>::new(Vec::new(), ascii("px")).unwrap();
    w.append_pixel_boxes(&[BBox3d::UNIT], false, false).unwrap();
    let out = text(w.finish().unwrap());
    assert!(out.contains("POINTS 4 double\n0 0 0\n1 0 0\n0 1 0\n1 1 0\n"));
    assert!(out.contains("CELLS 1 5\n4 0 1 2 3\n"));
    assert!(out.contains("CELL_TYPES 1\n8\n"));
}

#[test]
fn test_word_count_mixed() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("mix")).unwrap();
    w.append_points(vec![[0.0f32, 0.0]; 5]).unwrap();
    w.append_cells([[0i32, 1, 2]], CellType::Triangle, false)
        .unwrap()
        .append_cells([vec![0i64, 1, 2, 3, 4]], CellType::PolyLine, false)
        .unwrap()
        .append_cells([[4usize]], CellType::Vertex, false)
        .unwrap();
    assert_eq!(w.cell_count(), 3);
    assert_eq!(w.cell_index_word_count(), 4 + 6 + 2);
    w.finish().unwrap();
}

#[test]
fn test_long_tuple_truncated() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("trunc")).unwrap();
    w.append_points(vec![[0.0f32; 3]; 4]).unwrap();
    w.append_cells([[0i32, 1, 2, 3]], CellType::Line, false).unwrap();
    let out = text(w.finish().unwrap());
    assert!(out.contains("CELLS 1 3\n2 0 1\n"));
}

#[test]
fn test_short_tuple_rejected() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("short")).unwrap();
    w.append_points(vec![[0.0f32; 3]; 4]).unwrap();
    let err = w.append_cells([[0i32, 1]], CellType::Triangle, false).unwrap_err();
    assert!(matches!(err, Error::ShortCell { expected: 3, actual: 2, .. }));
    assert_eq!(w.cell_count(), 0);
    w.finish().unwrap();
}

#[test]
fn test_index_past_points_fails() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("oob")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();
    w.append_cells([[0i32, 5]], CellType::Line, false).unwrap();
    let err = w.finish().unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 5, point_count: 1 }));
}

#[test]
fn test_negative_index_rejected() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("neg")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();
    assert!(matches!(
        w.append_cells([[-1i32]], CellType::Vertex, false),
        Err(Error::IndexOutOfRange { index: -1, .. })
    ));
    w.finish().unwrap();
}

#[test]
fn test_field_accumulates_under_one_header() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("acc")).unwrap();
    w.append_points(vec![[0.0f32; 3]; 2]).unwrap();
    w.append_cells([[0i32], [1]], CellType::Vertex, false).unwrap();
    w.append_field_data("id", FieldDomain::Cell, [1, 2]).unwrap();
    w.append_field_data("mass", FieldDomain::Point, [0.5f64, 1.5]).unwrap();
    assert_eq!(w.field_len("id", FieldDomain::Cell), Some(2));

    w.append_points([[2.0f32; 3]]).unwrap();
    w.append_cells([[2i32]], CellType::Vertex, false).unwrap();
    w.append_field_data("id", FieldDomain::Cell, [3]).unwrap();
    w.append_field_data("mass", FieldDomain::Point, [2.5f32]).unwrap();

    let out = text(w.finish().unwrap());
    assert_eq!(out.matches("SCALARS id float").count(), 1);
    assert!(out.contains("CELL_DATA 3\nSCALARS id float\nLOOKUP_TABLE default\n1\n2\n3\n"));
    assert!(out.contains("POINT_DATA 3\nSCALARS mass float\nLOOKUP_TABLE default\n0.5\n1.5\n2.5\n"));
}

#[test]
fn test_fields_keep_registration_order() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("order")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();
    w.append_field_data("zeta", FieldDomain::Point, [1]).unwrap();
    w.append_field_data("alpha", FieldDomain::Point, [2]).unwrap();
    let out = text(w.finish().unwrap());
    let zeta = out.find("SCALARS zeta").unwrap();
    let alpha = out.find("SCALARS alpha").unwrap();
    assert!(zeta < alpha);
}

#[test]
fn test_field_count_mismatch_poisons() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("bad")).unwrap();
    w.append_points(vec![[0.0f32; 3]; 3]).unwrap();
    let err = w.append_field_data("t", FieldDomain::Point, [1, 2]).unwrap_err();
    assert!(matches!(err, Error::FieldCountMismatch { count: 2, expected: 3, .. }));
    assert!(matches!(w.state(), WriterState::Poisoned(_)));
    assert!(matches!(w.append_points([[0.0f32; 3]]), Err(Error::Poisoned(_))));
    assert!(matches!(w.finish(), Err(Error::Poisoned(_))));
}

#[test]
fn test_group_count_checked_at_finish() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("grp")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();
    w.append_field_data("a", FieldDomain::Point, [1]).unwrap();
    w.append_points([[1.0f32; 3]]).unwrap();
    assert!(matches!(
        w.finish(),
        Err(Error::GroupCountMismatch { count: 1, declared: 2, .. })
    ));
}

#[test]
fn test_shape_reuse_rejected() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("shape")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();
    w.append_field_data("v", FieldDomain::Point, [1]).unwrap();
    assert!(matches!(
        w.append_vector_field_data("v", FieldDomain::Point, [Vec3::X]),
        Err(Error::FieldShapeMismatch { .. })
    ));
    assert!(matches!(
        w.append_field_data("two words", FieldDomain::Point, [1]),
        Err(Error::InvalidFieldName(_))
    ));
    w.finish().unwrap();
}

#[test]
fn test_vector_and_color_text() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("vc")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();
    w.append_vector_field_data("vel", FieldDomain::Point, [[1.0f32, 2.0]]).unwrap();
    w.append_color_field_data("rgb", FieldDomain::Point, [[0.5f32, 0.25, 1.0]]).unwrap();
    let out = text(w.finish().unwrap());
    assert!(out.contains("VECTORS vel float\n1 2 0\n"));
    assert!(out.contains("COLOR_SCALARS rgb 4\n0.5 0.25 1 1\n"));
}

#[test]
fn test_binary_sections_big_endian() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("bin").binary()).unwrap();
    w.append_points([[1.5f32, -2.0, 3.0]]).unwrap();
    w.append_cells([[0i32]], CellType::Vertex, false).unwrap();
    w.append_color_field_data("c", FieldDomain::Cell, [[1.0f32, 0.0, 1.0]]).unwrap();
    let out = w.finish().unwrap();

    let header = b"# vtk DataFile Version 1.0\nbin\nBINARY\nDATASET UNSTRUCTURED_GRID\nPOINTS 1 float\n";
    assert!(out.starts_with(header));
    let body = &out[header.len()..];
    assert_eq!(BigEndian::read_f32(&body[0..4]), 1.5);
    assert_eq!(BigEndian::read_f32(&body[4..8]), -2.0);
    assert_eq!(BigEndian::read_f32(&body[8..12]), 3.0);
    assert_eq!(body[12], b'\n');

    let rest = &body[13..];
    let cells = b"CELLS 1 2\n";
    assert!(rest.starts_with(cells));
    let words = &rest[cells.len()..];
    assert_eq!(BigEndian::read_i32(&words[0..4]), 1);
    assert_eq!(BigEndian::read_i32(&words[4..8]), 0);

    let tail = b"CELL_DATA 1\nCOLOR_SCALARS c 4\n\xff\x00\xff\xff\n";
    assert!(out.ends_with(tail));
}

#[test]
fn test_structured_points() {
    let options = WriterOptions::structured("grid", BBox3d::UNIT, UVec3::splat(1), false);
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), options).unwrap();
    w.append_default_field(0..8).unwrap();
    w.append_field_data("w", FieldDomain::Point, vec![1.0f32; 8]).unwrap();
    let out = text(w.finish().unwrap());
    assert!(out.starts_with(
        "# vtk DataFile Version 1.0\ngrid\nASCII\nDATASET STRUCTURED_POINTS\n\
         DIMENSIONS 2 2 2\nORIGIN 0 0 0\nSPACING 1 1 1\nPOINT_DATA 8\n\
         SCALARS w float\nLOOKUP_TABLE default\n"
    ));
    assert!(out.ends_with("SCALARS data float\nLOOKUP_TABLE default\n0\n1\n2\n3\n4\n5\n6\n7\n"));
}

#[test]
fn test_structured_needs_one_default_field() {
    let options = WriterOptions::structured("g", BBox3d::UNIT, UVec3::ONE, true);
    let w = VtkWriter::<f32, _>::new(Vec::new(), options.clone()).unwrap();
    assert!(matches!(w.finish(), Err(Error::DefaultFieldCount(0))));

    let mut w = VtkWriter::<f32, _>::new(Vec::new(), options).unwrap();
    w.append_default_field([1]).unwrap().append_default_field([2]).unwrap();
    assert!(matches!(w.finish(), Err(Error::DefaultFieldCount(2))));
}

#[test]
fn test_dataset_mismatch() {
    let options = WriterOptions::structured("g", BBox3d::UNIT, UVec3::ONE, true);
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), options).unwrap();
    assert!(matches!(w.append_points([[0.0f32; 3]]), Err(Error::DatasetMismatch { .. })));
    assert!(matches!(
        w.append_field_data("c", FieldDomain::Cell, [1]),
        Err(Error::DatasetMismatch { .. })
    ));
    w.append_default_field([1]).unwrap();
    w.finish().unwrap();

    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("u")).unwrap();
    assert!(matches!(w.append_default_field([1]), Err(Error::DatasetMismatch { .. })));
    w.finish().unwrap();
}

#[test]
fn test_invalid_options() {
    assert!(matches!(
        VtkWriter::<f32, _>::new(Vec::new(), ascii("two\nlines")),
        Err(Error::InvalidName(_))
    ));
    let options = WriterOptions::structured("g", BBox3d::UNIT, UVec3::new(1, 0, 1), false);
    assert!(matches!(
        VtkWriter::<f32, _>::new(Vec::new(), options),
        Err(Error::InvalidDimensions([1, 0, 1]))
    ));
}

#[test]
fn test_drop_finalizes() {
    // Dropping an unfinished writer writes the file.
    let temp = tempfile::NamedTempFile::new().unwrap();
    {
        let mut w = VtkWriter::<f32>::create(temp.path(), ascii("drop")).unwrap();
        w.append_points([[0.0f32; 3]]).unwrap();
    }
    let out = std::fs::read_to_string(temp.path()).unwrap();
    assert!(out.ends_with("POINTS 1 float\n0 0 0\nCELLS 0 0\nCELL_TYPES 0\n"));
}

#[test]
fn test_debug_summary() {
    let mut w = VtkWriter::<f64, _>::new(Vec::new(), ascii("dbg")).unwrap();
    w.append_points([[0.0f64; 3]; 2]).unwrap();
    let summary = format!("{w:?}");
    assert!(summary.starts_with("VtkWriter"));
    assert!(summary.contains("precision: \"double\""));
    assert!(summary.contains("points: 2"));
    w.finish().unwrap();
}

#[test]
fn test_explicit_and_current_relative_index() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("rel")).unwrap();
    w.append_points(vec![[0.0f32; 3]; 3]).unwrap();
    w.set_relative_index(Some(1))
        .append_cells([[0i32, 1]], CellType::Line, true)
        .unwrap();
    assert_eq!(w.relative_index_base(), 1);

    w.set_relative_index(None);
    assert_eq!(w.relative_index_base(), 3);
    w.append_points(vec![[1.0f32; 3]; 2])
        .unwrap()
        .append_cells([[0i32, 1]], CellType::Line, true)
        .unwrap();

    // Without the flag the base is ignored.
    w.append_cells([[0i32]], CellType::Vertex, false).unwrap();

    let out = text(w.finish().unwrap());
    assert!(out.contains("CELLS 3 8\n2 1 2\n2 3 4\n1 0\n"));
}

#[test]
fn test_relative_base_overflow_rejected() {
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), ascii("ovf")).unwrap();
    w.append_points([[0.0f32; 3]]).unwrap();

    w.set_relative_index(Some(usize::MAX));
    assert!(matches!(
        w.append_cells([[0i32]], CellType::Vertex, true),
        Err(Error::IndexOutOfRange { index: i64::MAX, .. })
    ));

    w.set_relative_index(Some(i64::MAX as usize));
    assert!(matches!(
        w.append_cells([[1i32]], CellType::Vertex, true),
        Err(Error::IndexOutOfRange { index: i64::MAX, .. })
    ));
    assert_eq!(w.cell_count(), 0);

    w.set_relative_index(Some(0));
    w.finish().unwrap();
}

const ABORT_CASE_VAR: &str = "VTK_LEGACY_DROP_ABORT_CASE";

/// Re-run `test` in a child process with `case` set and return its exit status.
fn run_child(test: &str, case: &str) -> std::process::ExitStatus {
    let exe = std::env::current_exe().unwrap();
    std::process::Command::new(exe)
        .args(["--exact", test, "--test-threads=1", "--nocapture"])
        .env(ABORT_CASE_VAR, case)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .unwrap()
}

#[test]
fn test_drop_aborts_on_default_field_count() {
    if let Ok(case) = std::env::var(ABORT_CASE_VAR) {
        let options = WriterOptions::structured("g", BBox3d::UNIT, UVec3::ONE, true);
        let mut w = VtkWriter::<f32, _>::new(Vec::new(), options).unwrap();
        if case == "two" {
            w.append_default_field([1]).unwrap().append_default_field([2]).unwrap();
        }
        drop(w);
        unreachable!("dropping the writer must abort");
    }

    for case in ["none", "two"] {
        let status = run_child("vtk::writer::tests::test_drop_aborts_on_default_field_count", case);
        assert!(!status.success(), "case {case}: child exited with {status}");
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            assert_eq!(status.signal(), Some(6), "case {case}: expected SIGABRT");
        }
    }
}

#[test]
fn test_drop_with_one_default_field_exits_cleanly() {
    let options = WriterOptions::structured("g", BBox3d::UNIT, UVec3::ONE, true);
    let mut w = VtkWriter::<f32, _>::new(Vec::new(), options).unwrap();
    w.append_default_field([1]).unwrap();
    drop(w);
}
