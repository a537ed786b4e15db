//! End-to-end checks of the difference operation on engraving-style inputs.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use mesh_boolean::{BooleanConfig, BooleanError, CleanupLevel, count_open_edges, difference_with_config};
use mesh_transform::{Transform3D, translate};
use mesh_types::{IndexedMesh, Point3, Vector3, cuboid, unit_cube};

fn plate() -> IndexedMesh {
    cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 4.0, 2.0))
}

/// Two separate blocks poking 0.5 into the plate's top face.
fn two_blocks() -> IndexedMesh {
    let mut blocks = cuboid(Point3::new(1.0, 1.0, 1.5), Point3::new(3.0, 3.0, 4.0));
    let mut second = cuboid(Point3::new(0.0, 0.0, 1.5), Point3::new(1.0, 2.0, 4.0));
    translate(&mut second, Vector3::new(6.0, 1.0, 0.0));
    blocks.merge(&second);
    blocks
}

#[test]
fn offset_cube_is_carved_out() {
    let mut b = unit_cube();
    translate(&mut b, Vector3::new(0.5, 0.5, 0.5));
    let result = difference_with_config(&unit_cube(), &b, &BooleanConfig::default()).unwrap();

    assert!((result.mesh.signed_volume() - 0.875).abs() < 1e-9);
    assert_eq!(result.stats.open_edges, 0);
    assert_eq!(count_open_edges(&result.mesh), 0);
}

#[test]
fn pockets_in_plate() {
    let result = difference_with_config(&plate(), &two_blocks(), &BooleanConfig::default()).unwrap();

    // 2x2x0.5 and 1x2x0.5 removed from an 80 unit plate.
    assert!((result.mesh.signed_volume() - 77.0).abs() < 1e-9);
    assert_eq!(result.stats.open_edges, 0);
    assert!(result.stats.meshes_intersected);

    let top = result
        .mesh
        .vertices
        .iter()
        .map(|v| v.position.z)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((top - 2.0).abs() < 1e-12);
}

#[test]
fn scaled_blocks_cut_like_glyphs() {
    let mut blocks = two_blocks();
    Transform3D::scale(0.5, 0.5, 1.0).apply_in_place(&mut blocks);
    let result = difference_with_config(&plate(), &blocks, &BooleanConfig::default()).unwrap();
    // Footprints shrink by a quarter, depth stays 0.5.
    assert!((result.mesh.signed_volume() - (80.0 - 0.75)).abs() < 1e-9);
    assert_eq!(result.stats.open_edges, 0);
}

#[test]
fn cleanup_levels_agree_on_volume() {
    for level in [CleanupLevel::None, CleanupLevel::Fast, CleanupLevel::Full] {
        let config = BooleanConfig::default().with_cleanup(level);
        let result = difference_with_config(&plate(), &two_blocks(), &config).unwrap();
        assert!((result.mesh.signed_volume() - 77.0).abs() < 1e-9, "{level:?}");
    }
}

#[test]
fn cad_preset_matches_default() {
    let default = difference_with_config(&plate(), &two_blocks(), &BooleanConfig::default()).unwrap();
    let cad = difference_with_config(&plate(), &two_blocks(), &BooleanConfig::for_cad()).unwrap();
    assert!((default.mesh.signed_volume() - cad.mesh.signed_volume()).abs() < 1e-9);
    assert_eq!(cad.stats.open_edges, 0);
}

#[test]
fn open_operand_is_rejected() {
    let mut open = two_blocks();
    open.faces.truncate(11);
    let err = difference_with_config(&plate(), &open, &BooleanConfig::default()).unwrap_err();
    match err {
        BooleanError::OpenMesh { mesh, open_edges } => {
            assert_eq!(mesh, "B");
            assert!(open_edges > 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}
