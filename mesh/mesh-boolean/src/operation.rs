//! Core boolean operations: union, intersection, and difference.
//!
//! Both meshes are split against each other, every piece is classified
//! against the other solid, and the pieces the operation keeps are
//! reassembled into one mesh.

use mesh_types::{IndexedMesh, MeshBounds};
use tracing::{debug, warn};

use crate::bvh::Bvh;
use crate::classify::{Relation, classify_pieces};
use crate::cleanup::{Origin, OutputPolygon, reconstruct};
use crate::config::{BooleanConfig, BooleanOp};
use crate::error::BooleanResult;
use crate::split::{SplitMesh, split_mesh};
use crate::validate::{check_structure, count_open_edges, validate_solid};

/// Statistics from a boolean operation.
#[derive(Debug, Clone, Default)]
pub struct BooleanStats {
    /// Triangles from mesh A in the result.
    pub faces_from_a: usize,
    /// Triangles from mesh B in the result.
    pub faces_from_b: usize,
    /// Pieces produced by cutting one polygon in two.
    pub pieces_cut: usize,
    /// Vertices inserted into edges during cleanup.
    pub t_junctions_repaired: usize,
    /// Unmatched edges left in the result; zero for a closed solid.
    pub open_edges: usize,
    /// Whether the surfaces crossed or touched at all.
    pub meshes_intersected: bool,
}

/// Result of a boolean operation.
#[derive(Debug)]
pub struct BooleanOperationResult {
    /// The resulting mesh.
    pub mesh: IndexedMesh,
    /// Statistics about the operation.
    pub stats: BooleanStats,
}

/// Perform a boolean operation on two meshes.
///
/// # Arguments
///
/// * `mesh_a` - First mesh (the "base" for difference operations)
/// * `mesh_b` - Second mesh (subtracted in difference operations)
/// * `operation` - The boolean operation to perform
/// * `config` - Configuration controlling tolerances and cleanup
///
/// # Errors
///
/// Returns `BooleanError` if:
/// - Either mesh is empty or has an out-of-range face index
/// - Validation is enabled and either mesh is open or degenerate
///
/// # Example
///
/// ```ignore
/// use mesh_boolean::{boolean_operation, BooleanOp, BooleanConfig};
///
/// let result = boolean_operation(&mesh_a, &mesh_b, BooleanOp::Difference, &BooleanConfig::default())?;
/// assert_eq!(result.stats.open_edges, 0);
/// ```
pub fn boolean_operation(
    mesh_a: &IndexedMesh,
    mesh_b: &IndexedMesh,
    operation: BooleanOp,
    config: &BooleanConfig,
) -> BooleanResult<BooleanOperationResult> {
    check_structure(mesh_a, "A")?;
    check_structure(mesh_b, "B")?;
    if config.validate_inputs {
        validate_solid(mesh_a, "A")?;
        validate_solid(mesh_b, "B")?;
    }

    debug!(
        %operation,
        faces_a = mesh_a.faces.len(),
        faces_b = mesh_b.faces.len(),
        "boolean operation"
    );

    if !mesh_a.bounds().intersects(&mesh_b.bounds()) {
        debug!("bounding boxes are disjoint");
        return Ok(handle_disjoint(mesh_a, mesh_b, operation));
    }

    let bvh_a = Bvh::build(mesh_a, config.bvh_leaf_size);
    let bvh_b = Bvh::build(mesh_b, config.bvh_leaf_size);

    let split_a = split_mesh(mesh_a, mesh_b, &bvh_b, config.plane_tolerance, config.parallel);
    let split_b = split_mesh(mesh_b, mesh_a, &bvh_a, config.plane_tolerance, config.parallel);
    debug!(
        pieces_a = split_a.pieces.len(),
        pieces_b = split_b.pieces.len(),
        coplanar_pairs = split_a.coplanar_pairs + split_b.coplanar_pairs,
        "split complete"
    );

    let relations_a = classify_pieces(
        &split_a.pieces,
        mesh_a,
        mesh_b,
        &bvh_b,
        config.classification_tolerance,
        config.parallel,
    );
    let relations_b = classify_pieces(
        &split_b.pieces,
        mesh_b,
        mesh_a,
        &bvh_a,
        config.classification_tolerance,
        config.parallel,
    );

    let touching = relations_a
        .iter()
        .chain(&relations_b)
        .any(|r| matches!(r, Relation::SameSide | Relation::OppositeSide));

    let mut polygons = Vec::with_capacity(split_a.pieces.len() + split_b.pieces.len());
    select(&mut polygons, &split_a, &relations_a, Origin::A, operation);
    select(&mut polygons, &split_b, &relations_b, Origin::B, operation);

    let rebuilt = reconstruct(&polygons, config.cleanup, config.vertex_weld_tolerance);
    let open_edges = count_open_edges(&rebuilt.mesh);
    if open_edges > 0 {
        warn!(open_edges, %operation, "boolean result is not closed");
    }

    let stats = BooleanStats {
        faces_from_a: rebuilt.faces_from_a,
        faces_from_b: rebuilt.faces_from_b,
        pieces_cut: split_a.cuts + split_b.cuts,
        t_junctions_repaired: rebuilt.t_junctions_repaired,
        open_edges,
        meshes_intersected: split_a.cuts + split_b.cuts > 0 || touching,
    };
    debug!(
        faces = rebuilt.mesh.faces.len(),
        pieces_cut = stats.pieces_cut,
        t_junctions = stats.t_junctions_repaired,
        "boolean operation complete"
    );

    Ok(BooleanOperationResult {
        mesh: rebuilt.mesh,
        stats,
    })
}

/// Whether a piece survives, and whether its winding flips.
fn keep(operation: BooleanOp, origin: Origin, relation: Relation) -> Option<bool> {
    use Relation::{Inside, OppositeSide, Outside, SameSide};
    let kept = match (operation, origin) {
        (BooleanOp::Union, Origin::A) => matches!(relation, Outside | SameSide),
        (BooleanOp::Union, Origin::B) => relation == Outside,
        (BooleanOp::Difference, Origin::A) => matches!(relation, Outside | OppositeSide),
        (BooleanOp::Difference, Origin::B) => relation == Inside,
        (BooleanOp::Intersection, Origin::A) => matches!(relation, Inside | SameSide),
        (BooleanOp::Intersection, Origin::B) => relation == Inside,
    };
    let reversed = operation == BooleanOp::Difference && origin == Origin::B;
    kept.then_some(reversed)
}

fn select(
    polygons: &mut Vec<OutputPolygon>,
    split: &SplitMesh,
    relations: &[Relation],
    origin: Origin,
    operation: BooleanOp,
) {
    for (piece, &relation) in split.pieces.iter().zip(relations) {
        if let Some(reversed) = keep(operation, origin, relation) {
            let mut points = piece.points.clone();
            if reversed {
                points.reverse();
            }
            polygons.push(OutputPolygon { points, origin });
        }
    }
}

/// Result when the bounding boxes do not overlap.
fn handle_disjoint(mesh_a: &IndexedMesh, mesh_b: &IndexedMesh, operation: BooleanOp) -> BooleanOperationResult {
    let (mesh, faces_from_a, faces_from_b) = match operation {
        BooleanOp::Union => {
            let mut merged = mesh_a.clone();
            merged.merge(mesh_b);
            (merged, mesh_a.faces.len(), mesh_b.faces.len())
        }
        BooleanOp::Difference => (mesh_a.clone(), mesh_a.faces.len(), 0),
        BooleanOp::Intersection => (IndexedMesh::new(), 0, 0),
    };
    let open_edges = count_open_edges(&mesh);
    BooleanOperationResult {
        mesh,
        stats: BooleanStats {
            faces_from_a,
            faces_from_b,
            open_edges,
            ..BooleanStats::default()
        },
    }
}

/// Convenience function for union operation.
///
/// # Errors
///
/// Returns `BooleanError` if either mesh is invalid.
pub fn union(mesh_a: &IndexedMesh, mesh_b: &IndexedMesh) -> BooleanResult<IndexedMesh> {
    let result = boolean_operation(mesh_a, mesh_b, BooleanOp::Union, &BooleanConfig::default())?;
    Ok(result.mesh)
}

/// Convenience function for union with custom config.
///
/// # Errors
///
/// Returns `BooleanError` if either mesh is invalid.
pub fn union_with_config(
    mesh_a: &IndexedMesh,
    mesh_b: &IndexedMesh,
    config: &BooleanConfig,
) -> BooleanResult<BooleanOperationResult> {
    boolean_operation(mesh_a, mesh_b, BooleanOp::Union, config)
}

/// Convenience function for difference operation.
///
/// # Example
///
/// ```ignore
/// use mesh_boolean::difference;
///
/// let engraved = difference(&plate, &lettering)?;
/// ```
///
/// # Errors
///
/// Returns `BooleanError` if either mesh is invalid.
pub fn difference(mesh_a: &IndexedMesh, mesh_b: &IndexedMesh) -> BooleanResult<IndexedMesh> {
    let result = boolean_operation(mesh_a, mesh_b, BooleanOp::Difference, &BooleanConfig::default())?;
    Ok(result.mesh)
}

/// Convenience function for difference with custom config.
///
/// # Errors
///
/// Returns `BooleanError` if either mesh is invalid.
pub fn difference_with_config(
    mesh_a: &IndexedMesh,
    mesh_b: &IndexedMesh,
    config: &BooleanConfig,
) -> BooleanResult<BooleanOperationResult> {
    boolean_operation(mesh_a, mesh_b, BooleanOp::Difference, config)
}

/// Convenience function for intersection operation.
///
/// # Errors
///
/// Returns `BooleanError` if either mesh is invalid.
pub fn intersection(mesh_a: &IndexedMesh, mesh_b: &IndexedMesh) -> BooleanResult<IndexedMesh> {
    let result = boolean_operation(mesh_a, mesh_b, BooleanOp::Intersection, &BooleanConfig::default())?;
    Ok(result.mesh)
}

/// Convenience function for intersection with custom config.
///
/// # Errors
///
/// Returns `BooleanError` if either mesh is invalid.
pub fn intersection_with_config(
    mesh_a: &IndexedMesh,
    mesh_b: &IndexedMesh,
    config: &BooleanConfig,
) -> BooleanResult<BooleanOperationResult> {
    boolean_operation(mesh_a, mesh_b, BooleanOp::Intersection, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::CleanupLevel;
    use crate::error::BooleanError;
    use mesh_types::{Point3, cuboid, unit_cube};

    fn offset_cube(d: f64) -> IndexedMesh {
        cuboid(Point3::new(d, d, d), Point3::new(1.0 + d, 1.0 + d, 1.0 + d))
    }

    #[test]
    fn keep_table() {
        assert_eq!(keep(BooleanOp::Difference, Origin::A, Relation::Outside), Some(false));
        assert_eq!(keep(BooleanOp::Difference, Origin::A, Relation::SameSide), None);
        assert_eq!(keep(BooleanOp::Difference, Origin::A, Relation::OppositeSide), Some(false));
        assert_eq!(keep(BooleanOp::Difference, Origin::B, Relation::Inside), Some(true));
        assert_eq!(keep(BooleanOp::Union, Origin::B, Relation::SameSide), None);
        assert_eq!(keep(BooleanOp::Intersection, Origin::A, Relation::SameSide), Some(false));
        assert_eq!(keep(BooleanOp::Intersection, Origin::B, Relation::Outside), None);
    }

    #[test]
    fn difference_of_overlapping_cubes() {
        let result = difference_with_config(&unit_cube(), &offset_cube(0.5), &BooleanConfig::default()).unwrap();
        assert!((result.mesh.signed_volume() - 0.875).abs() < 1e-9);
        assert_eq!(result.stats.open_edges, 0);
        assert!(result.stats.meshes_intersected);
        assert!(result.stats.pieces_cut > 0);
        assert!(result.stats.faces_from_b > 0);
    }

    #[test]
    fn union_and_intersection_volumes() {
        let a = unit_cube();
        let b = offset_cube(0.5);
        let union = union_with_config(&a, &b, &BooleanConfig::default()).unwrap();
        assert!((union.mesh.signed_volume() - 1.875).abs() < 1e-9);
        assert_eq!(union.stats.open_edges, 0);

        let common = intersection_with_config(&a, &b, &BooleanConfig::default()).unwrap();
        assert!((common.mesh.signed_volume() - 0.125).abs() < 1e-9);
        assert_eq!(common.stats.open_edges, 0);
    }

    #[test]
    fn serial_and_parallel_agree() {
        let a = unit_cube();
        let b = offset_cube(0.25);
        let serial = difference_with_config(&a, &b, &BooleanConfig::default().with_parallel(false)).unwrap();
        let parallel = difference_with_config(&a, &b, &BooleanConfig::default()).unwrap();
        assert_eq!(serial.mesh.faces.len(), parallel.mesh.faces.len());
        assert!((serial.mesh.signed_volume() - parallel.mesh.signed_volume()).abs() < 1e-12);
    }

    #[test]
    fn cubes_sharing_a_face_union_into_a_box() {
        let a = unit_cube();
        let b = cuboid(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
        let result = union_with_config(&a, &b, &BooleanConfig::default()).unwrap();
        assert!((result.mesh.signed_volume() - 2.0).abs() < 1e-9);
        assert_eq!(result.stats.open_edges, 0);
        assert!(result.stats.meshes_intersected);
    }

    #[test]
    fn contained_cube_leaves_a_cavity() {
        let outer = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 3.0, 3.0));
        let inner = cuboid(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        let result = difference_with_config(&outer, &inner, &BooleanConfig::default()).unwrap();
        assert!((result.mesh.signed_volume() - 26.0).abs() < 1e-9);
        assert_eq!(result.stats.faces_from_b, 12);
        assert!(!result.stats.meshes_intersected);
    }

    #[test]
    fn disjoint_shortcut() {
        let a = unit_cube();
        let b = offset_cube(5.0);

        let diff = difference_with_config(&a, &b, &BooleanConfig::default()).unwrap();
        assert_eq!(diff.mesh, a);
        assert!(!diff.stats.meshes_intersected);

        let merged = union(&a, &b).unwrap();
        assert_eq!(merged.faces.len(), 24);
        assert!((merged.signed_volume() - 2.0).abs() < 1e-12);

        assert!(intersection(&a, &b).unwrap().faces.is_empty());
    }

    #[test]
    fn empty_and_open_inputs() {
        let err = difference(&unit_cube(), &IndexedMesh::new()).unwrap_err();
        assert!(matches!(err, BooleanError::EmptyMesh { .. }));

        let mut open = offset_cube(0.5);
        open.faces.pop();
        let err = difference(&unit_cube(), &open).unwrap_err();
        assert!(matches!(err, BooleanError::OpenMesh { ref mesh, .. } if mesh == "B"));

        // Without validation the operation runs on whatever it is given.
        let config = BooleanConfig::default().with_validation(false);
        assert!(difference_with_config(&unit_cube(), &open, &config).is_ok());
    }

    #[test]
    fn bad_index_is_rejected_even_without_validation() {
        let mut broken = unit_cube();
        broken.faces[3] = [0, 1, 99];
        let config = BooleanConfig::default().with_validation(false);
        let err = union_with_config(&broken, &unit_cube(), &config).unwrap_err();
        assert!(matches!(err, BooleanError::InvalidIndex { face: 3, index: 99, .. }));
    }

    #[test]
    fn cleanup_none_skips_welding() {
        let config = BooleanConfig::default().with_cleanup(CleanupLevel::None);
        let result = difference_with_config(&unit_cube(), &offset_cube(0.5), &config).unwrap();
        assert_eq!(result.stats.t_junctions_repaired, 0);
        assert!((result.mesh.signed_volume() - 0.875).abs() < 1e-9);
    }
}
