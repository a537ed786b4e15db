//! Piece classification against the other mesh.
//!
//! A piece is first tested for lying on the other mesh's surface (a
//! coplanar overlap). Otherwise its centroid is tested for containment by
//! casting three rays in skewed directions and taking the majority of the
//! crossing-count parities, which tolerates a single ray grazing an edge.

use mesh_types::{IndexedMesh, MeshTopology, Point3, Vector3};
use rayon::prelude::*;

use crate::bvh::Bvh;
use crate::intersect::{point_in_triangle, ray_triangle_intersect};
use crate::predicates::SupportPlane;
use crate::split::Piece;

/// Where a piece sits relative to the other mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Inside the other solid.
    Inside,
    /// Outside the other solid.
    Outside,
    /// On the other surface, normals agreeing.
    SameSide,
    /// On the other surface, normals opposed.
    OppositeSide,
}

/// Ray directions, skewed so no ray runs along an axis-aligned face or edge.
const RAY_DIRECTIONS: [[f64; 3]; 3] = [
    [0.8137, 0.4521, 0.3653],
    [-0.3412, 0.8761, 0.3405],
    [0.2718, -0.3141, 0.9099],
];

/// Cosine above which two face normals count as parallel.
const PARALLEL_COSINE: f64 = 1.0 - 1e-9;

/// Classify every piece of `mesh` against `other`.
///
/// The piece normal is taken from its source face in `mesh`.
#[must_use]
pub fn classify_pieces(
    pieces: &[Piece],
    mesh: &IndexedMesh,
    other: &IndexedMesh,
    other_bvh: &Bvh,
    tolerance: f64,
    parallel: bool,
) -> Vec<Relation> {
    let classify_one = |piece: &Piece| -> Relation {
        let normal = mesh
            .triangle(piece.source_face as usize)
            .and_then(|t| t.normal())
            .unwrap_or_else(Vector3::zeros);
        classify_point(&piece.centroid(), &normal, other, other_bvh, tolerance)
    };

    if parallel {
        pieces.par_iter().map(classify_one).collect()
    } else {
        pieces.iter().map(classify_one).collect()
    }
}

/// Classify a point carrying a surface normal against `mesh`.
#[must_use]
pub fn classify_point(
    point: &Point3<f64>,
    normal: &Vector3<f64>,
    mesh: &IndexedMesh,
    bvh: &Bvh,
    tolerance: f64,
) -> Relation {
    if let Some(relation) = surface_contact(point, normal, mesh, bvh, tolerance) {
        return relation;
    }
    if point_in_mesh(point, mesh, bvh, tolerance) {
        Relation::Inside
    } else {
        Relation::Outside
    }
}

fn surface_contact(
    point: &Point3<f64>,
    normal: &Vector3<f64>,
    mesh: &IndexedMesh,
    bvh: &Bvh,
    tolerance: f64,
) -> Option<Relation> {
    for face_index in bvh.query_point(point, tolerance) {
        let Some(tri) = mesh.triangle(face_index as usize) else {
            continue;
        };
        let Some(plane) = SupportPlane::from_triangle(tri.v0, tri.v1, tri.v2) else {
            continue;
        };
        if plane.signed_distance(point).abs() > tolerance {
            continue;
        }
        let cosine = plane.unit_normal().dot(normal);
        if cosine.abs() < PARALLEL_COSINE {
            continue;
        }
        if point_in_triangle(point, &tri.v0, &tri.v1, &tri.v2, tolerance) {
            return Some(if cosine > 0.0 {
                Relation::SameSide
            } else {
                Relation::OppositeSide
            });
        }
    }
    None
}

/// Containment test by majority vote over three ray parities.
#[must_use]
pub fn point_in_mesh(point: &Point3<f64>, mesh: &IndexedMesh, bvh: &Bvh, tolerance: f64) -> bool {
    let votes = RAY_DIRECTIONS
        .iter()
        .filter(|d| {
            let direction = Vector3::new(d[0], d[1], d[2]);
            count_crossings(point, &direction, mesh, bvh, tolerance) % 2 == 1
        })
        .count();
    votes >= 2
}

fn count_crossings(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    mesh: &IndexedMesh,
    bvh: &Bvh,
    tolerance: f64,
) -> usize {
    bvh.query_ray(origin, direction, tolerance)
        .into_iter()
        .filter_map(|i| mesh.triangle(i as usize))
        .filter(|t| ray_triangle_intersect(origin, direction, &t.v0, &t.v1, &t.v2, tolerance).is_some())
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use mesh_types::{Point3, cuboid, unit_cube};
    use smallvec::SmallVec;

    fn cube_bvh() -> (IndexedMesh, Bvh) {
        let cube = unit_cube();
        let bvh = Bvh::build(&cube, 2);
        (cube, bvh)
    }

    #[test]
    fn inside_and_outside() {
        let (cube, bvh) = cube_bvh();
        assert!(point_in_mesh(&Point3::new(0.5, 0.5, 0.5), &cube, &bvh, 1e-9));
        assert!(point_in_mesh(&Point3::new(0.01, 0.99, 0.5), &cube, &bvh, 1e-9));
        assert!(!point_in_mesh(&Point3::new(1.5, 0.5, 0.5), &cube, &bvh, 1e-9));
        assert!(!point_in_mesh(&Point3::new(-0.5, -0.5, -0.5), &cube, &bvh, 1e-9));
    }

    #[test]
    fn surface_points_report_orientation() {
        let (cube, bvh) = cube_bvh();
        let on_top = Point3::new(0.3, 0.6, 1.0);
        assert_eq!(
            classify_point(&on_top, &Vector3::z(), &cube, &bvh, 1e-9),
            Relation::SameSide
        );
        assert_eq!(
            classify_point(&on_top, &-Vector3::z(), &cube, &bvh, 1e-9),
            Relation::OppositeSide
        );
        // On the surface but crossing it: not a coplanar contact.
        assert_eq!(
            classify_point(&on_top, &Vector3::x(), &cube, &bvh, 1e-9),
            Relation::Outside
        );
    }

    #[test]
    fn pieces_use_source_face_normals() {
        let big = cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(2.0, 2.0, 2.0));
        let (cube, bvh) = cube_bvh();
        let pieces: Vec<Piece> = (0..big.faces.len() as u32)
            .map(|i| {
                let t = big.triangle(i as usize).unwrap();
                Piece {
                    points: SmallVec::from_slice(&t.vertices()),
                    source_face: i,
                }
            })
            .collect();
        let relations = classify_pieces(&pieces, &big, &cube, &bvh, 1e-9, false);
        assert!(relations.iter().all(|&r| r == Relation::Outside));

        let inner: Vec<Piece> = (0..cube.faces.len() as u32)
            .map(|i| {
                let t = cube.triangle(i as usize).unwrap();
                Piece {
                    points: SmallVec::from_slice(&t.vertices()),
                    source_face: i,
                }
            })
            .collect();
        let big_bvh = Bvh::build(&big, 4);
        let relations = classify_pieces(&inner, &cube, &big, &big_bvh, 1e-9, true);
        assert!(relations.iter().all(|&r| r == Relation::Inside));
    }
}
