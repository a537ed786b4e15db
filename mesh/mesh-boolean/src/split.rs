//! Splitting faces into convex pieces along the other mesh's surface.
//!
//! Each triangle starts as one piece. For every triangle of the other mesh
//! whose box overlaps it, pieces that strictly straddle that triangle's
//! support plane are cut in two (Sutherland-Hodgman). When the two
//! triangles are coplanar, the pieces are cut by the planes through the
//! other triangle's edges instead, so every piece ends up either covered by
//! or clear of the other triangle.
//!
//! Afterwards no piece crosses the other mesh's surface, and each piece can
//! be classified by its centroid alone.

use mesh_types::{Aabb, IndexedMesh, MeshTopology, Point3, Triangle, Vector3};
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::bvh::Bvh;
use crate::predicates::{Side, SupportPlane};

/// A convex planar polygon cut from one face of an input mesh.
///
/// Points are in the winding order of the source face.
#[derive(Debug, Clone)]
pub struct Piece {
    /// Polygon corners.
    pub points: SmallVec<[Point3<f64>; 8]>,
    /// Index of the face the piece was cut from.
    pub source_face: u32,
}

impl Piece {
    fn from_triangle(tri: &Triangle, source_face: u32) -> Self {
        Self {
            points: SmallVec::from_slice(&tri.vertices()),
            source_face,
        }
    }

    /// Average of the corners; strictly interior for a non-degenerate piece.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.points.len() as f64)
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.points.iter())
    }
}

/// Pieces of one mesh after splitting against another.
#[derive(Debug, Default)]
pub struct SplitMesh {
    /// All pieces, grouped by source face in face order.
    pub pieces: Vec<Piece>,
    /// Number of cuts that produced two non-empty parts.
    pub cuts: usize,
    /// Number of face pairs that were found coplanar.
    pub coplanar_pairs: usize,
}

/// Split every face of `mesh` against the faces of `other`.
///
/// `other_bvh` must be built over `other`. Zero-area faces yield no pieces.
#[must_use]
pub fn split_mesh(
    mesh: &IndexedMesh,
    other: &IndexedMesh,
    other_bvh: &Bvh,
    tolerance: f64,
    parallel: bool,
) -> SplitMesh {
    let split_one = |face_index: usize| -> FaceSplit {
        mesh.triangle(face_index).map_or_else(FaceSplit::default, |tri| {
            split_face(&tri, face_index as u32, other, other_bvh, tolerance)
        })
    };

    let per_face: Vec<FaceSplit> = if parallel {
        (0..mesh.face_count()).into_par_iter().map(split_one).collect()
    } else {
        (0..mesh.face_count()).map(split_one).collect()
    };

    let mut result = SplitMesh::default();
    for face in per_face {
        result.cuts += face.cuts;
        result.coplanar_pairs += face.coplanar_pairs;
        result.pieces.extend(face.pieces);
    }
    result
}

#[derive(Default)]
struct FaceSplit {
    pieces: Vec<Piece>,
    cuts: usize,
    coplanar_pairs: usize,
}

fn split_face(
    tri: &Triangle,
    face_index: u32,
    other: &IndexedMesh,
    other_bvh: &Bvh,
    tolerance: f64,
) -> FaceSplit {
    let mut out = FaceSplit::default();
    let Some(own_plane) = SupportPlane::from_triangle(tri.v0, tri.v1, tri.v2) else {
        return out;
    };
    out.pieces.push(Piece::from_triangle(tri, face_index));

    let mut candidates = other_bvh.query(&tri.bounds(), tolerance);
    // Deterministic cut order whatever the traversal order.
    candidates.sort_unstable();

    for other_index in candidates {
        let Some(other_tri) = other.triangle(other_index as usize) else {
            continue;
        };
        let Some(other_plane) = SupportPlane::from_triangle(other_tri.v0, other_tri.v1, other_tri.v2)
        else {
            continue;
        };

        let ours = sides(&other_plane, tri.vertices(), tolerance);
        if ours.iter().all(|&s| s == Side::On) {
            out.coplanar_pairs += 1;
            for plane in edge_planes(&other_tri, &own_plane) {
                out.cuts += cut_pieces(&mut out.pieces, &plane, &other_tri.bounds(), tolerance);
            }
            continue;
        }
        if !straddles(&ours) {
            continue;
        }
        let theirs = sides(&own_plane, other_tri.vertices(), tolerance);
        if !touches_across(&theirs) {
            continue;
        }
        out.cuts += cut_pieces(&mut out.pieces, &other_plane, &other_tri.bounds(), tolerance);
    }
    out
}

fn sides(plane: &SupportPlane, points: [Point3<f64>; 3], tolerance: f64) -> [Side; 3] {
    points.map(|p| plane.side(&p, tolerance))
}

/// Points on both strict sides.
fn straddles(sides: &[Side]) -> bool {
    sides.contains(&Side::Above) && sides.contains(&Side::Below)
}

/// The other triangle reaches our plane along more than a single point:
/// it crosses the plane, or an edge of it lies in the plane.
fn touches_across(sides: &[Side; 3]) -> bool {
    straddles(sides) || sides.iter().filter(|&&s| s == Side::On).count() >= 2
}

/// Planes through each edge of `tri`, perpendicular to `own_plane`.
fn edge_planes(tri: &Triangle, own_plane: &SupportPlane) -> SmallVec<[SupportPlane; 3]> {
    let lift = own_plane.unit_normal();
    let [a, b, c] = tri.vertices();
    [(a, b), (b, c), (c, a)]
        .into_iter()
        .filter_map(|(p, q)| SupportPlane::from_triangle(p, q, p + lift))
        .collect()
}

/// Cut every piece near `region` that strictly straddles `plane`.
/// Returns the number of pieces that were split.
fn cut_pieces(pieces: &mut Vec<Piece>, plane: &SupportPlane, region: &Aabb, tolerance: f64) -> usize {
    let region = region.padded(tolerance);
    let mut cuts = 0;
    let mut i = 0;
    while i < pieces.len() {
        if pieces[i].bounds().intersects(&region) {
            if let Some((above, below)) = split_polygon(&pieces[i], plane, tolerance) {
                pieces[i] = above;
                pieces.push(below);
                cuts += 1;
            }
        }
        i += 1;
    }
    cuts
}

/// Split a convex polygon by a plane. `None` when it does not strictly
/// straddle the plane or one half would be degenerate.
fn split_polygon(piece: &Piece, plane: &SupportPlane, tolerance: f64) -> Option<(Piece, Piece)> {
    let point_sides: SmallVec<[Side; 8]> = piece
        .points
        .iter()
        .map(|p| plane.side(p, tolerance))
        .collect();
    if !straddles(&point_sides) {
        return None;
    }

    let mut above: SmallVec<[Point3<f64>; 8]> = SmallVec::new();
    let mut below: SmallVec<[Point3<f64>; 8]> = SmallVec::new();
    let n = piece.points.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let (p, q) = (&piece.points[i], &piece.points[j]);
        let (sp, sq) = (point_sides[i], point_sides[j]);

        match sp {
            Side::Above => above.push(*p),
            Side::Below => below.push(*p),
            Side::On => {
                above.push(*p);
                below.push(*p);
            }
        }
        if (sp == Side::Above && sq == Side::Below) || (sp == Side::Below && sq == Side::Above) {
            let x = plane.crossing(p, q);
            above.push(x);
            below.push(x);
        }
    }

    if above.len() < 3 || below.len() < 3 {
        return None;
    }
    Some((
        Piece {
            points: above,
            source_face: piece.source_face,
        },
        Piece {
            points: below,
            source_face: piece.source_face,
        },
    ))
}
