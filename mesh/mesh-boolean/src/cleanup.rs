//! Rebuilding a triangle mesh from selected pieces.
//!
//! Pieces arrive as convex polygons in output winding. Depending on the
//! [`CleanupLevel`] their corners are welded through a spatial hash and
//! edges are repaired where a welded vertex of a neighbouring piece lies
//! on them (a T-junction). Each polygon is then fan-triangulated.

use hashbrown::HashMap;
use mesh_types::{Aabb, IndexedMesh, Point3, Vector3, Vertex};
use smallvec::SmallVec;

use crate::config::CleanupLevel;
use crate::intersect::point_segment_distance;
use crate::predicates::is_collinear;

/// Which input a polygon came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The first operand.
    A,
    /// The second operand.
    B,
}

/// A convex polygon ready for output.
#[derive(Debug, Clone)]
pub struct OutputPolygon {
    /// Corners in output winding.
    pub points: SmallVec<[Point3<f64>; 8]>,
    /// Operand the polygon was cut from.
    pub origin: Origin,
}

/// Result of [`reconstruct`].
#[derive(Debug, Default)]
pub struct Reconstruction {
    /// The assembled mesh.
    pub mesh: IndexedMesh,
    /// Triangles that came from A.
    pub faces_from_a: usize,
    /// Triangles that came from B.
    pub faces_from_b: usize,
    /// Vertices inserted into polygon edges.
    pub t_junctions_repaired: usize,
}

/// Assemble polygons into an indexed mesh.
#[must_use]
pub fn reconstruct(polygons: &[OutputPolygon], level: CleanupLevel, tolerance: f64) -> Reconstruction {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut loops: Vec<(SmallVec<[u32; 8]>, Origin)> = Vec::with_capacity(polygons.len());

    match level {
        CleanupLevel::None => {
            for polygon in polygons {
                let start = vertices.len() as u32;
                vertices.extend_from_slice(&polygon.points);
                let indices = (start..vertices.len() as u32).collect();
                loops.push((indices, polygon.origin));
            }
        }
        CleanupLevel::Fast | CleanupLevel::Full => {
            let mut welder = Welder::new(tolerance);
            for polygon in polygons {
                let mut indices: SmallVec<[u32; 8]> = polygon
                    .points
                    .iter()
                    .map(|p| welder.insert(p, &mut vertices))
                    .collect();
                indices.dedup();
                while indices.len() > 1 && indices.first() == indices.last() {
                    indices.pop();
                }
                if indices.len() >= 3 {
                    loops.push((indices, polygon.origin));
                }
            }
        }
    }

    let mut t_junctions_repaired = 0;
    if level == CleanupLevel::Full {
        let index = EdgeIndex::new(&vertices, tolerance);
        for (indices, _) in &mut loops {
            t_junctions_repaired += index.repair_loop(indices, &vertices, tolerance);
        }
    }

    let mut result = Reconstruction {
        t_junctions_repaired,
        ..Reconstruction::default()
    };
    let mut faces: Vec<[u32; 3]> = Vec::new();
    for (indices, origin) in &loops {
        let before = faces.len();
        triangulate(indices, &mut vertices, &mut faces);
        let added = faces.len() - before;
        match origin {
            Origin::A => result.faces_from_a += added,
            Origin::B => result.faces_from_b += added,
        }
    }

    result.mesh = IndexedMesh::from_parts(vertices.into_iter().map(Vertex::new).collect(), faces);
    remove_unreferenced_vertices(&mut result.mesh);
    result
}

/// Merges points closer than the tolerance, using a hash of cubic cells
/// one tolerance wide and searching the 27 cells around each point.
struct Welder {
    tolerance: f64,
    cell: f64,
    grid: HashMap<[i64; 3], SmallVec<[u32; 2]>>,
}

impl Welder {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            cell: tolerance.max(f64::EPSILON),
            grid: HashMap::new(),
        }
    }

    fn key(&self, p: &Point3<f64>) -> [i64; 3] {
        [
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
            (p.z / self.cell).floor() as i64,
        ]
    }

    fn insert(&mut self, p: &Point3<f64>, vertices: &mut Vec<Point3<f64>>) -> u32 {
        let [kx, ky, kz] = self.key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = self.grid.get(&[kx + dx, ky + dy, kz + dz]) {
                        if let Some(&hit) = bucket
                            .iter()
                            .find(|&&i| (vertices[i as usize] - p).norm() <= self.tolerance)
                        {
                            return hit;
                        }
                    }
                }
            }
        }
        let index = vertices.len() as u32;
        vertices.push(*p);
        self.grid.entry([kx, ky, kz]).or_default().push(index);
        index
    }
}

/// Coarse grid over welded vertices for finding points near an edge.
struct EdgeIndex {
    cell: f64,
    grid: HashMap<[i64; 3], Vec<u32>>,
    vertex_count: usize,
}

impl EdgeIndex {
    fn new(vertices: &[Point3<f64>], tolerance: f64) -> Self {
        let bounds = Aabb::from_points(vertices.iter());
        let per_axis = (vertices.len().max(1) as f64).cbrt();
        let cell = (bounds.diagonal() / per_axis).max(tolerance * 4.0).max(f64::EPSILON);
        let mut index = Self {
            cell,
            grid: HashMap::new(),
            vertex_count: vertices.len(),
        };
        for (i, p) in vertices.iter().enumerate() {
            let key = index.key(p);
            index.grid.entry(key).or_default().push(i as u32);
        }
        index
    }

    fn key(&self, p: &Point3<f64>) -> [i64; 3] {
        [
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
            (p.z / self.cell).floor() as i64,
        ]
    }

    /// Vertex indices in cells overlapping `region`.
    fn near(&self, region: &Aabb) -> Vec<u32> {
        let lo = self.key(&region.min);
        let hi = self.key(&region.max);
        let span = (0..3).map(|k| (hi[k] - lo[k] + 1) as usize).product::<usize>();
        if span > self.vertex_count {
            return (0..self.vertex_count as u32).collect();
        }
        let mut found = Vec::new();
        for x in lo[0]..=hi[0] {
            for y in lo[1]..=hi[1] {
                for z in lo[2]..=hi[2] {
                    if let Some(bucket) = self.grid.get(&[x, y, z]) {
                        found.extend_from_slice(bucket);
                    }
                }
            }
        }
        found
    }

    /// Insert vertices lying on the loop's edges. Returns the number added.
    fn repair_loop(&self, indices: &mut SmallVec<[u32; 8]>, vertices: &[Point3<f64>], tolerance: f64) -> usize {
        let n = indices.len();
        let mut repaired: SmallVec<[u32; 8]> = SmallVec::with_capacity(n);
        let mut inserted = 0;

        for k in 0..n {
            let a = indices[k];
            let b = indices[(k + 1) % n];
            repaired.push(a);

            let (pa, pb) = (vertices[a as usize], vertices[b as usize]);
            let region = Aabb::new(pa, pb).padded(tolerance);
            let mut on_edge: SmallVec<[(f64, u32); 4]> = self
                .near(&region)
                .into_iter()
                .filter(|i| !indices.contains(i))
                .filter_map(|i| {
                    let (distance, t) = point_segment_distance(&vertices[i as usize], &pa, &pb);
                    (distance <= tolerance && t > 0.0 && t < 1.0).then_some((t, i))
                })
                .collect();
            on_edge.sort_by(|x, y| x.0.total_cmp(&y.0));
            on_edge.dedup_by_key(|e| e.1);

            inserted += on_edge.len();
            repaired.extend(on_edge.into_iter().map(|(_, i)| i));
        }

        *indices = repaired;
        inserted
    }
}

/// Fan-triangulate a convex loop.
///
/// Tries each corner as the fan apex and takes the first whose triangles
/// all have area; otherwise fans from a new vertex at the loop centroid.
fn triangulate(indices: &[u32], vertices: &mut Vec<Point3<f64>>, faces: &mut Vec<[u32; 3]>) {
    let n = indices.len();
    if n < 3 {
        return;
    }
    let fan_is_valid = |apex: usize, vertices: &[Point3<f64>]| {
        (1..n - 1).all(|i| {
            let a = vertices[indices[apex] as usize];
            let b = vertices[indices[(apex + i) % n] as usize];
            let c = vertices[indices[(apex + i + 1) % n] as usize];
            !is_collinear(&a, &b, &c)
        })
    };

    if let Some(apex) = (0..n).find(|&apex| fan_is_valid(apex, vertices)) {
        for i in 1..n - 1 {
            faces.push([
                indices[apex],
                indices[(apex + i) % n],
                indices[(apex + i + 1) % n],
            ]);
        }
        return;
    }

    let sum = indices
        .iter()
        .fold(Vector3::zeros(), |acc, &i| acc + vertices[i as usize].coords);
    let center = Point3::from(sum / n as f64);
    let c = vertices.len() as u32;
    vertices.push(center);
    for k in 0..n {
        let (a, b) = (indices[k], indices[(k + 1) % n]);
        if !is_collinear(&center, &vertices[a as usize], &vertices[b as usize]) {
            faces.push([c, a, b]);
        }
    }
}

/// Drop vertices no face references, renumbering faces.
pub fn remove_unreferenced_vertices(mesh: &mut IndexedMesh) {
    let mut remap = vec![u32::MAX; mesh.vertices.len()];
    let mut kept = Vec::with_capacity(mesh.vertices.len());
    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            let slot = &mut remap[*index as usize];
            if *slot == u32::MAX {
                *slot = kept.len() as u32;
                kept.push(mesh.vertices[*index as usize]);
            }
            *index = *slot;
        }
    }
    mesh.vertices = kept;
}
