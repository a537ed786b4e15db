//! Bounding Volume Hierarchy for accelerated intersection queries.
//!
//! Finding the triangles of one mesh that may touch a triangle, point or
//! ray costs O(log n + k) instead of a scan over every face.

use mesh_types::{Aabb, IndexedMesh, MeshTopology, Point3, Vector3};
use smallvec::SmallVec;

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
pub enum BvhNode {
    /// Leaf node containing triangle indices.
    Leaf {
        /// Bounding box of all triangles in this leaf.
        bbox: Aabb,
        /// Triangle indices stored in this leaf.
        triangles: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of all triangles in this subtree.
        bbox: Aabb,
        /// Left child node.
        left: Box<Self>,
        /// Right child node.
        right: Box<Self>,
    },
}

impl BvhNode {
    /// Get the bounding box of this node.
    #[must_use]
    pub fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Bounding Volume Hierarchy over the faces of a mesh.
#[derive(Debug)]
pub struct Bvh {
    root: Option<BvhNode>,
    triangle_count: usize,
}

impl Bvh {
    /// Build a BVH from a mesh.
    ///
    /// Faces are split at the median of their box centers along the longest
    /// axis until a node holds at most `max_leaf_size` faces.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Vertex, Point3};
    /// use mesh_boolean::bvh::Bvh;
    ///
    /// let mut mesh = IndexedMesh::new();
    /// mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
    /// mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
    /// mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
    /// mesh.faces.push([0, 1, 2]);
    ///
    /// let bvh = Bvh::build(&mesh, 8);
    /// assert_eq!(bvh.triangle_count(), 1);
    /// ```
    #[must_use]
    pub fn build(mesh: &IndexedMesh, max_leaf_size: usize) -> Self {
        let boxes: Vec<(u32, Aabb)> = mesh
            .triangles()
            .enumerate()
            .map(|(i, tri)| (i as u32, tri.bounds()))
            .collect();

        if boxes.is_empty() {
            return Self {
                root: None,
                triangle_count: 0,
            };
        }

        let root = Self::build_recursive(boxes, max_leaf_size.max(1));
        Self {
            root: Some(root),
            triangle_count: mesh.faces.len(),
        }
    }

    fn build_recursive(mut items: Vec<(u32, Aabb)>, max_leaf_size: usize) -> BvhNode {
        let mut bbox = Aabb::empty();
        for (_, item_box) in &items {
            bbox.expand(item_box);
        }

        if items.len() <= max_leaf_size {
            return BvhNode::Leaf {
                bbox,
                triangles: items.iter().map(|(i, _)| *i).collect(),
            };
        }

        let axis = bbox.longest_axis();
        items.sort_by(|(_, a), (_, b)| a.center()[axis].total_cmp(&b.center()[axis]));

        let right_items = items.split_off(items.len() / 2);
        let left = Self::build_recursive(items, max_leaf_size);
        let right = Self::build_recursive(right_items, max_leaf_size);

        BvhNode::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Faces whose boxes overlap `query_bbox` grown by `tolerance`.
    #[must_use]
    pub fn query(&self, query_bbox: &Aabb, tolerance: f64) -> Vec<u32> {
        let mut result = Vec::new();
        if let Some(root) = &self.root {
            let padded = query_bbox.padded(tolerance);
            Self::query_recursive(root, &padded, &mut result);
        }
        result
    }

    fn query_recursive(node: &BvhNode, query_bbox: &Aabb, result: &mut Vec<u32>) {
        if !node.bbox().intersects(query_bbox) {
            return;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => result.extend_from_slice(triangles),
            BvhNode::Internal { left, right, .. } => {
                Self::query_recursive(left, query_bbox, result);
                Self::query_recursive(right, query_bbox, result);
            }
        }
    }

    /// Faces whose boxes come within `tolerance` of `point`.
    #[must_use]
    pub fn query_point(&self, point: &Point3<f64>, tolerance: f64) -> Vec<u32> {
        self.query(&Aabb::new(*point, *point), tolerance)
    }

    /// Faces whose boxes are hit by the ray `origin + t * direction`, `t >= 0`.
    #[must_use]
    pub fn query_ray(&self, origin: &Point3<f64>, direction: &Vector3<f64>, tolerance: f64) -> Vec<u32> {
        let mut result = Vec::new();
        if let Some(root) = &self.root {
            let inv = direction.map(|d| 1.0 / d);
            Self::query_ray_recursive(root, origin, &inv, tolerance, &mut result);
        }
        result
    }

    fn query_ray_recursive(
        node: &BvhNode,
        origin: &Point3<f64>,
        inv_dir: &Vector3<f64>,
        tolerance: f64,
        result: &mut Vec<u32>,
    ) {
        if !ray_hits_box(origin, inv_dir, &node.bbox().padded(tolerance)) {
            return;
        }
        match node {
            BvhNode::Leaf { triangles, .. } => result.extend_from_slice(triangles),
            BvhNode::Internal { left, right, .. } => {
                Self::query_ray_recursive(left, origin, inv_dir, tolerance, result);
                Self::query_ray_recursive(right, origin, inv_dir, tolerance, result);
            }
        }
    }

    /// Number of triangles in the tree.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Whether the tree holds no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Bounding box of the whole tree.
    #[must_use]
    pub fn root_bbox(&self) -> Option<&Aabb> {
        self.root.as_ref().map(BvhNode::bbox)
    }

    /// Structure statistics, for tuning `bvh_leaf_size`.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        let mut stats = BvhStats::default();
        if let Some(root) = &self.root {
            Self::collect_stats(root, 1, &mut stats);
        }
        stats
    }

    fn collect_stats(node: &BvhNode, depth: usize, stats: &mut BvhStats) {
        stats.max_depth = stats.max_depth.max(depth);
        match node {
            BvhNode::Leaf { triangles, .. } => {
                stats.leaf_count += 1;
                stats.max_leaf_size = stats.max_leaf_size.max(triangles.len());
            }
            BvhNode::Internal { left, right, .. } => {
                stats.internal_count += 1;
                Self::collect_stats(left, depth + 1, stats);
                Self::collect_stats(right, depth + 1, stats);
            }
        }
    }
}

/// Slab test; `inv_dir` components may be infinite for axis-parallel rays.
fn ray_hits_box(origin: &Point3<f64>, inv_dir: &Vector3<f64>, bbox: &Aabb) -> bool {
    let mut t_min = 0.0_f64;
    let mut t_max = f64::INFINITY;
    for axis in 0..3 {
        let lo = (bbox.min[axis] - origin[axis]) * inv_dir[axis];
        let hi = (bbox.max[axis] - origin[axis]) * inv_dir[axis];
        // 0 * inf is NaN when the origin sits on a slab face; keep the slab open.
        let (near, far) = if lo.is_nan() || hi.is_nan() {
            (f64::NEG_INFINITY, f64::INFINITY)
        } else {
            (lo.min(hi), lo.max(hi))
        };
        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Statistics about BVH structure.
#[derive(Debug, Default, Clone)]
pub struct BvhStats {
    /// Deepest level, the root counting as 1.
    pub max_depth: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of internal nodes.
    pub internal_count: usize,
    /// Largest number of triangles in one leaf.
    pub max_leaf_size: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use mesh_types::{cuboid, unit_cube};

    #[test]
    fn build_empty() {
        let bvh = Bvh::build(&IndexedMesh::new(), 8);
        assert!(bvh.is_empty());
        assert_eq!(bvh.triangle_count(), 0);
        assert!(bvh.query(&Aabb::new(Point3::origin(), Point3::origin()), 1.0).is_empty());
    }

    #[test]
    fn build_box_with_small_leaves() {
        let bvh = Bvh::build(&unit_cube(), 2);
        let stats = bvh.stats();
        assert_eq!(bvh.triangle_count(), 12);
        assert!(stats.max_leaf_size <= 2);
        assert_eq!(stats.leaf_count, stats.internal_count + 1);
        let root = bvh.root_bbox().unwrap();
        assert_eq!(root.max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn query_all_and_partial() {
        let bvh = Bvh::build(&unit_cube(), 1);
        let everything = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(bvh.query(&everything, 0.0).len(), 12);

        // A thin slab just above z = 1 touches only the two top faces.
        let above = Aabb::new(Point3::new(0.2, 0.2, 1.001), Point3::new(0.4, 0.4, 1.5));
        assert!(bvh.query(&above, 0.0).is_empty());
        let mut top = bvh.query(&above, 0.01);
        top.sort_unstable();
        assert_eq!(top, vec![2, 3]);
    }

    #[test]
    fn query_point_near_face() {
        let bvh = Bvh::build(&unit_cube(), 1);
        let hits = bvh.query_point(&Point3::new(0.5, 0.5, 0.0), 1e-9);
        assert!(hits.contains(&0) || hits.contains(&1));
        assert!(bvh.query_point(&Point3::new(5.0, 5.0, 5.0), 1e-9).is_empty());
    }

    #[test]
    fn query_ray_filters_by_direction() {
        let mesh = cuboid(Point3::new(2.0, -0.5, -0.5), Point3::new(3.0, 0.5, 0.5));
        let bvh = Bvh::build(&mesh, 1);
        let origin = Point3::origin();
        assert!(!bvh.query_ray(&origin, &Vector3::x(), 0.0).is_empty());
        assert!(bvh.query_ray(&origin, &-Vector3::x(), 0.0).is_empty());
        assert!(bvh.query_ray(&origin, &Vector3::y(), 0.0).is_empty());
    }
}
