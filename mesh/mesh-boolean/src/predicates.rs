//! Exact orientation predicates with a tolerance band.
//!
//! Every side-of-plane decision in the engine goes through
//! [`SupportPlane::side`]. The sign comes from Shewchuk's adaptive
//! `orient3d`, so it is exact for the given `f64` inputs; only points
//! within `tolerance` of the plane are snapped to [`Side::On`].

use mesh_types::{Point3, Vector3};
use robust::{Coord, Coord3D, orient2d, orient3d};

/// Position of a point relative to an oriented plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Opposite the plane normal.
    Below,
    /// Within the tolerance band.
    On,
    /// Along the plane normal.
    Above,
}

/// The plane through a triangle, oriented by its winding.
#[derive(Debug, Clone, Copy)]
pub struct SupportPlane {
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
    normal: Vector3<f64>,
    norm: f64,
}

fn coord(p: &Point3<f64>) -> Coord3D<f64> {
    Coord3D {
        x: p.x,
        y: p.y,
        z: p.z,
    }
}

impl SupportPlane {
    /// Plane through `a`, `b`, `c`; `None` when the triangle has no area.
    #[must_use]
    pub fn from_triangle(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Option<Self> {
        if is_collinear(&a, &b, &c) {
            return None;
        }
        let normal = (b - a).cross(&(c - a));
        let norm = normal.norm();
        if norm <= f64::MIN_POSITIVE {
            return None;
        }
        Some(Self {
            a,
            b,
            c,
            normal,
            norm,
        })
    }

    /// Unit normal following the right-hand rule on the winding.
    #[must_use]
    pub fn unit_normal(&self) -> Vector3<f64> {
        self.normal / self.norm
    }

    /// Signed distance from the plane, positive above.
    ///
    /// The magnitude is a floating-point estimate; its sign is exact.
    #[must_use]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        // orient3d is positive when `p` is below the plane.
        -orient3d(coord(&self.a), coord(&self.b), coord(&self.c), coord(p)) / self.norm
    }

    /// Classify `p` against the plane with a snapping band of `tolerance`.
    #[must_use]
    pub fn side(&self, p: &Point3<f64>, tolerance: f64) -> Side {
        let d = self.signed_distance(p);
        if d == 0.0 || d.abs() <= tolerance {
            Side::On
        } else if d > 0.0 {
            Side::Above
        } else {
            Side::Below
        }
    }

    /// Point where segment `p`-`q` crosses the plane.
    ///
    /// Callers guarantee that `p` and `q` lie strictly on opposite sides.
    #[must_use]
    pub fn crossing(&self, p: &Point3<f64>, q: &Point3<f64>) -> Point3<f64> {
        let dp = self.signed_distance(p);
        let dq = self.signed_distance(q);
        let t = (dp / (dp - dq)).clamp(0.0, 1.0);
        p + (q - p) * t
    }

    /// Whether the two planes are parallel up to orientation.
    #[must_use]
    pub fn is_parallel_to(&self, other: &Self) -> bool {
        self.unit_normal().cross(&other.unit_normal()).norm() <= f64::EPSILON * 4.0
    }
}

/// Exact collinearity test: all three axis projections are degenerate.
#[must_use]
pub fn is_collinear(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> bool {
    let xy = |p: &Point3<f64>| Coord { x: p.x, y: p.y };
    let yz = |p: &Point3<f64>| Coord { x: p.y, y: p.z };
    let zx = |p: &Point3<f64>| Coord { x: p.z, y: p.x };
    orient2d(xy(a), xy(b), xy(c)) == 0.0
        && orient2d(yz(a), yz(b), yz(c)) == 0.0
        && orient2d(zx(a), zx(b), zx(c)) == 0.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn ground() -> SupportPlane {
        SupportPlane::from_triangle(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn sides_follow_winding() {
        let plane = ground();
        assert_eq!(plane.side(&Point3::new(0.3, 0.3, 2.0), 0.0), Side::Above);
        assert_eq!(plane.side(&Point3::new(0.3, 0.3, -2.0), 0.0), Side::Below);
        assert_eq!(plane.side(&Point3::new(5.0, -3.0, 0.0), 0.0), Side::On);
        assert!((plane.signed_distance(&Point3::new(9.0, 9.0, 1.5)) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn band_snaps_near_points() {
        let plane = ground();
        let near = Point3::new(0.2, 0.2, 1e-10);
        assert_eq!(plane.side(&near, 0.0), Side::Above);
        assert_eq!(plane.side(&near, 1e-9), Side::On);
    }

    #[test]
    fn exact_sign_on_tilted_plane() {
        // A plane whose points are not exactly representable; the midpoint
        // of two plane points is still classified without a band.
        let a = Point3::new(0.1, 0.2, 0.3);
        let b = Point3::new(1.7, -0.4, 2.9);
        let c = Point3::new(-0.6, 3.1, 0.8);
        let plane = SupportPlane::from_triangle(a, b, c).unwrap();
        assert_eq!(plane.side(&a, 0.0), Side::On);
        assert_eq!(plane.side(&c, 0.0), Side::On);
    }

    #[test]
    fn collinear_triangles_have_no_plane() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let c = Point3::new(2.0, 2.0, 2.0);
        assert!(is_collinear(&a, &b, &c));
        assert!(SupportPlane::from_triangle(a, b, c).is_none());
        assert!(!is_collinear(&a, &b, &Point3::new(2.0, 2.0, 2.5)));
    }

    #[test]
    fn crossing_lands_on_plane() {
        let plane = ground();
        let p = Point3::new(0.0, 0.0, -1.0);
        let q = Point3::new(2.0, 4.0, 3.0);
        let x = plane.crossing(&p, &q);
        assert!(x.z.abs() < 1e-12);
        assert!((x.x - 0.5).abs() < 1e-12);
        assert!((x.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_planes() {
        let flipped = SupportPlane::from_triangle(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 1.0, 5.0),
            Point3::new(1.0, 0.0, 5.0),
        )
        .unwrap();
        assert!(ground().is_parallel_to(&flipped));
        assert!(flipped.unit_normal().z < 0.0);
    }
}
