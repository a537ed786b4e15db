//! Ray and point queries against single triangles.

// Barycentric determinants read naturally with these groupings.
#![allow(clippy::suspicious_operation_groupings)]

use mesh_types::{Point3, Vector3};

/// Ray-triangle intersection using the Möller-Trumbore algorithm.
///
/// # Arguments
///
/// * `origin` - Ray origin
/// * `direction` - Ray direction (does not need to be normalized)
/// * `v0`, `v1`, `v2` - Triangle vertices
/// * `epsilon` - Tolerance for parallel ray detection
///
/// # Returns
///
/// `Some(t)` where `origin + t * direction` is the hit, or `None`.
/// Hits at or behind the origin (`t <= epsilon`) are ignored.
#[must_use]
pub fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > epsilon).then_some(t)
}

/// Point-in-triangle test using barycentric coordinates.
///
/// The point is assumed to lie in the triangle's plane. Returns `true`
/// inside or within `epsilon` (in barycentric units) of the boundary.
#[must_use]
pub fn point_in_triangle(
    point: &Point3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    epsilon: f64,
) -> bool {
    let v0v1 = v1 - v0;
    let v0v2 = v2 - v0;
    let v0p = point - v0;

    let dot00 = v0v2.dot(&v0v2);
    let dot01 = v0v2.dot(&v0v1);
    let dot02 = v0v2.dot(&v0p);
    let dot11 = v0v1.dot(&v0v1);
    let dot12 = v0v1.dot(&v0p);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() <= f64::MIN_POSITIVE {
        return false;
    }
    let inv_denom = 1.0 / denom;

    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    u >= -epsilon && v >= -epsilon && u + v <= 1.0 + epsilon
}

/// Distance from `point` to segment `a`-`b` and the clamped parameter of
/// the closest point.
#[must_use]
pub fn point_segment_distance(point: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> (f64, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::MIN_POSITIVE {
        return ((point - a).norm(), 0.0);
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    ((point - (a + ab * t)).norm(), t)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn tri() -> [Point3<f64>; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]
    }

    #[test]
    fn ray_hits_front_and_back() {
        let [a, b, c] = tri();
        let down = ray_triangle_intersect(
            &Point3::new(0.5, 0.5, 3.0),
            &Vector3::new(0.0, 0.0, -1.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert!((down.unwrap() - 3.0).abs() < 1e-12);

        // Back-face hits count too; parity needs both.
        let up = ray_triangle_intersect(
            &Point3::new(0.5, 0.5, -1.0),
            &Vector3::new(0.0, 0.0, 1.0),
            &a,
            &b,
            &c,
            1e-12,
        );
        assert!((up.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ray_misses() {
        let [a, b, c] = tri();
        let away = Vector3::new(0.0, 0.0, 1.0);
        assert!(ray_triangle_intersect(&Point3::new(0.5, 0.5, 1.0), &away, &a, &b, &c, 1e-12).is_none());
        assert!(ray_triangle_intersect(&Point3::new(3.0, 3.0, 1.0), &-away, &a, &b, &c, 1e-12).is_none());
        let parallel = Vector3::new(1.0, 0.0, 0.0);
        assert!(ray_triangle_intersect(&Point3::new(-1.0, 0.5, 0.0), &parallel, &a, &b, &c, 1e-12).is_none());
    }

    #[test]
    fn point_in_triangle_boundary() {
        let [a, b, c] = tri();
        assert!(point_in_triangle(&Point3::new(0.5, 0.5, 0.0), &a, &b, &c, 0.0));
        assert!(point_in_triangle(&Point3::new(1.0, 1.0, 0.0), &a, &b, &c, 1e-12));
        assert!(!point_in_triangle(&Point3::new(1.5, 1.5, 0.0), &a, &b, &c, 1e-9));
    }

    #[test]
    fn segment_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(4.0, 0.0, 0.0);
        let (d, t) = point_segment_distance(&Point3::new(1.0, 2.0, 0.0), &a, &b);
        assert!((d - 2.0).abs() < 1e-12);
        assert!((t - 0.25).abs() < 1e-12);
        let (d, t) = point_segment_distance(&Point3::new(6.0, 0.0, 0.0), &a, &b);
        assert!((d - 2.0).abs() < 1e-12);
        assert_eq!(t, 1.0);
    }
}
