//! Input validation: emptiness, index range, degeneracy, closure.

use hashbrown::HashMap;
use mesh_types::IndexedMesh;

use crate::error::{BooleanError, BooleanResult};
use crate::predicates::is_collinear;

/// Checks that run regardless of configuration; the engine indexes
/// vertices directly and must not see out-of-range faces.
///
/// # Errors
///
/// [`BooleanError::EmptyMesh`] or [`BooleanError::InvalidIndex`].
pub fn check_structure(mesh: &IndexedMesh, name: &str) -> BooleanResult<()> {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return Err(BooleanError::EmptyMesh {
            details: format!("mesh {name} has no faces"),
        });
    }
    let vertex_count = mesh.vertices.len();
    for (face_index, face) in mesh.faces.iter().enumerate() {
        if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(BooleanError::InvalidIndex {
                mesh: name.to_string(),
                face: face_index,
                index,
            });
        }
    }
    Ok(())
}

/// Full validation of a boolean operand.
///
/// In order: exactly collinear faces, unmatched edges, then non-positive
/// signed volume (an inside-out or flat solid).
///
/// # Errors
///
/// [`BooleanError::DegenerateMesh`] or [`BooleanError::OpenMesh`].
pub fn validate_solid(mesh: &IndexedMesh, name: &str) -> BooleanResult<()> {
    if let Some(face_index) = mesh.faces.iter().position(|&[a, b, c]| {
        is_collinear(&mesh.position(a), &mesh.position(b), &mesh.position(c))
    }) {
        return Err(BooleanError::DegenerateMesh {
            details: format!("mesh {name}: face {face_index} has zero area"),
        });
    }

    let open_edges = count_open_edges(mesh);
    if open_edges > 0 {
        return Err(BooleanError::OpenMesh {
            mesh: name.to_string(),
            open_edges,
        });
    }

    let volume = mesh.signed_volume();
    if volume.is_nan() || volume <= 0.0 {
        return Err(BooleanError::DegenerateMesh {
            details: format!("mesh {name} encloses no volume (signed volume {volume})"),
        });
    }
    Ok(())
}

/// Number of directed edges without a matching opposite half-edge.
///
/// Vertices are identified by exact position, so duplicated vertices at the
/// same point still pair up. Zero for a closed, consistently wound surface.
#[must_use]
pub fn count_open_edges(mesh: &IndexedMesh) -> usize {
    let mut canonical: HashMap<[u64; 3], u32> = HashMap::with_capacity(mesh.vertices.len());
    let ids: Vec<u32> = mesh
        .positions()
        .map(|p| {
            let key = [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()];
            let next = canonical.len() as u32;
            *canonical.entry(key).or_insert(next)
        })
        .collect();

    // Net count per undirected edge: +1 for (lo, hi), -1 for (hi, lo).
    let mut balance: HashMap<(u32, u32), i64> = HashMap::with_capacity(mesh.faces.len() * 3);
    for face in &mesh.faces {
        for k in 0..3 {
            let u = ids[face[k] as usize];
            let v = ids[face[(k + 1) % 3] as usize];
            if u == v {
                continue;
            }
            let (key, delta) = if u < v { ((u, v), 1) } else { ((v, u), -1) };
            *balance.entry(key).or_insert(0) += delta;
        }
    }
    balance.values().map(|b| b.unsigned_abs() as usize).sum()
}
