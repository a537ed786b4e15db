//! Subtracting a composed tag from the fixture body.

use mesh_boolean::{BooleanConfig, BooleanError, BooleanResult, difference_with_config};
use mesh_types::IndexedMesh;
use tracing::{debug, warn};

/// Boolean settings for engraving: full cleanup, validated inputs, serial.
#[must_use]
pub fn engrave_config() -> BooleanConfig {
    BooleanConfig::default().with_parallel(false)
}

/// `fixture` minus `tag`.
///
/// An empty tag returns a copy of the fixture without running the engine.
/// A result that is not a closed solid, or whose lost volume is negative or
/// exceeds the tag's volume, is an error rather than an engraving.
///
/// # Errors
///
/// Any [`BooleanError`] from the engine, e.g. an open or degenerate tag
/// when validation is enabled, plus [`BooleanError::NonManifoldResult`] and
/// [`BooleanError::InconsistentResult`] for a broken result.
pub fn subtract(fixture: &IndexedMesh, tag: &IndexedMesh, config: &BooleanConfig) -> BooleanResult<IndexedMesh> {
    if tag.faces.is_empty() {
        debug!("empty tag, fixture unchanged");
        return Ok(fixture.clone());
    }
    let result = difference_with_config(fixture, tag, config)?;
    let open_edges = result.stats.open_edges;
    if open_edges > 0 {
        warn!(open_edges, "engraved fixture is not watertight");
        return Err(BooleanError::NonManifoldResult { open_edges });
    }
    check_removed_volume(fixture, tag, &result.mesh)?;
    debug!(
        faces = result.mesh.faces.len(),
        from_tag = result.stats.faces_from_b,
        "subtracted tag"
    );
    Ok(result.mesh)
}

/// The engraving may only remove material, and no more than the tag holds.
fn check_removed_volume(fixture: &IndexedMesh, tag: &IndexedMesh, engraved: &IndexedMesh) -> BooleanResult<()> {
    let before = fixture.signed_volume();
    let removed = before - engraved.signed_volume();
    let limit = tag.signed_volume();
    let tolerance = VOLUME_TOLERANCE * before.abs().max(1.0);
    if removed < -tolerance || removed > limit + tolerance {
        warn!(removed, limit, "engraved volume out of range");
        return Err(BooleanError::InconsistentResult {
            details: format!("removed volume {removed:.6} outside 0..={limit:.6}"),
        });
    }
    Ok(())
}

/// Relative slack on the volume check.
const VOLUME_TOLERANCE: f64 = 1e-9;
