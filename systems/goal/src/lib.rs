#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure goal evaluation for Gridquest lessons.
//!
//! The evaluator is a stateless predicate over immutable views; the
//! level-triggered completion latch itself lives with the world state so a
//! reset clears it atomically with the rest of the session snapshot.

use gridquest_core::{PlayerSnapshot, TargetDescriptor};

/// Reports whether the player currently satisfies the lesson target.
///
/// True iff both horizontal distances to the target cell fall within
/// `goal_tolerance` (per-axis, not Euclidean) and at least the required
/// number of gems has been collected. The advisory `max_moves` field of the
/// target is never consulted; move budgets are scored by external
/// collaborators.
#[must_use]
pub fn is_complete(
    player: &PlayerSnapshot,
    target: &TargetDescriptor,
    goal_tolerance: f32,
) -> bool {
    let dx = (player.position.x - target.target_position.x).abs();
    let dz = (player.position.z - target.target_position.z).abs();

    dx < goal_tolerance
        && dz < goal_tolerance
        && player.gems_collected >= target.required_gems_collected
}
