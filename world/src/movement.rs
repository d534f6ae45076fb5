//! Movement engine: one command in, one deterministic transition out.
//!
//! Proximity is per-axis on the horizontal plane: a cell and an entity are
//! co-located iff both `|Δx|` and `|Δz|` fall under the session's cell
//! tolerance. Headings map to step vectors through plain trigonometry so
//! lesson-supplied off-axis rotations keep working; the tolerances absorb
//! the resulting float drift.

use glam::{Vec3, Vec3Swizzles};
use gridquest_core::{Direction, Event, Position, StepOutcome, Yaw};

use crate::World;

/// Travel sense of a single-cell move relative to the facing direction.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Heading {
    Forward,
    Backward,
}

pub(crate) fn advance(
    world: &mut World,
    heading: Heading,
    out_events: &mut Vec<Event>,
) -> StepOutcome {
    let step = step_vector(world.player.yaw);
    let offset = match heading {
        Heading::Forward => step,
        Heading::Backward => -step,
    };
    let destination = to_position(to_vec3(world.player.position) + offset);
    let tolerance = world.lesson.tolerances.cell;

    let blocked = world
        .obstacles
        .iter()
        .any(|obstacle| same_cell(obstacle.position, destination, tolerance));
    if blocked {
        out_events.push(Event::MovementBlocked { at: destination });
        return StepOutcome::Blocked;
    }

    let from = world.player.position;
    world.player.position = destination;
    world.player.moves += 1;
    out_events.push(Event::PlayerMoved {
        from,
        to: destination,
    });

    // Gems are swept up by forward travel only; backing onto a gem leaves it
    // on the ground for an explicit PickGem.
    let collected_gem = match heading {
        Heading::Forward => collect_gem(world, destination, out_events),
        Heading::Backward => false,
    };

    world.refresh_completion(out_events);
    StepOutcome::Advanced { collected_gem }
}

pub(crate) fn rotate(world: &mut World, yaw: Yaw, out_events: &mut Vec<Event>) -> StepOutcome {
    world.player.yaw = yaw;
    world.player.moves += 1;
    out_events.push(Event::PlayerRotated {
        yaw_degrees: yaw.degrees(),
    });
    world.refresh_completion(out_events);
    StepOutcome::Rotated {
        yaw_degrees: yaw.degrees(),
    }
}

pub(crate) fn face(
    world: &mut World,
    direction: &str,
    out_events: &mut Vec<Event>,
) -> StepOutcome {
    match Direction::from_name(direction) {
        Some(cardinal) => rotate(world, Yaw::from_degrees(cardinal.yaw_degrees()), out_events),
        None => {
            out_events.push(Event::FaceRejected {
                direction: direction.to_owned(),
            });
            StepOutcome::Rejected
        }
    }
}

pub(crate) fn walk(world: &mut World, steps: u32, out_events: &mut Vec<Event>) -> StepOutcome {
    let mut taken = 0;
    for _ in 0..steps {
        match advance(world, Heading::Forward, out_events) {
            StepOutcome::Advanced { .. } => taken += 1,
            _ => break,
        }
    }
    StepOutcome::Walked { steps: taken }
}

pub(crate) fn pick_gem(world: &mut World, out_events: &mut Vec<Event>) -> StepOutcome {
    let cell = world.player.position;
    if collect_gem(world, cell, out_events) {
        world.player.moves += 1;
        world.refresh_completion(out_events);
        StepOutcome::Collected
    } else {
        StepOutcome::NothingToCollect
    }
}

fn collect_gem(world: &mut World, cell: Position, out_events: &mut Vec<Event>) -> bool {
    let tolerance = world.lesson.tolerances.cell;
    let Some(gem) = world
        .gems
        .iter_mut()
        .find(|gem| !gem.collected && same_cell(gem.position, cell, tolerance))
    else {
        return false;
    };

    gem.collected = true;
    let at = gem.position;
    world.player.gems_collected += 1;
    out_events.push(Event::GemCollected {
        at,
        gems_collected: world.player.gems_collected,
    });
    true
}

fn step_vector(yaw: Yaw) -> Vec3 {
    let radians = yaw.radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

fn same_cell(entity: Position, cell: Position, tolerance: f32) -> bool {
    let delta = (to_vec3(entity).xz() - to_vec3(cell).xz()).abs();
    delta.max_element() < tolerance
}

fn to_vec3(position: Position) -> Vec3 {
    Vec3::new(position.x, position.y, position.z)
}

fn to_position(vector: Vec3) -> Position {
    Position::new(vector.x, vector.y, vector.z)
}
