#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Gridquest.
//!
//! A [`World`] holds exactly one live player/world pair derived from an
//! immutable lesson definition. All mutation flows through the free
//! [`apply`] entry point, which executes a single [`Command`] as one
//! deterministic transition, broadcasts [`Event`] values for external
//! presenters, and reports a [`StepOutcome`] to the caller. Read access
//! goes through the [`query`] module.

mod movement;

use gridquest_core::{
    Command, Event, Gem, LessonDefinition, Obstacle, PlayerSeed, Position, StepOutcome, Yaw,
};
use gridquest_system_goal as goal;

/// Runtime player pose and counters, mutated exclusively by the movement
/// engine.
#[derive(Clone, Debug)]
struct Player {
    position: Position,
    yaw: Yaw,
    gems_collected: u32,
    moves: u32,
}

impl Player {
    fn from_seed(seed: &PlayerSeed) -> Self {
        Self {
            position: seed.position,
            yaw: Yaw::from_degrees(seed.rotation.y),
            gems_collected: 0,
            moves: 0,
        }
    }
}

/// Authoritative state of one lesson session.
///
/// The lesson definition stays inside the world untouched; gems and
/// obstacles are deep copies, so runtime `collected` flags never leak back
/// into the shared definition. Cloning a world yields an independent
/// session with identical state, which the sandbox adapter uses for its
/// forecast.
#[derive(Clone, Debug)]
pub struct World {
    lesson: LessonDefinition,
    player: Player,
    gems: Vec<Gem>,
    obstacles: Vec<Obstacle>,
    completed: bool,
}

impl World {
    /// Starts a session from a lesson definition, cloning the layout into
    /// fresh runtime state with zeroed counters and a cleared completion
    /// latch.
    #[must_use]
    pub fn from_lesson(lesson: LessonDefinition) -> Self {
        let mut world = Self {
            player: Player::from_seed(&lesson.world_state.player),
            gems: Vec::new(),
            obstacles: Vec::new(),
            completed: false,
            lesson,
        };
        world.reset();
        world
    }

    /// Restores the lesson's original snapshot: starting pose, uncollected
    /// gems, zeroed counters, cleared completion latch. Idempotent.
    pub fn reset(&mut self) {
        self.player = Player::from_seed(&self.lesson.world_state.player);
        self.gems = self
            .lesson
            .world_state
            .gems
            .iter()
            .map(|gem| Gem {
                position: gem.position,
                collected: false,
            })
            .collect();
        self.obstacles = self.lesson.world_state.obstacles.clone();
        self.completed = false;
    }

    fn refresh_completion(&mut self, out_events: &mut Vec<Event>) {
        if self.completed {
            return;
        }

        let player = query::player(self);
        if goal::is_complete(
            &player,
            &self.lesson.target_state,
            self.lesson.tolerances.goal,
        ) {
            self.completed = true;
            out_events.push(Event::LessonCompleted {
                moves: player.moves,
                gems_collected: player.gems_collected,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state
/// deterministically and appending any resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) -> StepOutcome {
    match command {
        Command::MoveForward => movement::advance(world, movement::Heading::Forward, out_events),
        Command::MoveBackward => movement::advance(world, movement::Heading::Backward, out_events),
        Command::TurnLeft => {
            let yaw = world.player.yaw.turned_left();
            movement::rotate(world, yaw, out_events)
        }
        Command::TurnRight => {
            let yaw = world.player.yaw.turned_right();
            movement::rotate(world, yaw, out_events)
        }
        Command::TurnAround => {
            let yaw = world.player.yaw.turned_around();
            movement::rotate(world, yaw, out_events)
        }
        Command::Face { direction } => movement::face(world, &direction, out_events),
        Command::MoveSteps { steps } => movement::walk(world, steps, out_events),
        Command::PickGem => movement::pick_gem(world, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridquest_core::{
        Direction, LessonDefinition, PlayerSnapshot, SessionSnapshot, TargetDescriptor,
        Tolerances, WorldSnapshot,
    };

    use super::World;

    /// Captures a read-only view of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            yaw_degrees: world.player.yaw.degrees(),
            facing: Direction::from_yaw(world.player.yaw),
            gems_collected: world.player.gems_collected,
            moves: world.player.moves,
        }
    }

    /// Captures a read-only view of the runtime gems and obstacles.
    #[must_use]
    pub fn world_state(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            gems: world.gems.clone(),
            obstacles: world.obstacles.clone(),
        }
    }

    /// Whether the lesson goal has been reached this session.
    #[must_use]
    pub fn completed(world: &World) -> bool {
        world.completed
    }

    /// Captures the combined view handed to the lesson/UI layer.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            player_state: player(world),
            world_state: world_state(world),
            completed: completed(world),
        }
    }

    /// Goal condition of the loaded lesson.
    #[must_use]
    pub fn target(world: &World) -> &TargetDescriptor {
        &world.lesson.target_state
    }

    /// Proximity thresholds of the loaded lesson.
    #[must_use]
    pub fn tolerances(world: &World) -> Tolerances {
        world.lesson.tolerances
    }

    /// The immutable lesson definition the session was started from.
    #[must_use]
    pub fn lesson(world: &World) -> &LessonDefinition {
        &world.lesson
    }
}
