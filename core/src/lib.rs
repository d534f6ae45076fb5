#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridquest engine.
//!
//! This crate defines the message surface that connects the sandbox bridge,
//! the authoritative world, and the scheduler. The bridge submits [`Command`]
//! values describing desired player actions, the world executes those
//! commands through its `apply` entry point and reports a [`StepOutcome`]
//! per command, and broadcasts [`Event`] values that external presenters
//! replay deterministically. Lesson definitions and target descriptors are
//! parsed by an external loader and arrive here as plain data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-axis distance under which an entity and a cell count as co-located
/// for collision and gem pickup.
pub const CELL_TOLERANCE: f32 = 0.5;

/// Per-axis distance under which the player counts as having arrived at the
/// lesson target.
pub const GOAL_TOLERANCE: f32 = 0.1;

/// Location in world units. Cells are spaced 1.0 apart; the `y` component is
/// carried for presentation (gems hover at 0.5) and never participates in
/// proximity tests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate, increasing toward east.
    pub x: f32,
    /// Vertical coordinate, unused by the simulation.
    #[serde(default)]
    pub y: f32,
    /// North-south coordinate, increasing toward north.
    pub z: f32,
}

impl Position {
    /// Creates a new position from explicit components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Euler rotation triple as stored in lesson documents, in degrees.
///
/// Only the `y` component (yaw) is meaningful to the simulation; `x` and `z`
/// ride along for presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Pitch, unused by the simulation.
    #[serde(default)]
    pub x: f32,
    /// Yaw in degrees.
    #[serde(default)]
    pub y: f32,
    /// Roll, unused by the simulation.
    #[serde(default)]
    pub z: f32,
}

/// Player heading in degrees, kept normalized into `[0, 360)`.
///
/// Headings produced by turns are always integer multiples of 90, but the
/// type accepts any angle so that lesson-supplied starting rotations survive
/// unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yaw(f32);

impl Yaw {
    /// Creates a yaw from degrees, normalizing into `[0, 360)`.
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        Self(degrees.rem_euclid(360.0))
    }

    /// Heading in degrees within `[0, 360)`.
    #[must_use]
    pub const fn degrees(&self) -> f32 {
        self.0
    }

    /// Heading in radians, for step-vector trigonometry.
    #[must_use]
    pub fn radians(&self) -> f32 {
        self.0.to_radians()
    }

    /// Yaw after a 90-degree turn to the left.
    #[must_use]
    pub fn turned_left(&self) -> Self {
        Self::from_degrees(self.0 - 90.0)
    }

    /// Yaw after a 90-degree turn to the right.
    #[must_use]
    pub fn turned_right(&self) -> Self {
        Self::from_degrees(self.0 + 90.0)
    }

    /// Yaw after a half turn.
    #[must_use]
    pub fn turned_around(&self) -> Self {
        Self::from_degrees(self.0 + 180.0)
    }
}

/// Cardinal directions the player can face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward increasing `z`, yaw 0.
    North,
    /// Toward increasing `x`, yaw 90.
    East,
    /// Toward decreasing `z`, yaw 180.
    South,
    /// Toward decreasing `x`, yaw 270.
    West,
}

impl Direction {
    /// Parses a direction name case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("north") {
            Some(Self::North)
        } else if name.eq_ignore_ascii_case("east") {
            Some(Self::East)
        } else if name.eq_ignore_ascii_case("south") {
            Some(Self::South)
        } else if name.eq_ignore_ascii_case("west") {
            Some(Self::West)
        } else {
            None
        }
    }

    /// Lowercase name of the direction.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Absolute yaw the direction maps to.
    #[must_use]
    pub const fn yaw_degrees(&self) -> f32 {
        match self {
            Self::North => 0.0,
            Self::East => 90.0,
            Self::South => 180.0,
            Self::West => 270.0,
        }
    }

    /// Derives the nearest cardinal from an arbitrary yaw using 45-degree
    /// bands, so slightly off-axis lesson rotations still report a facing.
    #[must_use]
    pub fn from_yaw(yaw: Yaw) -> Self {
        let degrees = yaw.degrees();
        if !(45.0..315.0).contains(&degrees) {
            Self::North
        } else if degrees < 135.0 {
            Self::East
        } else if degrees < 225.0 {
            Self::South
        } else {
            Self::West
        }
    }
}

/// Visual category of an obstacle. Presentation metadata only: every kind
/// blocks movement identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Solid wall segment.
    Wall,
    /// Open pit.
    Pit,
    /// Spike trap.
    Spike,
}

/// Collectible gem placed on the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gem {
    /// Cell the gem occupies.
    pub position: Position,
    /// Whether the gem has been collected. Monotonic: once true it reverts
    /// only through a full session reset.
    #[serde(default)]
    pub collected: bool,
}

/// Impassable obstacle placed on the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Cell the obstacle occupies.
    pub position: Position,
    /// Visual category of the obstacle.
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
}

/// Per-session proximity thresholds, tunable per lesson difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Per-axis distance for cell occupancy (collision and pickup).
    pub cell: f32,
    /// Per-axis distance for goal arrival.
    pub goal: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            cell: CELL_TOLERANCE,
            goal: GOAL_TOLERANCE,
        }
    }
}

/// Starting pose of the player as stored in lesson documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeed {
    /// Cell the player starts on.
    pub position: Position,
    /// Starting rotation; only the yaw component drives the simulation.
    #[serde(default)]
    pub rotation: Rotation,
}

/// Static layout of a lesson's world: starting pose, gems, and obstacles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    /// Starting pose of the player.
    pub player: PlayerSeed,
    /// Gems placed on the grid.
    #[serde(default)]
    pub gems: Vec<Gem>,
    /// Obstacles placed on the grid.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

/// Horizontal coordinates of the lesson target cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPosition {
    /// East-west coordinate of the target cell.
    pub x: f32,
    /// North-south coordinate of the target cell.
    pub z: f32,
}

/// Goal condition a session must reach to be marked complete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDescriptor {
    /// Cell the player must stand on.
    #[serde(alias = "playerPosition")]
    pub target_position: TargetPosition,
    /// Minimum number of gems that must be collected.
    #[serde(alias = "gemsCollected")]
    pub required_gems_collected: u32,
    /// Advisory move budget for scoring by external collaborators; never
    /// enforced by the engine.
    #[serde(default)]
    pub max_moves: u32,
}

/// Immutable definition of one lesson, as produced by the external loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDefinition {
    /// Display title of the lesson.
    #[serde(default)]
    pub title: String,
    /// Code pre-filled into the learner's editor.
    #[serde(default)]
    pub starting_code: String,
    /// Static world layout the session is initialized from.
    pub world_state: WorldLayout,
    /// Goal condition for the lesson.
    pub target_state: TargetDescriptor,
    /// Proximity thresholds, defaulting to the engine-wide constants.
    #[serde(default)]
    pub tolerances: Tolerances,
}

/// Commands that express all permissible player actions.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advance one cell in the facing direction.
    MoveForward,
    /// Retreat one cell opposite the facing direction.
    MoveBackward,
    /// Rotate 90 degrees counter-clockwise.
    TurnLeft,
    /// Rotate 90 degrees clockwise.
    TurnRight,
    /// Rotate 180 degrees.
    TurnAround,
    /// Face an absolute cardinal direction.
    Face {
        /// Raw direction name as supplied by the sandbox; the engine owns
        /// rejection of unknown names.
        direction: String,
    },
    /// Advance up to `steps` cells, stopping at the first blocked cell.
    MoveSteps {
        /// Maximum number of forward steps to attempt.
        steps: u32,
    },
    /// Collect an uncollected gem on the player's current cell.
    PickGem,
}

/// Result of applying one command to the world.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The player moved one cell.
    Advanced {
        /// Whether an uncollected gem on the destination cell was collected.
        collected_gem: bool,
    },
    /// An obstacle occupied the destination cell; nothing changed.
    Blocked,
    /// The player's heading changed.
    Rotated {
        /// Heading after the rotation, in degrees.
        yaw_degrees: f32,
    },
    /// A `Face` command named an unknown direction; nothing changed.
    Rejected,
    /// A `MoveSteps` command finished.
    Walked {
        /// Number of cells actually advanced before stopping.
        steps: u32,
    },
    /// A gem on the current cell was collected.
    Collected,
    /// No uncollected gem occupied the current cell; nothing changed.
    NothingToCollect,
}

impl StepOutcome {
    /// Whether the command mutated state. `Walked` counts as a success even
    /// at zero steps: the command itself executed as specified.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        !matches!(
            self,
            Self::Blocked | Self::Rejected | Self::NothingToCollect
        )
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The player advanced or retreated one cell.
    PlayerMoved {
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
    },
    /// Movement into an occupied cell was refused.
    MovementBlocked {
        /// Destination cell that was blocked.
        at: Position,
    },
    /// An uncollected gem was collected.
    GemCollected {
        /// Cell of the collected gem.
        at: Position,
        /// Running total of gems collected this session.
        gems_collected: u32,
    },
    /// The player's heading changed.
    PlayerRotated {
        /// Heading after the rotation, in degrees.
        yaw_degrees: f32,
    },
    /// A `Face` command named an unknown direction.
    FaceRejected {
        /// The unrecognized direction name.
        direction: String,
    },
    /// The lesson goal was reached for the first time this session.
    LessonCompleted {
        /// Move count at the moment of completion.
        moves: u32,
        /// Gems collected at the moment of completion.
        gems_collected: u32,
    },
}

/// Failure raised by learner code during a bridge call. Non-fatal: recorded
/// as the session's latest error while the remaining queue drains.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("sandbox execution failed: {message}")]
pub struct SandboxError {
    /// Human-readable failure description from the sandbox.
    pub message: String,
}

impl SandboxError {
    /// Creates a new sandbox error from any message-like value.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Immutable view of the player used by evaluators and external consumers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Cell the player occupies.
    pub position: Position,
    /// Heading in degrees within `[0, 360)`.
    pub yaw_degrees: f32,
    /// Nearest cardinal facing derived from the heading.
    pub facing: Direction,
    /// Gems collected this session.
    pub gems_collected: u32,
    /// State-changing commands applied this session.
    pub moves: u32,
}

/// Immutable view of the runtime world used by external consumers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorldSnapshot {
    /// Gems with their runtime collection flags.
    pub gems: Vec<Gem>,
    /// Obstacles placed on the grid.
    pub obstacles: Vec<Obstacle>,
}

/// Combined read-only view handed to the lesson/UI layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Player state at the time of the snapshot.
    pub player_state: PlayerSnapshot,
    /// World state at the time of the snapshot.
    pub world_state: WorldSnapshot,
    /// Whether the lesson goal has been reached this session.
    pub completed: bool,
}
