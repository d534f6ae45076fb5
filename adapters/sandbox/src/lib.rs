#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sandbox adapter: the contract between the external code executor and a
//! Gridquest session.
//!
//! Learner code must observe each operation's outcome synchronously even
//! though visual playback is paced. The session therefore keeps two worlds:
//! bridge operations apply each command eagerly to a private **forecast**
//! world (producing the return value) while enqueueing the same command for
//! the paced drain against the authoritative world. The engine is
//! deterministic, so the drained outcomes match the forecast exactly; the
//! parity test in `tests/session.rs` pins this equivalence.

use std::time::Duration;

use gridquest_core::{
    Command, Event, LessonDefinition, SandboxError, SessionSnapshot, StepOutcome,
};
use gridquest_scheduler::{DrainState, DrainStatus, ExecutionRecord, Pacer, Scheduler};
use gridquest_world::{self as world, query, World};

/// Explicit simulation-session object owning one live player/world pair.
///
/// Whichever component starts a lesson owns the session and passes it by
/// reference to collaborators; there is no process-wide state.
#[derive(Debug)]
pub struct LessonSession {
    world: World,
    forecast: World,
    scheduler: Scheduler,
}

impl LessonSession {
    /// Initializes a session from a lesson definition with default pacing.
    #[must_use]
    pub fn new(lesson: LessonDefinition) -> Self {
        Self::with_scheduler(lesson, Scheduler::new())
    }

    /// Initializes a session pausing for the provided interval between
    /// replayed commands.
    #[must_use]
    pub fn with_step_interval(lesson: LessonDefinition, step_interval: Duration) -> Self {
        Self::with_scheduler(lesson, Scheduler::with_step_interval(step_interval))
    }

    fn with_scheduler(lesson: LessonDefinition, scheduler: Scheduler) -> Self {
        let world = World::from_lesson(lesson);
        let forecast = world.clone();
        Self {
            world,
            forecast,
            scheduler,
        }
    }

    /// Restores the lesson's original snapshot and invalidates every queued
    /// command. Idempotent.
    pub fn reset(&mut self) {
        self.scheduler.reset(&mut self.world);
        self.forecast = self.world.clone();
    }

    /// Read-only view of the authoritative state for the lesson/UI layer.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        query::snapshot(&self.world)
    }

    /// Latest sandbox error recorded during a drain, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&SandboxError> {
        self.scheduler.last_error()
    }

    /// Commands applied to the authoritative world, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ExecutionRecord] {
        self.scheduler.history()
    }

    /// Whether a drain is in progress.
    #[must_use]
    pub fn drain_state(&self) -> DrainState {
        self.scheduler.drain_state()
    }

    /// Drains every queued command against the authoritative world, pausing
    /// between commands through the provided pacer.
    pub fn run(&mut self, pacer: &mut dyn Pacer, out_events: &mut Vec<Event>) {
        self.scheduler.run(&mut self.world, pacer, out_events);
    }

    /// Processes at most one queued command, for hosts that interleave
    /// their own work with the drain.
    pub fn step(&mut self, out_events: &mut Vec<Event>) -> DrainStatus {
        self.scheduler.step(&mut self.world, out_events)
    }

    /// Borrows the operation surface handed to the code executor.
    #[must_use]
    pub fn bridge(&mut self) -> SandboxBridge<'_> {
        SandboxBridge { session: self }
    }
}

/// Named operations the external code executor calls while learner code
/// runs.
///
/// Every operation enqueues exactly one command and returns a value
/// reflecting that command's outcome synchronously. Query operations answer
/// from the forecast so mid-program reads observe the state the already
/// issued commands will produce.
#[derive(Debug)]
pub struct SandboxBridge<'session> {
    session: &'session mut LessonSession,
}

impl SandboxBridge<'_> {
    fn submit(&mut self, command: Command) -> StepOutcome {
        // Forecast events are discarded: presenters replay the
        // authoritative events produced by the paced drain.
        let mut scratch = Vec::new();
        let outcome = world::apply(&mut self.session.forecast, command.clone(), &mut scratch);
        self.session.scheduler.enqueue(command);
        outcome
    }

    /// Advances one cell in the facing direction. False when blocked.
    pub fn move_forward(&mut self) -> bool {
        self.submit(Command::MoveForward).succeeded()
    }

    /// Retreats one cell opposite the facing direction. False when blocked.
    pub fn move_backward(&mut self) -> bool {
        self.submit(Command::MoveBackward).succeeded()
    }

    /// Rotates 90 degrees counter-clockwise. Always succeeds.
    pub fn turn_left(&mut self) -> bool {
        self.submit(Command::TurnLeft).succeeded()
    }

    /// Rotates 90 degrees clockwise. Always succeeds.
    pub fn turn_right(&mut self) -> bool {
        self.submit(Command::TurnRight).succeeded()
    }

    /// Rotates 180 degrees. Always succeeds.
    pub fn turn_around(&mut self) -> bool {
        self.submit(Command::TurnAround).succeeded()
    }

    /// Faces an absolute cardinal direction. False for unknown names.
    pub fn face(&mut self, direction: &str) -> bool {
        self.submit(Command::Face {
            direction: direction.to_owned(),
        })
        .succeeded()
    }

    /// Advances up to `steps` cells, stopping at the first blocked cell.
    /// Returns the number of cells actually covered; negative requests
    /// clamp to zero.
    pub fn move_steps(&mut self, steps: i64) -> u32 {
        let requested = u32::try_from(steps.max(0)).unwrap_or(u32::MAX);
        match self.submit(Command::MoveSteps { steps: requested }) {
            StepOutcome::Walked { steps } => steps,
            _ => 0,
        }
    }

    /// Collects an uncollected gem on the current cell. False when there is
    /// nothing to collect.
    pub fn pick_gem(&mut self) -> bool {
        self.submit(Command::PickGem).succeeded()
    }

    /// Routes a learner-code exception into the drain so it is recorded as
    /// the session's latest error without aborting the remaining queue.
    pub fn report_failure(&mut self, message: impl Into<String>) {
        self.session
            .scheduler
            .report_failure(SandboxError::new(message));
    }

    /// Current facing as a lowercase cardinal name.
    #[must_use]
    pub fn direction(&self) -> &'static str {
        query::player(&self.session.forecast).facing.name()
    }

    /// Current horizontal position as `(x, z)`.
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        let position = query::player(&self.session.forecast).position;
        (position.x, position.z)
    }

    /// Gems collected so far.
    #[must_use]
    pub fn gems_collected(&self) -> u32 {
        query::player(&self.session.forecast).gems_collected
    }

    /// State-changing commands issued so far.
    #[must_use]
    pub fn moves(&self) -> u32 {
        query::player(&self.session.forecast).moves
    }
}
