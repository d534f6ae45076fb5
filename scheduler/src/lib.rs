#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooperative command scheduler for Gridquest sessions.
//!
//! The scheduler serializes command execution: commands drain in strict
//! FIFO order, at most one applies at any instant, and the loop suspends
//! for a pacing interval between consecutive entries so an external
//! presenter can replay the transitions visually. Suspension never occurs
//! mid-command. Cancellation is a generation counter: a reset invalidates
//! every entry enqueued under a prior generation by plain integer
//! comparison, so no stale command can touch freshly reset state.

use std::collections::VecDeque;
use std::time::Duration;

use gridquest_core::{Command, Event, SandboxError, StepOutcome};
use gridquest_world::{self as world, World};

/// Pause between consecutive commands during a drain, sized for visual
/// playback by an external renderer.
pub const STEP_INTERVAL: Duration = Duration::from_millis(140);

/// Monotonically increasing counter that invalidates stale queued commands
/// after a reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Creates a generation with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the generation.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Whether the scheduler is currently replaying queued commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainState {
    /// No drain in progress; the queue may be accumulating entries.
    Idle,
    /// Entries are being applied one at a time.
    Draining,
}

/// Result of processing a single queue entry.
#[derive(Clone, Debug, PartialEq)]
pub enum DrainStatus {
    /// A command was applied to the world.
    Applied(StepOutcome),
    /// A sandbox fault was recorded as the session's latest error.
    Faulted,
    /// A stale-generation entry was dropped without touching the world.
    Discarded,
    /// The queue is empty; the scheduler returned to idle.
    Drained,
}

/// Suspension seam used between commands during a drain.
pub trait Pacer {
    /// Blocks the cooperative loop for the pacing interval.
    fn pause(&mut self, interval: Duration);
}

/// Pacer that sleeps the current thread, for real visual playback.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn pause(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// Pacer that never suspends, for headless drains and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPacer;

impl Pacer for NoopPacer {
    fn pause(&mut self, _interval: Duration) {}
}

/// One applied command together with the outcome the engine reported.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionRecord {
    /// Command that was applied.
    pub command: Command,
    /// Outcome of the transition.
    pub outcome: StepOutcome,
}

#[derive(Clone, Debug)]
enum Pending {
    Command(Command),
    Fault(SandboxError),
}

#[derive(Clone, Debug)]
struct QueueEntry {
    generation: Generation,
    pending: Pending,
}

/// Serializes and paces command execution for one session.
#[derive(Debug)]
pub struct Scheduler {
    queue: VecDeque<QueueEntry>,
    generation: Generation,
    state: DrainState,
    step_interval: Duration,
    last_error: Option<SandboxError>,
    history: Vec<ExecutionRecord>,
}

impl Scheduler {
    /// Creates a scheduler with the default pacing interval.
    #[must_use]
    pub fn new() -> Self {
        Self::with_step_interval(STEP_INTERVAL)
    }

    /// Creates a scheduler pausing for the provided interval between
    /// commands.
    #[must_use]
    pub fn with_step_interval(step_interval: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            generation: Generation::new(0),
            state: DrainState::Idle,
            step_interval,
            last_error: None,
            history: Vec::new(),
        }
    }

    /// Appends a command under the current generation. The queue is
    /// unbounded for the duration of one run and stays append-only while a
    /// drain is in progress.
    pub fn enqueue(&mut self, command: Command) {
        self.queue.push_back(QueueEntry {
            generation: self.generation,
            pending: Pending::Command(command),
        });
    }

    /// Appends a sandbox fault so a learner-code exception surfaces in
    /// order with the commands around it. The drain records it as the
    /// session's latest error and continues with the remaining queue.
    pub fn report_failure(&mut self, error: SandboxError) {
        self.queue.push_back(QueueEntry {
            generation: self.generation,
            pending: Pending::Fault(error),
        });
    }

    /// Processes at most one queue entry against the world.
    ///
    /// An empty queue returns [`DrainStatus::Drained`] and puts the machine
    /// back to idle; a stale-generation entry is discarded silently.
    pub fn step(&mut self, world: &mut World, out_events: &mut Vec<Event>) -> DrainStatus {
        let Some(entry) = self.queue.pop_front() else {
            self.state = DrainState::Idle;
            return DrainStatus::Drained;
        };
        self.state = DrainState::Draining;

        let status = if entry.generation != self.generation {
            log::debug!(
                "discarding entry from stale generation {}",
                entry.generation.get()
            );
            DrainStatus::Discarded
        } else {
            match entry.pending {
                Pending::Command(command) => {
                    let outcome = world::apply(world, command.clone(), out_events);
                    self.history.push(ExecutionRecord {
                        command,
                        outcome: outcome.clone(),
                    });
                    DrainStatus::Applied(outcome)
                }
                Pending::Fault(error) => {
                    log::debug!("recording sandbox fault: {error}");
                    self.last_error = Some(error);
                    DrainStatus::Faulted
                }
            }
        };

        if self.queue.is_empty() {
            self.state = DrainState::Idle;
        }
        status
    }

    /// Drains the entire current queue in FIFO order, pausing for the
    /// pacing interval between consecutive entries.
    ///
    /// The loop pops from the live queue on every iteration, so entries
    /// appended after the run started are included. Pauses happen strictly
    /// between entries: never before the first and never after the last.
    pub fn run(&mut self, world: &mut World, pacer: &mut dyn Pacer, out_events: &mut Vec<Event>) {
        if self.queue.is_empty() {
            return;
        }

        self.state = DrainState::Draining;
        let mut processed_any = false;
        loop {
            if processed_any && !self.queue.is_empty() {
                pacer.pause(self.step_interval);
            }
            match self.step(world, out_events) {
                DrainStatus::Drained => break,
                _ => processed_any = true,
            }
        }
        log::debug!("queue drained; {} commands in history", self.history.len());
    }

    /// Forces the machine to idle from any state: clears pending entries
    /// and history, advances the generation, clears the recorded error, and
    /// reinitializes the world from its lesson snapshot.
    pub fn reset(&mut self, world: &mut World) {
        self.state = DrainState::Idle;
        self.queue.clear();
        self.generation = self.generation.next();
        self.last_error = None;
        self.history.clear();
        world.reset();
        log::debug!("scheduler reset; now at generation {}", self.generation.get());
    }

    /// Current cancellation generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a drain is in progress.
    #[must_use]
    pub const fn drain_state(&self) -> DrainState {
        self.state
    }

    /// Number of entries waiting to be processed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Latest sandbox error recorded during a drain, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&SandboxError> {
        self.last_error.as_ref()
    }

    /// Commands applied this session, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ExecutionRecord] {
        &self.history
    }

    /// Pause inserted between consecutive entries during a drain.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
