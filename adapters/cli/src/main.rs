#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted lesson session end to end.
//!
//! Loads a lesson document, feeds an action script through the sandbox
//! bridge exactly as a code executor would, then drains the queue with
//! visual pacing and prints the replayed events and the final snapshot.

mod script;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gridquest_core::LessonDefinition;
use gridquest_sandbox::LessonSession;
use gridquest_scheduler::{NoopPacer, Pacer, SleepPacer};

use crate::script::Action;

/// Runs a Gridquest lesson against a scripted sequence of actions.
#[derive(Debug, Parser)]
#[command(name = "gridquest", version, about)]
struct Args {
    /// Path to the lesson definition document (JSON).
    lesson: PathBuf,

    /// Path to the action script, one action per line.
    script: PathBuf,

    /// Pause between replayed commands, in milliseconds.
    #[arg(long, default_value_t = 140)]
    interval_ms: u64,

    /// Replay without pacing pauses.
    #[arg(long)]
    instant: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let lesson_source = fs::read_to_string(&args.lesson)
        .with_context(|| format!("reading lesson {}", args.lesson.display()))?;
    let lesson: LessonDefinition = serde_json::from_str(&lesson_source)
        .with_context(|| format!("parsing lesson {}", args.lesson.display()))?;

    let script_source = fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let actions = script::parse(&script_source)?;

    if !lesson.title.is_empty() {
        println!("lesson: {}", lesson.title);
    }

    let mut session =
        LessonSession::with_step_interval(lesson, Duration::from_millis(args.interval_ms));
    perform(&mut session, &actions);

    let mut sleep = SleepPacer;
    let mut noop = NoopPacer;
    let pacer: &mut dyn Pacer = if args.instant { &mut noop } else { &mut sleep };

    let mut events = Vec::new();
    session.run(pacer, &mut events);

    for event in &events {
        println!("event: {event:?}");
    }

    let snapshot = session.snapshot();
    println!(
        "snapshot: {}",
        serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?
    );
    match session.last_error() {
        Some(error) => println!("error: {error}"),
        None => println!("error: none"),
    }
    println!("completed: {}", snapshot.completed);

    Ok(())
}

/// Replays the parsed script against the bridge, logging each returned
/// value the way learner code would observe it.
fn perform(session: &mut LessonSession, actions: &[Action]) {
    let mut bridge = session.bridge();
    for action in actions {
        match action {
            Action::Move => {
                let moved = bridge.move_forward();
                log::info!("move() -> {moved}");
            }
            Action::Back => {
                let moved = bridge.move_backward();
                log::info!("move_backward() -> {moved}");
            }
            Action::Left => {
                let _ = bridge.turn_left();
                log::info!("turn_left()");
            }
            Action::Right => {
                let _ = bridge.turn_right();
                log::info!("turn_right()");
            }
            Action::Around => {
                let _ = bridge.turn_around();
                log::info!("turn_around()");
            }
            Action::Face(direction) => {
                let faced = bridge.face(direction);
                log::info!("face({direction}) -> {faced}");
            }
            Action::Steps(steps) => {
                let walked = bridge.move_steps(*steps);
                log::info!("move_steps({steps}) -> {walked}");
            }
            Action::Pick => {
                let picked = bridge.pick_gem();
                log::info!("pick_gem() -> {picked}");
            }
        }
    }
}
