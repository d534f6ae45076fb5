use gridquest_core::{
    Gem, LessonDefinition, Obstacle, ObstacleKind, PlayerSeed, Position, Rotation,
    TargetDescriptor, TargetPosition, Tolerances, WorldLayout,
};
use gridquest_sandbox::LessonSession;
use gridquest_scheduler::{DrainState, NoopPacer};

fn lesson(
    gems: Vec<Position>,
    obstacles: Vec<Position>,
    target: TargetPosition,
    required_gems: u32,
) -> LessonDefinition {
    LessonDefinition {
        title: "session fixture".to_owned(),
        starting_code: String::new(),
        world_state: WorldLayout {
            player: PlayerSeed {
                position: Position::new(0.0, 0.0, 0.0),
                rotation: Rotation::default(),
            },
            gems: gems
                .into_iter()
                .map(|position| Gem {
                    position,
                    collected: false,
                })
                .collect(),
            obstacles: obstacles
                .into_iter()
                .map(|position| Obstacle {
                    position,
                    kind: ObstacleKind::Wall,
                })
                .collect(),
        },
        target_state: TargetDescriptor {
            target_position: target,
            required_gems_collected: required_gems,
            max_moves: 10,
        },
        tolerances: Tolerances::default(),
    }
}

#[test]
fn facing_and_walking_to_the_gem_completes_the_lesson() {
    // Worked scenario: gem two cells east, target two cells east requiring
    // one gem; `face(east)` then `move_steps(2)`.
    let mut session = LessonSession::new(lesson(
        vec![Position::new(2.0, 0.5, 0.0)],
        Vec::new(),
        TargetPosition { x: 2.0, z: 0.0 },
        1,
    ));

    let mut bridge = session.bridge();
    assert!(bridge.face("east"));
    assert_eq!(bridge.move_steps(2), 2);

    // The learner already observed the outcome; playback has not happened.
    assert_eq!(session.snapshot().player_state.moves, 0);

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    let snapshot = session.snapshot();
    assert!(snapshot.completed);
    assert_eq!(snapshot.player_state.gems_collected, 1);
    assert!((snapshot.player_state.position.x - 2.0).abs() < 0.1);
    assert!(snapshot.player_state.position.z.abs() < 0.1);
}

#[test]
fn blocked_moves_report_false_synchronously() {
    // Worked scenario: obstacle one cell east; the move reports false and
    // only the facing counts as a move.
    let mut session = LessonSession::new(lesson(
        Vec::new(),
        vec![Position::new(1.0, 0.5, 0.0)],
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));

    let mut bridge = session.bridge();
    assert!(bridge.face("east"));
    assert!(!bridge.move_forward());

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.player_state.moves, 1);
    assert!(snapshot.player_state.position.x.abs() < 0.1);
}

#[test]
fn picking_the_same_gem_twice_reports_the_second_as_a_no_op() {
    // Worked scenario: a gem on the starting cell; the first pick succeeds
    // and the second does not.
    let mut session = LessonSession::new(lesson(
        vec![Position::new(0.0, 0.5, 0.0)],
        Vec::new(),
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));

    let mut bridge = session.bridge();
    assert!(bridge.pick_gem());
    assert!(!bridge.pick_gem());

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.player_state.gems_collected, 1);
    assert_eq!(snapshot.player_state.moves, 1);
}

#[test]
fn eager_returns_match_the_paced_replay() {
    // Drive a representative program through the bridge, then drain; the
    // authoritative world must land exactly where the forecast did.
    let mut session = LessonSession::new(lesson(
        vec![Position::new(1.0, 0.5, 0.0), Position::new(2.0, 0.5, 0.0)],
        vec![Position::new(3.0, 0.5, 0.0)],
        TargetPosition { x: 2.0, z: 0.0 },
        2,
    ));

    let mut bridge = session.bridge();
    assert!(bridge.face("east"));
    assert_eq!(bridge.move_steps(5), 2);
    assert!(!bridge.move_forward());
    assert!(bridge.turn_around());
    assert!(!bridge.face("sideways"));
    assert!(bridge.move_forward());

    // Forecast-backed queries reflect everything issued so far.
    assert_eq!(bridge.direction(), "west");
    assert_eq!(bridge.gems_collected(), 2);
    let (x, z) = bridge.position();
    assert!((x - 1.0).abs() < 0.1);
    assert!(z.abs() < 0.1);

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    let snapshot = session.snapshot();
    assert!(snapshot.completed);
    assert_eq!(snapshot.player_state.gems_collected, 2);
    assert!((snapshot.player_state.position.x - 1.0).abs() < 0.1);
    assert_eq!(snapshot.player_state.facing.name(), "west");
    assert_eq!(session.history().len(), 6);
}

#[test]
fn queue_is_replayed_in_order_after_the_program_finishes() {
    let mut session = LessonSession::new(lesson(
        Vec::new(),
        Vec::new(),
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));

    let mut bridge = session.bridge();
    assert!(bridge.turn_right());
    assert!(bridge.move_forward());
    assert!(bridge.turn_left());

    assert_eq!(session.drain_state(), DrainState::Idle);
    assert_eq!(session.snapshot().player_state.moves, 0);

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    assert_eq!(session.drain_state(), DrainState::Idle);
    assert_eq!(session.snapshot().player_state.moves, 3);
    assert_eq!(session.snapshot().player_state.yaw_degrees, 0.0);
}

#[test]
fn reported_failures_surface_after_the_drain_without_aborting_it() {
    let mut session = LessonSession::new(lesson(
        Vec::new(),
        Vec::new(),
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));

    let mut bridge = session.bridge();
    assert!(bridge.move_forward());
    bridge.report_failure("ZeroDivisionError: division by zero");
    assert!(bridge.move_forward());

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    assert_eq!(
        session.last_error().map(|error| error.message.as_str()),
        Some("ZeroDivisionError: division by zero")
    );
    assert_eq!(session.snapshot().player_state.moves, 2);
}

#[test]
fn reset_discards_queued_work_and_resyncs_the_forecast() {
    let mut session = LessonSession::new(lesson(
        vec![Position::new(0.0, 0.5, 1.0)],
        Vec::new(),
        TargetPosition { x: 0.0, z: 1.0 },
        1,
    ));
    let pristine = session.snapshot();

    let mut bridge = session.bridge();
    assert!(bridge.move_forward());
    assert_eq!(bridge.gems_collected(), 1);

    session.reset();

    // Nothing queued survives the reset, and the forecast starts over.
    assert_eq!(session.snapshot(), pristine);
    assert_eq!(session.bridge().gems_collected(), 0);
    assert!(session.last_error().is_none());

    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);
    assert_eq!(session.snapshot(), pristine);
    assert!(events.is_empty());

    // The session remains fully usable after the reset.
    assert!(session.bridge().move_forward());
    session.run(&mut NoopPacer, &mut events);
    assert!(session.snapshot().completed);
}

#[test]
fn double_reset_equals_single_reset() {
    let mut session = LessonSession::new(lesson(
        vec![Position::new(0.0, 0.5, 1.0)],
        Vec::new(),
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));
    let pristine = session.snapshot();

    assert!(session.bridge().move_forward());
    let mut events = Vec::new();
    session.run(&mut NoopPacer, &mut events);

    session.reset();
    let once = session.snapshot();
    session.reset();
    let twice = session.snapshot();

    assert_eq!(once, pristine);
    assert_eq!(twice, pristine);
}

#[test]
fn negative_step_requests_clamp_to_zero() {
    let mut session = LessonSession::new(lesson(
        Vec::new(),
        Vec::new(),
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));

    let mut bridge = session.bridge();
    assert_eq!(bridge.move_steps(-3), 0);
    assert_eq!(bridge.moves(), 0);
}

#[test]
fn direction_query_tracks_turns_before_playback() {
    let mut session = LessonSession::new(lesson(
        Vec::new(),
        Vec::new(),
        TargetPosition { x: 5.0, z: 5.0 },
        0,
    ));

    let mut bridge = session.bridge();
    assert_eq!(bridge.direction(), "north");
    assert!(bridge.turn_right());
    assert_eq!(bridge.direction(), "east");
    assert!(bridge.turn_around());
    assert_eq!(bridge.direction(), "west");
    assert!(bridge.face("south"));
    assert_eq!(bridge.direction(), "south");
}
