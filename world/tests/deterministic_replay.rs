use gridquest_core::{
    Command, Gem, LessonDefinition, Obstacle, ObstacleKind, PlayerSeed, Position, Rotation,
    TargetDescriptor, TargetPosition, Tolerances, WorldLayout,
};
use gridquest_world::{self as world, query, World};

fn scripted_lesson() -> LessonDefinition {
    LessonDefinition {
        title: "replay fixture".to_owned(),
        starting_code: String::new(),
        world_state: WorldLayout {
            player: PlayerSeed {
                position: Position::new(0.0, 0.0, 0.0),
                rotation: Rotation::default(),
            },
            gems: vec![
                Gem {
                    position: Position::new(1.0, 0.5, 0.0),
                    collected: false,
                },
                Gem {
                    position: Position::new(2.0, 0.5, 0.0),
                    collected: false,
                },
                Gem {
                    position: Position::new(2.0, 0.5, 2.0),
                    collected: false,
                },
            ],
            obstacles: vec![Obstacle {
                position: Position::new(3.0, 0.5, 0.0),
                kind: ObstacleKind::Wall,
            }],
        },
        target_state: TargetDescriptor {
            target_position: TargetPosition { x: 2.0, z: 2.0 },
            required_gems_collected: 3,
            max_moves: 20,
        },
        tolerances: Tolerances::default(),
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::Face {
            direction: "east".to_owned(),
        },
        Command::MoveSteps { steps: 5 },
        Command::Face {
            direction: "diagonal".to_owned(),
        },
        Command::TurnLeft,
        Command::MoveForward,
        Command::MoveForward,
        Command::PickGem,
        Command::PickGem,
        Command::MoveBackward,
        Command::TurnAround,
        Command::MoveForward,
    ]
}

#[test]
fn identical_scripts_replay_identically() {
    let script = scripted_commands();

    let mut first = World::from_lesson(scripted_lesson());
    let mut second = World::from_lesson(scripted_lesson());

    let mut first_events = Vec::new();
    let mut second_events = Vec::new();
    let first_outcomes: Vec<_> = script
        .iter()
        .cloned()
        .map(|command| world::apply(&mut first, command, &mut first_events))
        .collect();
    let second_outcomes: Vec<_> = script
        .into_iter()
        .map(|command| world::apply(&mut second, command, &mut second_events))
        .collect();

    assert_eq!(first_outcomes, second_outcomes, "outcomes diverged");
    assert_eq!(first_events, second_events, "events diverged");
    assert_eq!(
        query::snapshot(&first),
        query::snapshot(&second),
        "snapshots diverged"
    );
}

#[test]
fn replay_reaches_the_scripted_end_state() {
    let mut world = World::from_lesson(scripted_lesson());
    let mut events = Vec::new();
    for command in scripted_commands() {
        let _ = world::apply(&mut world, command, &mut events);
    }

    // East to the wall (two gems swept up), a rejected facing, north two
    // cells onto the third gem, two failed picks, a step back south, and a
    // half turn followed by one more step south again.
    let snapshot = query::snapshot(&world);
    assert_eq!(snapshot.player_state.gems_collected, 3);
    assert!(snapshot.completed);
    assert!(
        snapshot
            .world_state
            .gems
            .iter()
            .all(|gem| gem.collected),
        "all gems should be collected"
    );
}
