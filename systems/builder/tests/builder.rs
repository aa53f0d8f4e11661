use eruption_core::{Command, CommandError, Position, TileType};
use eruption_system_builder::Builder;
use eruption_world::{GameMap, SimulationConfig, SimulationState};

const YARD: [&str; 4] = ["WWWWW", "WH.SW", "W.V.W", "WWWWW"];

fn state(barricades: u32, open_roads: u32) -> SimulationState {
    let map = GameMap::from_template(&YARD).expect("valid template");
    let config = SimulationConfig::new(map, barricades, open_roads, 2).expect("valid config");
    SimulationState::bootstrap(config)
}

fn tile_type(state: &SimulationState, x: i32, y: i32) -> TileType {
    state
        .map()
        .tile(Position::new(x, y))
        .expect("inside")
        .tile_type()
}

#[test]
fn barricade_on_road_spends_one_action() {
    let mut state = state(2, 0);
    let builder = Builder::new();

    assert_eq!(builder.build_barricade(&mut state, Position::new(2, 1)), Ok(()));

    assert!(
        state.map().tile(Position::new(2, 1)).expect("inside").is_barricaded(),
        "barricade should be raised on the targeted road"
    );
    assert!(!state.map().is_traversable(Position::new(2, 1)));
    assert_eq!(state.barricade_actions_left(), 1);
}

#[test]
fn barricade_on_wall_is_refused_without_spending() {
    let mut state = state(1, 0);

    let result = Builder::new().build_barricade(&mut state, Position::new(0, 0));

    assert_eq!(result, Err(CommandError::InvalidTile));
    assert_eq!(
        state.barricade_actions_left(),
        1,
        "refused commands must not consume the budget"
    );
}

#[test]
fn barricade_refused_on_houses_safe_zones_and_vent() {
    let mut state = state(3, 0);
    let builder = Builder::new();

    for (x, y) in [(1, 1), (3, 1), (2, 2)] {
        assert_eq!(
            builder.build_barricade(&mut state, Position::new(x, y)),
            Err(CommandError::InvalidTile),
            "({x},{y}) is not a road"
        );
    }
    assert_eq!(state.barricade_actions_left(), 3);
}

#[test]
fn barricade_refused_on_lava() {
    let mut state = state(1, 0);
    assert_eq!(state.ignite(Position::new(1, 2)), Ok(true));

    let result = Builder::new().build_barricade(&mut state, Position::new(1, 2));

    assert_eq!(result, Err(CommandError::LavaPresent));
    assert!(!state.map().tile(Position::new(1, 2)).expect("inside").is_barricaded());
}

#[test]
fn out_of_bounds_targets_are_refused() {
    let mut state = state(1, 1);
    let builder = Builder::new();

    assert_eq!(
        builder.build_barricade(&mut state, Position::new(-1, 2)),
        Err(CommandError::OutOfBounds)
    );
    assert_eq!(
        builder.open_road(&mut state, Position::new(5, 0)),
        Err(CommandError::OutOfBounds)
    );
    assert_eq!(state.barricade_actions_left(), 1);
    assert_eq!(state.open_road_actions_left(), 1);
}

#[test]
fn open_road_promotes_walls_only() {
    let mut state = state(0, 1);
    let builder = Builder::new();

    assert_eq!(
        builder.open_road(&mut state, Position::new(2, 1)),
        Err(CommandError::InvalidTile),
        "roads cannot be opened again"
    );
    assert_eq!(state.open_road_actions_left(), 1);

    assert_eq!(builder.open_road(&mut state, Position::new(4, 1)), Ok(()));
    assert_eq!(tile_type(&state, 4, 1), TileType::Road);
    assert!(state.map().is_traversable(Position::new(4, 1)));
    assert_eq!(state.open_road_actions_left(), 0);

    assert_eq!(
        builder.open_road(&mut state, Position::new(0, 1)),
        Err(CommandError::NoActionsLeft)
    );
    assert_eq!(tile_type(&state, 0, 1), TileType::Wall);
}

#[test]
fn preview_matches_apply_without_mutating() {
    let mut state = state(1, 1);
    let builder = Builder::new();
    let command = Command::BuildBarricade {
        position: Position::new(2, 1),
    };

    let preview = builder.preview(&state, command);
    assert!(preview.is_accepted());
    assert_eq!(state.barricade_actions_left(), 1);
    assert!(!state.map().tile(Position::new(2, 1)).expect("inside").is_barricaded());

    assert_eq!(builder.apply(&mut state, command), Ok(()));
    assert_eq!(
        builder.preview(&state, command).refusal,
        Some(CommandError::NoActionsLeft)
    );
}
