use std::collections::BTreeSet;

use eruption_core::{CitizenId, CitizenKind, Position, PriorityTier, TickReport};
use eruption_system_lava::LavaSpread;
use eruption_world::{Citizen, GameMap, SimulationConfig, SimulationState};
use proptest::prelude::*;

const CORRIDOR: [&str; 3] = ["WWWWWWWW", "WV.....W", "WWWWWWWW"];

fn corridor(interval: u32) -> SimulationState {
    let map = GameMap::from_template(&CORRIDOR).expect("valid template");
    let config = SimulationConfig::new(map, 1, 0, interval).expect("valid config");
    SimulationState::bootstrap(config)
}

fn run_tick(lava: &mut LavaSpread, state: &mut SimulationState) -> TickReport {
    let tick = state.advance_tick();
    let mut report = TickReport::new(tick);
    lava.handle(state, &mut report).expect("lava stays inside the map");
    report
}

#[test]
fn vent_is_the_only_initial_lava_cell() {
    let state = corridor(1);
    let expected: BTreeSet<Position> = [Position::new(1, 1)].into();
    assert_eq!(state.lava_cells(), &expected);
    assert!(state.map().tile(Position::new(1, 1)).expect("inside").has_lava());
}

#[test]
fn lava_only_spreads_on_interval_ticks() {
    let mut state = corridor(3);
    let mut lava = LavaSpread::new(&state);

    let quiet: Vec<usize> = (0..2)
        .map(|_| run_tick(&mut lava, &mut state).new_lava.len())
        .collect();
    assert_eq!(quiet, vec![0, 0]);

    let report = run_tick(&mut lava, &mut state);
    assert_eq!(report.tick, 3);
    assert_eq!(report.new_lava, vec![Position::new(2, 1)]);
}

#[test]
fn barricade_delays_lava_by_exactly_one_interval() {
    let mut state = corridor(2);
    state.raise_barricade(Position::new(3, 1)).expect("inside");
    let mut lava = LavaSpread::new(&state);

    let mut by_tick = Vec::new();
    for _ in 0..8 {
        let report = run_tick(&mut lava, &mut state);
        by_tick.push((report.tick, report.new_lava));
    }

    assert_eq!(
        by_tick,
        vec![
            (1, vec![]),
            (2, vec![Position::new(2, 1)]),
            (3, vec![]),
            (4, vec![]),
            (5, vec![]),
            (6, vec![Position::new(3, 1)]),
            (7, vec![]),
            (8, vec![Position::new(4, 1)]),
        ],
        "the barricade should hold for one spread round only"
    );
    assert!(!state.map().tile(Position::new(3, 1)).expect("inside").is_barricaded());
}

#[test]
fn lava_engulfs_active_citizens_in_id_order() {
    let map = GameMap::from_template(&["V.S", "W.W"]).expect("valid template");
    let config = SimulationConfig::new(map, 0, 0, 1).expect("valid config");
    let citizens = (0..3)
        .map(|id| {
            Citizen::new(
                CitizenId::new(id),
                CitizenKind::Slow,
                PriorityTier::Critical,
                Position::new(1, 0),
            )
        })
        .collect();
    let mut state = SimulationState::with_citizens(config, citizens);
    assert!(state.mark_citizen_safe(1).is_some());
    let mut lava = LavaSpread::new(&state);

    let report = run_tick(&mut lava, &mut state);

    assert_eq!(report.lost, vec![CitizenId::new(0), CitizenId::new(2)]);
    assert_eq!(state.lost_count(), 2);
    assert_eq!(state.saved_count(), 1);
    assert!(state.citizens()[1].is_safe());
}

#[test]
fn melted_barricade_is_not_entered_in_the_same_round() {
    let map = GameMap::from_template(&["V..", "..."]).expect("valid template");
    let config = SimulationConfig::new(map, 0, 0, 1).expect("valid config");
    let mut state = SimulationState::bootstrap(config);
    let gate = Position::new(1, 1);
    state.raise_barricade(gate).expect("inside");
    let mut lava = LavaSpread::new(&state);

    let first = run_tick(&mut lava, &mut state);
    assert_eq!(first.new_lava.len(), 2);
    assert!(state.is_lava(Position::new(1, 0)));
    assert!(state.is_lava(Position::new(0, 1)));

    let second = run_tick(&mut lava, &mut state);
    let tile = state.map().tile(gate).expect("inside");
    assert!(!tile.is_barricaded(), "both sources border the gate and one melts it");
    assert!(!tile.has_lava());
    assert!(!state.is_lava(gate));
    assert!(!second.new_lava.contains(&gate));
    assert_eq!(second.new_lava, vec![Position::new(2, 0)]);

    let third = run_tick(&mut lava, &mut state);
    assert!(third.new_lava.contains(&gate));
    assert!(state.is_lava(gate));
}

#[test]
fn lava_reaching_every_edge_stays_inside_the_map() {
    let config = SimulationConfig::new(field(&[false; 49]), 0, 0, 1).expect("valid config");
    let mut state = SimulationState::bootstrap(config);
    let mut lava = LavaSpread::new(&state);

    for round in 1..=7 {
        let mut report = TickReport::new(round);
        assert_eq!(lava.spread(&mut state, &mut report), Ok(()), "round {round}");
    }

    assert_eq!(state.lava_cells().len(), 49);
    assert!(lava.frontier().is_empty());
}

fn rescan_round(state: &mut SimulationState) {
    let sources: Vec<Position> = state.lava_cells().iter().copied().collect();
    let mut claimed = BTreeSet::new();
    for source in sources {
        let neighbors: Vec<Position> = state.map().neighbors4(source).collect();
        for neighbor in neighbors {
            if state.is_lava(neighbor) || !claimed.insert(neighbor) {
                continue;
            }
            if state.melt_barricade(neighbor).expect("inside") {
                continue;
            }
            let _ = state.ignite(neighbor).expect("inside");
        }
    }
}

fn field(walls: &[bool]) -> GameMap {
    let rows: Vec<String> = (0..7)
        .map(|y| {
            (0..7)
                .map(|x| {
                    if (x, y) == (3, 3) {
                        'V'
                    } else if walls[y * 7 + x] {
                        'W'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();
    GameMap::from_template(&rows).expect("valid template")
}

proptest! {
    #[test]
    fn frontier_matches_full_rescan(
        walls in prop::collection::vec(prop::bool::weighted(0.25), 49),
        barricades in prop::collection::vec((0..7i32, 0..7i32), 0..10),
        rounds in 1usize..12,
    ) {
        let config = SimulationConfig::new(field(&walls), 0, 0, 1).expect("valid config");
        let mut state = SimulationState::bootstrap(config);
        for (x, y) in barricades {
            let position = Position::new(x, y);
            if state.map().is_traversable(position) {
                state.raise_barricade(position).expect("inside");
            }
        }
        let mut reference = state.clone();
        let mut lava = LavaSpread::new(&state);

        let mut previous = state.lava_cells().len();
        for round in 0..rounds {
            let mut report = TickReport::new(round as u64 + 1);
            lava.spread(&mut state, &mut report).expect("inside");
            rescan_round(&mut reference);

            prop_assert_eq!(state.lava_cells(), reference.lava_cells());
            prop_assert!(state.lava_cells().len() >= previous);
            prop_assert_eq!(state.lava_cells().len(), previous + report.new_lava.len());
            previous = state.lava_cells().len();
        }
    }
}
