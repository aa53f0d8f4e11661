#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lava spread cellular automaton.
//!
//! Every spread round grows the lava set by one layer of graph neighbours.
//! Only the frontier, the lava cells that may still reach a non-lava
//! neighbour, is expanded. A cell leaves the frontier once it has spread, and
//! stays in it when it melted a barricade this round so it can advance onto
//! the cleared tile on the next round.

use std::collections::BTreeSet;

use eruption_core::{MapError, Position, TickReport};
use eruption_world::SimulationState;

/// Frontier-driven lava spread system.
#[derive(Clone, Debug, Default)]
pub struct LavaSpread {
    frontier: BTreeSet<Position>,
}

impl LavaSpread {
    /// Creates the system with every current lava cell on the frontier.
    #[must_use]
    pub fn new(state: &SimulationState) -> Self {
        Self {
            frontier: state.lava_cells().clone(),
        }
    }

    /// Lava cells that will be expanded on the next round.
    #[must_use]
    pub fn frontier(&self) -> &BTreeSet<Position> {
        &self.frontier
    }

    /// Reports whether the provided tick is a spread tick.
    #[must_use]
    pub fn is_spread_tick(state: &SimulationState, tick: u64) -> bool {
        tick % u64::from(state.lava_spread_interval().get()) == 0
    }

    /// Runs one spread round if `report.tick` falls on the spread interval.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::OutOfBounds`] only if a frontier cell or one of its
    /// neighbours lies outside the map. Frontier cells are lava cells of the
    /// map and neighbours come from [`eruption_world::GameMap::neighbors4`],
    /// so a state built through [`SimulationState`] never triggers it.
    pub fn handle(
        &mut self,
        state: &mut SimulationState,
        report: &mut TickReport,
    ) -> Result<(), MapError> {
        if !Self::is_spread_tick(state, report.tick) {
            return Ok(());
        }
        self.spread(state, report)
    }

    /// Runs one synchronous spread round regardless of the interval.
    pub fn spread(
        &mut self,
        state: &mut SimulationState,
        report: &mut TickReport,
    ) -> Result<(), MapError> {
        let sources = std::mem::take(&mut self.frontier);
        let mut melted = BTreeSet::new();
        let mut ignited = Vec::new();

        for source in sources {
            let neighbors: Vec<Position> = state.map().neighbors4(source).collect();
            let mut holds = false;
            for neighbor in neighbors {
                if state.is_lava(neighbor) || melted.contains(&neighbor) {
                    continue;
                }
                if state.melt_barricade(neighbor)? {
                    let _ = melted.insert(neighbor);
                    holds = true;
                    continue;
                }
                if state.ignite(neighbor)? {
                    ignited.push(neighbor);
                    engulf_citizens(state, neighbor, report);
                }
            }
            if holds {
                let _ = self.frontier.insert(source);
            }
        }

        for &cell in &melted {
            tracing::debug!(tick = report.tick, cell = %cell, "barricade melted");
        }
        if !ignited.is_empty() {
            tracing::debug!(
                tick = report.tick,
                new_cells = ignited.len(),
                total = state.lava_cells().len(),
                "lava spread"
            );
        }

        self.frontier.extend(ignited.iter().copied());
        report.new_lava.extend(ignited);
        Ok(())
    }

    /// Returns lava cells next to `opened` to the frontier.
    ///
    /// Called after a wall is promoted to a road so lava that had run out of
    /// room can flow into the new opening.
    pub fn reactivate_around(&mut self, state: &SimulationState, opened: Position) {
        for neighbor in opened.neighbors4() {
            if state.is_lava(neighbor) {
                let _ = self.frontier.insert(neighbor);
            }
        }
    }
}

fn engulf_citizens(state: &mut SimulationState, cell: Position, report: &mut TickReport) {
    for index in state.active_citizens_at(cell) {
        if let Some(id) = state.mark_citizen_dead(index) {
            tracing::debug!(tick = report.tick, citizen = %id, cell = %cell, "citizen engulfed");
            report.lost.push(id);
        }
    }
}
