#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that plans routes and walks citizens.
//!
//! Routes are planned lazily: a citizen only asks for a new route when its
//! queue runs dry, so fresh barricades and lava are noticed on the next plan
//! rather than by patching the old one.

use eruption_core::TickReport;
use eruption_world::{Citizen, SimulationState};

/// Pure system that advances every active citizen once per tick.
#[derive(Debug, Default)]
pub struct Movement {
    replans: u64,
}

impl Movement {
    /// Moves every active citizen, highest priority first and then by id.
    ///
    /// Deaths and rescues are appended to `report` in the order they happen.
    pub fn handle(&mut self, state: &mut SimulationState, report: &mut TickReport) {
        for index in state.processing_order() {
            self.advance(state, index, report);
        }
    }

    /// Number of routes planned since the system was created.
    #[must_use]
    pub const fn replans(&self) -> u64 {
        self.replans
    }

    fn advance(&mut self, state: &mut SimulationState, index: usize, report: &mut TickReport) {
        let Some(citizen) = state.citizens().get(index) else {
            return;
        };
        if !citizen.is_active() {
            return;
        }
        let budget = citizen.kind().tiles_per_tick();

        for _ in 0..budget {
            if !self.ensure_route(state, index) {
                break;
            }
            let Some(next) = state.citizen_mut(index).and_then(Citizen::next_step) else {
                break;
            };
            let _ = state.citizen_mut(index).map(|citizen| citizen.move_to(next));

            if state.is_lava(next) {
                if let Some(id) = state.mark_citizen_dead(index) {
                    tracing::debug!(tick = report.tick, citizen = %id, cell = %next, "citizen walked into lava");
                    report.lost.push(id);
                }
                break;
            }
            if state.map().is_safe_zone(next) {
                if let Some(id) = state.mark_citizen_safe(index) {
                    tracing::debug!(tick = report.tick, citizen = %id, cell = %next, "citizen reached safety");
                    report.saved.push(id);
                }
                break;
            }
        }
    }

    /// Plans a fresh route when the queue is empty. Returns `false` when the
    /// citizen has nowhere to go this tick.
    fn ensure_route(&mut self, state: &mut SimulationState, index: usize) -> bool {
        let Some(citizen) = state.citizens().get(index) else {
            return false;
        };
        if citizen.has_route() {
            return true;
        }

        let origin = citizen.position();
        let id = citizen.id();
        let route = state.map().shortest_path_to_safe_zone(origin).into_route();
        self.replans += 1;
        if route.is_empty() {
            tracing::debug!(citizen = %id, cell = %origin, "no route to a safe zone");
            return false;
        }

        match state.citizen_mut(index) {
            Some(citizen) => {
                citizen.assign_route(route);
                citizen.has_route()
            }
            None => false,
        }
    }
}
