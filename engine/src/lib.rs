#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based orchestration of an eruption run.
//!
//! The [`Engine`] owns the authoritative [`SimulationState`] and the systems
//! that mutate it. Callers serialize all access: one [`Engine::tick`] per
//! clock period, with player commands applied between ticks. A tick runs
//! movement, then lava spread on interval ticks, then outcome evaluation, and
//! hands back a fresh [`TickReport`] describing what changed.

mod outcome;

use eruption_core::{Command, CommandError, Position, TickReport};
use eruption_system_builder::Builder;
use eruption_system_lava::LavaSpread;
use eruption_system_movement::Movement;
use eruption_world::{SimulationConfig, SimulationState};

/// Single-threaded simulation driver.
#[derive(Debug)]
pub struct Engine {
    state: SimulationState,
    movement: Movement,
    lava: LavaSpread,
    builder: Builder,
}

impl Engine {
    /// Creates a run with one citizen per house and the vent already ignited.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::from_state(SimulationState::bootstrap(config))
    }

    /// Wraps an already constructed state, such as one with a custom roster.
    #[must_use]
    pub fn from_state(state: SimulationState) -> Self {
        let lava = LavaSpread::new(&state);
        Self {
            state,
            movement: Movement::default(),
            lava,
            builder: Builder::new(),
        }
    }

    /// Read-only view of the authoritative state.
    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Discards the current run and starts a new one from `config`.
    pub fn reset(&mut self, config: SimulationConfig) {
        *self = Self::new(config);
        tracing::info!(
            width = self.state.map().width(),
            height = self.state.map().height(),
            citizens = self.state.citizens().len(),
            "run reset"
        );
    }

    /// Advances the run by one tick.
    ///
    /// A finished run is left untouched: the tick counter does not move and
    /// the report only echoes the stored outcome.
    pub fn tick(&mut self) -> TickReport {
        if self.state.outcome().is_terminal() {
            return TickReport::idle(self.state.tick(), self.state.outcome());
        }

        let tick = self.state.advance_tick();
        let mut report = TickReport::new(tick);

        self.movement.handle(&mut self.state, &mut report);
        // Spread only touches in-bounds neighbours of in-bounds lava cells, so
        // an error here means the lava set and the map disagree.
        if let Err(error) = self.lava.handle(&mut self.state, &mut report) {
            tracing::error!(tick, %error, "lava spread aborted");
            debug_assert!(false, "lava spread left the map: {error}");
        }

        let outcome = outcome::evaluate(&self.state);
        if self.state.conclude(outcome) {
            tracing::info!(
                tick,
                ?outcome,
                saved = self.state.saved_count(),
                lost = self.state.lost_count(),
                "run finished"
            );
        }
        report.outcome = self.state.outcome();

        tracing::debug!(
            tick,
            saved = report.saved.len(),
            lost = report.lost.len(),
            new_lava = report.new_lava.len(),
            "tick complete"
        );
        report
    }

    /// Applies a player command, returning why it was refused.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        self.builder.apply(&mut self.state, command)?;
        if let Command::OpenRoad { position } = command {
            self.lava.reactivate_around(&self.state, position);
        }
        Ok(())
    }

    /// Places a barricade on a road tile. Returns `false` if refused.
    pub fn build_barricade(&mut self, position: Position) -> bool {
        self.apply(Command::BuildBarricade { position }).is_ok()
    }

    /// Opens a wall tile into a road. Returns `false` if refused.
    pub fn open_road(&mut self, position: Position) -> bool {
        self.apply(Command::OpenRoad { position }).is_ok()
    }
}
