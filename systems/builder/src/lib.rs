#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system that validates and applies player commands.

use eruption_core::{Command, CommandError, Position, TileType};
use eruption_world::SimulationState;

/// Declarative preview describing whether a command would be accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandPreview {
    /// Command being previewed.
    pub command: Command,
    /// Reason the command would be refused, if any.
    pub refusal: Option<CommandError>,
}

impl CommandPreview {
    /// Reports whether the previewed command would be accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.refusal.is_none()
    }
}

/// Builder system that turns player commands into topology changes.
///
/// Refused commands leave the state untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks a command against the current state without applying it.
    #[must_use]
    pub fn preview(&self, state: &SimulationState, command: Command) -> CommandPreview {
        CommandPreview {
            command,
            refusal: validate(state, command).err(),
        }
    }

    /// Validates and applies the command.
    pub fn apply(&self, state: &mut SimulationState, command: Command) -> Result<(), CommandError> {
        validate(state, command)?;
        let position = command.position();
        match command {
            Command::BuildBarricade { .. } => {
                state
                    .raise_barricade(position)
                    .map_err(|_| CommandError::OutOfBounds)?;
                let _ = state.spend_barricade_action();
            }
            Command::OpenRoad { .. } => {
                state
                    .promote_to_road(position)
                    .map_err(|_| CommandError::OutOfBounds)?;
                let _ = state.spend_open_road_action();
            }
        }
        tracing::info!(
            tick = state.tick(),
            ?command,
            barricades_left = state.barricade_actions_left(),
            open_roads_left = state.open_road_actions_left(),
            "command applied"
        );
        Ok(())
    }

    /// Places a barricade on a road tile.
    pub fn build_barricade(
        &self,
        state: &mut SimulationState,
        position: Position,
    ) -> Result<(), CommandError> {
        self.apply(state, Command::BuildBarricade { position })
    }

    /// Promotes a wall tile to a road.
    pub fn open_road(
        &self,
        state: &mut SimulationState,
        position: Position,
    ) -> Result<(), CommandError> {
        self.apply(state, Command::OpenRoad { position })
    }
}

fn validate(state: &SimulationState, command: Command) -> Result<(), CommandError> {
    let (budget, required) = match command {
        Command::BuildBarricade { .. } => (state.barricade_actions_left(), TileType::Road),
        Command::OpenRoad { .. } => (state.open_road_actions_left(), TileType::Wall),
    };
    if budget == 0 {
        return Err(CommandError::NoActionsLeft);
    }

    let tile = state
        .map()
        .tile(command.position())
        .map_err(|_| CommandError::OutOfBounds)?;
    if tile.tile_type() != required {
        return Err(CommandError::InvalidTile);
    }
    if tile.has_lava() {
        return Err(CommandError::LavaPresent);
    }
    Ok(())
}
