//! Scripted player actions in `<tick>:<barricade|open>:<x>,<y>` form.

use std::str::FromStr;

use eruption_core::{Command, Position};
use thiserror::Error;

/// Player command scheduled before a specific tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedAction {
    /// Tick the command precedes.
    pub(crate) tick: u64,
    /// Command to apply.
    pub(crate) command: Command,
}

/// Reasons a scripted action could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The action did not have three `:`-separated fields.
    #[error("expected <tick>:<barricade|open>:<x>,<y>, got {0:?}")]
    Malformed(String),
    /// The tick field was not a positive integer.
    #[error("invalid tick {0:?}")]
    InvalidTick(String),
    /// The command field named an unknown action.
    #[error("unknown action {0:?}; expected barricade or open")]
    UnknownAction(String),
    /// The coordinate field was not `<x>,<y>`.
    #[error("invalid coordinates {0:?}")]
    InvalidPosition(String),
}

impl FromStr for ScriptedAction {
    type Err = ScriptError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut fields = value.trim().splitn(3, ':');
        let (Some(tick), Some(action), Some(coordinates)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(ScriptError::Malformed(value.to_owned()));
        };

        let tick = tick
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|tick| *tick > 0)
            .ok_or_else(|| ScriptError::InvalidTick(tick.to_owned()))?;
        let position = parse_position(coordinates)?;
        let command = match action.trim().to_ascii_lowercase().as_str() {
            "barricade" | "b" => Command::BuildBarricade { position },
            "open" | "o" => Command::OpenRoad { position },
            _ => return Err(ScriptError::UnknownAction(action.to_owned())),
        };

        Ok(Self { tick, command })
    }
}

fn parse_position(value: &str) -> Result<Position, ScriptError> {
    let invalid = || ScriptError::InvalidPosition(value.to_owned());
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<i32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok(Position::new(x, y))
}

/// Scripted actions ordered by tick, preserving input order within a tick.
#[derive(Clone, Debug, Default)]
pub(crate) struct Script {
    actions: Vec<ScriptedAction>,
}

impl Script {
    pub(crate) fn new(mut actions: Vec<ScriptedAction>) -> Self {
        actions.sort_by_key(|action| action.tick);
        Self { actions }
    }

    /// Commands scheduled before `tick`.
    pub(crate) fn due(&self, tick: u64) -> impl Iterator<Item = Command> + '_ {
        self.actions
            .iter()
            .filter(move |action| action.tick == tick)
            .map(|action| action.command)
    }
}
