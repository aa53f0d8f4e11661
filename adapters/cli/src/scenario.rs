//! Custom scenarios loaded from TOML files.
//!
//! ```toml
//! map = [
//!     "WWWWW",
//!     "WH.SW",
//!     "W.V.W",
//!     "WWWWW",
//! ]
//! barricade_actions = 1
//! open_road_actions = 0
//! lava_spread_interval = 2
//! actions = ["2:barricade:1,2"]
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use eruption_world::{GameMap, SimulationConfig};
use serde::Deserialize;

use crate::script::ScriptedAction;

/// Scenario file contents before validation.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    map: Vec<String>,
    #[serde(default)]
    barricade_actions: u32,
    #[serde(default)]
    open_road_actions: u32,
    #[serde(default = "default_interval")]
    lava_spread_interval: u32,
    #[serde(default)]
    actions: Vec<String>,
}

const fn default_interval() -> u32 {
    1
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario TOML")
    }

    pub(crate) fn config(&self) -> Result<SimulationConfig> {
        let map = GameMap::from_template(&self.map).context("scenario map is malformed")?;
        SimulationConfig::new(
            map,
            self.barricade_actions,
            self.open_road_actions,
            self.lava_spread_interval,
        )
        .context("scenario settings are invalid")
    }

    pub(crate) fn actions(&self) -> Result<Vec<ScriptedAction>> {
        self.actions
            .iter()
            .map(|action| {
                action
                    .parse::<ScriptedAction>()
                    .with_context(|| format!("scenario action {action:?}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eruption_core::{Command, Position};

    const YARD: &str = r#"
map = ["WWWWW", "WH.SW", "W.V.W", "WWWWW"]
barricade_actions = 1
lava_spread_interval = 2
actions = ["2:barricade:1,2"]
"#;

    #[test]
    fn parses_a_complete_scenario() {
        let scenario = Scenario::parse(YARD).expect("valid scenario");
        let config = scenario.config().expect("valid config");

        assert_eq!(config.barricade_actions(), 1);
        assert_eq!(config.open_road_actions(), 0);
        assert_eq!(config.lava_spread_interval().get(), 2);
        assert_eq!(config.map().volcano(), Position::new(2, 2));
        assert_eq!(
            scenario.actions().expect("valid actions")[0].command,
            Command::BuildBarricade {
                position: Position::new(1, 2),
            }
        );
    }

    #[test]
    fn interval_defaults_to_every_tick() {
        let scenario = Scenario::parse(r#"map = ["HV.S"]"#).expect("valid scenario");
        assert_eq!(scenario.config().expect("valid config").lava_spread_interval().get(), 1);
    }

    #[test]
    fn malformed_maps_are_reported() {
        let scenario = Scenario::parse(r#"map = ["H..S"]"#).expect("valid TOML");
        let error = scenario.config().expect_err("no vent");
        assert!(format!("{error:#}").contains("missing a volcano"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let scenario =
            Scenario::parse("map = [\"V.S\"]\nlava_spread_interval = 0").expect("valid TOML");
        assert!(scenario.config().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Scenario::parse("map = [\"V.S\"]\nlava = 3").is_err());
    }
}
