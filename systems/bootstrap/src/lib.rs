#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares an eruption run.
//!
//! Difficulty presets pair a map source with action budgets and a lava spread
//! interval. Hand-authored maps live in [`maps`]; the procedural preset
//! generates its map from the seed supplied by the caller.

use std::{fmt, str::FromStr};

use eruption_core::{ConfigError, WELCOME_BANNER};
use eruption_system_generator::{generate, GeneratorSettings};
use eruption_world::{GameMap, SimulationConfig};
use thiserror::Error;

/// Hand-authored map templates used by the fixed difficulty presets.
pub mod maps {
    /// Two ring roads around an exposed vent, generous safe zones.
    pub const EASY: [&str; 11] = [
        "WWWWWWWWWWWW",
        "W.S....S...W",
        "W.RRRWWRRR.W",
        "W.R..WW..R.W",
        "W.RH.RH.R..W",
        "W.R..V..R..W",
        "W.RH.RH.R..W",
        "W.R..WW..R.W",
        "W.RRRWWRRR.W",
        "W...S..S...W",
        "WWWWWWWWWWWW",
    ];

    /// Walled-in vent with two houses on opposite corners.
    pub const NORMAL: [&str; 11] = [
        "WWWWWWWWWWWWWWW",
        "W..H....R...S.W",
        "W.WWW.RRR.WWW.W",
        "W.R..RRRR..R..W",
        "W.R.WWWWWW.R..W",
        "W.R.W..V.W.R..W",
        "W.R.WWWWWW.R..W",
        "W.R..RRRR..R..W",
        "W.WWW.RRR.WWW.W",
        "W.S...R..H....W",
        "WWWWWWWWWWWWWWW",
    ];

    /// Narrow corridors and a single barricade to spend.
    pub const HARD: [&str; 12] = [
        "WWWWWWWWWWWWWWWW",
        "W.H..R...S..R..W",
        "W.RWWRWWWWWRW.WW",
        "W.R..R....RRR..W",
        "W.R..R.WWWW.R..W",
        "W.WWWR.W..R.R..W",
        "W.R..R.WV.R.R..W",
        "W.R..R.W..R.R..W",
        "W.RWWR.WWWW.R..W",
        "W.R..RRRR..R.R.W",
        "W.S..R....RH...W",
        "WWWWWWWWWWWWWWWW",
    ];
}

/// Generator settings used by [`Difficulty::Procedural`].
pub const PROCEDURAL_SETTINGS: GeneratorSettings = GeneratorSettings::new(29, 23, 18, 3);

/// Where a preset's map comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSource {
    /// Fixed template rows.
    Template(&'static [&'static str]),
    /// Map generated from the run's seed.
    Procedural(GeneratorSettings),
}

/// Budgets, lava pace, and map source for one difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyPreset {
    /// Map the run is played on.
    pub map: MapSource,
    /// Barricades available over the run.
    pub barricade_actions: u32,
    /// Walls that may be opened over the run.
    pub open_road_actions: u32,
    /// Ticks between lava expansions.
    pub lava_spread_interval: u32,
}

impl DifficultyPreset {
    /// Reports whether the map is generated rather than hand-authored.
    #[must_use]
    pub const fn is_procedural(&self) -> bool {
        matches!(self.map, MapSource::Procedural(_))
    }

    /// Builds the run configuration. The seed only matters for procedural maps.
    pub fn build(&self, seed: u64) -> Result<SimulationConfig, ConfigError> {
        let map = match self.map {
            MapSource::Template(rows) => GameMap::from_template(rows)?,
            MapSource::Procedural(settings) => generate(settings, seed)?.map,
        };
        SimulationConfig::new(
            map,
            self.barricade_actions,
            self.open_road_actions,
            self.lava_spread_interval,
        )
    }
}

/// Named difficulty levels offered to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// Slow lava and generous budgets.
    Easy,
    /// The default experience.
    #[default]
    Normal,
    /// Lava every tick and one action of each kind.
    Hard,
    /// Normal budgets on a freshly generated map.
    Procedural,
}

impl Difficulty {
    /// Every difficulty in menu order.
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Normal, Self::Hard, Self::Procedural];

    /// Human-readable name of the difficulty.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Procedural => "Procedural",
        }
    }

    /// Preset record backing the difficulty.
    #[must_use]
    pub const fn preset(self) -> DifficultyPreset {
        match self {
            Self::Easy => DifficultyPreset {
                map: MapSource::Template(&maps::EASY),
                barricade_actions: 3,
                open_road_actions: 3,
                lava_spread_interval: 3,
            },
            Self::Normal => DifficultyPreset {
                map: MapSource::Template(&maps::NORMAL),
                barricade_actions: 2,
                open_road_actions: 2,
                lava_spread_interval: 2,
            },
            Self::Hard => DifficultyPreset {
                map: MapSource::Template(&maps::HARD),
                barricade_actions: 1,
                open_road_actions: 1,
                lava_spread_interval: 1,
            },
            Self::Procedural => DifficultyPreset {
                map: MapSource::Procedural(PROCEDURAL_SETTINGS),
                barricade_actions: 2,
                open_road_actions: 2,
                lava_spread_interval: 2,
            },
        }
    }

    /// Builds the run configuration for this difficulty.
    pub fn config(self, seed: u64) -> Result<SimulationConfig, ConfigError> {
        self.preset().build(seed)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a difficulty name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty {0:?}; expected easy, normal, hard, or procedural")]
pub struct UnknownDifficulty(String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.display_name().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownDifficulty(value.to_owned()))
    }
}

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }

    /// Builds the configuration for a difficulty and logs the chosen map.
    pub fn prepare(
        &self,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<SimulationConfig, ConfigError> {
        let config = difficulty.config(seed)?;
        let map = config.map();
        tracing::info!(
            difficulty = difficulty.display_name(),
            procedural = difficulty.preset().is_procedural(),
            seed,
            width = map.width(),
            height = map.height(),
            citizens = map.houses().len(),
            "run prepared"
        );
        Ok(config)
    }
}
