#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the eruption evacuation engine.
//!
//! This crate defines the value types that connect adapters, the
//! authoritative world, and the pure systems. Adapters submit [`Command`]
//! values describing desired player actions, the engine advances the world
//! one tick at a time, and every tick produces a fresh [`TickReport`] that
//! collaborators consume and discard.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "The vent is awake. Get everyone to a safe zone.";

/// Integer grid location expressed as `x` (column) and `y` (row).
///
/// Positions are plain values and are not bound to any particular grid, so
/// they may fall outside a map; callers check `GameMap::is_inside` before
/// dereferencing tiles.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the position shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four cardinal neighbours in the fixed enumeration order
    /// `+x`, `-x`, `+y`, `-y`.
    ///
    /// Every search in the engine relies on this order to make path and
    /// spread choices reproducible.
    #[must_use]
    pub const fn neighbors4(self) -> [Position; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Static terrain class of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Open street that citizens may walk and players may barricade.
    Road,
    /// Residence where a citizen starts the run.
    House,
    /// Evacuation point that ends a citizen's run as saved.
    SafeZone,
    /// The single eruption vent; origin of all lava.
    Volcano,
    /// Solid terrain that players may open into a road.
    Wall,
}

impl TileType {
    /// Parses a template symbol into a tile type.
    ///
    /// Both `.` and `R` denote roads.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'W' => Some(Self::Wall),
            '.' | 'R' => Some(Self::Road),
            'H' => Some(Self::House),
            'S' => Some(Self::SafeZone),
            'V' => Some(Self::Volcano),
            _ => None,
        }
    }

    /// Canonical template symbol for the tile type.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Road => '.',
            Self::House => 'H',
            Self::SafeZone => 'S',
            Self::Volcano => 'V',
            Self::Wall => 'W',
        }
    }

    /// Reports whether citizens may stand on this terrain when it is
    /// otherwise unobstructed.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Road | Self::House | Self::SafeZone)
    }

    /// Reports whether the terrain participates in the adjacency graph.
    ///
    /// Walls and the vent never do, regardless of dynamic flags.
    #[must_use]
    pub const fn is_graph_node(self) -> bool {
        !matches!(self, Self::Wall | Self::Volcano)
    }
}

/// Unique identifier assigned to a citizen.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CitizenId(u32);

impl CitizenId {
    /// Creates a new citizen identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CitizenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Movement class of a citizen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CitizenKind {
    /// Walks a single tile per tick.
    Slow,
    /// Runs two tiles per tick.
    Fast,
}

impl CitizenKind {
    /// Number of tiles the citizen may cover during one tick.
    #[must_use]
    pub const fn tiles_per_tick(self) -> u32 {
        match self {
            Self::Slow => 1,
            Self::Fast => 2,
        }
    }

    /// Kind assigned to the citizen created from the `index`-th house.
    ///
    /// Even indices walk, odd indices run.
    #[must_use]
    pub const fn for_house_index(index: usize) -> Self {
        if index % 2 == 1 {
            Self::Fast
        } else {
            Self::Slow
        }
    }
}

/// Processing tier derived from a citizen's starting distance to the vent.
///
/// Tiers only order tick processing; they never grant movement precedence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PriorityTier {
    /// Tier 1: more than six tiles from the vent.
    Low,
    /// Tier 2: four to six tiles from the vent.
    Elevated,
    /// Tier 3: within three tiles of the vent.
    Critical,
}

impl PriorityTier {
    /// Derives the tier from a Manhattan distance to the vent.
    #[must_use]
    pub const fn from_vent_distance(distance: u32) -> Self {
        if distance <= 3 {
            Self::Critical
        } else if distance <= 6 {
            Self::Elevated
        } else {
            Self::Low
        }
    }

    /// Numeric tier in the range `1..=3`.
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Elevated => 2,
            Self::Critical => 3,
        }
    }
}

/// Result of a run. Once a run leaves `Running` it never returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The eruption is still unresolved.
    #[default]
    Running,
    /// Every citizen is resolved and at least one reached safety.
    Victory,
    /// Every citizen is resolved and none reached safety.
    Failure,
}

impl Outcome {
    /// Reports whether the outcome is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Player actions that alter the traversable topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Requests a barricade on the road at `position`.
    BuildBarricade {
        /// Tile that should receive the barricade.
        position: Position,
    },
    /// Requests that the wall at `position` be opened into a road.
    OpenRoad {
        /// Tile that should be promoted to a road.
        position: Position,
    },
}

impl Command {
    /// Tile targeted by the command.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::BuildBarricade { position } | Self::OpenRoad { position } => *position,
        }
    }
}

/// Per-tick summary handed to rendering, audio, and logging collaborators.
///
/// Reports are produced fresh by every tick and are never retained by the
/// engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number the report describes.
    pub tick: u64,
    /// Citizens that reached a safe zone during the tick, in processing order.
    pub saved: Vec<CitizenId>,
    /// Citizens that died during the tick, in the order they died.
    pub lost: Vec<CitizenId>,
    /// Tiles that turned to lava during the tick.
    pub new_lava: Vec<Position>,
    /// Outcome after the tick completed.
    pub outcome: Outcome,
}

impl TickReport {
    /// Creates an empty report for the provided tick.
    #[must_use]
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            saved: Vec::new(),
            lost: Vec::new(),
            new_lava: Vec::new(),
            outcome: Outcome::Running,
        }
    }

    /// Creates the report returned when a finished run is ticked again.
    #[must_use]
    pub fn idle(tick: u64, outcome: Outcome) -> Self {
        Self {
            outcome,
            ..Self::new(tick)
        }
    }

    /// Reports whether nothing happened besides the tick itself.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.saved.is_empty() && self.lost.is_empty() && self.new_lava.is_empty()
    }
}

/// Fatal problems detected while constructing a map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The template contained no rows or no columns.
    #[error("map template is empty")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the template alphabet was encountered.
    #[error("unknown map symbol {symbol:?} at {position}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Location of the character.
        position: Position,
    },
    /// The template has no `V` tile.
    #[error("map template is missing a volcano vent")]
    MissingVolcano,
    /// The template has more than one `V` tile.
    #[error("map template has a second volcano at {second}, first at {first}")]
    MultipleVolcanoes {
        /// First vent encountered in row-major order.
        first: Position,
        /// Second vent encountered in row-major order.
        second: Position,
    },
    /// A tile access fell outside the map.
    #[error("position {0} lies outside the map")]
    OutOfBounds(Position),
    /// Maze carving produced no open cells.
    #[error("generator carved no roads")]
    NoRoads,
}

/// Problems detected while assembling a simulation configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Lava must spread at most once per tick.
    #[error("lava spread interval must be at least one tick")]
    ZeroLavaInterval,
    /// The map could not be built.
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Reasons a player command may be refused. Refusals never mutate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum CommandError {
    /// The action budget for this command is spent.
    #[error("no actions of this kind remain")]
    NoActionsLeft,
    /// The target lies outside the map.
    #[error("target lies outside the map")]
    OutOfBounds,
    /// The target tile has the wrong terrain for this command.
    #[error("target tile cannot take this action")]
    InvalidTile,
    /// The target tile is already covered in lava.
    #[error("target tile is covered in lava")]
    LavaPresent,
}
