#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the eruption evacuation engine.
//!
//! The world owns the tile grid, the citizens, and every counter of a run.
//! Systems mutate it only through the methods on [`SimulationState`], which
//! keep the run's invariants intact; collaborators observe it through the
//! read-only [`query`] helpers.

mod citizen;
mod map;
mod navigation;
mod state;

pub use citizen::Citizen;
pub use map::{GameMap, Tile};
pub use navigation::PathResult;
pub use state::{SimulationConfig, SimulationState};

/// Query functions that provide read-only access to the world state.
pub mod query {
    use eruption_core::{CitizenId, CitizenKind, Position, PriorityTier};

    use super::SimulationState;

    /// Symbol drawn for lava in [`tile_rows`].
    pub const LAVA_SYMBOL: char = '~';
    /// Symbol drawn for a barricade in [`tile_rows`].
    pub const BARRICADE_SYMBOL: char = '#';

    /// Immutable representation of a single citizen's state used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct CitizenSnapshot {
        /// Unique identifier assigned to the citizen.
        pub id: CitizenId,
        /// Movement class of the citizen.
        pub kind: CitizenKind,
        /// Processing tier of the citizen.
        pub priority: PriorityTier,
        /// Tile the citizen occupies.
        pub position: Position,
        /// Whether the citizen is alive.
        pub alive: bool,
        /// Whether the citizen reached a safe zone.
        pub safe: bool,
        /// Head of the planned route, if any.
        pub next_hop: Option<Position>,
    }

    /// Read-only snapshot describing every citizen.
    #[derive(Clone, Debug, Default)]
    pub struct CitizenView {
        snapshots: Vec<CitizenSnapshot>,
    }

    impl CitizenView {
        /// Iterator over the captured snapshots in id order.
        pub fn iter(&self) -> impl Iterator<Item = &CitizenSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<CitizenSnapshot> {
            self.snapshots
        }
    }

    /// Captures a read-only view of the citizens.
    #[must_use]
    pub fn citizen_view(state: &SimulationState) -> CitizenView {
        let mut snapshots: Vec<CitizenSnapshot> = state
            .citizens()
            .iter()
            .map(|citizen| CitizenSnapshot {
                id: citizen.id(),
                kind: citizen.kind(),
                priority: citizen.priority(),
                position: citizen.position(),
                alive: citizen.is_alive(),
                safe: citizen.is_safe(),
                next_hop: citizen.route().front().copied(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        CitizenView { snapshots }
    }

    /// Renders the live grid as text rows.
    ///
    /// Terrain uses the template alphabet; lava (except on the vent) is drawn
    /// as [`LAVA_SYMBOL`] and barricades as [`BARRICADE_SYMBOL`].
    #[must_use]
    pub fn tile_rows(state: &SimulationState) -> Vec<String> {
        let map = state.map();
        let mut rows = vec![String::new(); map.height() as usize];
        for (position, tile) in map.iter() {
            let symbol = if tile.is_barricaded() {
                BARRICADE_SYMBOL
            } else if tile.has_lava() && position != map.volcano() {
                LAVA_SYMBOL
            } else {
                tile.tile_type().symbol()
            };
            if let Some(row) = rows.get_mut(position.y() as usize) {
                row.push(symbol);
            }
        }
        rows
    }
}
