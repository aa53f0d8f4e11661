//! Authoritative simulation snapshot and the configuration it was built from.

use std::{collections::BTreeSet, num::NonZeroU32};

use eruption_core::{
    CitizenId, CitizenKind, ConfigError, MapError, Outcome, Position, PriorityTier,
};

use crate::{Citizen, GameMap};

/// Parameters that define a single evacuation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    map: GameMap,
    barricade_actions: u32,
    open_road_actions: u32,
    lava_spread_interval: NonZeroU32,
}

impl SimulationConfig {
    /// Creates a configuration, rejecting a zero lava spread interval.
    pub fn new(
        map: GameMap,
        barricade_actions: u32,
        open_road_actions: u32,
        lava_spread_interval: u32,
    ) -> Result<Self, ConfigError> {
        let lava_spread_interval =
            NonZeroU32::new(lava_spread_interval).ok_or(ConfigError::ZeroLavaInterval)?;
        Ok(Self {
            map,
            barricade_actions,
            open_road_actions,
            lava_spread_interval,
        })
    }

    /// Map the run starts from.
    #[must_use]
    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// Barricades the player may build over the whole run.
    #[must_use]
    pub const fn barricade_actions(&self) -> u32 {
        self.barricade_actions
    }

    /// Walls the player may open over the whole run.
    #[must_use]
    pub const fn open_road_actions(&self) -> u32 {
        self.open_road_actions
    }

    /// Ticks between lava expansions.
    #[must_use]
    pub const fn lava_spread_interval(&self) -> NonZeroU32 {
        self.lava_spread_interval
    }
}

/// Complete mutable state of a run.
///
/// Counters only grow, the lava set only grows, budgets never go below
/// zero, and the outcome never leaves a terminal value. Every mutator below
/// upholds those rules so systems cannot break them.
#[derive(Clone, Debug)]
pub struct SimulationState {
    config: SimulationConfig,
    citizens: Vec<Citizen>,
    lava_cells: BTreeSet<Position>,
    tick: u64,
    barricade_actions_left: u32,
    open_road_actions_left: u32,
    saved: usize,
    lost: usize,
    outcome: Outcome,
}

impl SimulationState {
    /// Creates the run, placing one citizen on every house.
    ///
    /// Citizens alternate slow and fast in house order, and their priority
    /// tier reflects how close their house is to the vent.
    #[must_use]
    pub fn bootstrap(config: SimulationConfig) -> Self {
        let volcano = config.map().volcano();
        let citizens = config
            .map()
            .houses()
            .iter()
            .enumerate()
            .map(|(index, &house)| {
                Citizen::new(
                    CitizenId::new(index as u32),
                    CitizenKind::for_house_index(index),
                    PriorityTier::from_vent_distance(house.manhattan_distance(volcano)),
                    house,
                )
            })
            .collect();
        Self::with_citizens(config, citizens)
    }

    /// Creates the run with an explicit citizen roster.
    ///
    /// The vent is ignited immediately and seeds the lava set.
    #[must_use]
    pub fn with_citizens(config: SimulationConfig, citizens: Vec<Citizen>) -> Self {
        let mut state = Self {
            barricade_actions_left: config.barricade_actions(),
            open_road_actions_left: config.open_road_actions(),
            config,
            citizens,
            lava_cells: BTreeSet::new(),
            tick: 0,
            saved: 0,
            lost: 0,
            outcome: Outcome::Running,
        };
        let volcano = state.map().volcano();
        let _ = state.ignite(volcano);
        state
    }

    /// Configuration the run was created from.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Live map, including lava and barricade flags.
    #[must_use]
    pub fn map(&self) -> &GameMap {
        &self.config.map
    }

    /// Every citizen in id order.
    #[must_use]
    pub fn citizens(&self) -> &[Citizen] {
        &self.citizens
    }

    /// Tiles covered in lava, including the vent.
    #[must_use]
    pub fn lava_cells(&self) -> &BTreeSet<Position> {
        &self.lava_cells
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Ticks between lava expansions.
    #[must_use]
    pub const fn lava_spread_interval(&self) -> NonZeroU32 {
        self.config.lava_spread_interval
    }

    /// Barricades the player may still build.
    #[must_use]
    pub const fn barricade_actions_left(&self) -> u32 {
        self.barricade_actions_left
    }

    /// Walls the player may still open.
    #[must_use]
    pub const fn open_road_actions_left(&self) -> u32 {
        self.open_road_actions_left
    }

    /// Citizens that reached a safe zone.
    #[must_use]
    pub const fn saved_count(&self) -> usize {
        self.saved
    }

    /// Citizens that died.
    #[must_use]
    pub const fn lost_count(&self) -> usize {
        self.lost
    }

    /// Current outcome of the run.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Reports whether every citizen is either saved or lost.
    #[must_use]
    pub fn everyone_resolved(&self) -> bool {
        self.saved + self.lost == self.citizens.len()
    }

    /// Reports whether the tile is covered in lava.
    #[must_use]
    pub fn is_lava(&self, position: Position) -> bool {
        self.lava_cells.contains(&position)
    }

    /// Citizen indices in processing order: highest priority first, then
    /// lowest id.
    #[must_use]
    pub fn processing_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.citizens.len()).collect();
        order.sort_by_key(|&index| {
            let citizen = &self.citizens[index];
            (std::cmp::Reverse(citizen.priority()), citizen.id())
        });
        order
    }

    /// Indices of active citizens standing on the tile, in id order.
    #[must_use]
    pub fn active_citizens_at(&self, position: Position) -> Vec<usize> {
        self.citizens
            .iter()
            .enumerate()
            .filter(|(_, citizen)| citizen.is_active() && citizen.position() == position)
            .map(|(index, _)| index)
            .collect()
    }

    /// Mutable access to a citizen's position and route.
    pub fn citizen_mut(&mut self, index: usize) -> Option<&mut Citizen> {
        self.citizens.get_mut(index)
    }

    /// Advances the tick counter, returning the new tick number.
    pub fn advance_tick(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    /// Marks the citizen as saved, counting it once.
    pub fn mark_citizen_safe(&mut self, index: usize) -> Option<CitizenId> {
        let citizen = self.citizens.get_mut(index)?;
        if !citizen.mark_safe() {
            return None;
        }
        self.saved += 1;
        Some(citizen.id())
    }

    /// Marks the citizen as lost, counting it once.
    pub fn mark_citizen_dead(&mut self, index: usize) -> Option<CitizenId> {
        let citizen = self.citizens.get_mut(index)?;
        if !citizen.kill() {
            return None;
        }
        self.lost += 1;
        Some(citizen.id())
    }

    /// Covers the tile in lava, returning `true` if it was not lava before.
    pub fn ignite(&mut self, position: Position) -> Result<bool, MapError> {
        let newly_lit = self.config.map.ignite(position)?;
        let inserted = self.lava_cells.insert(position);
        Ok(newly_lit || inserted)
    }

    /// Places a barricade flag on the tile.
    pub fn raise_barricade(&mut self, position: Position) -> Result<(), MapError> {
        self.config.map.set_barricaded(position, true)
    }

    /// Removes a barricade, returning `true` if one stood on the tile.
    pub fn melt_barricade(&mut self, position: Position) -> Result<bool, MapError> {
        let barricaded = self.map().tile(position)?.is_barricaded();
        if barricaded {
            self.config.map.set_barricaded(position, false)?;
        }
        Ok(barricaded)
    }

    /// Permanently converts the tile into a road.
    pub fn promote_to_road(&mut self, position: Position) -> Result<(), MapError> {
        self.config.map.promote_to_road(position)
    }

    /// Spends one barricade action, returning `false` if none remain.
    pub fn spend_barricade_action(&mut self) -> bool {
        match self.barricade_actions_left.checked_sub(1) {
            Some(left) => {
                self.barricade_actions_left = left;
                true
            }
            None => false,
        }
    }

    /// Spends one open-road action, returning `false` if none remain.
    pub fn spend_open_road_action(&mut self) -> bool {
        match self.open_road_actions_left.checked_sub(1) {
            Some(left) => {
                self.open_road_actions_left = left;
                true
            }
            None => false,
        }
    }

    /// Records a terminal outcome. Returns `false` if the run already ended
    /// or `outcome` is `Running`.
    pub fn conclude(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_terminal() || !outcome.is_terminal() {
            return false;
        }
        self.outcome = outcome;
        true
    }
}
