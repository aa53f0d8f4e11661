//! Evacuating agents and their planned routes.

use std::collections::VecDeque;

use eruption_core::{CitizenId, CitizenKind, Position, PriorityTier};

/// Autonomous agent trying to reach a safe zone.
///
/// Once a citizen dies or reaches safety its position, route, and flags are
/// frozen for the rest of the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Citizen {
    id: CitizenId,
    kind: CitizenKind,
    priority: PriorityTier,
    position: Position,
    alive: bool,
    safe: bool,
    route: VecDeque<Position>,
}

impl Citizen {
    /// Creates a living, unsaved citizen with an empty route.
    #[must_use]
    pub fn new(id: CitizenId, kind: CitizenKind, priority: PriorityTier, position: Position) -> Self {
        Self {
            id,
            kind,
            priority,
            position,
            alive: true,
            safe: false,
            route: VecDeque::new(),
        }
    }

    /// Stable identifier of the citizen.
    #[must_use]
    pub const fn id(&self) -> CitizenId {
        self.id
    }

    /// Movement class of the citizen.
    #[must_use]
    pub const fn kind(&self) -> CitizenKind {
        self.kind
    }

    /// Processing tier fixed at creation.
    #[must_use]
    pub const fn priority(&self) -> PriorityTier {
        self.priority
    }

    /// Tile the citizen currently stands on.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Reports whether the citizen is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Reports whether the citizen reached a safe zone.
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        self.safe
    }

    /// Reports whether the citizen still takes part in the evacuation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.alive && !self.safe
    }

    /// Remaining planned tiles, nearest first.
    #[must_use]
    pub fn route(&self) -> &VecDeque<Position> {
        &self.route
    }

    /// Reports whether any planned tiles remain.
    #[must_use]
    pub fn has_route(&self) -> bool {
        !self.route.is_empty()
    }

    /// Replaces the planned route wholesale.
    pub fn assign_route(&mut self, route: VecDeque<Position>) {
        if self.is_active() {
            self.route = route;
        }
    }

    /// Removes and returns the next planned tile.
    pub fn next_step(&mut self) -> Option<Position> {
        if !self.is_active() {
            return None;
        }
        self.route.pop_front()
    }

    /// Moves the citizen, returning `false` once the citizen is resolved.
    pub fn move_to(&mut self, position: Position) -> bool {
        if !self.is_active() {
            return false;
        }
        self.position = position;
        true
    }

    pub(crate) fn kill(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.alive = false;
        self.route.clear();
        true
    }

    pub(crate) fn mark_safe(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.safe = true;
        self.route.clear();
        true
    }
}
