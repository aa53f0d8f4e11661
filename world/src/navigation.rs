//! Breadth-first evacuation routing over the live tile grid.

use std::collections::VecDeque;

use eruption_core::{Position, TileType};

use crate::GameMap;

/// Outcome of an evacuation route search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// Minimum-length route, starting at the origin and ending on a safe zone.
    Found(Vec<Position>),
    /// No safe zone is reachable from the origin.
    NotFound,
}

impl PathResult {
    /// Reports whether a route was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Number of steps needed to follow the route, excluding the origin.
    #[must_use]
    pub fn step_count(&self) -> Option<usize> {
        match self {
            Self::Found(path) => Some(path.len().saturating_sub(1)),
            Self::NotFound => None,
        }
    }

    /// Converts the result into a walking queue that omits the origin tile.
    ///
    /// An unreachable result yields an empty queue.
    #[must_use]
    pub fn into_route(self) -> VecDeque<Position> {
        match self {
            Self::Found(path) => path.into_iter().skip(1).collect(),
            Self::NotFound => VecDeque::new(),
        }
    }
}

impl GameMap {
    /// Finds a minimum-length route from `from` to the nearest safe zone.
    ///
    /// The search expands tiles that are currently traversable or are safe
    /// zones; the origin itself is always expanded, so a citizen stranded on a
    /// tile that just became impassable can still leave it. Neighbours are
    /// visited in `+x`, `-x`, `+y`, `-y` order, which breaks ties between
    /// equally short routes deterministically.
    #[must_use]
    pub fn shortest_path_to_safe_zone(&self, from: Position) -> PathResult {
        let Some(start) = self.index(from) else {
            return PathResult::NotFound;
        };

        let mut parents: Vec<Option<Position>> = vec![None; self.tile_count()];
        let mut visited = vec![false; self.tile_count()];
        let mut queue = VecDeque::new();

        visited[start] = true;
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current != from && self.is_safe_zone(current) {
                return PathResult::Found(self.reconstruct(&parents, current));
            }

            for neighbor in self.neighbors4(current) {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                let Ok(tile) = self.tile(neighbor) else {
                    continue;
                };
                if !tile.is_traversable() && tile.tile_type() != TileType::SafeZone {
                    continue;
                }

                visited[index] = true;
                parents[index] = Some(current);
                queue.push_back(neighbor);
            }
        }

        PathResult::NotFound
    }

    fn reconstruct(&self, parents: &[Option<Position>], target: Position) -> Vec<Position> {
        let mut path = vec![target];
        let mut cursor = target;
        while let Some(parent) = self
            .index(cursor)
            .and_then(|index| parents.get(index).copied().flatten())
        {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(rows: &[&str]) -> GameMap {
        GameMap::from_template(rows).expect("valid template")
    }

    #[test]
    fn finds_minimum_route_including_origin() {
        let map = map(&["V..", "...", "..S"]);

        let result = map.shortest_path_to_safe_zone(Position::new(2, 0));

        assert_eq!(
            result,
            PathResult::Found(vec![
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 2),
            ])
        );
        assert_eq!(result.step_count(), Some(2));
    }

    #[test]
    fn ties_break_by_enumeration_order() {
        let map = map(&["S.V", "...", "..S"]);

        let result = map.shortest_path_to_safe_zone(Position::new(1, 1));

        assert_eq!(
            result,
            PathResult::Found(vec![
                Position::new(1, 1),
                Position::new(2, 1),
                Position::new(2, 2),
            ])
        );
    }

    #[test]
    fn routes_around_barricades_and_lava() {
        let mut map = map(&["WWWWW", "WH.SW", "W.W.W", "W...W", "WWWVW"]);
        map.set_barricaded(Position::new(2, 1), true).expect("inside");

        let route = map
            .shortest_path_to_safe_zone(Position::new(1, 1))
            .into_route();

        assert_eq!(
            route,
            VecDeque::from(vec![
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
                Position::new(3, 1),
            ])
        );

        assert!(map.ignite(Position::new(2, 3)).expect("inside"));
        assert_eq!(
            map.shortest_path_to_safe_zone(Position::new(1, 1)),
            PathResult::NotFound
        );
    }

    #[test]
    fn origin_is_expanded_even_when_impassable() {
        let mut map = map(&["V.H.S"]);
        assert!(map.ignite(Position::new(2, 0)).expect("inside"));

        let result = map.shortest_path_to_safe_zone(Position::new(2, 0));

        assert!(result.is_found());
        assert_eq!(result.step_count(), Some(2));
    }

    #[test]
    fn origin_safe_zone_does_not_count_as_destination() {
        let map = map(&["S.S", "WVW"]);

        let result = map.shortest_path_to_safe_zone(Position::new(0, 0));

        assert_eq!(result.step_count(), Some(2));
    }

    #[test]
    fn outside_origin_finds_nothing() {
        let map = map(&["V.S"]);
        let result = map.shortest_path_to_safe_zone(Position::new(-1, 0));
        assert!(!result.is_found());
        assert_eq!(result, PathResult::NotFound);
        assert!(PathResult::NotFound.into_route().is_empty());
    }

    const OPEN_FIELD: [&str; 6] = [
        "S.....",
        "......",
        "...V..",
        "......",
        "......",
        ".....S",
    ];

    proptest! {
        #[test]
        fn added_barricade_never_shortens_route(
            start_x in 0i32..6,
            start_y in 0i32..6,
            block_x in 0i32..6,
            block_y in 0i32..6,
        ) {
            let mut field = map(&OPEN_FIELD);
            let start = Position::new(start_x, start_y);
            let block = Position::new(block_x, block_y);
            prop_assume!(field.is_traversable(start));
            prop_assume!(block != start);
            prop_assume!(field.tile(block).map(|tile| tile.tile_type()) == Ok(TileType::Road));

            let before = field.shortest_path_to_safe_zone(start).step_count();
            field.set_barricaded(block, true).expect("inside");
            let after = field.shortest_path_to_safe_zone(start).step_count();

            match (before, after) {
                (Some(before), Some(after)) => {
                    prop_assert!(after >= before);
                }
                (Some(_), None) => {}
                (None, after) => {
                    prop_assert_eq!(after, None);
                }
            }

            field.set_barricaded(block, false).expect("inside");
            prop_assert_eq!(field.shortest_path_to_safe_zone(start).step_count(), before);
        }

        #[test]
        fn found_routes_step_between_adjacent_open_tiles(
            start_x in 0i32..6,
            start_y in 0i32..6,
        ) {
            let field = map(&OPEN_FIELD);
            let start = Position::new(start_x, start_y);
            prop_assume!(field.is_traversable(start) && !field.is_safe_zone(start));

            let PathResult::Found(path) = field.shortest_path_to_safe_zone(start) else {
                return Err(TestCaseError::fail("open field always reaches a safe zone"));
            };

            prop_assert_eq!(path.first().copied(), Some(start));
            prop_assert!(path.last().map_or(false, |end| field.is_safe_zone(*end)));
            for pair in path.windows(2) {
                prop_assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
                prop_assert!(field.is_traversable(pair[1]));
            }
        }
    }
}
