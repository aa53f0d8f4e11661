#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural map generation.
//!
//! A map is carved as a randomized depth-first maze, loosened with extra
//! passages, and then populated: the vent lands near the centre, safe zones
//! as far from it as possible (preferring the border), and houses close to it.
//! Every random draw comes from a `ChaCha8Rng` seeded with the caller's seed,
//! so the same seed always yields the same map.

use std::{cmp::Reverse, collections::VecDeque};

use eruption_core::{MapError, Position, TileType};
use eruption_world::GameMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Smallest width or height the generator produces.
pub const MIN_DIMENSION: u32 = 15;

const EXTRA_PASSAGE_CHANCE: f64 = 0.12;
const HOUSE_ACCEPT_CHANCE: f64 = 0.75;
const VOLCANO_JITTER: u32 = 4;
const CARVE_STEPS: [(i32, i32); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

/// Requested shape and population of a generated map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Requested number of columns; forced odd and at least [`MIN_DIMENSION`].
    pub width: u32,
    /// Requested number of rows; forced odd and at least [`MIN_DIMENSION`].
    pub height: u32,
    /// Number of houses to place.
    pub house_count: usize,
    /// Number of safe zones to place.
    pub safe_zone_count: usize,
}

impl GeneratorSettings {
    /// Creates a new settings descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32, house_count: usize, safe_zone_count: usize) -> Self {
        Self {
            width,
            height,
            house_count,
            safe_zone_count,
        }
    }

    /// Width actually generated for the requested width.
    #[must_use]
    pub const fn effective_width(&self) -> u32 {
        normalize_dimension(self.width)
    }

    /// Height actually generated for the requested height.
    #[must_use]
    pub const fn effective_height(&self) -> u32 {
        normalize_dimension(self.height)
    }
}

/// Placements the generator could not make because candidates ran out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shortfall {
    /// Houses requested but not placed.
    pub houses: usize,
    /// Safe zones requested but not placed.
    pub safe_zones: usize,
}

impl Shortfall {
    /// Reports whether every requested placement was made.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.houses == 0 && self.safe_zones == 0
    }
}

/// Map produced by [`generate`] together with its provenance.
#[derive(Clone, Debug)]
pub struct GeneratedMap {
    /// The generated map.
    pub map: GameMap,
    /// Seed the map was generated from.
    pub seed: u64,
    /// Requested placements that could not be made.
    pub shortfall: Shortfall,
}

/// Builds a map from the provided settings and seed.
///
/// Running out of candidate tiles is not an error: fewer houses or safe zones
/// are placed and the gap is reported in [`GeneratedMap::shortfall`].
pub fn generate(settings: GeneratorSettings, seed: u64) -> Result<GeneratedMap, MapError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut layout = Layout::walled(settings.effective_width(), settings.effective_height());

    layout.carve_maze(&mut rng);
    layout.open_extra_passages(&mut rng);

    let roads = layout.positions_of(TileType::Road);
    let volcano = layout
        .select_volcano(&roads, &mut rng)
        .ok_or(MapError::NoRoads)?;
    layout.set(volcano, TileType::Volcano);

    let distances = layout.distances_from(volcano);

    let safe_zones = layout.select_safe_zones(&distances, settings.safe_zone_count);
    for &position in &safe_zones {
        layout.set(position, TileType::SafeZone);
    }

    let houses = layout.select_houses(&distances, settings.house_count, &mut rng);
    for &position in &houses {
        layout.set(position, TileType::House);
    }

    let shortfall = Shortfall {
        houses: settings.house_count.saturating_sub(houses.len()),
        safe_zones: settings.safe_zone_count.saturating_sub(safe_zones.len()),
    };
    if !shortfall.is_empty() {
        tracing::warn!(
            seed,
            missing_houses = shortfall.houses,
            missing_safe_zones = shortfall.safe_zones,
            "generated map is short of requested placements"
        );
    }

    let map = GameMap::from_template(&layout.to_rows())?;
    tracing::debug!(
        seed,
        width = map.width(),
        height = map.height(),
        houses = map.houses().len(),
        safe_zones = map.safe_zones().len(),
        volcano = %map.volcano(),
        "generated map"
    );

    Ok(GeneratedMap {
        map,
        seed,
        shortfall,
    })
}

const fn normalize_dimension(value: u32) -> u32 {
    let odd = value | 1;
    if odd < MIN_DIMENSION {
        MIN_DIMENSION
    } else {
        odd
    }
}

#[derive(Debug)]
struct Layout {
    width: usize,
    height: usize,
    cells: Vec<TileType>,
}

impl Layout {
    fn walled(width: u32, height: u32) -> Self {
        let width = width as usize;
        let height = height as usize;
        Self {
            width,
            height,
            cells: vec![TileType::Wall; width * height],
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = usize::try_from(position.x()).ok()?;
        let y = usize::try_from(position.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    fn set(&mut self, position: Position, tile_type: TileType) {
        if let Some(index) = self.index(position) {
            self.cells[index] = tile_type;
        }
    }

    fn position_at(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }

    fn is_interior(&self, position: Position) -> bool {
        position.x() > 0
            && position.y() > 0
            && (position.x() as usize) < self.width - 1
            && (position.y() as usize) < self.height - 1
    }

    fn is_border_band(&self, position: Position) -> bool {
        let x = position.x() as usize;
        let y = position.y() as usize;
        x <= 1 || y <= 1 || x + 2 >= self.width || y + 2 >= self.height
    }

    /// Recursive backtracker over odd cells starting at `(1, 1)`.
    fn carve_maze(&mut self, rng: &mut ChaCha8Rng) {
        let start = Position::new(1, 1);
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        if let Some(index) = self.index(start) {
            visited[index] = true;
        }
        self.set(start, TileType::Road);

        while let Some(&current) = stack.last() {
            let candidates: Vec<(Position, Position)> = CARVE_STEPS
                .iter()
                .map(|&(dx, dy)| (current.offset(dx, dy), current.offset(dx / 2, dy / 2)))
                .filter(|(target, _)| self.is_interior(*target))
                .filter(|(target, _)| {
                    self.index(*target)
                        .map_or(false, |index| !visited[index])
                })
                .collect();

            if candidates.is_empty() {
                let _ = stack.pop();
                continue;
            }

            let (target, between) = candidates[rng.gen_range(0..candidates.len())];
            self.set(between, TileType::Road);
            self.set(target, TileType::Road);
            if let Some(index) = self.index(target) {
                visited[index] = true;
            }
            stack.push(target);
        }
    }

    fn open_extra_passages(&mut self, rng: &mut ChaCha8Rng) {
        for y in 1..self.height.saturating_sub(1) {
            for x in 1..self.width.saturating_sub(1) {
                let index = y * self.width + x;
                if self.cells[index] == TileType::Wall && rng.gen_bool(EXTRA_PASSAGE_CHANCE) {
                    self.cells[index] = TileType::Road;
                }
            }
        }
    }

    fn positions_of(&self, tile_type: TileType) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == tile_type)
            .map(|(index, _)| self.position_at(index))
            .collect()
    }

    /// Road closest to the centre after a small random jitter; the first
    /// minimum in row-major order wins.
    fn select_volcano(&self, roads: &[Position], rng: &mut ChaCha8Rng) -> Option<Position> {
        let center = Position::new((self.width / 2) as i32, (self.height / 2) as i32);
        roads
            .iter()
            .copied()
            .min_by_key(|road| road.manhattan_distance(center) + rng.gen_range(0..VOLCANO_JITTER))
    }

    /// Hop distances from `origin` over every non-wall cell.
    fn distances_from(&self, origin: Position) -> Vec<Option<u32>> {
        let mut distances = vec![None; self.cells.len()];
        let Some(start) = self.index(origin) else {
            return distances;
        };
        distances[start] = Some(0);
        let mut queue = VecDeque::from([origin]);

        while let Some(current) = queue.pop_front() {
            let Some(current_distance) = self.index(current).and_then(|index| distances[index])
            else {
                continue;
            };
            for neighbor in current.neighbors4() {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if self.cells[index] == TileType::Wall || distances[index].is_some() {
                    continue;
                }
                distances[index] = Some(current_distance + 1);
                queue.push_back(neighbor);
            }
        }

        distances
    }

    /// Reachable roads with their distance, in row-major order.
    fn reachable_roads(&self, distances: &[Option<u32>]) -> Vec<(Position, u32)> {
        self.cells
            .iter()
            .zip(distances)
            .enumerate()
            .filter_map(|(index, (cell, distance))| match (cell, distance) {
                (TileType::Road, Some(distance)) => Some((self.position_at(index), *distance)),
                _ => None,
            })
            .collect()
    }

    fn select_safe_zones(&self, distances: &[Option<u32>], count: usize) -> Vec<Position> {
        let mut candidates = self.reachable_roads(distances);
        candidates.sort_by_key(|&(_, distance)| Reverse(distance));

        let mut chosen: Vec<Position> = candidates
            .iter()
            .map(|&(position, _)| position)
            .filter(|&position| self.is_border_band(position))
            .take(count)
            .collect();

        for &(position, _) in &candidates {
            if chosen.len() >= count {
                break;
            }
            if !chosen.contains(&position) {
                chosen.push(position);
            }
        }

        chosen
    }

    fn select_houses(
        &self,
        distances: &[Option<u32>],
        count: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Position> {
        let mut candidates = self.reachable_roads(distances);
        candidates.sort_by_key(|&(_, distance)| distance);

        let mut chosen = Vec::with_capacity(count);
        for &(position, _) in &candidates {
            if chosen.len() >= count {
                break;
            }
            if rng.gen_bool(HOUSE_ACCEPT_CHANCE) {
                chosen.push(position);
            }
        }

        let mut tries = 0;
        while chosen.len() < count && tries < candidates.len() {
            let (position, _) = candidates[rng.gen_range(0..candidates.len())];
            if !chosen.contains(&position) {
                chosen.push(position);
            }
            tries += 1;
        }

        chosen
    }

    fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }
}
