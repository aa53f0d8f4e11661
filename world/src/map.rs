//! Tile grid ownership, template parsing, and topology queries.

use eruption_core::{MapError, Position, TileType};

/// Mutable state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    tile_type: TileType,
    barricaded: bool,
    lava: bool,
}

impl Tile {
    /// Creates an unobstructed tile of the provided terrain.
    #[must_use]
    pub const fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            barricaded: false,
            lava: false,
        }
    }

    /// Terrain class of the tile.
    #[must_use]
    pub const fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Reports whether a barricade currently stands on the tile.
    #[must_use]
    pub const fn is_barricaded(&self) -> bool {
        self.barricaded
    }

    /// Reports whether lava covers the tile.
    #[must_use]
    pub const fn has_lava(&self) -> bool {
        self.lava
    }

    /// Reports whether a citizen may currently step onto the tile.
    ///
    /// Walls and the vent are never traversable regardless of flags.
    #[must_use]
    pub const fn is_traversable(&self) -> bool {
        !self.lava && !self.barricaded && self.tile_type.is_walkable()
    }

    fn set_barricaded(&mut self, barricaded: bool) {
        self.barricaded = barricaded;
    }

    fn ignite(&mut self) -> bool {
        let was_lava = self.lava;
        self.lava = true;
        !was_lava
    }

    fn promote_to_road(&mut self) {
        self.tile_type = TileType::Road;
    }
}

/// Rectangular tile grid with the immutable layout derived from its template.
///
/// Dimensions, houses, safe zones, and the vent are fixed at construction.
/// Only tile flags and the wall-to-road promotion change afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    houses: Vec<Position>,
    safe_zones: Vec<Position>,
    volcano: Position,
}

impl GameMap {
    /// Parses a textual template, one character per cell.
    ///
    /// `W` is a wall, `.` or `R` a road, `H` a house, `S` a safe zone and
    /// `V` the vent. Houses and safe zones are recorded in row-major order.
    pub fn from_template<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let width = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut houses = Vec::new();
        let mut safe_zones = Vec::new();
        let mut volcano: Option<Position> = None;

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, symbol) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                let tile_type = TileType::from_symbol(symbol)
                    .ok_or(MapError::UnknownSymbol { symbol, position })?;
                match tile_type {
                    TileType::House => houses.push(position),
                    TileType::SafeZone => safe_zones.push(position),
                    TileType::Volcano => {
                        if let Some(first) = volcano {
                            return Err(MapError::MultipleVolcanoes {
                                first,
                                second: position,
                            });
                        }
                        volcano = Some(position);
                    }
                    TileType::Road | TileType::Wall => {}
                }
                tiles.push(Tile::new(tile_type));
            }
        }

        let volcano = volcano.ok_or(MapError::MissingVolcano)?;

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            tiles,
            houses,
            safe_zones,
            volcano,
        })
    }

    /// Encodes the terrain back into template rows.
    ///
    /// Lava and barricades are dynamic state and are not written out.
    #[must_use]
    pub fn to_template(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|tile| tile.tile_type().symbol()).collect())
            .collect()
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// House positions in the order they were recorded.
    #[must_use]
    pub fn houses(&self) -> &[Position] {
        &self.houses
    }

    /// Safe-zone positions in the order they were recorded.
    #[must_use]
    pub fn safe_zones(&self) -> &[Position] {
        &self.safe_zones
    }

    /// Location of the single eruption vent.
    #[must_use]
    pub const fn volcano(&self) -> Position {
        self.volcano
    }

    /// Reports whether the position lies on the grid.
    #[must_use]
    pub fn is_inside(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Bounds-checked tile access.
    pub fn tile(&self, position: Position) -> Result<&Tile, MapError> {
        self.index(position)
            .and_then(|index| self.tiles.get(index))
            .ok_or(MapError::OutOfBounds(position))
    }

    /// Reports whether the position is an in-bounds safe zone.
    #[must_use]
    pub fn is_safe_zone(&self, position: Position) -> bool {
        self.tile(position)
            .map_or(false, |tile| tile.tile_type() == TileType::SafeZone)
    }

    /// Reports whether a citizen could step onto the position right now.
    #[must_use]
    pub fn is_traversable(&self, position: Position) -> bool {
        self.tile(position).map_or(false, Tile::is_traversable)
    }

    /// In-bounds cardinal neighbours that are neither walls nor the vent.
    ///
    /// Lava and barricades are not filtered; this is graph adjacency, not
    /// instantaneous traversability. Neighbours follow the `+x`, `-x`, `+y`,
    /// `-y` order.
    pub fn neighbors4(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        position.neighbors4().into_iter().filter(move |neighbor| {
            self.tile(*neighbor)
                .map_or(false, |tile| tile.tile_type().is_graph_node())
        })
    }

    /// Iterates every tile in row-major order alongside its position.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            (
                Position::new((index % width) as i32, (index / width) as i32),
                tile,
            )
        })
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        let x = u32::try_from(position.x()).ok()?;
        let y = u32::try_from(position.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(y).ok()?;
        let column = usize::try_from(x).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    pub(crate) fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn set_barricaded(
        &mut self,
        position: Position,
        barricaded: bool,
    ) -> Result<(), MapError> {
        self.tile_mut(position)?.set_barricaded(barricaded);
        Ok(())
    }

    pub(crate) fn ignite(&mut self, position: Position) -> Result<bool, MapError> {
        Ok(self.tile_mut(position)?.ignite())
    }

    pub(crate) fn promote_to_road(&mut self, position: Position) -> Result<(), MapError> {
        self.tile_mut(position)?.promote_to_road();
        Ok(())
    }

    fn tile_mut(&mut self, position: Position) -> Result<&mut Tile, MapError> {
        self.index(position)
            .and_then(|index| self.tiles.get_mut(index))
            .ok_or(MapError::OutOfBounds(position))
    }
}
