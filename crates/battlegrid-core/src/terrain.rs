//! Terrain categories, locomotion classes and the terrain query interface.

use std::fmt;

use crate::geom::{Bounds, TilePos};

/// Passability profile of a moving unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Locomotion {
    /// Ground vehicles: blocked by cliffs, rough rock fields and structures.
    Vehicle,
    /// Foot soldiers: blocked by cliffs and structures only.
    Infantry,
}

impl fmt::Display for Locomotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vehicle => f.write_str("vehicle"),
            Self::Infantry => f.write_str("infantry"),
        }
    }
}

/// Category of a battlefield tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Road,
    #[default]
    Grass,
    Sand,
    Mud,
    /// Rock field: infantry can pick their way through, vehicles cannot.
    Rough,
    /// Impassable for every locomotion class.
    Cliff,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 6] = [
        Self::Road,
        Self::Grass,
        Self::Sand,
        Self::Mud,
        Self::Rough,
        Self::Cliff,
    ];

    /// Movement-cost multiplier applied when entering a tile. Always > 0.
    pub const fn cost_multiplier(self) -> f32 {
        match self {
            Self::Road => 0.8,
            Self::Grass => 1.0,
            Self::Sand => 1.5,
            Self::Mud => 2.0,
            Self::Rough => 1.8,
            Self::Cliff => 1.0,
        }
    }

    pub const fn vehicle_passable(self) -> bool {
        matches!(self, Self::Road | Self::Grass | Self::Sand | Self::Mud)
    }

    pub const fn infantry_passable(self) -> bool {
        !matches!(self, Self::Cliff)
    }

    /// Whether units of class `loco` may stand on this terrain.
    pub const fn passable_for(self, loco: Locomotion) -> bool {
        match loco {
            Locomotion::Vehicle => self.vehicle_passable(),
            Locomotion::Infantry => self.infantry_passable(),
        }
    }

    /// Character used in ASCII maps.
    pub const fn glyph(self) -> char {
        match self {
            Self::Road => '=',
            Self::Grass => '.',
            Self::Sand => ':',
            Self::Mud => '~',
            Self::Rough => '^',
            Self::Cliff => '#',
        }
    }

    pub fn from_glyph(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.glyph() == ch)
    }
}

/// Read-only view of the battlefield terrain.
///
/// This is the boundary to whatever owns map data. Pathfinding only ever
/// borrows it for the duration of a query.
pub trait TerrainQuery {
    /// Tiles covered by the map.
    fn bounds(&self) -> Bounds;

    /// Terrain category of `tile`, or `None` when off the map.
    fn terrain(&self, tile: TilePos) -> Option<TerrainKind>;

    /// Edge length of one tile in world units.
    fn tile_size(&self) -> f32;

    /// Static passability of `tile` for `loco`, ignoring structures.
    fn statically_passable(&self, tile: TilePos, loco: Locomotion) -> bool {
        self.terrain(tile).is_some_and(|k| k.passable_for(loco))
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }

    fn terrain(&self, tile: TilePos) -> Option<TerrainKind> {
        (**self).terrain(tile)
    }

    fn tile_size(&self) -> f32 {
        (**self).tile_size()
    }

    fn statically_passable(&self, tile: TilePos, loco: Locomotion) -> bool {
        (**self).statically_passable(tile, loco)
    }
}

// ---------------------------------------------------------------------------
// TerrainMap
// ---------------------------------------------------------------------------

/// Dense in-memory terrain grid.
///
/// Holds exactly one cell per tile of its bounds, row-major.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTerrainMap"))]
pub struct TerrainMap {
    cells: Vec<TerrainKind>,
    bounds: Bounds,
    tile_size: f32,
}

/// Wire form of [`TerrainMap`], checked before use.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTerrainMap {
    cells: Vec<TerrainKind>,
    bounds: Bounds,
    tile_size: f32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTerrainMap> for TerrainMap {
    type Error = TerrainParseError;

    fn try_from(raw: RawTerrainMap) -> Result<Self, Self::Error> {
        if raw.cells.len() != raw.bounds.len() {
            return Err(TerrainParseError::CellCount {
                expected: raw.bounds.len(),
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            cells: raw.cells,
            bounds: raw.bounds,
            tile_size: raw.tile_size,
        })
    }
}

impl TerrainMap {
    /// Create a `width` × `height` map filled with the default terrain.
    pub fn new(width: i32, height: i32, tile_size: f32) -> Self {
        Self::filled(width, height, tile_size, TerrainKind::default())
    }

    pub fn filled(width: i32, height: i32, tile_size: f32, kind: TerrainKind) -> Self {
        let bounds = Bounds::from_size(width.max(0), height.max(0));
        Self {
            cells: vec![kind; bounds.len()],
            bounds,
            tile_size,
        }
    }

    /// Parse a map from rows of terrain glyphs (see [`TerrainKind::glyph`]).
    ///
    /// Row `z` is line `z` of the input; leading and trailing blank lines and
    /// surrounding whitespace on each line are ignored.
    pub fn from_ascii(text: &str, tile_size: f32) -> Result<Self, TerrainParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(TerrainParseError::Empty);
        }
        let width = rows[0].chars().count();
        let mut cells = Vec::with_capacity(width * rows.len());
        for (z, row) in rows.iter().enumerate() {
            let w = row.chars().count();
            if w != width {
                return Err(TerrainParseError::InconsistentWidth {
                    row: z,
                    expected: width,
                    found: w,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let kind = TerrainKind::from_glyph(ch).ok_or(TerrainParseError::UnknownGlyph {
                    ch,
                    pos: TilePos::new(x as i32, z as i32),
                })?;
                cells.push(kind);
            }
        }
        Ok(Self {
            cells,
            bounds: Bounds::from_size(width as i32, rows.len() as i32),
            tile_size,
        })
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Terrain at `tile`, or `None` when off the map.
    pub fn at(&self, tile: TilePos) -> Option<TerrainKind> {
        self.bounds.index_of(tile).map(|i| self.cells[i])
    }

    /// Set the terrain of `tile`. Returns `false` when off the map.
    pub fn set(&mut self, tile: TilePos, kind: TerrainKind) -> bool {
        match self.bounds.index_of(tile) {
            Some(i) => {
                self.cells[i] = kind;
                true
            }
            None => false,
        }
    }

    /// Paint every in-map tile of `area` with `kind`.
    pub fn fill(&mut self, area: Bounds, kind: TerrainKind) {
        for tile in area {
            self.set(tile, kind);
        }
    }

    /// Render the map back into glyph rows.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height() as usize);
        for (i, kind) in self.cells.iter().enumerate() {
            if i > 0 && i % self.width() as usize == 0 {
                out.push('\n');
            }
            out.push(kind.glyph());
        }
        out
    }
}

impl TerrainQuery for TerrainMap {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn terrain(&self, tile: TilePos) -> Option<TerrainKind> {
        self.at(tile)
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }
}

/// Errors that can occur when reading a terrain map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerrainParseError {
    /// The input contained no rows.
    Empty,
    /// A row's width differs from the first row's.
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character that is not a terrain glyph was found.
    UnknownGlyph { ch: char, pos: TilePos },
    /// A stored map whose cell count does not match its bounds.
    CellCount { expected: usize, found: usize },
}

impl fmt::Display for TerrainParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("terrain map: no rows"),
            Self::InconsistentWidth {
                row,
                expected,
                found,
            } => write!(
                f,
                "terrain map: row {row} has width {found}, expected {expected}"
            ),
            Self::UnknownGlyph { ch, pos } => {
                write!(f, "terrain map: unknown glyph \u{201c}{ch}\u{201d} at {pos}")
            }
            Self::CellCount { expected, found } => {
                write!(f, "terrain map: {found} cells for {expected} tiles")
            }
        }
    }
}

impl std::error::Error for TerrainParseError {}
