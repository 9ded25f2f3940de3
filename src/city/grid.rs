//! Tile grid and tile classification.
//!
//! The grid is the only input to city composition. Every cell holds one
//! [`TileCode`]; neighbours outside the grid are reported as `None` rather
//! than treated as errors, so border tiles classify the same way as inner ones.

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::city::error::CityError;

/// Role of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileCode {
    Residential,
    Skyscraper,
    Store,
    MidBuilding,
    HorizontalRoad,
    VerticalRoad,
    Intersection,
    Corner,
    TJunction,
    Empty,
}

impl TileCode {
    /// Parse a single-character layout code. Blank strings are empty lots.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "" => Some(TileCode::Empty),
            "R" => Some(TileCode::Residential),
            "L" => Some(TileCode::Skyscraper),
            "S" => Some(TileCode::Store),
            "M" => Some(TileCode::MidBuilding),
            "H" => Some(TileCode::HorizontalRoad),
            "V" => Some(TileCode::VerticalRoad),
            "I" => Some(TileCode::Intersection),
            "C" => Some(TileCode::Corner),
            "T" => Some(TileCode::TJunction),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            TileCode::Residential => "R",
            TileCode::Skyscraper => "L",
            TileCode::Store => "S",
            TileCode::MidBuilding => "M",
            TileCode::HorizontalRoad => "H",
            TileCode::VerticalRoad => "V",
            TileCode::Intersection => "I",
            TileCode::Corner => "C",
            TileCode::TJunction => "T",
            TileCode::Empty => "",
        }
    }

    pub fn is_building(self) -> bool {
        matches!(
            self,
            TileCode::Residential | TileCode::Skyscraper | TileCode::Store | TileCode::MidBuilding
        )
    }

    /// Tiles that carry road geometry.
    pub fn is_road(self) -> bool {
        matches!(
            self,
            TileCode::HorizontalRoad
                | TileCode::VerticalRoad
                | TileCode::Intersection
                | TileCode::Corner
                | TileCode::TJunction
        )
    }

    /// Tiles a vehicle may be parked on.
    pub fn is_drivable(self) -> bool {
        matches!(
            self,
            TileCode::Residential | TileCode::VerticalRoad | TileCode::Intersection
        )
    }
}

/// Grid address, 0-indexed from the top-left tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub row: usize,
    pub col: usize,
}

impl TilePos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Centre of the tile on the ground plane (`x = col * size`, `z = row * size`).
    pub fn world(self, tile_size: f32) -> Vec3 {
        Vec3::new(self.col as f32 * tile_size, 0.0, self.row as f32 * tile_size)
    }
}

/// Rectangular, immutable grid of tile codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityGrid {
    rows: usize,
    cols: usize,
    tiles: Vec<TileCode>,
}

impl CityGrid {
    /// Build a grid from already classified rows.
    pub fn new(rows: Vec<Vec<TileCode>>) -> Result<Self, CityError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(CityError::EmptyGrid);
        }

        let row_count = rows.len();
        let mut tiles = Vec::with_capacity(row_count * expected);
        for (row, codes) in rows.into_iter().enumerate() {
            if codes.len() != expected {
                return Err(CityError::RaggedGrid {
                    row,
                    expected,
                    found: codes.len(),
                });
            }
            tiles.extend(codes);
        }

        Ok(Self {
            rows: row_count,
            cols: expected,
            tiles,
        })
    }

    /// Parse a grid of layout codes such as `[["C", "H"], ["V", ""]]`.
    ///
    /// Shape is checked before any code is read, so a ragged grid reports
    /// [`CityError::RaggedGrid`] even if it also contains unknown codes.
    pub fn parse<R, S>(rows: &[R]) -> Result<Self, CityError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let expected = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if expected == 0 {
            return Err(CityError::EmptyGrid);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(CityError::RaggedGrid {
                row,
                expected,
                found,
            });
        }

        let mut parsed = Vec::with_capacity(rows.len());
        for (row, codes) in rows.iter().enumerate() {
            let mut line = Vec::with_capacity(expected);
            for (col, code) in codes.as_ref().iter().enumerate() {
                let code = code.as_ref();
                let tile = TileCode::from_code(code).ok_or_else(|| {
                    CityError::UnclassifiableTile {
                        row,
                        col,
                        code: code.to_string(),
                    }
                })?;
                line.push(tile);
            }
            parsed.push(line);
        }

        Self::new(parsed)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at `pos`, or `None` outside the grid.
    pub fn get(&self, pos: TilePos) -> Option<TileCode> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(self.tiles[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    /// Iterate every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TilePos, TileCode)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (TilePos::new(i / cols, i % cols), *tile))
    }

    /// Number of tiles matching `predicate`.
    pub fn count(&self, predicate: impl Fn(TileCode) -> bool) -> usize {
        self.tiles.iter().filter(|t| predicate(**t)).count()
    }

    /// World-space width (x) and depth (z) covered by the grid.
    pub fn extent(&self, tile_size: f32) -> Vec2 {
        Vec2::new(self.cols as f32 * tile_size, self.rows as f32 * tile_size)
    }
}

/// One of the four edge directions of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// The 4-neighbourhood of a tile; `None` marks a neighbour outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub top: Option<TileCode>,
    pub right: Option<TileCode>,
    pub bottom: Option<TileCode>,
    pub left: Option<TileCode>,
}

impl Neighbors {
    pub fn on(&self, side: Side) -> Option<TileCode> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    /// Sides whose neighbour is not a road (absent neighbours included).
    pub fn open_sides(&self) -> SmallVec<[Side; 4]> {
        Side::ALL
            .into_iter()
            .filter(|side| !self.on(*side).is_some_and(TileCode::is_road))
            .collect()
    }
}

/// Role of the tile at (`row`, `col`).
///
/// # Panics
///
/// Panics if the coordinate lies outside the grid; callers iterate the
/// grid's own bounds.
pub fn classify(grid: &CityGrid, row: usize, col: usize) -> TileCode {
    assert!(
        row < grid.rows && col < grid.cols,
        "tile ({row}, {col}) outside {}x{} grid",
        grid.rows,
        grid.cols
    );
    grid.tiles[row * grid.cols + col]
}

/// Tiles above, right of, below and left of (`row`, `col`).
pub fn neighbors(grid: &CityGrid, row: usize, col: usize) -> Neighbors {
    Neighbors {
        top: row
            .checked_sub(1)
            .and_then(|r| grid.get(TilePos::new(r, col))),
        right: grid.get(TilePos::new(row, col + 1)),
        bottom: grid.get(TilePos::new(row + 1, col)),
        left: col
            .checked_sub(1)
            .and_then(|c| grid.get(TilePos::new(row, c))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> CityGrid {
        CityGrid::parse(rows).expect("valid grid")
    }

    #[test]
    fn parses_codes_and_trims_whitespace() {
        let g = grid(&[&["R", " M"], &["", "I"]]);
        assert_eq!(classify(&g, 0, 0), TileCode::Residential);
        assert_eq!(classify(&g, 0, 1), TileCode::MidBuilding);
        assert_eq!(classify(&g, 1, 0), TileCode::Empty);
        assert_eq!(classify(&g, 1, 1), TileCode::Intersection);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let rows: Vec<Vec<&str>> = Vec::new();
        assert_eq!(CityGrid::parse(&rows), Err(CityError::EmptyGrid));
        assert_eq!(CityGrid::parse(&[Vec::<&str>::new()]), Err(CityError::EmptyGrid));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = CityGrid::parse(&[vec!["H", "H"], vec!["V"]]).unwrap_err();
        assert_eq!(
            err,
            CityError::RaggedGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn unknown_code_reports_coordinate() {
        let err = CityGrid::parse(&[vec!["H", "H"], vec!["V", "Q"]]).unwrap_err();
        assert_eq!(
            err,
            CityError::UnclassifiableTile {
                row: 1,
                col: 1,
                code: "Q".into()
            }
        );
        assert!(err.to_string().contains("row 1, column 1"));
    }

    #[test]
    fn corner_tile_has_absent_top_and_left() {
        let g = grid(&[&["H", "I"], &["I", "V"]]);
        let n = neighbors(&g, 0, 0);
        assert_eq!(n.top, None);
        assert_eq!(n.left, None);
        assert_eq!(n.right, Some(TileCode::Intersection));
        assert_eq!(n.bottom, Some(TileCode::Intersection));

        let n = neighbors(&g, 1, 1);
        assert_eq!(n.bottom, None);
        assert_eq!(n.right, None);
        assert_eq!(n.top, Some(TileCode::Intersection));
    }

    #[test]
    fn empty_neighbour_differs_from_absent() {
        let g = grid(&[&["", "T", ""]]);
        let n = neighbors(&g, 0, 1);
        assert_eq!(n.left, Some(TileCode::Empty));
        assert_eq!(n.top, None);
        assert_eq!(n.open_sides().len(), 4);
    }

    #[test]
    fn iter_is_row_major() {
        let g = grid(&[&["R", "L"], &["S", "M"]]);
        let order: Vec<_> = g.iter().map(|(pos, _)| (pos.row, pos.col)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(g.count(TileCode::is_building), 4);
    }

    #[test]
    fn world_position_scales_by_tile_size() {
        assert_eq!(TilePos::new(2, 3).world(40.0), Vec3::new(120.0, 0.0, 80.0));
    }
}
