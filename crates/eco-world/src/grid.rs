//! Elevation and terrain grid.

use eco_core::{Position, TerrainKind};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Two co-indexed layers over `width` rows by `height` columns.
///
/// Rows are indexed by `0..width` and columns by `0..height`. Access outside
/// that range is a caller bug and panics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridLayers")]
pub struct Grid {
    width: i32,
    height: i32,
    elevation: Vec<i32>,
    terrain: Vec<TerrainKind>,
    max_elevation: i32,
}

/// Deserialized form of a [`Grid`]; the cached maximum is always rebuilt.
#[derive(Deserialize)]
struct GridLayers {
    width: i32,
    height: i32,
    elevation: Vec<i32>,
    terrain: Vec<TerrainKind>,
}

impl TryFrom<GridLayers> for Grid {
    type Error = String;

    fn try_from(layers: GridLayers) -> Result<Self, Self::Error> {
        let GridLayers {
            width,
            height,
            elevation,
            terrain,
        } = layers;
        if width <= 0 || height <= 0 {
            return Err(format!("grid dimensions must be positive, got {width}x{height}"));
        }
        let size = width as usize * height as usize;
        if elevation.len() != size || terrain.len() != size {
            return Err(format!(
                "grid layers hold {} and {} cells, expected {size}",
                elevation.len(),
                terrain.len()
            ));
        }
        if elevation.iter().any(|&e| e < 0) {
            return Err("negative elevation".to_string());
        }
        Ok(Self::from_parts(width, height, elevation, terrain))
    }
}

impl Grid {
    /// Flat ground grid at elevation 0.
    ///
    /// # Panics
    ///
    /// Panics unless both dimensions are positive.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Ground grid with every tile at `elevation`.
    pub fn filled(width: i32, height: i32, elevation: i32) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        let size = (width * height) as usize;
        Self::from_parts(
            width,
            height,
            vec![elevation; size],
            vec![TerrainKind::Ground; size],
        )
    }

    /// Build a grid from row-major layers.
    pub fn from_parts(
        width: i32,
        height: i32,
        elevation: Vec<i32>,
        terrain: Vec<TerrainKind>,
    ) -> Self {
        assert!(
            width > 0 && height > 0,
            "grid dimensions must be positive, got {width}x{height}"
        );
        let size = (width * height) as usize;
        assert_eq!(elevation.len(), size, "elevation layer size mismatch");
        assert_eq!(terrain.len(), size, "terrain layer size mismatch");
        assert!(elevation.iter().all(|&e| e >= 0), "negative elevation");

        let mut grid = Self {
            width,
            height,
            elevation,
            terrain,
            max_elevation: 0,
        };
        grid.refresh_max_elevation();
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.elevation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevation.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.width && pos.col < self.height
    }

    /// Highest elevation on the grid, kept current by every setter
    pub fn max_elevation(&self) -> i32 {
        self.max_elevation
    }

    pub fn elevation(&self, pos: Position) -> i32 {
        self.elevation[self.index(pos)]
    }

    pub fn terrain(&self, pos: Position) -> TerrainKind {
        self.terrain[self.index(pos)]
    }

    pub fn is_water(&self, pos: Position) -> bool {
        self.terrain(pos).is_water()
    }

    pub fn set_elevation(&mut self, pos: Position, elevation: i32) {
        assert!(elevation >= 0, "negative elevation {elevation} at {pos}");
        let index = self.index(pos);
        let previous = std::mem::replace(&mut self.elevation[index], elevation);
        if elevation >= self.max_elevation {
            self.max_elevation = elevation;
        } else if previous == self.max_elevation {
            self.refresh_max_elevation();
        }
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: TerrainKind) {
        let index = self.index(pos);
        self.terrain[index] = terrain;
    }

    fn refresh_max_elevation(&mut self) {
        self.max_elevation = self.elevation.iter().copied().max().unwrap_or(0);
    }

    /// All in-bounds cells within Chebyshev `radius` of `center`, center excluded
    pub fn neighborhood(&self, center: Position, radius: i32) -> Vec<Position> {
        self.square_around(center, radius)
            .filter(|pos| *pos != center)
            .collect()
    }

    /// In-bounds cells within Chebyshev `radius` of `center` that share
    /// neither its row nor its column.
    pub fn off_axis_neighborhood(&self, center: Position, radius: i32) -> Vec<Position> {
        self.square_around(center, radius)
            .filter(|pos| pos.row != center.row && pos.col != center.col)
            .collect()
    }

    fn square_around(&self, center: Position, radius: i32) -> impl Iterator<Item = Position> + '_ {
        (-radius..=radius)
            .flat_map(move |dr| (-radius..=radius).map(move |dc| center.offset(dr, dc)))
            .filter(move |pos| self.contains(*pos))
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {pos} outside {}x{} grid",
            self.width,
            self.height
        );
        (pos.row * self.height + pos.col) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let row = (index as i32) / self.height;
        let col = (index as i32) % self.height;
        Position::new(row, col)
    }

    /// Iterator over all positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all tiles as `(position, elevation, terrain)`
    pub fn iter(&self) -> impl Iterator<Item = (Position, i32, TerrainKind)> + '_ {
        self.elevation
            .iter()
            .zip(&self.terrain)
            .enumerate()
            .map(move |(i, (&e, &t))| (self.index_to_pos(i), e, t))
    }

    pub fn count_terrain(&self, kind: TerrainKind) -> usize {
        self.terrain.iter().filter(|&&t| t == kind).count()
    }

    /// Write the plain-text elevation dump: a `"<width> <height>"` header,
    /// then one line per row holding that row's elevations.
    pub fn write_elevation_dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{} {}", self.width, self.height)?;
        for row in self.elevation.chunks(self.height as usize) {
            let line = row
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    pub fn elevation_dump(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_elevation_dump(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 12);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 12);
        assert_eq!(grid.len(), 120);
        assert_eq!(grid.max_elevation(), 0);
        assert_eq!(grid.count_terrain(TerrainKind::Ground), 120);
    }

    #[test]
    #[should_panic]
    fn test_zero_sized_grid_panics() {
        Grid::new(0, 5);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_access_panics() {
        let grid = Grid::new(10, 10);
        grid.elevation(Position::new(10, 0));
    }

    #[test]
    fn test_index_round_trip_on_non_square_grid() {
        let grid = Grid::new(3, 7);
        for (i, pos) in grid.positions().enumerate() {
            assert!(grid.contains(pos));
            assert_eq!(grid.index(pos), i);
        }
    }

    #[test]
    fn test_max_elevation_tracks_setters() {
        let mut grid = Grid::new(4, 4);
        grid.set_elevation(Position::new(1, 1), 9);
        grid.set_elevation(Position::new(2, 2), 4);
        assert_eq!(grid.max_elevation(), 9);

        grid.set_elevation(Position::new(1, 1), 3);
        assert_eq!(grid.max_elevation(), 4);
    }

    #[test]
    fn test_neighborhood_is_clipped() {
        let grid = Grid::new(10, 10);
        assert_eq!(grid.neighborhood(Position::new(5, 5), 1).len(), 8);
        assert_eq!(grid.neighborhood(Position::new(0, 0), 1).len(), 3);
        assert_eq!(grid.neighborhood(Position::new(5, 5), 3).len(), 48);
    }

    #[test]
    fn test_off_axis_neighborhood_skips_row_and_column() {
        let grid = Grid::new(10, 10);
        let center = Position::new(5, 5);
        let cells = grid.off_axis_neighborhood(center, 3);
        assert_eq!(cells.len(), 36);
        assert!(cells
            .iter()
            .all(|p| p.row != center.row && p.col != center.col));

        // A single row has nothing off-axis
        let strip = Grid::new(1, 10);
        assert!(strip.off_axis_neighborhood(Position::new(0, 4), 3).is_empty());
    }

    #[test]
    fn test_deserialize_rebuilds_max_elevation() {
        let json = r#"{
            "width": 1, "height": 3,
            "elevation": [2, 8, 5],
            "terrain": ["Ground", "Ground", "Water"],
            "max_elevation": 40
        }"#;
        let grid: Grid = serde_json::from_str(json).unwrap();
        assert_eq!(grid.max_elevation(), 8);
        assert!(grid.is_water(Position::new(0, 2)));
    }

    #[test]
    fn test_deserialize_rejects_bad_layers() {
        let short = r#"{ "width": 2, "height": 2, "elevation": [1, 2, 3], "terrain": ["Ground", "Ground", "Ground", "Ground"] }"#;
        assert!(serde_json::from_str::<Grid>(short).is_err());

        let negative = r#"{ "width": 1, "height": 1, "elevation": [-1], "terrain": ["Ground"] }"#;
        assert!(serde_json::from_str::<Grid>(negative).is_err());
    }

    #[test]
    fn test_serialized_grid_reads_back() {
        let mut grid = Grid::new(2, 2);
        grid.set_elevation(Position::new(1, 0), 6);
        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back.elevation_dump(), grid.elevation_dump());
        assert_eq!(back.max_elevation(), 6);
    }

    #[test]
    fn test_elevation_dump_layout() {
        let mut grid = Grid::new(2, 3);
        grid.set_elevation(Position::new(0, 2), 7);
        grid.set_elevation(Position::new(1, 0), 4);

        assert_eq!(grid.elevation_dump(), "2 3\n0 0 7\n4 0 0\n");
    }
}
