//! Procedural terrain generation and initial population.

use crate::entity::Entity;
use crate::grid::Grid;
use crate::world_map::{assert_valid_config, WorldMap};
use eco_core::{BoundedRandom, Position, SimulationConfig, TerrainKind, WorldConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

/// Builds a [`WorldMap`]: random elevation seeds with sandpile smoothing,
/// a water-table flood, one flatten sweep, then plants and bunnies.
pub struct TerrainGenerator {
    config: SimulationConfig,
}

impl TerrainGenerator {
    /// # Panics
    ///
    /// Panics if `config` fails [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Self {
        assert_valid_config(&config);
        Self { config }
    }

    /// Generate a `width` x `height` world with default behavior settings.
    ///
    /// # Panics
    ///
    /// Panics unless both dimensions are positive.
    pub fn generate(id: impl Into<String>, width: i32, height: i32) -> WorldMap {
        let config = SimulationConfig::new(WorldConfig {
            width,
            height,
            ..Default::default()
        });
        Self::new(config).build(id)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[instrument(skip(self, id), fields(width = self.config.world.width, height = self.config.world.height))]
    pub fn build(&self, id: impl Into<String>) -> WorldMap {
        let world = &self.config.world;
        let mut rng = match world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut grid = Grid::new(world.width, world.height);
        info!("World dimensions: {} x {}", world.width, world.height);

        raise_elevation(&mut grid, world, &mut rng);
        let water_table = grid.max_elevation() / world.water_table_divisor;
        flood_water_table(&mut grid, water_table);
        flatten(&mut grid, world.flatten_radius);

        let mut map = WorldMap::with_rng(id, grid, self.config.clone(), rng);
        seed_plants(&mut map);
        seed_bunnies(&mut map, world.initial_bunnies);
        map
    }
}

/// Drop `width * height / 2` random height seeds, smoothing around each.
fn raise_elevation<R: Rng + ?Sized>(grid: &mut Grid, world: &WorldConfig, rng: &mut R) {
    let rows = BoundedRandom::below(grid.width());
    let cols = BoundedRandom::below(grid.height());
    let deltas = BoundedRandom::new(world.elevation_delta_min, world.elevation_delta_max);

    let height_seeds = grid.width() * grid.height() / 2;
    debug!(height_seeds, "Seeding elevation");

    for _ in 0..height_seeds {
        let source = Position::new(rows.sample(rng), cols.sample(rng));
        let delta = deltas.sample(rng);
        grid.set_elevation(source, grid.elevation(source) + delta);
        smooth(grid, source, delta / 2);
    }
}

/// Spill some of a height seed onto its surroundings, like sand: tiles
/// farther from `source` receive less, and none ends up above it.
fn smooth(grid: &mut Grid, source: Position, radius: i32) {
    let peak = grid.elevation(source);
    for tile in grid.neighborhood(source, radius) {
        let spread = radius - tile.chebyshev_distance(&source) + 1;
        let current = grid.elevation(tile);
        if current < peak {
            grid.set_elevation(tile, peak.min(current + spread));
        }
    }
}

/// Turn every tile at or below `water_table` into water. Returns the number
/// of water tiles.
fn flood_water_table(grid: &mut Grid, water_table: i32) -> usize {
    let flooded: Vec<Position> = grid
        .iter()
        .filter(|&(_, elevation, _)| elevation <= water_table)
        .map(|(pos, _, _)| pos)
        .collect();
    for &pos in &flooded {
        grid.set_terrain(pos, TerrainKind::Water);
    }

    let percent = 100 * flooded.len() / grid.len();
    info!(
        water_table,
        water_tiles = flooded.len(),
        "Tiles converted to water: {} ({}%)",
        flooded.len(),
        percent
    );
    flooded.len()
}

/// One row-major sweep over ground tiles, leveling lone bumps. Returns the
/// number of tiles changed.
fn flatten(grid: &mut Grid, radius: i32) -> usize {
    let mut flattened = 0;
    for pos in grid.positions().collect::<Vec<_>>() {
        if grid.terrain(pos) != TerrainKind::Water && flatten_tile(grid, pos, radius) {
            flattened += 1;
        }
    }
    info!(flattened, "Flattened tiles");
    flattened
}

/// Level one ground tile against its off-axis neighbors.
///
/// Only a local peak is leveled: a tile keeps its height unless every one of
/// its ground neighbors sits below it, in which case it takes their mean
/// height. A tile with no ground neighbors at all is an island: it sinks to
/// the mean of its neighbors and becomes water.
fn flatten_tile(grid: &mut Grid, pos: Position, radius: i32) -> bool {
    let neighbors = grid.off_axis_neighborhood(pos, radius);
    if neighbors.is_empty() {
        return false;
    }

    let current = grid.elevation(pos);
    let mut valid = 0;
    let mut lower = 0;
    let mut valid_sum = 0;
    let mut total_sum = 0;
    for &tile in &neighbors {
        let elevation = grid.elevation(tile);
        total_sum += elevation;
        if grid.terrain(tile) != TerrainKind::Water {
            valid += 1;
            valid_sum += elevation;
            if elevation < current {
                lower += 1;
            }
        }
    }

    // Whole-number share of lower neighbors: zero unless all of them are lower
    if valid > 0 && lower / valid < 1 {
        return false;
    }

    if valid > 0 {
        grid.set_elevation(pos, valid_sum / valid);
    } else {
        grid.set_elevation(pos, total_sum / neighbors.len() as i32);
        grid.set_terrain(pos, TerrainKind::Water);
    }
    true
}

/// Try `width + height` random tiles; each ground tile the map accepts gets
/// a founding plant.
fn seed_plants(map: &mut WorldMap) {
    let rows = BoundedRandom::below(map.width());
    let cols = BoundedRandom::below(map.height());
    let attempts = map.width() + map.height();
    let plant_config = map.config().plant.clone();

    let mut planted = 0;
    for _ in 0..attempts {
        let pos = Position::new(rows.sample(map.rng_mut()), cols.sample(map.rng_mut()));
        if map.grid().is_water(pos) {
            continue;
        }
        let plant = Entity::plant(map.grid(), pos, &plant_config);
        if map.add_entity(plant, false) {
            planted += 1;
        }
    }
    info!("Planted {} seeds, {} germinated.", attempts, planted);
}

/// Keep drawing tiles until `count` bunnies stand on ground, or until no
/// free ground tile is left to try.
fn seed_bunnies(map: &mut WorldMap, count: usize) {
    let rows = BoundedRandom::below(map.width());
    let cols = BoundedRandom::below(map.height());
    let bunny_config = map.config().bunny.clone();

    let free_ground = map
        .grid()
        .positions()
        .filter(|&pos| !map.grid().is_water(pos) && map.has_empty_space(pos))
        .count();
    let target = count.min(free_ground);

    let mut placed = 0;
    while placed < target {
        let pos = Position::new(rows.sample(map.rng_mut()), cols.sample(map.rng_mut()));
        if !map.grid().is_water(pos) && map.add_entity(Entity::bunny(pos, &bunny_config), false) {
            placed += 1;
        }
    }
    info!(requested = count, placed, "Placed bunnies");
}
