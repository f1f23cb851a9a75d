//! Plants: rooted, water-seeking, spread by seed.

use super::{stay_put, SpeciesHooks, SpeciesState};
use crate::appearance::{Appearance, Rgb, Shape};
use crate::entity::Entity;
use crate::grid::Grid;
use crate::world_map::WorldMap;
use eco_core::{GrowthStage, PlantConfig, Position, SimulationConfig, TerrainKind};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

pub(crate) static HOOKS: SpeciesHooks = SpeciesHooks {
    movement: stay_put,
    growth: update_growth,
    cost_of_living: incur_cost_of_living,
    reproduction: handle_reproduction,
    appearance,
};

#[derive(Debug, Clone)]
pub struct PlantState {
    pub(crate) water_search_tiles: Vec<Position>,
    pub(crate) spawn_tiles: Vec<Position>,
    pub(crate) root_depth: i32,
    pub(crate) germination_cooldown: u32,
    pub(crate) last_germination_age: u32,
    pub(crate) seed_accumulator: f32,
}

impl PlantState {
    pub(crate) fn new(grid: &Grid, position: Position, config: &PlantConfig) -> Self {
        Self {
            water_search_tiles: grid.neighborhood(position, config.search_radius),
            spawn_tiles: grid.neighborhood(position, config.spawn_radius),
            root_depth: config.root_depth,
            germination_cooldown: config.germination_cooldown,
            last_germination_age: 0,
            seed_accumulator: 0.0,
        }
    }

    pub fn root_depth(&self) -> i32 {
        self.root_depth
    }

    pub fn seed_accumulator(&self) -> f32 {
        self.seed_accumulator
    }

    /// True if a water tile in the search set sits no more than
    /// `root_depth` below the plant.
    pub fn has_water_nearby(&self, grid: &Grid, position: Position) -> bool {
        let current = grid.elevation(position);
        self.water_search_tiles
            .iter()
            .any(|&tile| grid.is_water(tile) && current - grid.elevation(tile) <= self.root_depth)
    }
}

fn state(entity: &Entity) -> &PlantState {
    match &entity.state {
        SpeciesState::Plant(plant) => plant,
        SpeciesState::Bunny(_) => unreachable!("plant hook dispatched for {}", entity.species()),
    }
}

fn state_mut(entity: &mut Entity) -> &mut PlantState {
    match &mut entity.state {
        SpeciesState::Plant(plant) => plant,
        SpeciesState::Bunny(_) => unreachable!("plant hook dispatched for a bunny"),
    }
}

fn growth_for_stage(stage: GrowthStage, config: &PlantConfig) -> i32 {
    match stage {
        GrowthStage::Youth => config.youth_growth,
        GrowthStage::Mature => config.mature_growth,
        GrowthStage::Dead => 0,
    }
}

fn update_growth(entity: &mut Entity, world: &mut WorldMap) {
    let config = &world.config().plant;
    let maturity_age = config.maturity_age;
    let seed_rate = config.seed_rate;

    if entity.age() > maturity_age && entity.growth_stage() != GrowthStage::Mature {
        entity.advance_stage(GrowthStage::Mature);
    } else if entity.growth_stage() == GrowthStage::Mature {
        let seeds = world.rng_mut().gen::<f32>() * seed_rate;
        state_mut(entity).seed_accumulator += seeds;
    }

    if state(entity).has_water_nearby(world.grid(), entity.position()) {
        let growth = growth_for_stage(entity.growth_stage(), &world.config().plant);
        entity.adjust_health(growth);
    }
}

fn incur_cost_of_living(entity: &mut Entity, world: &mut WorldMap) {
    if !state(entity).has_water_nearby(world.grid(), entity.position()) {
        entity.adjust_health(-world.config().plant.drought_cost);
    }
}

fn handle_reproduction(entity: &mut Entity, world: &mut WorldMap) {
    let min_health = world.config().plant.min_germination_health;
    let plant = state(entity);
    let ready = entity.age() >= plant.last_germination_age + plant.germination_cooldown
        && plant.seed_accumulator > 1.0
        && entity.health() > min_health;
    if ready {
        spread(entity, world);
    }
}

/// Spend whole seeds on random spawn tiles. Each seed that lands on ground
/// the map accepts becomes a newborn and costs the parent health.
fn spread(entity: &mut Entity, world: &mut WorldMap) {
    let config = world.config().plant.clone();
    let age = entity.age();
    state_mut(entity).last_germination_age = age;

    while state(entity).seed_accumulator > 1.0 {
        state_mut(entity).seed_accumulator -= 1.0;

        let Some(&tile) = state(entity).spawn_tiles.choose(world.rng_mut()) else {
            break;
        };
        if world.grid().terrain(tile) != TerrainKind::Ground {
            continue;
        }

        let seedling = Entity::plant(world.grid(), tile, &config);
        if world.add_entity(seedling, true) {
            entity.adjust_health(-config.seed_cost);
            trace!(
                parent_id = %entity.id(),
                row = tile.row,
                col = tile.col,
                "Seed germinated"
            );
        }
    }
}

fn appearance(entity: &Entity, config: &SimulationConfig) -> Appearance {
    let plant = &config.plant;
    let color = match entity.growth_stage() {
        GrowthStage::Dead => Rgb::ORANGE,
        GrowthStage::Youth => {
            let expected = entity.age() as i32 * plant.youth_growth;
            let deficit = health_deficit(entity.health(), expected);
            let maturity = entity.age() as f32 / plant.maturity_age.max(1) as f32;
            Rgb::blend3(
                Rgb::WHITE.blend(Rgb::GREEN, maturity),
                Rgb::YELLOW,
                Rgb::RED,
                deficit,
            )
        }
        GrowthStage::Mature => {
            let expected = plant.maturity_age as i32 * plant.youth_growth;
            let deficit = health_deficit(entity.health(), expected);
            return Appearance {
                color: Rgb::blend3(Rgb::GREEN, Rgb::YELLOW, Rgb::RED, deficit),
                shape: Shape::Round,
                accent: Some((Rgb::WHITE, (1.0 - deficit).min(0.5))),
            };
        }
    };
    Appearance {
        color,
        shape: Shape::Round,
        accent: None,
    }
}

/// Fraction of `expected` health the plant is missing, in `[0, 1]`
fn health_deficit(health: i32, expected: i32) -> f32 {
    if expected <= 0 {
        return 0.0;
    }
    1.0 - health.clamp(0, expected) as f32 / expected as f32
}
