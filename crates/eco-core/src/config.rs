//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of grid rows
    pub width: i32,
    /// Number of grid columns
    pub height: i32,
    /// Tiles at or below `max_elevation / water_table_divisor` become water
    pub water_table_divisor: i32,
    /// Chebyshev radius inspected by the flatten pass
    pub flatten_radius: i32,
    /// Smallest elevation delta dropped by a height seed (inclusive)
    pub elevation_delta_min: i32,
    /// Largest elevation delta dropped by a height seed (exclusive)
    pub elevation_delta_max: i32,
    /// Number of bunnies placed when the world is seeded
    pub initial_bunnies: usize,
    /// Optional seed for the shared random source; entropy when absent
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            water_table_divisor: 3,
            flatten_radius: 3,
            elevation_delta_min: 2,
            elevation_delta_max: 7,
            initial_bunnies: 2,
            seed: None,
        }
    }
}

/// Shared lifecycle cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Raw ticks per age-tick
    pub moves_per_age: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self { moves_per_age: 10 }
    }
}

/// Plant behavior parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub starting_health: i32,
    /// Maximum elevation a plant may sit above a water tile and still reach it
    pub root_depth: i32,
    /// Age-ticks between germinations
    pub germination_cooldown: u32,
    /// Radius of the water search neighborhood
    pub search_radius: i32,
    /// Radius of the seed spawn neighborhood
    pub spawn_radius: i32,
    /// Plants mature once their age exceeds this
    pub maturity_age: u32,
    /// Health gained per age-tick near water while young
    pub youth_growth: i32,
    /// Health gained per age-tick near water while mature
    pub mature_growth: i32,
    /// Health lost per age-tick without reachable water
    pub drought_cost: i32,
    /// Upper bound of the per-age-tick seed accumulation
    pub seed_rate: f32,
    /// Health required (exclusive) before germinating
    pub min_germination_health: i32,
    /// Health paid by the parent per planted seed
    pub seed_cost: i32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            starting_health: 20,
            root_depth: 2,
            germination_cooldown: 5,
            search_radius: 3,
            spawn_radius: 3,
            maturity_age: 10,
            youth_growth: 2,
            mature_growth: 1,
            drought_cost: 1,
            seed_rate: 0.5,
            min_germination_health: 10,
            seed_cost: 2,
        }
    }
}

/// Bunny behavior parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BunnyConfig {
    pub starting_health: i32,
    /// Bunnies mature once their age exceeds this
    pub maturity_age: u32,
    /// Raw ticks between idle steps
    pub idle_period: u32,
    /// Chance of a random turn after an idle step
    pub turn_chance: f64,
    /// Chance of starting to look for a mate after an idle step
    pub mate_chance: f64,
    /// Age-ticks between matings
    pub mating_cooldown: u32,
    /// Health required (exclusive) to mate
    pub min_mating_health: i32,
    /// Health paid by each parent
    pub mating_cost: i32,
}

impl Default for BunnyConfig {
    fn default() -> Self {
        Self {
            starting_health: 20,
            maturity_age: 10,
            idle_period: 5,
            turn_chance: 0.2,
            mate_chance: 0.2,
            mating_cooldown: 3,
            min_mating_health: 5,
            mating_cost: 5,
        }
    }
}

/// Top level simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub lifecycle: LifecycleConfig,
    pub plant: PlantConfig,
    pub bunny: BunnyConfig,
    /// Remove entities from the registry in the tick they die
    pub prune_dead: bool,
    /// Ticks between population reports while running
    pub report_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            lifecycle: LifecycleConfig::default(),
            plant: PlantConfig::default(),
            bunny: BunnyConfig::default(),
            prune_dead: true,
            report_interval: 100,
        }
    }
}

impl SimulationConfig {
    pub fn new(world: WorldConfig) -> Self {
        Self {
            world,
            ..Default::default()
        }
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let world = &self.world;
        if world.width <= 0 || world.height <= 0 {
            return Err(Error::Validation(format!(
                "world dimensions must be positive, got {}x{}",
                world.width, world.height
            )));
        }
        if world.elevation_delta_max <= world.elevation_delta_min || world.elevation_delta_min < 0 {
            return Err(Error::Validation(format!(
                "elevation delta range [{}, {}) is empty or negative",
                world.elevation_delta_min, world.elevation_delta_max
            )));
        }
        if world.water_table_divisor <= 0 {
            return Err(Error::Validation("water_table_divisor must be positive".to_string()));
        }
        if world.flatten_radius < 0 || self.plant.search_radius < 0 || self.plant.spawn_radius < 0 {
            return Err(Error::Validation("radii must not be negative".to_string()));
        }
        if self.lifecycle.moves_per_age == 0 {
            return Err(Error::Validation("moves_per_age must be at least 1".to_string()));
        }
        for (name, p) in [
            ("turn_chance", self.bunny.turn_chance),
            ("mate_chance", self.bunny.mate_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Validation(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        if self.plant.seed_rate < 0.0 {
            return Err(Error::Validation("seed_rate must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::new(WorldConfig::default());
        assert_eq!(config.world.width, 100);
        assert_eq!(config.world.water_table_divisor, 3);
        assert_eq!(config.lifecycle.moves_per_age, 10);
        assert_eq!(config.plant.root_depth, 2);
        assert_eq!(config.bunny.mating_cooldown, 3);
        assert!(config.prune_dead);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_world() {
        let config = SimulationConfig::new(WorldConfig {
            width: 0,
            ..Default::default()
        });
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let mut config = SimulationConfig::new(WorldConfig::default());
        config.bunny.mate_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "world": { "width": 12, "height": 8 } }"#).unwrap();
        assert_eq!(config.world.width, 12);
        assert_eq!(config.world.height, 8);
        assert_eq!(config.world.flatten_radius, 3);
        assert_eq!(config.plant.starting_health, 20);
        assert!(config.prune_dead);
    }
}
