//! Serializable read-only views of the world for renderers and exports.

use crate::appearance::Appearance;
use crate::entity::Entity;
use crate::grid::Grid;
use crate::species::{Goal, Species};
use eco_core::{EntityId, Facing, GrowthStage, Position, SimulationConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub species: Species,
    pub position: Position,
    pub facing: Facing,
    pub age: u32,
    pub health: i32,
    pub stage: GrowthStage,
    pub goal: Option<Goal>,
    pub appearance: Appearance,
}

impl EntitySnapshot {
    pub fn capture(entity: &Entity, config: &SimulationConfig) -> Self {
        Self {
            id: entity.id(),
            species: entity.species(),
            position: entity.position(),
            facing: entity.facing(),
            age: entity.age(),
            health: entity.health(),
            stage: entity.growth_stage(),
            goal: entity.goal(),
            appearance: (entity.species().hooks().appearance)(entity, config),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub id: String,
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub max_elevation: i32,
    pub grid: Grid,
    pub entities: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    pub fn to_json(&self) -> eco_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_map::WorldMap;
    use eco_core::{BunnyConfig, WorldConfig};

    #[test]
    fn test_snapshot_lists_live_entities() {
        let config = SimulationConfig::new(WorldConfig {
            width: 6,
            height: 4,
            ..Default::default()
        });
        let mut world = WorldMap::new("snap", Grid::filled(6, 4, 2), config);
        let plant = Entity::plant(world.grid(), Position::new(1, 1), &world.config().plant);
        world.add_entity(plant, false);
        world.add_entity(Entity::bunny(Position::new(3, 2), &BunnyConfig::default()), false);

        let snapshot = world.snapshot();
        assert_eq!(snapshot.width, 6);
        assert_eq!(snapshot.height, 4);
        assert_eq!(snapshot.max_elevation, 2);
        assert_eq!(snapshot.entities.len(), 2);
        assert_eq!(snapshot.entities[0].species, Species::Plant);
        assert_eq!(snapshot.entities[0].goal, None);
        assert_eq!(snapshot.entities[1].goal, Some(Goal::None));
        assert_eq!(snapshot.entities[1].position, Position::new(3, 2));
    }

    #[test]
    fn test_snapshot_serializes() {
        let config = SimulationConfig::new(WorldConfig {
            width: 3,
            height: 3,
            ..Default::default()
        });
        let mut world = WorldMap::new("json", Grid::new(3, 3), config);
        world.add_entity(Entity::bunny(Position::new(0, 0), &BunnyConfig::default()), false);

        let json = world.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "json");
        assert_eq!(value["entities"][0]["species"], "Bunny");
    }
}
