//! Bunnies: terrestrial wanderers that pair up to breed.

use super::{SpeciesHooks, SpeciesState};
use crate::appearance::{Appearance, Rgb, Shape};
use crate::entity::Entity;
use crate::world_map::WorldMap;
use eco_core::{BunnyConfig, EntityId, GrowthStage, Position, SimulationConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) static HOOKS: SpeciesHooks = SpeciesHooks {
    movement,
    growth: update_growth,
    cost_of_living: incur_cost_of_living,
    reproduction: handle_reproduction,
    appearance,
};

/// What a bunny is currently trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Goal {
    #[default]
    None,
    Mate,
}

#[derive(Debug, Clone)]
pub struct BunnyState {
    pub(crate) goal: Goal,
    pub(crate) idle_counter: u32,
    pub(crate) last_mate_age: u32,
    pub(crate) mating_cooldown: u32,
}

impl BunnyState {
    pub(crate) fn new(config: &BunnyConfig) -> Self {
        Self {
            goal: Goal::None,
            idle_counter: 0,
            last_mate_age: 0,
            mating_cooldown: config.mating_cooldown,
        }
    }
}

fn state(entity: &Entity) -> &BunnyState {
    match &entity.state {
        SpeciesState::Bunny(bunny) => bunny,
        SpeciesState::Plant(_) => unreachable!("bunny hook dispatched for {}", entity.species()),
    }
}

fn state_mut(entity: &mut Entity) -> &mut BunnyState {
    match &mut entity.state {
        SpeciesState::Bunny(bunny) => bunny,
        SpeciesState::Plant(_) => unreachable!("bunny hook dispatched for a plant"),
    }
}

/// Mature, healthy enough, and past the mating cooldown
pub(crate) fn can_mate(entity: &Entity, config: &BunnyConfig) -> bool {
    let SpeciesState::Bunny(bunny) = &entity.state else {
        return false;
    };
    entity.growth_stage() == GrowthStage::Mature
        && entity.health() > config.min_mating_health
        && entity.age().saturating_sub(bunny.last_mate_age) >= bunny.mating_cooldown
}

fn movement(entity: &mut Entity, world: &mut WorldMap) {
    match state(entity).goal {
        Goal::None => wander(entity, world),
        Goal::Mate => entity.move_in_direction(world, 1),
    }
}

/// Idle behavior: a single step every `idle_period` ticks, with a chance to
/// turn and a chance to start looking for a mate.
fn wander(entity: &mut Entity, world: &mut WorldMap) {
    let config = world.config().bunny.clone();

    let bunny = state_mut(entity);
    bunny.idle_counter += 1;
    if bunny.idle_counter < config.idle_period {
        return;
    }
    bunny.idle_counter = 0;

    entity.move_in_direction(world, 1);

    if world.rng_mut().gen_bool(config.turn_chance) {
        entity.turn_randomly(world.rng_mut());
    }

    if can_mate(entity, &config) && world.rng_mut().gen_bool(config.mate_chance) {
        state_mut(entity).goal = Goal::Mate;
    }
}

fn update_growth(entity: &mut Entity, world: &mut WorldMap) {
    if entity.age() > world.config().bunny.maturity_age
        && entity.growth_stage() != GrowthStage::Mature
    {
        entity.advance_stage(GrowthStage::Mature);
    }
}

/// Bunnies do not eat yet, so living is free
fn incur_cost_of_living(_entity: &mut Entity, _world: &mut WorldMap) {}

/// Pair with the first adjacent bunny that is also looking for a mate and
/// is itself eligible, dropping one newborn onto a free neighboring cell.
fn handle_reproduction(entity: &mut Entity, world: &mut WorldMap) {
    if state(entity).goal != Goal::Mate {
        return;
    }
    let config = world.config().bunny.clone();

    let nursery: Vec<Position> = entity
        .position()
        .surrounding()
        .filter(|&cell| world.can_host_occupant(cell))
        .collect();
    if nursery.is_empty() {
        return;
    }

    let Some(partner_id) = find_partner(entity, world, &config) else {
        return;
    };
    let Some(&spawn) = nursery.choose(world.rng_mut()) else {
        return;
    };

    let newborn = Entity::bunny(spawn, &config);
    let newborn_id = newborn.id();
    world.add_entity(newborn, true);

    entity.adjust_health(-config.mating_cost);
    let age = entity.age();
    let bunny = state_mut(entity);
    bunny.last_mate_age = age;
    bunny.goal = Goal::None;

    if let Some(partner) = world.entity_mut(partner_id) {
        partner.adjust_health(-config.mating_cost);
        let partner_age = partner.age();
        let mate = state_mut(partner);
        mate.last_mate_age = partner_age;
        mate.goal = Goal::None;
        partner.mark_dead_if_depleted();
    }

    debug!(
        parent_id = %entity.id(),
        partner_id = %partner_id,
        newborn_id = %newborn_id,
        row = spawn.row,
        col = spawn.col,
        "Bunnies mated"
    );
}

fn find_partner(entity: &Entity, world: &WorldMap, config: &BunnyConfig) -> Option<EntityId> {
    entity
        .position()
        .surrounding()
        .filter(|&cell| world.grid().contains(cell))
        .flat_map(move |cell| world.entities_at(cell))
        .find(|other| {
            other.goal() == Some(Goal::Mate) && can_mate(other, config)
        })
        .map(|other| other.id())
}

fn appearance(entity: &Entity, _config: &SimulationConfig) -> Appearance {
    let color = match entity.growth_stage() {
        GrowthStage::Youth => Rgb::WHITE,
        GrowthStage::Mature if entity.goal() == Some(Goal::Mate) => Rgb::PINK,
        GrowthStage::Mature => Rgb::MAGENTA,
        GrowthStage::Dead => Rgb::BLACK,
    };
    // Elongated across the axis of travel
    let shape = if entity.facing().is_vertical() {
        Shape::Wide
    } else {
        Shape::Tall
    };
    Appearance {
        color,
        shape,
        accent: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::Species;
    use eco_core::{Facing, WorldConfig};

    fn flat_world(width: i32, height: i32) -> WorldMap {
        let config = SimulationConfig::new(WorldConfig {
            width,
            height,
            ..Default::default()
        });
        WorldMap::new("bunnies", Grid::filled(width, height, 5), config)
    }

    fn eager_bunny(position: Position) -> Entity {
        let mut bunny = Entity::bunny(position, &BunnyConfig::default());
        bunny.set_age(12);
        bunny.advance_stage(GrowthStage::Mature);
        state_mut(&mut bunny).goal = Goal::Mate;
        bunny
    }

    #[test]
    fn test_can_mate_requires_maturity_health_and_cooldown() {
        let config = BunnyConfig::default();
        let mut bunny = Entity::bunny(Position::new(0, 0), &config);
        assert!(!can_mate(&bunny, &config));

        bunny.set_age(12);
        bunny.advance_stage(GrowthStage::Mature);
        assert!(can_mate(&bunny, &config));

        state_mut(&mut bunny).last_mate_age = 10;
        assert!(!can_mate(&bunny, &config));
        state_mut(&mut bunny).last_mate_age = 9;
        assert!(can_mate(&bunny, &config));

        bunny.adjust_health(-15);
        assert!(!can_mate(&bunny, &config));
    }

    #[test]
    fn test_idle_bunny_steps_every_fifth_tick() {
        let mut world = flat_world(11, 11);
        let mut bunny = Entity::bunny(Position::new(5, 5), &BunnyConfig::default());
        bunny.set_facing(Facing::Right);

        for _ in 0..4 {
            bunny.update(&mut world);
            assert_eq!(bunny.position(), Position::new(5, 5));
        }
        bunny.update(&mut world);
        assert_eq!(bunny.position(), Position::new(5, 6));
    }

    #[test]
    fn test_mate_goal_steps_every_tick() {
        let mut world = flat_world(11, 11);
        let mut bunny = eager_bunny(Position::new(5, 2));
        bunny.set_facing(Facing::Right);
        movement(&mut bunny, &mut world);
        movement(&mut bunny, &mut world);
        assert_eq!(bunny.position(), Position::new(5, 4));
    }

    #[test]
    fn test_idle_without_eligibility_never_seeks_mate() {
        let mut world = flat_world(11, 11);
        let mut bunny = Entity::bunny(Position::new(5, 5), &BunnyConfig::default());
        for _ in 0..9 {
            bunny.update(&mut world);
        }
        assert_eq!(bunny.goal(), Some(Goal::None));
    }

    #[test]
    fn test_adjacent_pair_produces_one_newborn() {
        let mut world = flat_world(10, 10);
        let partner = eager_bunny(Position::new(5, 6));
        let partner_id = partner.id();
        assert!(world.add_entity(partner, false));

        let mut bunny = eager_bunny(Position::new(5, 5));
        handle_reproduction(&mut bunny, &mut world);

        let newborns = world.pending_newborns();
        assert_eq!(newborns.len(), 1);
        let newborn = &newborns[0];
        assert_eq!(newborn.species(), Species::Bunny);
        assert_eq!(newborn.position().chebyshev_distance(&bunny.position()), 1);
        assert_ne!(newborn.position(), Position::new(5, 6));

        assert_eq!(bunny.health(), 15);
        assert_eq!(bunny.goal(), Some(Goal::None));
        assert_eq!(state(&bunny).last_mate_age, 12);

        let partner = world.entity(partner_id).unwrap();
        assert_eq!(partner.health(), 15);
        assert_eq!(partner.goal(), Some(Goal::None));
        assert_eq!(state(partner).last_mate_age, 12);
    }

    #[test]
    fn test_partner_must_also_seek_mate() {
        let mut world = flat_world(10, 10);
        let mut partner = eager_bunny(Position::new(4, 4));
        state_mut(&mut partner).goal = Goal::None;
        assert!(world.add_entity(partner, false));

        let mut bunny = eager_bunny(Position::new(5, 5));
        handle_reproduction(&mut bunny, &mut world);

        assert!(world.pending_newborns().is_empty());
        assert_eq!(bunny.health(), 20);
        assert_eq!(bunny.goal(), Some(Goal::Mate));
    }

    #[test]
    fn test_no_room_for_newborn() {
        let mut world = flat_world(3, 3);
        let center = Position::new(1, 1);
        for cell in center.surrounding() {
            assert!(world.add_entity(eager_bunny(cell), false));
        }

        let mut bunny = eager_bunny(center);
        handle_reproduction(&mut bunny, &mut world);
        assert!(world.pending_newborns().is_empty());
        assert_eq!(bunny.health(), 20);
    }

    #[test]
    fn test_appearance_follows_goal_and_facing() {
        let config = SimulationConfig::default();
        let mut bunny = eager_bunny(Position::new(0, 0));
        assert_eq!(appearance(&bunny, &config).color, Rgb::PINK);
        assert_eq!(appearance(&bunny, &config).shape, Shape::Wide);

        bunny.set_facing(Facing::Left);
        state_mut(&mut bunny).goal = Goal::None;
        assert_eq!(appearance(&bunny, &config).color, Rgb::MAGENTA);
        assert_eq!(appearance(&bunny, &config).shape, Shape::Tall);
    }
}
