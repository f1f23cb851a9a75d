use eco_core::{
    BunnyConfig, GrowthStage, Position, SimulationConfig, TerrainKind, WorldConfig,
};
use eco_world::{Entity, Grid, Species, TerrainGenerator, WorldMap};

fn config(width: i32, height: i32) -> SimulationConfig {
    SimulationConfig::new(WorldConfig {
        width,
        height,
        seed: Some(11),
        ..Default::default()
    })
}

/// 10x10 at elevation 5 with one water tile at (5, 6), elevation 3
fn pond_world() -> WorldMap {
    let mut grid = Grid::filled(10, 10, 5);
    let pond = Position::new(5, 6);
    grid.set_elevation(pond, 3);
    grid.set_terrain(pond, TerrainKind::Water);
    WorldMap::new("pond", grid, config(10, 10))
}

#[test]
fn watered_plant_never_withers() {
    let mut world = pond_world();
    let plant = Entity::plant(world.grid(), Position::new(5, 5), &world.config().plant);
    let id = plant.id();
    assert!(world.add_entity(plant, false));

    let mut last = 20;
    for _ in 0..20 {
        world.tick();
        let health = world.entity(id).map(|p| p.health()).unwrap();
        assert!(health >= last);
        last = health;
    }
    assert_eq!(last, 24);
}

#[test]
fn dry_plant_dies_after_twenty_age_ticks() {
    let mut world = WorldMap::new("dry", Grid::filled(10, 10, 5), config(10, 10));
    let plant = Entity::plant(world.grid(), Position::new(5, 5), &world.config().plant);
    let id = plant.id();
    world.add_entity(plant, false);

    world.run(199);
    assert_eq!(world.entity(id).map(|p| p.health()), Some(1));

    let summary = world.run(1);
    assert!(world.entity(id).is_none());
    assert_eq!(summary.deaths, 1);
    assert_eq!(summary.population.total(), 0);
}

#[test]
fn idle_bunny_steps_once_after_five_ticks() {
    let mut world = WorldMap::new("meadow", Grid::filled(10, 10, 5), config(10, 10));
    let bunny = Entity::bunny(Position::new(5, 5), &BunnyConfig::default());
    let id = bunny.id();
    world.add_entity(bunny, false);

    for _ in 0..4 {
        world.tick();
    }
    assert_eq!(world.entity(id).unwrap().position(), Position::new(5, 5));

    world.tick();
    assert_eq!(world.entity(id).unwrap().position(), Position::new(4, 5));
}

#[test]
fn bunny_and_plant_share_a_cell() {
    let mut world = WorldMap::new("share", Grid::filled(4, 4, 1), config(4, 4));
    let cell = Position::new(2, 2);
    let plant_config = world.config().plant.clone();

    assert!(world.add_entity(Entity::plant(world.grid(), cell, &plant_config), false));
    assert!(world.add_entity(Entity::plant(world.grid(), cell, &plant_config), false));
    assert!(world.add_entity(Entity::bunny(cell, &BunnyConfig::default()), false));
    assert!(!world.add_entity(Entity::bunny(cell, &BunnyConfig::default()), false));

    assert_eq!(world.entities_at(cell).len(), 3);
    assert!(!world.has_empty_space(cell));
}

#[test]
fn long_run_keeps_registry_consistent() {
    let mut world = TerrainGenerator::new(config(40, 40)).build("long");
    let initial = world.len() as u64;

    let summary = world.run(400);
    assert_eq!(summary.ticks, 400);
    assert_eq!(summary.final_tick, 400);
    assert_eq!(world.current_tick(), 400);
    assert_eq!(summary.population.total(), world.len());
    assert_eq!(initial + summary.births - summary.deaths, world.len() as u64);

    let mut bunny_cells = std::collections::HashSet::new();
    for entity in world.entities() {
        assert!(entity.is_alive());
        assert_ne!(entity.growth_stage(), GrowthStage::Dead);
        assert!(!world.grid().is_water(entity.position()));
        if entity.species() == Species::Bunny {
            assert!(bunny_cells.insert(entity.position()));
        }
    }
}

#[test]
fn snapshot_reflects_final_state() {
    let mut world = TerrainGenerator::new(config(15, 20)).build("snap");
    world.run(30);

    let snapshot = world.snapshot();
    assert_eq!(snapshot.tick, 30);
    assert_eq!(snapshot.width, 15);
    assert_eq!(snapshot.height, 20);
    assert_eq!(snapshot.entities.len(), world.len());

    let json = snapshot.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["id"], "snap");
    assert_eq!(value["tick"], 30);
}
