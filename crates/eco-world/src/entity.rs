//! Entity state and the shared lifecycle state machine.

use crate::grid::Grid;
use crate::species::{BunnyState, Goal, PlantState, Species, SpeciesState};
use crate::world_map::WorldMap;
use eco_core::{BunnyConfig, EntityId, Facing, GrowthStage, PlantConfig, Position, Traits};
use rand::Rng;

/// A living thing on the map.
///
/// The fields every species shares live here; species-specific state sits in
/// [`SpeciesState`] and species behavior is reached through
/// [`Species::hooks`].
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    species: Species,
    traits: Traits,
    position: Position,
    facing: Facing,
    age: u32,
    health: i32,
    stage: GrowthStage,
    moves_since_aging: u32,
    pub(crate) state: SpeciesState,
}

impl Entity {
    fn new(species: Species, position: Position, health: i32, state: SpeciesState) -> Self {
        Self {
            id: EntityId::new(),
            species,
            traits: species.traits(),
            position,
            facing: Facing::default(),
            age: 1,
            health,
            stage: GrowthStage::Youth,
            moves_since_aging: 0,
            state,
        }
    }

    /// A young plant rooted at `position`; its search and spawn tiles are
    /// fixed here against `grid`.
    pub fn plant(grid: &Grid, position: Position, config: &PlantConfig) -> Self {
        Self::new(
            Species::Plant,
            position,
            config.starting_health,
            SpeciesState::Plant(PlantState::new(grid, position, config)),
        )
    }

    pub fn bunny(position: Position, config: &BunnyConfig) -> Self {
        Self::new(
            Species::Bunny,
            position,
            config.starting_health,
            SpeciesState::Bunny(BunnyState::new(config)),
        )
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn traits(&self) -> Traits {
        self.traits
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn growth_stage(&self) -> GrowthStage {
        self.stage
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Current bunny goal, `None` for other species
    pub fn goal(&self) -> Option<Goal> {
        match &self.state {
            SpeciesState::Bunny(bunny) => Some(bunny.goal),
            SpeciesState::Plant(_) => None,
        }
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub(crate) fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    #[cfg(test)]
    pub(crate) fn set_moves_since_aging(&mut self, moves: u32) {
        self.moves_since_aging = moves;
    }

    pub(crate) fn adjust_health(&mut self, delta: i32) {
        self.health += delta;
    }

    /// Moves the growth stage forward; earlier stages are ignored.
    pub(crate) fn advance_stage(&mut self, stage: GrowthStage) {
        if stage > self.stage {
            self.stage = stage;
        }
    }

    pub(crate) fn mark_dead_if_depleted(&mut self) {
        if self.health <= 0 {
            self.advance_stage(GrowthStage::Dead);
        }
    }

    /// One raw tick of the lifecycle.
    ///
    /// Movement runs every tick. Every `moves_per_age` ticks the entity ages,
    /// grows, pays its cost of living, and, if it survived, may reproduce.
    pub(crate) fn update(&mut self, world: &mut WorldMap) {
        if self.health <= 0 {
            return;
        }
        let hooks = self.species.hooks();

        (hooks.movement)(self, world);

        self.moves_since_aging += 1;
        if self.moves_since_aging < world.config().lifecycle.moves_per_age {
            return;
        }
        self.moves_since_aging = 0;
        self.age += 1;

        (hooks.growth)(self, world);
        (hooks.cost_of_living)(self, world);

        if self.health <= 0 {
            self.advance_stage(GrowthStage::Dead);
            return;
        }

        (hooks.reproduction)(self, world);
        self.mark_dead_if_depleted();
    }

    /// Step up to `steps` cells along the current facing.
    ///
    /// The displacement shrinks one cell at a time until the destination is
    /// in bounds and passable. If it had to shrink at all, the entity turns
    /// left or right afterwards.
    pub(crate) fn move_in_direction(&mut self, world: &mut WorldMap, steps: i32) {
        let (d_row, d_col) = self.facing.to_delta();
        let mut distance = steps;
        let mut blocked = false;

        while distance != 0
            && !world.is_passable_for(self, self.position.offset(d_row * distance, d_col * distance))
        {
            distance -= distance.signum();
            blocked = true;
        }

        if distance != 0 {
            let destination = self.position.offset(d_row * distance, d_col * distance);
            world.relocate(self, destination);
        }

        if blocked {
            self.turn_randomly(world.rng_mut());
        }
    }

    /// Rotate one position left or right with equal odds
    pub(crate) fn turn_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.facing = if rng.gen_bool(0.5) {
            self.facing.turn_left()
        } else {
            self.facing.turn_right()
        };
    }
}
