//! The world map: immutable terrain plus the live entity registry.

use crate::entity::Entity;
use crate::grid::Grid;
use crate::snapshot::{EntitySnapshot, WorldSnapshot};
use crate::species::Species;
use eco_core::{EntityId, Position, SimulationConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, trace};

pub struct WorldMap {
    id: String,
    grid: Grid,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    entities: HashMap<EntityId, Entity>,
    // Insertion order of the live registry
    order: Vec<EntityId>,
    // Cell -> the occupying entity standing there
    occupied: HashMap<Position, EntityId>,
    pending: Vec<Entity>,
    tick: u64,
    births: u64,
    deaths: u64,
    rejected_newborns: u64,
}

pub(crate) fn assert_valid_config(config: &SimulationConfig) {
    if let Err(err) = config.validate() {
        panic!("invalid simulation config: {err}");
    }
}

/// Live entity counts per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    pub plants: usize,
    pub bunnies: usize,
}

impl Population {
    pub fn total(&self) -> usize {
        self.plants + self.bunnies
    }
}

/// Outcome of [`WorldMap::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_tick: u64,
    pub population: Population,
    pub births: u64,
    pub deaths: u64,
}

impl WorldMap {
    /// Empty map over `grid`, drawing randomness from `config.world.seed`
    /// or OS entropy.
    pub fn new(id: impl Into<String>, grid: Grid, config: SimulationConfig) -> Self {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(id, grid, config, rng)
    }

    /// # Panics
    ///
    /// Panics if `config` fails [`SimulationConfig::validate`].
    pub fn with_rng(
        id: impl Into<String>,
        grid: Grid,
        config: SimulationConfig,
        rng: ChaCha8Rng,
    ) -> Self {
        assert_valid_config(&config);
        Self {
            id: id.into(),
            grid,
            config,
            rng,
            entities: HashMap::new(),
            order: Vec::new(),
            occupied: HashMap::new(),
            pending: Vec::new(),
            tick: 0,
            births: 0,
            deaths: 0,
            rejected_newborns: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The shared random source
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn births(&self) -> u64 {
        self.births
    }

    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    pub fn rejected_newborns(&self) -> u64 {
        self.rejected_newborns
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live entities in registry order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Newborns waiting for the end of the current tick
    pub fn pending_newborns(&self) -> &[Entity] {
        &self.pending
    }

    /// Registered entities standing on `pos`, in registry order.
    ///
    /// While an entity runs its own update it is detached from the registry,
    /// so queries made from its hooks do not list it. Its cell still counts
    /// as occupied for [`WorldMap::has_empty_space`].
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn entities_at(&self, pos: Position) -> Vec<&Entity> {
        self.assert_in_bounds(pos);
        self.entities().filter(|e| e.position() == pos).collect()
    }

    /// True unless an occupying entity stands on `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    pub fn has_empty_space(&self, pos: Position) -> bool {
        self.assert_in_bounds(pos);
        !self.occupied.contains_key(&pos)
    }

    /// Two entities conflict only when both occupy their cell.
    pub fn can_place(&self, entity: &Entity) -> bool {
        !entity.traits().is_occupying() || self.has_empty_space(entity.position())
    }

    /// Register `entity` if the placement rule allows it.
    ///
    /// Newborns go to the pending buffer and stay invisible until the running
    /// tick finishes. Returns `false`, with no effect, when rejected.
    pub fn add_entity(&mut self, entity: Entity, is_newborn: bool) -> bool {
        if !self.can_place(&entity) {
            trace!(
                entity_id = %entity.id(),
                species = %entity.species(),
                row = entity.position().row,
                col = entity.position().col,
                newborn = is_newborn,
                "Placement rejected"
            );
            return false;
        }

        if is_newborn {
            self.pending.push(entity);
        } else {
            let id = entity.id();
            if entity.traits().is_occupying() {
                self.occupied.insert(entity.position(), id);
            }
            self.order.push(id);
            self.entities.insert(id, entity);
        }
        true
    }

    /// Detach an entity from the live registry. No-op if absent.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.order.retain(|other| *other != id);
        if self.occupied.get(&entity.position()) == Some(&id) {
            self.occupied.remove(&entity.position());
        }
        Some(entity)
    }

    /// Whether `entity` could step onto `pos`
    pub(crate) fn is_passable_for(&self, entity: &Entity, pos: Position) -> bool {
        if !self.grid.contains(pos) {
            return false;
        }
        let traits = entity.traits();
        if traits.is_occupying() && !self.has_empty_space(pos) {
            return false;
        }
        !(traits.is_terrestrial() && self.grid.is_water(pos))
    }

    /// In-bounds ground cell with no occupying entity
    pub(crate) fn can_host_occupant(&self, pos: Position) -> bool {
        self.grid.contains(pos) && !self.grid.is_water(pos) && self.has_empty_space(pos)
    }

    /// Move `entity` to `to`, keeping the occupancy index in step
    pub(crate) fn relocate(&mut self, entity: &mut Entity, to: Position) {
        let from = entity.position();
        let id = entity.id();
        if self.occupied.get(&from) == Some(&id) {
            self.occupied.remove(&from);
            self.occupied.insert(to, id);
        }
        entity.set_position(to);
    }

    /// Advance the simulation by one raw tick.
    ///
    /// Every entity registered when the tick starts is updated exactly once,
    /// in registry order. Entities born meanwhile sit in the pending buffer
    /// and join the registry only once all updates are done.
    pub fn tick(&mut self) {
        self.update_entities();
        if self.config.prune_dead {
            self.prune_dead();
        }
        self.drain_newborns();
        self.tick += 1;
    }

    fn update_entities(&mut self) {
        let snapshot = self.order.clone();
        for id in snapshot {
            let Some(mut entity) = self.detach(id) else {
                continue;
            };
            let was_alive = entity.is_alive();
            entity.update(self);

            if was_alive && !entity.is_alive() {
                self.deaths += 1;
                debug!(
                    entity_id = %id,
                    species = %entity.species(),
                    age = entity.age(),
                    row = entity.position().row,
                    col = entity.position().col,
                    tick = self.tick,
                    "Entity died"
                );
            }
            self.reattach(entity);
        }
    }

    /// Take an entity out of the registry for its own update so its hooks can
    /// borrow the rest of the map. Its slot in `order` and its occupancy
    /// entry stay in place.
    fn detach(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    fn reattach(&mut self, entity: Entity) {
        self.entities.insert(entity.id(), entity);
    }

    fn prune_dead(&mut self) {
        let dead: Vec<EntityId> = self
            .entities()
            .filter(|e| !e.is_alive())
            .map(|e| e.id())
            .collect();
        for id in dead {
            self.remove_entity(id);
        }
    }

    fn drain_newborns(&mut self) {
        for newborn in std::mem::take(&mut self.pending) {
            let id = newborn.id();
            let species = newborn.species();
            let pos = newborn.position();
            if self.add_entity(newborn, false) {
                self.births += 1;
                debug!(
                    entity_id = %id,
                    species = %species,
                    row = pos.row,
                    col = pos.col,
                    tick = self.tick,
                    "Entity born"
                );
            } else {
                self.rejected_newborns += 1;
            }
        }
    }

    /// Run `ticks` ticks, logging a population report every
    /// `report_interval` ticks.
    #[instrument(skip(self), fields(map_id = %self.id))]
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        info!("Starting simulation for {} ticks", ticks);
        let interval = self.config.report_interval;

        for _ in 0..ticks {
            self.tick();
            if interval > 0 && self.tick % interval == 0 {
                let population = self.population();
                info!(
                    event = "population_metrics",
                    tick = self.tick,
                    plants = population.plants,
                    bunnies = population.bunnies,
                    births = self.births,
                    deaths = self.deaths,
                    rejected_newborns = self.rejected_newborns,
                    "Population snapshot"
                );
            }
        }

        let summary = RunSummary {
            ticks,
            final_tick: self.tick,
            population: self.population(),
            births: self.births,
            deaths: self.deaths,
        };
        info!(
            event = "run_summary",
            final_tick = summary.final_tick,
            plants = summary.population.plants,
            bunnies = summary.population.bunnies,
            births = summary.births,
            deaths = summary.deaths,
            "Simulation complete"
        );
        summary
    }

    pub fn population(&self) -> Population {
        let mut population = Population::default();
        for entity in self.entities() {
            match entity.species() {
                Species::Plant => population.plants += 1,
                Species::Bunny => population.bunnies += 1,
            }
        }
        population
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            id: self.id.clone(),
            tick: self.tick,
            width: self.width(),
            height: self.height(),
            max_elevation: self.grid.max_elevation(),
            grid: self.grid.clone(),
            entities: self
                .entities()
                .map(|e| EntitySnapshot::capture(e, &self.config))
                .collect(),
        }
    }

    fn assert_in_bounds(&self, pos: Position) {
        assert!(
            self.grid.contains(pos),
            "position {pos} outside {}x{} map {}",
            self.width(),
            self.height(),
            self.id
        );
    }
}
