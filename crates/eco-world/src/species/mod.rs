//! Species catalogue and per-species behavior dispatch.

pub mod bunny;
pub mod plant;

pub use bunny::{BunnyState, Goal};
pub use plant::PlantState;

use crate::appearance::Appearance;
use crate::entity::Entity;
use crate::world_map::WorldMap;
use eco_core::{Locomotion, Occupancy, SimulationConfig, Traits};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior hook run against the world during an entity's own update
pub type Hook = fn(&mut Entity, &mut WorldMap);

/// Function set backing one species
pub struct SpeciesHooks {
    pub movement: Hook,
    pub growth: Hook,
    pub cost_of_living: Hook,
    pub reproduction: Hook,
    pub appearance: fn(&Entity, &SimulationConfig) -> Appearance,
}

/// Closed set of species living on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Plant,
    Bunny,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Plant, Species::Bunny];

    pub fn hooks(self) -> &'static SpeciesHooks {
        match self {
            Species::Plant => &plant::HOOKS,
            Species::Bunny => &bunny::HOOKS,
        }
    }

    pub fn traits(self) -> Traits {
        match self {
            Species::Plant => Traits::new(Occupancy::NonOccupying, Locomotion::Other),
            Species::Bunny => Traits::new(Occupancy::Occupying, Locomotion::Terrestrial),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Plant => "plant",
            Species::Bunny => "bunny",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Species-specific portion of an entity
#[derive(Debug, Clone)]
pub enum SpeciesState {
    Plant(PlantState),
    Bunny(BunnyState),
}

/// Hook for species that never move
pub(crate) fn stay_put(_entity: &mut Entity, _world: &mut WorldMap) {}
