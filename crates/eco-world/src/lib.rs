//! Terrain generation and the plant/bunny ecosystem.
//!
//! A [`TerrainGenerator`] builds a [`WorldMap`]: an elevation and water grid
//! seeded with plants and bunnies. Calling [`WorldMap::tick`] advances every
//! entity through its lifecycle once.

pub mod appearance;
pub mod entity;
pub mod generator;
pub mod grid;
pub mod snapshot;
pub mod species;
pub mod world_map;

pub use appearance::{Appearance, Rgb, Shape};
pub use entity::Entity;
pub use generator::TerrainGenerator;
pub use grid::Grid;
pub use snapshot::{EntitySnapshot, WorldSnapshot};
pub use species::{Goal, Species, SpeciesHooks};
pub use world_map::{Population, RunSummary, WorldMap};
