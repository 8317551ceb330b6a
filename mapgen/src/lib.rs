pub mod ids;
pub mod map_element;
pub mod object;
pub mod occupancy;
pub mod position;
pub mod rng;
pub mod tile;
pub mod tile_map;
pub mod zone;

pub mod pathfinding;

pub mod composer;
pub mod decoration;
pub mod fractalize;
pub mod placement;
pub mod road_builder;
pub mod sites;

pub mod filler;
pub mod generator;
pub mod settings;

pub use generator::Generator;
pub use settings::GeneratorSettings;
