pub mod constrained_sum;
pub mod loot;
pub mod stack;

pub use loot::{compose_bag_loot, compose_loot};
pub use stack::{compose_stack, ComposedStack};
