//! Fire cells: placement rules, deferred commands and the tick loop

pub mod command_queue;
pub mod engine;
pub mod ignition;

pub use command_queue::{CommandQueue, FireCommand};
pub use engine::{FireCell, FireEngine, TickReport};
pub use ignition::{
    can_place_fire, fire_faces, has_adjacent_flammable, has_full_adjacent_face,
    supported_from_below, try_ignite,
};
