//! Domain definitions.

pub mod bed;
pub mod property;
pub mod room;
pub mod sequence;

pub use self::{bed::Bed, property::Property, room::Room};
