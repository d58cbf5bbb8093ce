pub mod config;
pub mod controller;
pub mod course;
pub mod entity;
pub mod legacy;
pub mod pod;
pub mod protocol;
pub mod simulation;
pub mod strategy;
pub mod vec2;
pub mod world;

pub use config::*;
pub use controller::*;
pub use course::*;
pub use entity::*;
pub use legacy::*;
pub use pod::*;
pub use protocol::*;
pub use simulation::*;
pub use strategy::*;
pub use vec2::*;
pub use world::*;
