//! Real-time core of a small arcade shooter: a ship that follows the
//! pointer, waves of wobbling enemies, a boss encounter, projectiles,
//! collisions and explosions, driven one frame at a time by [`engine::Engine`].

pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod factory;
pub mod input;
pub mod render;
pub mod starfield;
pub mod surface;
pub mod systems;
pub mod util;
