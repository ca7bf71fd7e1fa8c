//! Gameplay systems.
//!
//! Each system owns one slice of the rules and touches only the pieces of
//! world state handed to it: collections, the [`Arena`] bounds, the player
//! position, the simulation clock, config and the RNG.

pub mod boss;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod explosion;

/// World bounds in pixels, as seen by the systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            cx: width / 2.0,
            cy: height / 2.0,
        }
    }
}
