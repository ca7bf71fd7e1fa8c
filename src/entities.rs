/// All game entity types — pure data, no logic.
///
/// Entities never reference each other; every interaction is a distance
/// check made by the collision and boss systems on each tick.

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletColor {
    Green,
    Red,
    Blue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining lifetime in seconds; the bullet is culled once it hits 0.
    pub life: f32,
    pub color: BulletColor,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn is_live(&self) -> bool {
        self.life > 0.0
    }
}

/// A short, purely time-driven flash left behind by a hit or a kill.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    /// Seconds since the explosion was triggered.
    pub t: f32,
    /// Set once the explosion has run its full duration.
    pub counted: bool,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Facing toward the player, radians.
    pub angle: f32,
    /// Assigned speed; `|(vx, vy)|` is renormalised to this after bounces.
    pub spd: f32,
    pub alive: bool,
    /// Simulation-clock time (seconds) of the next shot.
    pub next_fire: f64,
    /// Seconds between shots.
    pub fire_every: f32,
    pub wobble_phase: f32,
}

/// The single high-health adversary of the boss phase.
#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Cosmetic spin, radians.
    pub angle: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    pub radius: f32,
    /// Milliseconds between volleys.
    pub fire_every: f32,
    /// Milliseconds accumulated toward the next volley.
    pub fire_t: f32,
}

// ── Player ────────────────────────────────────────────────────────────────────

/// A position in world pixels. Used for both the raw cursor target and the
/// smoothed ship position that eases toward it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
