//! Runtime gameplay configuration.
//!
//! [`GameConfig`] mirrors every tunable the simulation reads. All fields have
//! built-in defaults; a TOML file may override any subset of them, and
//! missing keys fall back to the defaults. Millisecond fields keep the `_ms`
//! suffix, everything else is pixels, seconds or radians.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Surface mapping ──────────────────────────────────────────────────────
    pub cell_width_px: f32,
    pub cell_height_px: f32,

    // ── Enemy spawning ───────────────────────────────────────────────────────
    pub enemy_min_spawn_ms: f32,
    pub enemy_max_spawn_ms: f32,
    /// How far outside the screen edge new enemies appear.
    pub spawn_margin: f32,

    // ── Enemy movement & fire ────────────────────────────────────────────────
    pub enemy_speed: f32,
    pub enemy_pad: f32,
    pub wobble_amplitude: f32,
    pub wobble_rate: f32,
    pub enemy_fire_min_ms: f32,
    pub enemy_fire_max_ms: f32,
    pub enemy_first_fire_min_ms: f32,
    pub enemy_first_fire_max_ms: f32,
    pub enemy_burst_chance: f64,
    pub enemy_burst_factor: f32,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_life: f32,
    pub my_bullet_speed: f32,
    pub my_bullet_life: f32,
    pub cull_margin: f32,

    // ── Collision & explosions ───────────────────────────────────────────────
    pub hit_radius: f32,
    pub player_hit_radius: f32,
    pub explosion_time: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_max_health: i32,
    pub hit_damage: i32,
    pub health_floor: i32,
    /// Exponential smoothing rate of the ship toward the cursor target.
    pub smoothing_rate: f32,
    pub nudge_step_px: f32,

    // ── Boss ─────────────────────────────────────────────────────────────────
    pub boss_kill_threshold: u32,
    pub boss_hp: i32,
    pub boss_radius: f32,
    pub boss_speed_x: f32,
    pub boss_speed_y: f32,
    pub boss_pad: f32,
    pub boss_spin: f32,
    pub boss_fire_every_ms: f32,
    pub boss_burst_count: u32,
    pub boss_burst_spread_rad: f32,
    pub boss_burst_stagger_ms: f32,

    // ── Frame timing ─────────────────────────────────────────────────────────
    pub max_frame_dt: f32,

    // ── Starfield ────────────────────────────────────────────────────────────
    pub star_speed: f32,
    pub star_z_min: f32,
    pub star_z_max: f32,
    pub star_max_count: usize,
    pub star_density_px: f32,
    pub star_margin: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_width_px: 8.0,
            cell_height_px: 16.0,

            enemy_min_spawn_ms: 2500.0,
            enemy_max_spawn_ms: 4800.0,
            spawn_margin: 40.0,

            enemy_speed: 70.0,
            enemy_pad: 24.0,
            wobble_amplitude: 18.0,
            wobble_rate: 2.2,
            enemy_fire_min_ms: 900.0,
            enemy_fire_max_ms: 1400.0,
            enemy_first_fire_min_ms: 200.0,
            enemy_first_fire_max_ms: 900.0,
            enemy_burst_chance: 0.25,
            enemy_burst_factor: 0.45,

            bullet_speed: 520.0,
            bullet_life: 1.6,
            my_bullet_speed: 800.0,
            my_bullet_life: 0.9,
            cull_margin: 50.0,

            hit_radius: 24.0,
            player_hit_radius: 24.0,
            explosion_time: 0.4,

            player_max_health: 100,
            hit_damage: 10,
            health_floor: 0,
            smoothing_rate: 8.0,
            nudge_step_px: 16.0,

            boss_kill_threshold: 10,
            boss_hp: 10,
            boss_radius: 40.0,
            boss_speed_x: 180.0,
            boss_speed_y: 140.0,
            boss_pad: 40.0,
            boss_spin: 0.8,
            boss_fire_every_ms: 800.0,
            boss_burst_count: 3,
            boss_burst_spread_rad: 0.14,
            boss_burst_stagger_ms: 90.0,

            max_frame_dt: 0.033,

            star_speed: 0.0315,
            star_z_min: 0.08,
            star_z_max: 1.25,
            star_max_count: 1200,
            star_density_px: 1500.0,
            star_margin: 120.0,
        }
    }
}

impl GameConfig {
    /// Load the config from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> GameResult<Self> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    GameError::ConfigRead {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Self::from_toml_str(&text, path)?
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; `origin` is only used for error messages.
    pub fn from_toml_str(text: &str, origin: &Path) -> GameResult<Self> {
        toml::from_str(text).map_err(|err| GameError::ConfigParse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn validate(&self) -> GameResult<()> {
        let positive: &[(&'static str, f32)] = &[
            ("cell_width_px", self.cell_width_px),
            ("cell_height_px", self.cell_height_px),
            ("enemy_speed", self.enemy_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_life", self.bullet_life),
            ("my_bullet_speed", self.my_bullet_speed),
            ("my_bullet_life", self.my_bullet_life),
            ("hit_radius", self.hit_radius),
            ("player_hit_radius", self.player_hit_radius),
            ("explosion_time", self.explosion_time),
            ("boss_radius", self.boss_radius),
            ("boss_fire_every_ms", self.boss_fire_every_ms),
            ("max_frame_dt", self.max_frame_dt),
            ("star_density_px", self.star_density_px),
        ];
        for &(field, value) in positive {
            if !(value > 0.0) {
                return Err(GameError::InvalidConfig {
                    field,
                    reason: format!("must be > 0 (got {})", value),
                });
            }
        }

        let ranges: &[(&'static str, f32, f32)] = &[
            ("enemy_max_spawn_ms", self.enemy_min_spawn_ms, self.enemy_max_spawn_ms),
            ("enemy_fire_max_ms", self.enemy_fire_min_ms, self.enemy_fire_max_ms),
            (
                "enemy_first_fire_max_ms",
                self.enemy_first_fire_min_ms,
                self.enemy_first_fire_max_ms,
            ),
            ("star_z_max", self.star_z_min, self.star_z_max),
        ];
        for &(field, min, max) in ranges {
            if min < 0.0 || max < min {
                return Err(GameError::InvalidConfig {
                    field,
                    reason: format!("must describe a range min <= max (got {}..{})", min, max),
                });
            }
        }

        if self.boss_kill_threshold == 0 {
            return Err(GameError::InvalidConfig {
                field: "boss_kill_threshold",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.boss_hp <= 0 {
            return Err(GameError::InvalidConfig {
                field: "boss_hp",
                reason: format!("must be > 0 (got {})", self.boss_hp),
            });
        }
        if self.hit_damage <= 0 || self.player_max_health <= self.health_floor {
            return Err(GameError::InvalidConfig {
                field: "hit_damage",
                reason: format!(
                    "needs hit_damage > 0 and player_max_health > health_floor (got {}, {}, {})",
                    self.hit_damage, self.player_max_health, self.health_floor
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.enemy_burst_chance) {
            return Err(GameError::InvalidConfig {
                field: "enemy_burst_chance",
                reason: format!("must be within 0..=1 (got {})", self.enemy_burst_chance),
            });
        }
        Ok(())
    }
}

// ── Difficulty presets ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Multipliers for (spawn interval, fire interval, enemy speed).
    fn factors(self) -> (f32, f32, f32) {
        match self {
            Difficulty::Easy => (1.4, 1.3, 0.8),
            Difficulty::Medium => (1.0, 1.0, 1.0),
            Difficulty::Hard => (0.6, 0.75, 1.25),
        }
    }

    /// Scale the pacing fields of `config` for this difficulty.
    pub fn apply(self, config: &mut GameConfig) {
        let (spawn, fire, speed) = self.factors();
        config.enemy_min_spawn_ms *= spawn;
        config.enemy_max_spawn_ms *= spawn;
        config.enemy_fire_min_ms *= fire;
        config.enemy_fire_max_ms *= fire;
        config.boss_fire_every_ms *= fire;
        config.enemy_speed *= speed;
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}' (easy, medium, hard)", other)),
        }
    }
}
