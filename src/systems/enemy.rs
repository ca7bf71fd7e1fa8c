/// Enemy spawning, steering and firing.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Bullet, Enemy, Point};
use crate::factory::{make_enemy, EnemyParams};
use crate::systems::bullet::enemy_shot;
use crate::systems::Arena;
use crate::util::{bounce_within, rand_between, renorm, unit_towards};

// ── Spawn timer ───────────────────────────────────────────────────────────────

/// Counts milliseconds toward the next spawn. The delay is re-drawn from the
/// configured range after every spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTimer {
    pub elapsed_ms: f32,
    pub next_in_ms: f32,
}

impl SpawnTimer {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut timer = Self {
            elapsed_ms: 0.0,
            next_in_ms: 0.0,
        };
        timer.reseed(config, rng);
        timer
    }

    pub fn reseed(&mut self, config: &GameConfig, rng: &mut impl Rng) {
        self.elapsed_ms = 0.0;
        self.next_in_ms = rand_between(rng, config.enemy_min_spawn_ms, config.enemy_max_spawn_ms);
    }

    /// Never fire again until reseeded.
    pub fn suspend(&mut self) {
        self.elapsed_ms = 0.0;
        self.next_in_ms = f32::INFINITY;
    }

    /// Advance by `dt` seconds; true when a spawn is due.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed_ms += dt * 1000.0;
        self.elapsed_ms >= self.next_in_ms
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// A new enemy just outside a random screen edge, heading for the centre.
pub fn spawn_enemy(arena: &Arena, config: &GameConfig, now: f64, rng: &mut impl Rng) -> Enemy {
    let m = config.spawn_margin;
    let (x, y) = match rng.gen_range(0..4) {
        0 => (rand_between(rng, 0.0, arena.width), -m),
        1 => (arena.width + m, rand_between(rng, 0.0, arena.height)),
        2 => (rand_between(rng, 0.0, arena.width), arena.height + m),
        _ => (-m, rand_between(rng, 0.0, arena.height)),
    };

    let (ux, uy) = unit_towards(x, y, arena.cx, arena.cy);
    let first_fire_ms = rand_between(
        rng,
        config.enemy_first_fire_min_ms,
        config.enemy_first_fire_max_ms,
    );
    let fire_every_ms = rand_between(rng, config.enemy_fire_min_ms, config.enemy_fire_max_ms);

    debug!(x, y, "enemy spawned");
    make_enemy(
        EnemyParams {
            x,
            y,
            vx: ux * config.enemy_speed,
            vy: uy * config.enemy_speed,
            spd: config.enemy_speed,
            fire_every: fire_every_ms / 1000.0,
            next_fire: now + f64::from(first_fire_ms) / 1000.0,
        },
        rng,
    )
}

// ── Per-tick AI ───────────────────────────────────────────────────────────────

/// Everything an enemy needs to know about the current tick.
#[derive(Clone, Copy, Debug)]
pub struct EnemyTick {
    pub dt: f32,
    /// Simulation clock, seconds.
    pub now: f64,
    /// Smoothed player position.
    pub player: Point,
}

/// Move one enemy: straight path plus perpendicular wobble, bounce off the
/// padded bounds, then restore its assigned speed.
pub fn steer(enemy: &mut Enemy, arena: &Arena, dt: f32, config: &GameConfig) {
    enemy.wobble_phase += dt * config.wobble_rate;
    let wobble = enemy.wobble_phase.sin() * config.wobble_amplitude;

    let spd = if enemy.spd != 0.0 { enemy.spd } else { 1.0 };
    let (ux, uy) = (enemy.vx / spd, enemy.vy / spd);
    let (nx, ny) = (-uy, ux);

    enemy.x += enemy.vx * dt + nx * wobble * dt;
    enemy.y += enemy.vy * dt + ny * wobble * dt;

    let b = bounce_within(
        enemy.x,
        enemy.y,
        enemy.vx,
        enemy.vy,
        arena.width,
        arena.height,
        config.enemy_pad,
    );
    let (vx, vy) = renorm(b.vx, b.vy, enemy.spd);
    enemy.x = b.x;
    enemy.y = b.y;
    enemy.vx = vx;
    enemy.vy = vy;
}

pub fn update_enemies(
    enemies: &mut [Enemy],
    arena: &Arena,
    tick: &EnemyTick,
    config: &GameConfig,
    rng: &mut impl Rng,
    enemy_bullets: &mut Vec<Bullet>,
) {
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        steer(enemy, arena, tick.dt, config);

        let dx = tick.player.x - enemy.x;
        let dy = tick.player.y - enemy.y;
        enemy.angle = dy.atan2(dx);

        if tick.now >= enemy.next_fire {
            enemy_bullets.push(enemy_shot(enemy.x, enemy.y, tick.player, 0.0, config, rng));
            let mut interval = enemy.fire_every;
            // Occasional quick follow-up shot
            if rng.gen_bool(config.enemy_burst_chance) {
                interval *= config.enemy_burst_factor;
            }
            enemy.next_fire = tick.now + f64::from(interval);
        }
    }
}
