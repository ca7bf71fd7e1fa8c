/// The boss encounter: spawn, movement, burst fire and damage.
///
/// Burst shots after the first are not fired immediately; they are returned
/// as [`ScheduledShot`]s on the simulation clock so their owner can drop them
/// on reset, victory or teardown.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Boss, Bullet, Explosion, Point};
use crate::factory::{make_boss, BossParams};
use crate::systems::bullet::enemy_shot;
use crate::systems::{explosion, Arena};
use crate::util::{bounce_within, is_hit};

/// A delayed burst shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledShot {
    /// Simulation-clock time (seconds) the shot leaves the boss.
    pub fire_at: f64,
    /// Angular offset from the line to the player, radians.
    pub spread: f32,
}

/// One boss at the upper middle of the screen, drifting diagonally in a
/// random direction.
pub fn spawn_boss(arena: &Arena, config: &GameConfig, rng: &mut impl Rng) -> Boss {
    let sx = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let sy = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    make_boss(BossParams {
        x: arena.cx,
        y: arena.cy * 0.5,
        vx: config.boss_speed_x * sx,
        vy: config.boss_speed_y * sy,
        hp: config.boss_hp,
        radius: config.boss_radius,
        fire_every: config.boss_fire_every_ms,
    })
}

/// Move, bounce and spin the boss. Returns true when a volley is due.
pub fn update_boss(boss: &mut Boss, arena: &Arena, dt: f32, config: &GameConfig) -> bool {
    if !boss.alive {
        return false;
    }

    let b = bounce_within(
        boss.x + boss.vx * dt,
        boss.y + boss.vy * dt,
        boss.vx,
        boss.vy,
        arena.width,
        arena.height,
        config.boss_pad,
    );
    boss.x = b.x;
    boss.y = b.y;
    boss.vx = b.vx;
    boss.vy = b.vy;

    boss.angle += config.boss_spin * dt;

    boss.fire_t += dt * 1000.0;
    if boss.fire_t >= boss.fire_every {
        boss.fire_t = 0.0;
        true
    } else {
        false
    }
}

/// Fire the first shot of a volley now and schedule the rest.
pub fn volley(
    boss: &Boss,
    player: Point,
    now: f64,
    config: &GameConfig,
    rng: &mut impl Rng,
    enemy_bullets: &mut Vec<Bullet>,
    pending: &mut Vec<ScheduledShot>,
) {
    let count = config.boss_burst_count.max(1);
    let mid = (count - 1) as f32 / 2.0;
    for i in 0..count {
        let spread = (i as f32 - mid) * config.boss_burst_spread_rad;
        if i == 0 {
            enemy_bullets.push(enemy_shot(boss.x, boss.y, player, spread, config, rng));
        } else {
            let delay = f64::from(config.boss_burst_stagger_ms) * f64::from(i) / 1000.0;
            pending.push(ScheduledShot {
                fire_at: now + delay,
                spread,
            });
        }
    }
}

/// Fire every scheduled shot that is due. Shots for a dead or missing boss
/// are dropped.
pub fn fire_due(
    pending: &mut Vec<ScheduledShot>,
    boss: Option<&Boss>,
    player: Point,
    now: f64,
    config: &GameConfig,
    rng: &mut impl Rng,
    enemy_bullets: &mut Vec<Bullet>,
) {
    let boss = match boss {
        Some(b) if b.alive => b,
        _ => {
            pending.clear();
            return;
        }
    };
    pending.retain(|shot| {
        if now >= shot.fire_at {
            enemy_bullets.push(enemy_shot(boss.x, boss.y, player, shot.spread, config, rng));
            false
        } else {
            true
        }
    });
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BossHits {
    pub hits: u32,
    pub defeated: bool,
}

/// Player bullets inside the boss radius each cost it one hit point.
pub fn resolve_boss_hits(
    boss: &mut Boss,
    player_bullets: &mut [Bullet],
    explosions: &mut Vec<Explosion>,
) -> BossHits {
    let mut outcome = BossHits::default();
    if !boss.alive {
        return outcome;
    }
    for pb in player_bullets.iter_mut().filter(|b| b.is_live()) {
        if !is_hit(boss.x, boss.y, pb.x, pb.y, boss.radius) {
            continue;
        }
        pb.life = 0.0;
        boss.hp -= 1;
        outcome.hits += 1;
        explosion::trigger(explosions, boss.x, boss.y);
        debug!(hp = boss.hp, "boss hit");

        if boss.hp <= 0 {
            boss.alive = false;
            outcome.defeated = true;
            break;
        }
    }
    outcome
}
