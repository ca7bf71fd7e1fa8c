/// Projectile creation, integration and culling.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bullet, BulletColor, Point};
use crate::factory::{make_enemy_bullet, make_player_bullet, BulletParams};
use crate::systems::Arena;
use crate::util::{out_of_bounds, rotate, unit_towards};

/// Red or blue with equal odds. Enemy and secondary fire use this palette.
pub fn random_alt_color(rng: &mut impl Rng) -> BulletColor {
    if rng.gen_bool(0.5) {
        BulletColor::Red
    } else {
        BulletColor::Blue
    }
}

/// An enemy-owned bullet from `(x, y)` aimed at `target`, rotated by
/// `spread` radians.
pub fn enemy_shot(
    x: f32,
    y: f32,
    target: Point,
    spread: f32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Bullet {
    let (ux, uy) = unit_towards(x, y, target.x, target.y);
    let (ux, uy) = rotate(ux, uy, spread);
    make_enemy_bullet(BulletParams {
        x,
        y,
        vx: ux * config.bullet_speed,
        vy: uy * config.bullet_speed,
        life: config.bullet_life,
        color: random_alt_color(rng),
    })
}

/// A player bullet fired straight up from `at`.
pub fn player_shot(at: Point, color: BulletColor, config: &GameConfig) -> Bullet {
    make_player_bullet(BulletParams {
        x: at.x,
        y: at.y,
        vx: 0.0,
        vy: -config.my_bullet_speed,
        life: config.my_bullet_life,
        color,
    })
}

/// Straight-line integration. Life never drops below zero.
pub fn integrate(bullets: &mut [Bullet], dt: f32) {
    for b in bullets.iter_mut() {
        if !b.is_live() {
            continue;
        }
        b.x += b.vx * dt;
        b.y += b.vy * dt;
        b.life = (b.life - dt).max(0.0);
    }
}

/// Drop spent bullets and those past the out-of-bounds margin.
pub fn cull(bullets: &mut Vec<Bullet>, arena: &Arena, margin: f32) {
    bullets.retain(|b| b.is_live() && !out_of_bounds(b.x, b.y, arena.width, arena.height, margin));
}
