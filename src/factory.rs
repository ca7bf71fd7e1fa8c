/// Constructors for entity records.
///
/// Callers supply every meaningful field. The only defaults filled in here
/// are `alive = true`, zeroed timers and a random wobble phase for enemies.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::{Boss, Bullet, BulletColor, BulletOwner, Enemy, Explosion};

pub struct EnemyParams {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub spd: f32,
    pub fire_every: f32,
    pub next_fire: f64,
}

pub fn make_enemy(params: EnemyParams, rng: &mut impl Rng) -> Enemy {
    Enemy {
        x: params.x,
        y: params.y,
        vx: params.vx,
        vy: params.vy,
        angle: 0.0,
        spd: params.spd,
        alive: true,
        next_fire: params.next_fire,
        fire_every: params.fire_every,
        wobble_phase: rng.gen_range(0.0..TAU),
    }
}

pub struct BulletParams {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub color: BulletColor,
}

pub fn make_enemy_bullet(params: BulletParams) -> Bullet {
    bullet(params, BulletOwner::Enemy)
}

pub fn make_player_bullet(params: BulletParams) -> Bullet {
    bullet(params, BulletOwner::Player)
}

fn bullet(params: BulletParams, owner: BulletOwner) -> Bullet {
    Bullet {
        x: params.x,
        y: params.y,
        vx: params.vx,
        vy: params.vy,
        life: params.life,
        color: params.color,
        owner,
    }
}

pub fn make_explosion(x: f32, y: f32) -> Explosion {
    Explosion {
        x,
        y,
        t: 0.0,
        counted: false,
    }
}

pub struct BossParams {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub hp: i32,
    pub radius: f32,
    pub fire_every: f32,
}

pub fn make_boss(params: BossParams) -> Boss {
    Boss {
        x: params.x,
        y: params.y,
        vx: params.vx,
        vy: params.vy,
        angle: 0.0,
        hp: params.hp,
        max_hp: params.hp,
        alive: true,
        radius: params.radius,
        fire_every: params.fire_every,
        fire_t: 0.0,
    }
}
