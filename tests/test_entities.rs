use std::f32::consts::TAU;

use star_arcade::entities::*;
use star_arcade::factory::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn enemy_defaults_alive_with_random_phase() {
    let mut rng = seeded_rng();
    let e = make_enemy(
        EnemyParams {
            x: 10.0,
            y: -40.0,
            vx: 0.0,
            vy: 70.0,
            spd: 70.0,
            fire_every: 1.2,
            next_fire: 0.5,
        },
        &mut rng,
    );
    assert!(e.alive);
    assert_eq!(e.angle, 0.0);
    assert_eq!((e.x, e.y, e.vx, e.vy, e.spd), (10.0, -40.0, 0.0, 70.0, 70.0));
    assert_eq!(e.next_fire, 0.5);
    assert_eq!(e.fire_every, 1.2);
    assert!((0.0..TAU).contains(&e.wobble_phase));
}

#[test]
fn wobble_phase_differs_between_enemies() {
    let mut rng = seeded_rng();
    let params = || EnemyParams {
        x: 0.0,
        y: 0.0,
        vx: 70.0,
        vy: 0.0,
        spd: 70.0,
        fire_every: 1.0,
        next_fire: 0.0,
    };
    let a = make_enemy(params(), &mut rng);
    let b = make_enemy(params(), &mut rng);
    assert_ne!(a.wobble_phase, b.wobble_phase);
}

#[test]
fn bullets_carry_owner_and_fields() {
    let params = || BulletParams {
        x: 1.0,
        y: 2.0,
        vx: 3.0,
        vy: 4.0,
        life: 0.9,
        color: BulletColor::Green,
    };
    let p = make_player_bullet(params());
    let e = make_enemy_bullet(params());
    assert_eq!(p.owner, BulletOwner::Player);
    assert_eq!(e.owner, BulletOwner::Enemy);
    assert_eq!((p.x, p.y, p.vx, p.vy, p.life), (1.0, 2.0, 3.0, 4.0, 0.9));
    assert!(p.is_live());
}

#[test]
fn spent_bullet_is_not_live() {
    let mut b = make_player_bullet(BulletParams {
        x: 0.0,
        y: 0.0,
        vx: 0.0,
        vy: -800.0,
        life: 0.9,
        color: BulletColor::Red,
    });
    b.life = 0.0;
    assert!(!b.is_live());
}

#[test]
fn explosion_starts_fresh() {
    let ex = make_explosion(5.0, 6.0);
    assert_eq!((ex.x, ex.y), (5.0, 6.0));
    assert_eq!(ex.t, 0.0);
    assert!(!ex.counted);
}

#[test]
fn boss_starts_at_full_health() {
    let b = make_boss(BossParams {
        x: 320.0,
        y: 96.0,
        vx: 180.0,
        vy: -140.0,
        hp: 10,
        radius: 40.0,
        fire_every: 800.0,
    });
    assert!(b.alive);
    assert_eq!(b.hp, 10);
    assert_eq!(b.max_hp, 10);
    assert_eq!(b.fire_t, 0.0);
    assert_eq!(b.angle, 0.0);
}

#[test]
fn entity_clone_is_independent() {
    let original = make_explosion(1.0, 1.0);
    let mut cloned = original.clone();
    cloned.t = 0.3;
    cloned.counted = true;
    assert_eq!(original.t, 0.0);
    assert!(!original.counted);
    assert_eq!(cloned.t, 0.3);
    assert!(cloned.counted);
}
