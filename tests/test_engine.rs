use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use star_arcade::config::GameConfig;
use star_arcade::engine::{Engine, EngineHooks, KillEvent};
use star_arcade::entities::*;
use star_arcade::factory::*;
use star_arcade::input::{FireKind, InputEvent, ScriptedInput};
use star_arcade::surface::HeadlessSurface;

use rand::rngs::StdRng;
use rand::SeedableRng;

const W: f32 = 640.0;
const H: f32 = 384.0;
const EPS: f32 = 1e-3;

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    kills: RefCell<Vec<KillEvent>>,
    resets: Cell<u32>,
}

fn engine_with(config: GameConfig) -> (Engine<HeadlessSurface>, Rc<Recorder>) {
    let rec = Rc::new(Recorder::default());
    let on_kill = Rc::clone(&rec);
    let on_reset = Rc::clone(&rec);
    let hooks = EngineHooks::new()
        .on_kill(move |ev| on_kill.kills.borrow_mut().push(ev))
        .on_reset(move || on_reset.resets.set(on_reset.resets.get() + 1));
    let engine = Engine::with_rng(
        HeadlessSurface::new(W, H),
        config,
        hooks,
        StdRng::seed_from_u64(42),
    );
    (engine, rec)
}

fn engine() -> (Engine<HeadlessSurface>, Rc<Recorder>) {
    engine_with(GameConfig::default())
}

/// A live enemy that will not fire for a long while.
fn quiet_enemy(x: f32, y: f32) -> Enemy {
    make_enemy(
        EnemyParams {
            x,
            y,
            vx: 70.0,
            vy: 0.0,
            spd: 70.0,
            fire_every: 1.0,
            next_fire: 1_000.0,
        },
        &mut StdRng::seed_from_u64(7),
    )
}

fn player_bullet(x: f32, y: f32) -> Bullet {
    make_player_bullet(BulletParams {
        x,
        y,
        vx: 0.0,
        vy: -800.0,
        life: 0.9,
        color: BulletColor::Green,
    })
}

fn enemy_bullet(x: f32, y: f32) -> Bullet {
    make_enemy_bullet(BulletParams {
        x,
        y,
        vx: 0.0,
        vy: 520.0,
        life: 1.6,
        color: BulletColor::Red,
    })
}

/// Place an enemy with a bullet on top of it and run one frozen frame.
fn kill_one(engine: &mut Engine<HeadlessSurface>) {
    let w = engine.world_mut();
    w.enemies.push(quiet_enemy(100.0, 100.0));
    w.player_bullets.push(player_bullet(100.0, 100.0));
    engine.step(0.0).unwrap();
}

// ── Start-up ──────────────────────────────────────────────────────────────────

#[test]
fn starts_centred_with_full_health() {
    let (engine, _) = engine();
    let w = engine.world();
    assert_eq!((w.player.x, w.player.y), (W / 2.0, H / 2.0));
    assert_eq!((w.target.x, w.target.y), (W / 2.0, H / 2.0));
    assert_eq!(w.player_health(), 100);
    assert_eq!(w.kill_count, 0);
    assert!(!w.in_boss_phase && !w.game_over && !w.victory);
    assert!(w.boss.is_none());
    assert!(engine.is_running());
    assert!(!engine.starfield().stars.is_empty());
}

#[test]
fn each_step_presents_one_frame_with_hud() {
    let (mut engine, _) = engine();
    engine.set_hud_label("MEDIUM");
    engine.step(1.0 / 60.0).unwrap();
    let s = engine.surface();
    assert_eq!(s.frames, 1);
    assert!(s.has_text("Kills:"));
    assert!(s.has_text("Health: 100/100"));
    assert!(s.has_text("[ MEDIUM ]"));
    assert!(s.plots > 0);
}

// ── Timing and smoothing ──────────────────────────────────────────────────────

#[test]
fn first_tick_has_zero_dt_and_long_gaps_are_clamped() {
    let (mut engine, _) = engine();
    let t0 = Instant::now();
    engine.tick(t0).unwrap();
    assert_eq!(engine.world().clock, 0.0);

    engine.tick(t0 + Duration::from_millis(10)).unwrap();
    assert!((engine.world().clock - 0.01).abs() < 1e-4);

    let before = engine.world().clock;
    engine.tick(t0 + Duration::from_secs(5)).unwrap();
    let max_dt = f64::from(engine.config().max_frame_dt);
    assert!((engine.world().clock - before - max_dt).abs() < 1e-6);
}

#[test]
fn ship_eases_toward_cursor() {
    let (mut engine, _) = engine();
    engine.handle_input(InputEvent::PointerMove { x: 420.0, y: 192.0 });
    engine.step(1.0 / 60.0).unwrap();

    let expected = 320.0 + 100.0 * (1.0 - (-8.0f32 / 60.0).exp());
    let p = engine.world().player;
    assert!((p.x - expected).abs() < EPS);
    assert!(p.x < 420.0);

    for _ in 0..600 {
        engine.step(1.0 / 60.0).unwrap();
    }
    assert!((engine.world().player.x - 420.0).abs() < 0.01);
}

// ── Kills and the boss threshold ──────────────────────────────────────────────

#[test]
fn player_bullet_kills_enemy_and_notifies() {
    let (mut engine, rec) = engine();
    kill_one(&mut engine);

    let w = engine.world();
    assert_eq!(w.kill_count, 1);
    assert!(w.enemies.is_empty());
    assert!(w.player_bullets.is_empty());
    assert_eq!(w.explosions.len(), 1);
    assert_eq!((w.explosions[0].x, w.explosions[0].y), (100.0, 100.0));
    assert_eq!(
        *rec.kills.borrow(),
        vec![KillEvent {
            kills: 1,
            absolute: true,
            reset: false
        }]
    );
}

#[test]
fn dead_enemy_is_counted_exactly_once() {
    let (mut engine, rec) = engine();
    kill_one(&mut engine);
    for _ in 0..5 {
        engine.step(0.0).unwrap();
    }
    assert_eq!(engine.world().kill_count, 1);
    assert_eq!(rec.kills.borrow().len(), 1);
}

#[test]
fn threshold_kill_starts_boss_phase_and_clears_field() {
    let (mut engine, rec) = engine();
    for _ in 0..9 {
        kill_one(&mut engine);
    }
    assert!(!engine.world().in_boss_phase);

    // Leftovers that the boss phase must sweep away
    let w = engine.world_mut();
    w.enemy_bullets.push(enemy_bullet(10.0, 10.0));
    w.enemies.push(quiet_enemy(500.0, 300.0));
    kill_one(&mut engine);

    let w = engine.world();
    assert_eq!(w.kill_count, 10);
    assert!(w.in_boss_phase);
    assert!(w.enemies.is_empty());
    assert!(w.enemy_bullets.is_empty());
    assert!(w.player_bullets.is_empty());
    assert!(w.explosions.is_empty());
    let boss = w.boss.as_ref().unwrap();
    assert!(boss.alive);
    assert_eq!(boss.hp, engine.config().boss_hp);

    let kills: Vec<u32> = rec.kills.borrow().iter().map(|e| e.kills).collect();
    assert_eq!(kills, (1..=10).collect::<Vec<_>>());
}

#[test]
fn custom_threshold_is_honoured() {
    let config = GameConfig {
        boss_kill_threshold: 3,
        ..GameConfig::default()
    };
    let (mut engine, _) = engine_with(config);
    for _ in 0..3 {
        kill_one(&mut engine);
    }
    assert!(engine.world().in_boss_phase);
}

#[test]
fn entering_boss_phase_twice_keeps_one_boss() {
    let (mut engine, _) = engine();
    engine.enter_boss_phase();
    let first = engine.world().boss.clone().unwrap();
    engine.enter_boss_phase();
    let second = engine.world().boss.clone().unwrap();
    assert_eq!(first.x, second.x);
    assert_eq!(first.vx, second.vx);
    assert_eq!(first.hp, second.hp);
}

#[test]
fn boss_phase_stops_enemy_spawns() {
    let (mut engine, _) = engine();
    engine.enter_boss_phase();
    for _ in 0..300 {
        engine.step(0.033).unwrap();
        assert!(engine.world().enemies.is_empty());
        assert!(engine.world().boss.is_some());
    }
}

#[test]
fn boss_phase_kills_are_not_counted() {
    let (mut engine, rec) = engine();
    engine.enter_boss_phase();
    let mut dead = quiet_enemy(100.0, 100.0);
    dead.alive = false;
    engine.world_mut().enemies.push(dead);
    engine.step(0.0).unwrap();
    assert_eq!(engine.world().kill_count, 0);
    assert!(rec.kills.borrow().is_empty());
}

#[test]
fn boss_opens_fire_on_its_cadence() {
    let (mut engine, _) = engine();
    engine.enter_boss_phase();
    // Just past one volley interval
    for _ in 0..25 {
        engine.step(0.033).unwrap();
    }
    let w = engine.world();
    let fired = w.enemy_bullets.len() + w.pending_shots.len();
    assert!(fired >= 1, "boss never fired");
}

#[test]
fn defeating_boss_is_victory() {
    let (mut engine, _) = engine();
    engine.enter_boss_phase();
    let (bx, by) = {
        let w = engine.world_mut();
        let b = w.boss.as_mut().unwrap();
        b.hp = 1;
        (b.x, b.y)
    };
    engine.world_mut().player_bullets.push(player_bullet(bx, by));
    engine.world_mut().enemy_bullets.push(enemy_bullet(10.0, 10.0));
    engine.step(0.0).unwrap();

    let w = engine.world();
    assert!(w.victory);
    assert!(w.in_boss_phase);
    assert!(!w.boss.as_ref().unwrap().alive);
    assert!(w.enemy_bullets.is_empty());
    assert!(w.pending_shots.is_empty());

    engine.step(0.1).unwrap();
    assert!(engine.surface().has_text("V I C T O R Y"));
    assert!(engine.world().victory_t > 0.0);

    // Victory holds until reset
    for _ in 0..100 {
        engine.step(0.033).unwrap();
    }
    assert!(engine.world().victory);
    assert!(engine.world().enemies.is_empty());
}

// ── Health and game over ──────────────────────────────────────────────────────

#[test]
fn ten_hits_end_the_game() {
    let (mut engine, _) = engine();
    let p = engine.world().player;
    for _ in 0..10 {
        engine.world_mut().enemy_bullets.push(enemy_bullet(p.x, p.y));
    }
    engine.step(0.0).unwrap();

    let w = engine.world();
    assert_eq!(w.player_health(), 0);
    assert!(w.game_over);
    assert!(engine.surface().has_text("GAME  OVER"));
}

#[test]
fn single_hit_costs_ten_points() {
    let (mut engine, _) = engine();
    let p = engine.world().player;
    engine.world_mut().enemy_bullets.push(enemy_bullet(p.x + 5.0, p.y));
    engine.step(0.0).unwrap();
    assert_eq!(engine.world().player_health(), 90);
    assert!(!engine.world().game_over);
    assert_eq!(engine.world().explosions.len(), 1);
}

#[test]
fn game_over_freezes_field_and_ignores_fire() {
    let (mut engine, _) = engine();
    let p = engine.world().player;
    for _ in 0..10 {
        engine.world_mut().enemy_bullets.push(enemy_bullet(p.x, p.y));
    }
    engine.step(0.0).unwrap();
    assert!(engine.world().game_over);

    engine.world_mut().enemies.push(quiet_enemy(200.0, 200.0));
    engine.world_mut().enemy_bullets.push(enemy_bullet(p.x, p.y));
    engine.handle_input(InputEvent::Fire(FireKind::Primary));
    assert!(engine.world().player_bullets.is_empty());

    for _ in 0..200 {
        engine.step(0.033).unwrap();
    }
    let w = engine.world();
    assert!(w.game_over);
    assert_eq!(w.player_health(), 0);
    assert_eq!(w.enemies.len(), 1);
    assert_eq!((w.enemies[0].x, w.enemies[0].y), (200.0, 200.0));
}

#[test]
fn reset_after_game_over_restores_play() {
    let (mut engine, _) = engine();
    let p = engine.world().player;
    for _ in 0..10 {
        engine.world_mut().enemy_bullets.push(enemy_bullet(p.x, p.y));
    }
    engine.step(0.0).unwrap();
    engine.handle_input(InputEvent::Reset);

    let w = engine.world();
    assert!(!w.game_over);
    assert_eq!(w.player_health(), 100);
    engine.handle_input(InputEvent::Fire(FireKind::Primary));
    assert_eq!(engine.world().player_bullets.len(), 1);
}

// ── Reset and teardown ────────────────────────────────────────────────────────

#[test]
fn reset_from_victory_clears_everything() {
    let (mut engine, rec) = engine();
    for _ in 0..3 {
        kill_one(&mut engine);
    }
    engine.enter_boss_phase();
    {
        let w = engine.world_mut();
        w.victory = true;
        w.health.current = 40;
        w.enemy_bullets.push(enemy_bullet(10.0, 10.0));
    }
    rec.kills.borrow_mut().clear();

    engine.reset_game();

    let w = engine.world();
    assert!(!w.victory && !w.game_over && !w.in_boss_phase);
    assert!(w.boss.is_none());
    assert_eq!(w.kill_count, 0);
    assert_eq!(w.player_health(), 100);
    assert!(w.enemies.is_empty());
    assert!(w.enemy_bullets.is_empty());
    assert!(w.player_bullets.is_empty());
    assert!(w.explosions.is_empty());
    assert!(w.pending_shots.is_empty());
    assert!(w.just_reset);

    assert_eq!(rec.resets.get(), 1);
    assert_eq!(
        *rec.kills.borrow(),
        vec![KillEvent {
            kills: 0,
            absolute: true,
            reset: true
        }]
    );
}

#[test]
fn reset_twice_gives_same_state() {
    let (mut engine, rec) = engine();
    kill_one(&mut engine);
    engine.reset_game();
    let first = engine.world().clone();
    engine.reset_game();
    let second = engine.world();

    assert_eq!(first.kill_count, second.kill_count);
    assert_eq!(first.health, second.health);
    assert_eq!(first.in_boss_phase, second.in_boss_phase);
    assert_eq!(first.game_over, second.game_over);
    assert_eq!(first.victory, second.victory);
    assert_eq!(first.enemies.len(), second.enemies.len());
    assert_eq!(first.explosions.len(), second.explosions.len());
    assert_eq!(rec.resets.get(), 2);
}

#[test]
fn kill_on_reset_frame_is_not_counted() {
    let (mut engine, _) = engine();
    engine.reset_game();
    let mut dead = quiet_enemy(100.0, 100.0);
    dead.alive = false;
    engine.world_mut().enemies.push(dead);
    engine.step(0.0).unwrap();
    assert_eq!(engine.world().kill_count, 0);
    assert!(!engine.world().just_reset);

    kill_one(&mut engine);
    assert_eq!(engine.world().kill_count, 1);
}

#[test]
fn destroy_is_idempotent_and_stops_everything() {
    let (mut engine, rec) = engine();
    engine.attach_input(ScriptedInput::new(vec![InputEvent::PointerMove {
        x: 10.0,
        y: 10.0,
    }]));
    engine.destroy();
    engine.destroy();
    assert!(!engine.is_running());

    engine.pump_inputs();
    assert_eq!(engine.world().target.x, W / 2.0);

    engine.step(0.1).unwrap();
    engine.tick(Instant::now()).unwrap();
    assert_eq!(engine.world().clock, 0.0);
    assert_eq!(engine.surface().frames, 0);

    engine.reset_game();
    assert_eq!(rec.resets.get(), 0);
    engine.handle_input(InputEvent::Fire(FireKind::Primary));
    assert!(engine.world().player_bullets.is_empty());

    engine.world_mut().enemies.push(quiet_enemy(100.0, 100.0));
    engine.enter_boss_phase();
    let w = engine.world();
    assert!(!w.in_boss_phase);
    assert!(w.boss.is_none());
    assert_eq!(w.enemies.len(), 1);

    engine.resize(100.0, 50.0);
    engine.handle_input(InputEvent::Resize {
        width: 200.0,
        height: 80.0,
    });
    assert_eq!(engine.world().arena.width, W);
    assert_eq!(engine.surface().width, W);
    assert_eq!(engine.starfield().width, W);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn scripted_input_moves_target_and_fires() {
    let (mut engine, _) = engine();
    engine.attach_input(ScriptedInput::new(vec![
        InputEvent::PointerMove { x: 100.0, y: 50.0 },
        InputEvent::Fire(FireKind::Primary),
    ]));
    engine.pump_inputs();

    let w = engine.world();
    assert_eq!((w.target.x, w.target.y), (100.0, 50.0));
    assert_eq!(w.player_bullets.len(), 1);
    let b = &w.player_bullets[0];
    assert_eq!(b.color, BulletColor::Green);
    assert_eq!(b.owner, BulletOwner::Player);
    // Shots leave from the cursor target, ahead of the eased ship
    assert_eq!((b.x, b.y), (100.0, 50.0));
    assert!(b.vy < 0.0);

    // Script is exhausted after one poll
    engine.pump_inputs();
    assert_eq!(engine.world().player_bullets.len(), 1);
}

#[test]
fn secondary_fire_is_red_or_blue() {
    let (mut engine, _) = engine();
    for _ in 0..20 {
        engine.handle_input(InputEvent::Fire(FireKind::Secondary));
    }
    assert!(engine
        .world()
        .player_bullets
        .iter()
        .all(|b| matches!(b.color, BulletColor::Red | BulletColor::Blue)));
}

#[test]
fn fire_at_moves_target_then_fires_from_it() {
    let (mut engine, _) = engine();
    engine.handle_input(InputEvent::FireAt {
        x: 100.0,
        y: 300.0,
        kind: FireKind::Primary,
    });
    let w = engine.world();
    assert_eq!((w.target.x, w.target.y), (100.0, 300.0));
    assert_eq!((w.player_bullets[0].x, w.player_bullets[0].y), (100.0, 300.0));
    assert_eq!(w.player.x, W / 2.0);
}

#[test]
fn nudge_is_clamped_to_the_screen() {
    let (mut engine, _) = engine();
    for _ in 0..50 {
        engine.handle_input(InputEvent::Nudge { dx: -1, dy: 1 });
    }
    let t = engine.world().target;
    assert_eq!(t.x, 0.0);
    assert_eq!(t.y, H);
}

#[test]
fn resize_recentres_and_keeps_score() {
    let (mut engine, _) = engine();
    engine.world_mut().kill_count = 3;
    engine.world_mut().health.current = 70;
    engine.handle_input(InputEvent::Resize {
        width: 800.0,
        height: 480.0,
    });

    let w = engine.world();
    assert_eq!(w.arena.width, 800.0);
    assert_eq!((w.target.x, w.target.y), (400.0, 240.0));
    assert_eq!((w.player.x, w.player.y), (400.0, 240.0));
    assert_eq!(w.kill_count, 3);
    assert_eq!(w.player_health(), 70);
    assert_eq!(engine.starfield().width, 800.0);
    assert_eq!(engine.surface().width, 800.0);
}

// ── Frame order ───────────────────────────────────────────────────────────────

#[test]
fn bullets_move_once_per_step() {
    let (mut engine, _) = engine();
    engine.world_mut().player_bullets.push(player_bullet(100.0, 300.0));
    engine.step(0.01).unwrap();
    let b = &engine.world().player_bullets[0];
    assert!((b.y - 292.0).abs() < EPS);
    assert!((b.life - 0.89).abs() < EPS);
}

#[test]
fn explosions_expire_after_their_duration() {
    let (mut engine, _) = engine();
    kill_one(&mut engine);
    assert_eq!(engine.world().explosions.len(), 1);
    for _ in 0..13 {
        engine.step(0.033).unwrap();
    }
    assert!(engine.world().explosions.is_empty());
}

#[test]
fn long_session_keeps_invariants() {
    let (mut engine, _) = engine();
    let mut last_kills = 0;
    for frame in 0..5_000 {
        if frame % 4 == 0 {
            let x = 40.0 + (frame % 560) as f32;
            engine.handle_input(InputEvent::PointerMove { x, y: 300.0 });
            engine.handle_input(InputEvent::Fire(FireKind::Primary));
        }
        engine.step(1.0 / 60.0).unwrap();

        let w = engine.world();
        assert!(w.kill_count >= last_kills);
        last_kills = w.kill_count;
        assert!((0..=100).contains(&w.player_health()));
        for e in &w.enemies {
            assert!(e.alive);
            assert!((e.vx.hypot(e.vy) - e.spd).abs() < EPS);
        }
        for b in w.enemy_bullets.iter().chain(&w.player_bullets) {
            assert!(b.life > 0.0);
        }
        for ex in &w.explosions {
            assert!(!ex.counted);
        }
        if w.in_boss_phase {
            assert!(w.boss.is_some());
            assert!(w.enemies.is_empty());
        }

        if w.game_over || w.victory {
            engine.reset_game();
            last_kills = 0;
        }
    }
}
