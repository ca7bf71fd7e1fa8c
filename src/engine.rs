/// The engine: single owner of the world and driver of the frame loop.
///
/// One call to [`Engine::step`] runs a whole tick in a fixed order:
/// smoothing → background → spawn/AI (or boss) → bullets → collisions →
/// explosions → overlays → cull. Input events are applied between ticks.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, trace};

use crate::config::GameConfig;
use crate::entities::{Boss, Bullet, BulletColor, Enemy, Explosion, Point};
use crate::error::GameResult;
use crate::input::{FireKind, InputEvent, InputSource};
use crate::render::{self, Hud};
use crate::starfield::Starfield;
use crate::surface::Surface;
use crate::systems::boss::{self, ScheduledShot};
use crate::systems::bullet::{self, player_shot, random_alt_color};
use crate::systems::collision::{self, Health};
use crate::systems::enemy::{self, EnemyTick, SpawnTimer};
use crate::systems::explosion;
use crate::systems::Arena;

// ── Notifications ─────────────────────────────────────────────────────────────

/// Payload of the `on_kill` hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KillEvent {
    /// Kill count after this event.
    pub kills: u32,
    /// `kills` is a total, not a delta.
    pub absolute: bool,
    /// Sent once per reset with `kills == 0`.
    pub reset: bool,
}

/// Callbacks into the host UI.
#[derive(Default)]
pub struct EngineHooks {
    pub on_kill: Option<Box<dyn FnMut(KillEvent)>>,
    pub on_reset: Option<Box<dyn FnMut()>>,
}

impl EngineHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_kill(mut self, f: impl FnMut(KillEvent) + 'static) -> Self {
        self.on_kill = Some(Box::new(f));
        self
    }

    pub fn on_reset(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_reset = Some(Box::new(f));
        self
    }
}

// ── World state ───────────────────────────────────────────────────────────────

/// All mutable game state. Only the engine and the systems it calls touch it.
#[derive(Clone, Debug)]
pub struct World {
    pub arena: Arena,
    /// Simulation clock, seconds since the engine started.
    pub clock: f64,
    pub kill_count: u32,
    pub health: Health,
    pub game_over: bool,
    pub victory: bool,
    /// Seconds since victory, drives the banner pulse.
    pub victory_t: f32,
    /// Set by a reset, cleared at the end of the next tick.
    pub just_reset: bool,
    pub in_boss_phase: bool,
    /// Raw cursor target.
    pub target: Point,
    /// Smoothed ship position; all hit tests against the player use this.
    pub player: Point,
    pub boss: Option<Boss>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Bullet>,
    pub player_bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    pub spawn: SpawnTimer,
    pub pending_shots: Vec<ScheduledShot>,
}

impl World {
    pub fn player_health(&self) -> i32 {
        self.health.current
    }

    fn clear(&mut self) {
        self.enemies.clear();
        self.enemy_bullets.clear();
        self.player_bullets.clear();
        self.explosions.clear();
        self.pending_shots.clear();
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

pub struct Engine<S: Surface> {
    surface: S,
    config: GameConfig,
    hooks: EngineHooks,
    rng: StdRng,
    starfield: Starfield,
    world: World,
    inputs: Vec<Box<dyn InputSource>>,
    input_buf: Vec<InputEvent>,
    last_tick: Option<Instant>,
    hud_label: Option<String>,
    destroyed: bool,
}

impl<S: Surface> Engine<S> {
    pub fn new(surface: S, config: GameConfig, hooks: EngineHooks) -> Self {
        Self::with_rng(surface, config, hooks, StdRng::from_entropy())
    }

    /// Build an engine with a caller-supplied RNG, for reproducible runs.
    pub fn with_rng(surface: S, config: GameConfig, hooks: EngineHooks, mut rng: StdRng) -> Self {
        let (width, height) = surface.size();
        let mut starfield = Starfield::new(&config);
        starfield.resize(width, height, &mut rng);
        let arena = Arena::new(width, height);
        let center = Point::new(arena.cx, arena.cy);

        let world = World {
            arena,
            clock: 0.0,
            kill_count: 0,
            health: Health::new(config.player_max_health, config.health_floor, config.hit_damage),
            game_over: false,
            victory: false,
            victory_t: 0.0,
            just_reset: false,
            in_boss_phase: false,
            target: center,
            player: center,
            boss: None,
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            player_bullets: Vec::new(),
            explosions: Vec::new(),
            spawn: SpawnTimer::new(&config, &mut rng),
            pending_shots: Vec::new(),
        };

        info!(width, height, "engine started");
        Self {
            surface,
            config,
            hooks,
            rng,
            starfield,
            world,
            inputs: Vec::new(),
            input_buf: Vec::new(),
            last_tick: None,
            hud_label: None,
            destroyed: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn is_running(&self) -> bool {
        !self.destroyed
    }

    /// Text shown in the middle of the status line outside the boss phase.
    pub fn set_hud_label(&mut self, label: impl Into<String>) {
        self.hud_label = Some(label.into());
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    pub fn attach_input<I: InputSource + 'static>(&mut self, source: I) {
        if !self.destroyed {
            self.inputs.push(Box::new(source));
        }
    }

    /// Detach every input source and stop ticking. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.inputs.clear();
        self.input_buf.clear();
        self.world.pending_shots.clear();
        self.last_tick = None;
        info!(kills = self.world.kill_count, "engine destroyed");
    }

    /// Back to a fresh session: zero kills, full health, empty world.
    pub fn reset_game(&mut self) {
        if self.destroyed {
            return;
        }
        let w = &mut self.world;
        w.victory = false;
        w.victory_t = 0.0;
        w.game_over = false;
        w.health.restore();
        w.in_boss_phase = false;
        w.boss = None;
        w.kill_count = 0;
        w.clear();
        w.spawn.reseed(&self.config, &mut self.rng);
        w.just_reset = true;
        self.last_tick = None;

        info!("game reset");
        if let Some(on_kill) = self.hooks.on_kill.as_mut() {
            on_kill(KillEvent {
                kills: 0,
                absolute: true,
                reset: true,
            });
        }
        if let Some(on_reset) = self.hooks.on_reset.as_mut() {
            on_reset();
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Drain every attached source and apply the events in order.
    pub fn pump_inputs(&mut self) {
        let mut buf = std::mem::take(&mut self.input_buf);
        for source in self.inputs.iter_mut() {
            source.poll(&mut buf);
        }
        for event in buf.drain(..) {
            self.handle_input(event);
        }
        self.input_buf = buf;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if self.destroyed {
            return;
        }
        match event {
            InputEvent::PointerMove { x, y } => self.world.target = Point::new(x, y),
            InputEvent::Fire(kind) => self.player_fire(kind),
            InputEvent::FireAt { x, y, kind } => {
                self.world.target = Point::new(x, y);
                self.player_fire(kind);
            }
            InputEvent::Nudge { dx, dy } => {
                let step = self.config.nudge_step_px;
                let arena = self.world.arena;
                let t = &mut self.world.target;
                t.x = (t.x + f32::from(dx) * step).clamp(0.0, arena.width);
                t.y = (t.y + f32::from(dy) * step).clamp(0.0, arena.height);
            }
            InputEvent::Reset => self.reset_game(),
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
    }

    /// Fire straight up from the cursor target. Ignored while the game-over
    /// screen is up.
    pub fn player_fire(&mut self, kind: FireKind) {
        if self.destroyed || self.world.game_over {
            return;
        }
        let color = match kind {
            FireKind::Primary => BulletColor::Green,
            FireKind::Secondary => random_alt_color(&mut self.rng),
        };
        let shot = player_shot(self.world.target, color, &self.config);
        self.world.player_bullets.push(shot);
    }

    /// Reproject the world to a new size. Score and health are kept. No-op
    /// after `destroy`.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.destroyed {
            return;
        }
        self.surface.resize(width, height);
        let (width, height) = self.surface.size();
        self.starfield.resize(width, height, &mut self.rng);
        self.world.arena = Arena::new(width, height);
        let center = Point::new(self.world.arena.cx, self.world.arena.cy);
        self.world.target = center;
        self.world.player = center;
    }

    // ── Boss phase ────────────────────────────────────────────────────────────

    /// Freeze spawning, clear the field and bring in the boss. No-op when
    /// the boss phase is already active or the engine is destroyed.
    pub fn enter_boss_phase(&mut self) {
        if self.destroyed || self.world.in_boss_phase {
            return;
        }
        self.world.in_boss_phase = true;
        self.world.spawn.suspend();
        self.world.clear();
        self.world.boss = Some(boss::spawn_boss(&self.world.arena, &self.config, &mut self.rng));
        info!(kills = self.world.kill_count, "boss phase entered");
    }

    fn on_boss_defeated(&mut self) {
        self.world.victory = true;
        self.world.victory_t = 0.0;
        self.world.clear();
        info!("boss defeated, victory");
    }

    // ── Frame loop ────────────────────────────────────────────────────────────

    /// One animation frame at wall-clock time `now`.
    pub fn tick(&mut self, now: Instant) -> GameResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let dt = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.step(dt)
    }

    /// Advance the simulation by `dt` seconds (clamped) and draw the frame.
    pub fn step(&mut self, dt: f32) -> GameResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let dt = dt.clamp(0.0, self.config.max_frame_dt);
        self.world.clock += f64::from(dt);

        // Ease the ship toward the cursor target
        let alpha = 1.0 - (-self.config.smoothing_rate * dt).exp();
        let w = &mut self.world;
        w.player.x += (w.target.x - w.player.x) * alpha;
        w.player.y += (w.target.y - w.player.y) * alpha;
        if w.victory {
            w.victory_t += dt;
        }

        self.surface.clear()?;
        self.background()?;

        if self.world.in_boss_phase {
            self.advance_boss(dt)?;
        } else {
            self.advance_enemies(dt)?;
        }

        if self.world.victory {
            let a = self.world.arena;
            render::draw_victory(&mut self.surface, a.cx, a.cy, self.world.victory_t)?;
        }

        self.advance_bullets(dt)?;
        self.collide();
        self.advance_explosions(dt)?;

        if self.world.game_over {
            let a = self.world.arena;
            render::draw_game_over(&mut self.surface, a.cx, a.cy, self.world.kill_count)?;
        }
        self.draw_hud()?;
        self.surface.present()?;

        self.cull();
        self.world.just_reset = false;
        Ok(())
    }

    fn background(&mut self) -> GameResult<()> {
        self.starfield.advance(&mut self.rng);
        if self.world.victory {
            let a = self.world.arena;
            render::draw_galaxy(&mut self.surface, a.cx, a.cy, self.world.victory_t)?;
        } else {
            self.starfield.draw(&mut self.surface)?;
        }
        Ok(())
    }

    fn advance_enemies(&mut self, dt: f32) -> GameResult<()> {
        // The game-over screen freezes the field
        if !self.world.game_over {
            if self.world.spawn.advance(dt) {
                self.world.spawn.reseed(&self.config, &mut self.rng);
                let e = enemy::spawn_enemy(
                    &self.world.arena,
                    &self.config,
                    self.world.clock,
                    &mut self.rng,
                );
                self.world.enemies.push(e);
            }

            let tick = EnemyTick {
                dt,
                now: self.world.clock,
                player: self.world.player,
            };
            enemy::update_enemies(
                &mut self.world.enemies,
                &self.world.arena,
                &tick,
                &self.config,
                &mut self.rng,
                &mut self.world.enemy_bullets,
            );
        }

        for e in self.world.enemies.iter().filter(|e| e.alive) {
            render::draw_enemy(&mut self.surface, e)?;
        }
        Ok(())
    }

    fn advance_boss(&mut self, dt: f32) -> GameResult<()> {
        let w = &mut self.world;
        if !w.game_over {
            if let Some(b) = w.boss.as_mut() {
                if boss::update_boss(b, &w.arena, dt, &self.config) {
                    boss::volley(
                        b,
                        w.player,
                        w.clock,
                        &self.config,
                        &mut self.rng,
                        &mut w.enemy_bullets,
                        &mut w.pending_shots,
                    );
                }
            }
            boss::fire_due(
                &mut w.pending_shots,
                w.boss.as_ref(),
                w.player,
                w.clock,
                &self.config,
                &mut self.rng,
                &mut w.enemy_bullets,
            );
        }

        if let Some(b) = self.world.boss.as_ref() {
            render::draw_boss(&mut self.surface, b)?;
        }
        Ok(())
    }

    fn advance_bullets(&mut self, dt: f32) -> GameResult<()> {
        bullet::integrate(&mut self.world.enemy_bullets, dt);
        bullet::integrate(&mut self.world.player_bullets, dt);

        for b in self.world.enemy_bullets.iter().filter(|b| b.is_live()) {
            render::draw_enemy_bullet(&mut self.surface, b)?;
        }
        for b in self.world.player_bullets.iter().filter(|b| b.is_live()) {
            render::draw_player_bullet(&mut self.surface, b)?;
        }
        render::draw_ship(&mut self.surface, self.world.player)?;
        Ok(())
    }

    fn collide(&mut self) {
        let w = &mut self.world;
        let mut defeated = false;
        if w.in_boss_phase {
            if let Some(b) = w.boss.as_mut() {
                defeated = boss::resolve_boss_hits(b, &mut w.player_bullets, &mut w.explosions)
                    .defeated;
            }
        } else {
            collision::resolve_enemy_hits(
                &mut w.player_bullets,
                &mut w.enemies,
                self.config.hit_radius,
                &mut w.explosions,
            );
        }
        if defeated {
            self.on_boss_defeated();
        }

        let w = &mut self.world;
        if w.victory || w.game_over {
            return;
        }
        let hits = collision::resolve_player_hits(
            &mut w.enemy_bullets,
            w.player,
            self.config.player_hit_radius,
            &mut w.health,
            &mut w.explosions,
        );
        if hits.game_over {
            w.game_over = true;
            info!(kills = w.kill_count, "game over");
        }
    }

    fn advance_explosions(&mut self, dt: f32) -> GameResult<()> {
        let duration = self.config.explosion_time;
        explosion::advance(&mut self.world.explosions, dt, duration);
        for ex in &self.world.explosions {
            render::draw_explosion(&mut self.surface, ex, duration)?;
        }
        Ok(())
    }

    fn draw_hud(&mut self) -> GameResult<()> {
        let w = &self.world;
        let boss = w
            .boss
            .as_ref()
            .filter(|b| b.alive)
            .map(|b| (b.hp, b.max_hp));
        let hud = Hud {
            kills: w.kill_count,
            health: w.health.current,
            max_health: w.health.max,
            boss,
            label: self.hud_label.as_deref(),
        };
        render::draw_hud(&mut self.surface, &hud)?;
        render::draw_controls_hint(&mut self.surface)?;
        Ok(())
    }

    /// Remove the dead and the expired. Normal-phase kills are counted here,
    /// once per enemy, except on the frame right after a reset.
    fn cull(&mut self) {
        let before = self.world.enemies.len();
        self.world.enemies.retain(|e| e.alive);
        let dead = before - self.world.enemies.len();

        for _ in 0..dead {
            if self.world.in_boss_phase || self.world.just_reset {
                break;
            }
            self.world.kill_count += 1;
            let kills = self.world.kill_count;
            trace!(kills, "enemy killed");
            if let Some(on_kill) = self.hooks.on_kill.as_mut() {
                on_kill(KillEvent {
                    kills,
                    absolute: true,
                    reset: false,
                });
            }
            if kills >= self.config.boss_kill_threshold {
                self.enter_boss_phase();
            }
        }

        let arena = self.world.arena;
        let margin = self.config.cull_margin;
        bullet::cull(&mut self.world.enemy_bullets, &arena, margin);
        bullet::cull(&mut self.world.player_bullets, &arena, margin);
        explosion::cull(&mut self.world.explosions);
    }
}
