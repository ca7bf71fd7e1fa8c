/// Circle-vs-point hit tests between projectiles and targets.
///
/// O(bullets × enemies) per tick, fine at arcade entity counts.

use crate::entities::{Bullet, Enemy, Explosion, Point};
use crate::systems::explosion;
use crate::util::is_hit;

/// Player health in points, counting down toward `floor`.
#[derive(Clone, Debug, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    pub floor: i32,
    /// Points lost per hit.
    pub damage: i32,
}

impl Health {
    pub fn new(max: i32, floor: i32, damage: i32) -> Self {
        Self {
            current: max,
            max,
            floor,
            damage,
        }
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }

    /// Apply one hit; true once the floor is reached.
    pub fn take_hit(&mut self) -> bool {
        self.current = (self.current - self.damage).max(self.floor);
        self.is_depleted()
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= self.floor
    }
}

/// Player bullets against live enemies. The first enemy within `hit_radius`
/// of a bullet dies and consumes that bullet. Returns the number of kills.
pub fn resolve_enemy_hits(
    player_bullets: &mut [Bullet],
    enemies: &mut [Enemy],
    hit_radius: f32,
    explosions: &mut Vec<Explosion>,
) -> usize {
    let mut kills = 0;
    for pb in player_bullets.iter_mut().filter(|b| b.is_live()) {
        if let Some(enemy) = enemies
            .iter_mut()
            .filter(|e| e.alive)
            .find(|e| is_hit(e.x, e.y, pb.x, pb.y, hit_radius))
        {
            enemy.alive = false;
            pb.life = 0.0;
            explosion::trigger(explosions, enemy.x, enemy.y);
            kills += 1;
        }
    }
    kills
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerHits {
    pub hits: u32,
    pub game_over: bool,
}

/// Hostile bullets against the player. Scanning stops as soon as health
/// reaches its floor.
pub fn resolve_player_hits(
    enemy_bullets: &mut [Bullet],
    player: Point,
    radius: f32,
    health: &mut Health,
    explosions: &mut Vec<Explosion>,
) -> PlayerHits {
    let mut outcome = PlayerHits::default();
    for b in enemy_bullets.iter_mut().filter(|b| b.is_live()) {
        if !is_hit(player.x, player.y, b.x, b.y, radius) {
            continue;
        }
        b.life = 0.0;
        explosion::trigger(explosions, player.x, player.y);
        outcome.hits += 1;
        if health.take_hit() {
            outcome.game_over = true;
            break;
        }
    }
    outcome
}
