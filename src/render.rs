/// Rendering layer — every draw call lives here.
///
/// Each function receives a surface and an immutable view of one entity or
/// overlay. No game logic is performed and nothing is mutated; bullet and
/// explosion integration happens in the systems before drawing.

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use crossterm::style::Color;

use crate::entities::{Boss, Bullet, BulletColor, Enemy, Explosion, Point};
use crate::surface::{Align, Surface};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BOSS_CORE: Color = Color::Magenta;
const C_BOSS_RING: Color = Color::DarkYellow;
const C_HUD_KILLS: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_BOSS: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
const C_GALAXY_ARM: Color = Color::Magenta;
const C_GALAXY_DUST: Color = Color::DarkBlue;

/// Horizontal offset of the side glyphs of a sprite — one default cell.
const SPRITE_SIDE_PX: f32 = 8.0;
const ENEMY_TRAIL_PX: f32 = 14.0;
const PLAYER_TRAIL_PX: f32 = 18.0;

fn bullet_color(color: BulletColor) -> Color {
    match color {
        BulletColor::Green => Color::Green,
        BulletColor::Red => Color::Red,
        BulletColor::Blue => Color::Blue,
    }
}

/// Arrow glyph for a facing angle (screen coordinates, y grows downward).
pub fn facing_glyph(angle: f32) -> char {
    const ARROWS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];
    let octant = (angle / FRAC_PI_4).round() as i32;
    ARROWS[octant.rem_euclid(8) as usize]
}

// ── Entities ──────────────────────────────────────────────────────────────────

pub fn draw_ship<S: Surface>(s: &mut S, at: Point) -> std::io::Result<()> {
    //   ▲      tip
    //  / \     wings, one row lower
    s.plot(at.x, at.y, '▲', C_PLAYER)?;
    s.plot(at.x - SPRITE_SIDE_PX, at.y + 16.0, '/', C_PLAYER)?;
    s.plot(at.x + SPRITE_SIDE_PX, at.y + 16.0, '\\', C_PLAYER)?;
    Ok(())
}

pub fn draw_enemy<S: Surface>(s: &mut S, enemy: &Enemy) -> std::io::Result<()> {
    // (→)  hull around a nose pointing at the player
    s.plot(enemy.x - SPRITE_SIDE_PX, enemy.y, '(', C_ENEMY)?;
    s.plot(enemy.x, enemy.y, facing_glyph(enemy.angle), C_ENEMY)?;
    s.plot(enemy.x + SPRITE_SIDE_PX, enemy.y, ')', C_ENEMY)?;
    Ok(())
}

pub fn draw_enemy_bullet<S: Surface>(s: &mut S, b: &Bullet) -> std::io::Result<()> {
    let color = bullet_color(b.color);
    let len = b.vx.hypot(b.vy);
    let len = if len > 0.0 { len } else { 1.0 };
    let tx = b.vx / len * ENEMY_TRAIL_PX;
    let ty = b.vy / len * ENEMY_TRAIL_PX;
    s.plot(b.x - tx, b.y - ty, '·', color)?;
    s.plot(b.x, b.y, '•', color)?;
    Ok(())
}

pub fn draw_player_bullet<S: Surface>(s: &mut S, b: &Bullet) -> std::io::Result<()> {
    let color = bullet_color(b.color);
    s.plot(b.x, b.y + PLAYER_TRAIL_PX, '¦', color)?;
    s.plot(b.x, b.y, '║', color)?;
    Ok(())
}

/// Expanding ring that fades over `duration` seconds.
pub fn draw_explosion<S: Surface>(s: &mut S, ex: &Explosion, duration: f32) -> std::io::Result<()> {
    let p = (ex.t / duration).clamp(0.0, 1.0);
    let r = 10.0 + 42.0 * p;
    let (glyph, color) = if p < 0.33 {
        ('@', Color::Yellow)
    } else if p < 0.66 {
        ('*', Color::Red)
    } else {
        ('.', Color::DarkRed)
    };

    if p < 0.5 {
        s.plot(ex.x, ex.y, '✹', Color::White)?;
    }
    for i in 0..8 {
        let a = i as f32 * FRAC_PI_4;
        s.plot(ex.x + a.cos() * r, ex.y + a.sin() * r * 0.5, glyph, color)?;
    }
    Ok(())
}

pub fn draw_boss<S: Surface>(s: &mut S, boss: &Boss) -> std::io::Result<()> {
    if !boss.alive {
        return Ok(());
    }
    s.plot(boss.x - SPRITE_SIDE_PX, boss.y, '<', C_BOSS_CORE)?;
    s.plot(boss.x, boss.y, 'Ψ', C_BOSS_CORE)?;
    s.plot(boss.x + SPRITE_SIDE_PX, boss.y, '>', C_BOSS_CORE)?;

    const SPOKES: usize = 12;
    for i in 0..SPOKES {
        let a = boss.angle + i as f32 * TAU / SPOKES as f32;
        s.plot(
            boss.x + a.cos() * boss.radius,
            boss.y + a.sin() * boss.radius * 0.5,
            '◆',
            C_BOSS_RING,
        )?;
    }
    Ok(())
}

// ── Backgrounds ───────────────────────────────────────────────────────────────

/// Two-armed spiral galaxy, shown behind the victory screen.
pub fn draw_galaxy<S: Surface>(s: &mut S, cx: f32, cy: f32, t: f32) -> std::io::Result<()> {
    let reach = cx.min(cy * 2.0);
    for arm in 0..2 {
        for i in 0..48 {
            let k = i as f32 / 48.0;
            let theta = k * 3.0 * PI + arm as f32 * PI + t * 0.15;
            let r = k * reach;
            let (glyph, color) = if i % 3 == 0 {
                ('*', C_GALAXY_ARM)
            } else {
                ('.', C_GALAXY_DUST)
            };
            s.plot(cx + theta.cos() * r, cy + theta.sin() * r * 0.5, glyph, color)?;
        }
    }
    s.plot(cx, cy, '☼', Color::Yellow)?;
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Values shown on the status line.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud<'a> {
    pub kills: u32,
    pub health: i32,
    pub max_health: i32,
    /// `(hp, max_hp)` while a boss is alive.
    pub boss: Option<(i32, i32)>,
    pub label: Option<&'a str>,
}

pub fn draw_hud<S: Surface>(s: &mut S, hud: &Hud<'_>) -> std::io::Result<()> {
    let (width, _) = s.size();
    let row = 0.0;

    // Kills — left
    s.text(8.0, row, &format!("Kills:{:>4}", hud.kills), C_HUD_KILLS, Align::Left)?;

    // Phase or label — centre
    if let Some((hp, max)) = hud.boss {
        let filled = hp.max(0) as usize;
        let empty = (max - hp).max(0) as usize;
        let bar = format!("BOSS [{}{}]", "█".repeat(filled), "·".repeat(empty));
        s.text(width / 2.0, row, &bar, C_HUD_BOSS, Align::Center)?;
    } else if let Some(label) = hud.label {
        s.text(width / 2.0, row, &format!("[ {} ]", label), C_HINT, Align::Center)?;
    }

    // Health — right
    let health = format!("Health:{:>4}/{}", hud.health.max(0), hud.max_health);
    s.text(width - 8.0, row, &health, C_HUD_HEALTH, Align::Right)?;
    Ok(())
}

pub fn draw_controls_hint<S: Surface>(s: &mut S) -> std::io::Result<()> {
    let (_, height) = s.size();
    s.text(
        8.0,
        height - 1.0,
        "Mouse/←↑↓→ : Aim   SPACE/L-click : Fire   X/R-click : Alt fire   R : Reset   Q : Quit",
        C_HINT,
        Align::Left,
    )
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Pulsing banner; `t` is seconds since the boss fell.
pub fn draw_victory<S: Surface>(s: &mut S, cx: f32, cy: f32, t: f32) -> std::io::Result<()> {
    let pulse = 1.0 + 0.06 * (t * 3.2).sin();
    let color = if pulse >= 1.0 { Color::Yellow } else { Color::White };
    s.text(cx, cy - 16.0, "★  V I C T O R Y  ★", color, Align::Center)?;
    s.text(cx, cy + 16.0, "Press R to restart", Color::Grey, Align::Center)?;
    Ok(())
}

pub fn draw_game_over<S: Surface>(s: &mut S, cx: f32, cy: f32, kills: u32) -> std::io::Result<()> {
    let kills_line = format!("Kills: {}", kills);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║     GAME  OVER     ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (kills_line.as_str(), Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let start = cy - (lines.len() as f32 / 2.0) * 16.0;
    for (i, (msg, color)) in lines.iter().enumerate() {
        s.text(cx, start + i as f32 * 16.0, msg, *color, Align::Center)?;
    }
    Ok(())
}
