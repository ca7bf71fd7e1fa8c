//! Warp-speed starfield behind the playfield.
//!
//! Stars live in a unit disc at depth `z` and are projected around the
//! screen centre; a resize rebuilds the whole population.

use std::f32::consts::TAU;

use crossterm::style::Color;
use rand::Rng;

use crate::config::GameConfig;
use crate::surface::Surface;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Star {
    /// Position in the unit disc.
    pub x: f32,
    pub y: f32,
    /// Depth; shrinks toward `z_min` as the star rushes past.
    pub z: f32,
    /// Projected screen position.
    pub sx: f32,
    pub sy: f32,
    /// Apparent size, grows as the star gets closer.
    pub w: f32,
}

#[derive(Clone, Debug)]
pub struct Starfield {
    pub width: f32,
    pub height: f32,
    pub cx: f32,
    pub cy: f32,
    pub fov: f32,
    pub stars: Vec<Star>,
    speed: f32,
    z_min: f32,
    z_max: f32,
    max_count: usize,
    density_px: f32,
    margin: f32,
}

impl Starfield {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            cx: 0.0,
            cy: 0.0,
            fov: 0.0,
            stars: Vec::new(),
            speed: config.star_speed,
            z_min: config.star_z_min,
            z_max: config.star_z_max,
            max_count: config.star_max_count,
            density_px: config.star_density_px,
            margin: config.star_margin,
        }
    }

    /// Reproject the world to a new size and rebuild the star population.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut impl Rng) {
        self.width = width;
        self.height = height;
        self.cx = width / 2.0;
        self.cy = height / 2.0;
        self.fov = width.min(height) * 0.9;

        let count = ((width * height) / self.density_px).floor().max(0.0) as usize;
        let count = count.min(self.max_count);
        self.stars = (0..count)
            .map(|_| {
                let mut s = Star::default();
                self.reset_star(&mut s, true, rng);
                s
            })
            .collect();
    }

    fn project(&self, s: &mut Star) {
        s.sx = self.cx + (s.x / s.z) * self.fov;
        s.sy = self.cy + (s.y / s.z) * self.fov;
        s.w = ((1.0 - s.z) * 2.5).max(0.7);
    }

    fn reset_star(&self, s: &mut Star, init: bool, rng: &mut impl Rng) {
        // Bias radii toward the centre so the tunnel looks dense.
        let r = rng.gen::<f32>().powf(1.4);
        let a = rng.gen_range(0.0..TAU);
        s.x = r * a.cos();
        s.y = r * a.sin();
        s.z = if init {
            rng.gen_range(self.z_min..=self.z_max)
        } else {
            self.z_max
        };
        self.project(s);
    }

    /// Move every star one frame closer, respawning the ones that passed.
    pub fn advance(&mut self, rng: &mut impl Rng) {
        let mut stars = std::mem::take(&mut self.stars);
        for s in stars.iter_mut() {
            s.z -= self.speed * s.z * s.z;
            self.project(s);

            let out = s.z <= self.z_min
                || s.sx < -self.margin
                || s.sx > self.width + self.margin
                || s.sy < -self.margin
                || s.sy > self.height + self.margin;
            if out {
                self.reset_star(s, false, rng);
            }
        }
        self.stars = stars;
    }

    pub fn draw<S: Surface>(&self, surface: &mut S) -> std::io::Result<()> {
        for s in &self.stars {
            let (glyph, color) = if s.w > 1.8 {
                ('*', Color::White)
            } else if s.w > 1.1 {
                ('+', Color::Grey)
            } else {
                ('.', Color::DarkGrey)
            };
            surface.plot(s.sx, s.sy, glyph, color)?;
        }
        Ok(())
    }
}
