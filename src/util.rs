//! Small geometry and randomness helpers shared by the systems.
//!
//! Every normalisation guards against zero-length vectors by falling back to
//! a divisor of 1, so a stationary entity never produces NaN.

use rand::Rng;

/// Uniform sample in `[min, max)`; returns `min` when the range is empty.
pub fn rand_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

pub fn dist2(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Circle test: true when `b` lies within `r` of `a` (inclusive).
pub fn is_hit(ax: f32, ay: f32, bx: f32, by: f32, r: f32) -> bool {
    dist2(ax, ay, bx, by) <= r * r
}

fn len_or_one(x: f32, y: f32) -> f32 {
    let len = x.hypot(y);
    if len > 0.0 {
        len
    } else {
        1.0
    }
}

/// Rescale `(vx, vy)` to magnitude `speed`.
pub fn renorm(vx: f32, vy: f32, speed: f32) -> (f32, f32) {
    let len = len_or_one(vx, vy);
    (vx / len * speed, vy / len * speed)
}

/// Unit vector pointing from `(fx, fy)` to `(tx, ty)`.
pub fn unit_towards(fx: f32, fy: f32, tx: f32, ty: f32) -> (f32, f32) {
    let dx = tx - fx;
    let dy = ty - fy;
    let len = len_or_one(dx, dy);
    (dx / len, dy / len)
}

/// Rotate a vector by `angle` radians.
pub fn rotate(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let (s, c) = angle.sin_cos();
    (x * c - y * s, x * s + y * c)
}

/// Result of [`bounce_within`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounce {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Keep a point inside `[pad, w - pad] × [pad, h - pad]`.
///
/// A point past an edge is clamped onto it and the matching velocity
/// component is forced to point back inward.
pub fn bounce_within(x: f32, y: f32, vx: f32, vy: f32, w: f32, h: f32, pad: f32) -> Bounce {
    let mut b = Bounce { x, y, vx, vy };
    if b.x < pad {
        b.x = pad;
        b.vx = b.vx.abs();
    } else if b.x > w - pad {
        b.x = w - pad;
        b.vx = -b.vx.abs();
    }
    if b.y < pad {
        b.y = pad;
        b.vy = b.vy.abs();
    } else if b.y > h - pad {
        b.y = h - pad;
        b.vy = -b.vy.abs();
    }
    b
}

/// True when `(x, y)` lies more than `margin` outside the `w × h` rectangle.
pub fn out_of_bounds(x: f32, y: f32, w: f32, h: f32, margin: f32) -> bool {
    x < -margin || x > w + margin || y < -margin || y > h + margin
}
