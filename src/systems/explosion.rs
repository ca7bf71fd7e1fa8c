/// Explosion lifecycle: trigger, age, remove.

use crate::entities::Explosion;
use crate::factory::make_explosion;

pub fn trigger(explosions: &mut Vec<Explosion>, x: f32, y: f32) {
    explosions.push(make_explosion(x, y));
}

/// Age every explosion by `dt`; the ones past `duration` are marked counted.
pub fn advance(explosions: &mut [Explosion], dt: f32, duration: f32) {
    for ex in explosions.iter_mut() {
        ex.t += dt;
        if ex.t >= duration {
            ex.counted = true;
        }
    }
}

pub fn cull(explosions: &mut Vec<Explosion>) {
    explosions.retain(|ex| !ex.counted);
}
