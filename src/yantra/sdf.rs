//! Distance-field primitives for the yantra layers.
//!
//! Every function maps a 2D point to a signed distance: negative inside,
//! positive outside, magnitude approximately Euclidean near the surface.
//! Circle, box, and triangle are exact; the lotus bump is approximate but
//! continuous.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// "Empty field" sentinel used when folding layer minima.
pub const FAR: f32 = 1e5;

/// Rotational copies in [`sd_triangle_ring`] are capped so no parameter
/// combination can make per-pixel cost unbounded.
pub const TRIANGLE_RING_MAX: usize = 24;

/// Rotate `p` by `angle` (matches the compositor's handedness; copies
/// advance counterclockwise on screen).
pub fn rotate(p: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * p.x + s * p.y, -s * p.x + c * p.y)
}

pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL-semantics smoothstep, hardened against a degenerate edge pair.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < 1e-12 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).max(0.0).min(1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic 2D -> 1D hash (fract/dot mix), used for pixel jitter.
/// Same result for the same pixel and time on every backend.
pub fn hash12(p: Vec2) -> f32 {
    let mut p3 = Vec3::new(
        fract(p.x * 0.1031),
        fract(p.y * 0.1031),
        fract(p.x * 0.1031),
    );
    let shifted = Vec3::new(p3.y, p3.z, p3.x) + Vec3::splat(33.33);
    p3 += Vec3::splat(p3.dot(shifted));
    fract((p3.x + p3.y) * p3.z)
}

fn fract(x: f32) -> f32 {
    x - x.floor()
}

pub fn sd_circle(p: Vec2, r: f32) -> f32 {
    p.length() - r
}

pub fn sd_box(p: Vec2, half_extents: Vec2) -> f32 {
    let d = p.abs() - half_extents;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Equilateral triangle folded into a sixth of the plane, with `skew`
/// compressing the vertical axis by up to 15%.
pub fn sd_equi_triangle(p: Vec2, r: f32, skew: f32) -> f32 {
    let mut p = Vec2::new(p.x, p.y * mix(1.0, 0.85, skew.max(0.0).min(1.0)));
    let k = 3.0_f32.sqrt();
    p.x = p.x.abs() - r;
    p.y += r / k;
    if p.x + k * p.y > 0.0 {
        p = Vec2::new(p.x - k * p.y, -k * p.x - p.y) / 2.0;
    }
    p.x -= p.x.max(-2.0 * r).min(0.0);
    -p.length() * sign(p.y)
}

/// Petal-count-modulated ring. The target radius oscillates between
/// 0.8R and 1.2R with the bump profile `0.25 + 0.75*|sin(a*k/2)|^1.5`.
pub fn sd_lotus(p: Vec2, radius: f32, width: f32, petals: u32) -> f32 {
    let angle = p.y.atan2(p.x);
    let radial = p.length();
    let k = petals.max(1) as f32;
    let bump = 0.25 + 0.75 * (angle * k * 0.5).sin().abs().powf(1.5);
    let target = radius * mix(0.8, 1.2, bump);
    (radial - target).abs() - width * 0.5
}

/// Gated square enclosure: a box ring with one gate gap carved into the
/// center of each side. The gates subtract with a 2-unit bias so they
/// read as true gaps in the wall, not extra strokes.
pub fn sd_bhupura(p: Vec2, size: f32, frame_width: f32, gate_width: f32, gate_depth: f32) -> f32 {
    let outer = sd_box(p, Vec2::splat(size));
    let inner = sd_box(p, Vec2::splat(size - frame_width));
    let ring = outer.max(-inner);

    let ns_gate = Vec2::new(gate_width * 0.5, gate_depth * 0.5);
    let ew_gate = Vec2::new(gate_depth * 0.5, gate_width * 0.5);
    let inset = size - gate_depth * 0.5;
    let mut gates = FAR;
    gates = gates.min(sd_box(p - Vec2::new(0.0, inset), ns_gate));
    gates = gates.min(sd_box(p - Vec2::new(0.0, -inset), ns_gate));
    gates = gates.min(sd_box(p - Vec2::new(inset, 0.0), ew_gate));
    gates = gates.min(sd_box(p - Vec2::new(-inset, 0.0), ew_gate));

    ring.max(-gates + 2.0)
}

/// N-fold rotational ring of triangle outlines. The copy count is
/// truncated at [`TRIANGLE_RING_MAX`]; angular spacing still follows the
/// requested count, so truncation drops copies rather than re-spacing.
pub fn sd_triangle_ring(
    p: Vec2,
    count: u32,
    radius: f32,
    width: f32,
    skew: f32,
    angular_offset: f32,
) -> f32 {
    let n = count.max(1);
    let copies = (n as usize).min(TRIANGLE_RING_MAX);
    let mut d = FAR;
    for i in 0..copies {
        let a = (i as f32 / n as f32) * TAU + angular_offset;
        let q = rotate(p, a);
        let dt = sd_equi_triangle(q, radius, skew);
        d = d.min(dt.abs() - width * 0.5);
    }
    d
}

fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_is_exact_outside_on_axes() {
        let b = Vec2::new(10.0, 5.0);
        assert!((sd_box(Vec2::new(14.0, 0.0), b) - 4.0).abs() < 1e-5);
        assert!((sd_box(Vec2::new(0.0, 9.0), b) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn box_is_negative_inside() {
        assert!(sd_box(Vec2::ZERO, Vec2::splat(3.0)) < 0.0);
    }

    #[test]
    fn hash_stays_in_unit_range() {
        for i in 0..256 {
            let p = Vec2::new(i as f32 * 17.13, (i * i) as f32 * 0.37 - 40.0);
            let h = hash12(p);
            assert!((0.0..1.0).contains(&h), "hash12({p:?}) = {h}");
        }
    }

    #[test]
    fn rotate_full_turn_is_identity() {
        let p = Vec2::new(3.0, -4.0);
        let q = rotate(p, TAU);
        assert!((p - q).length() < 1e-4);
    }
}
