//! Scene compositor: folds the enabled layers into one scalar field.

use crate::params::SceneParameters;
use crate::yantra::sdf;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

// Bhupura proportions, in device pixels. The wall tracks the viewport
// so the enclosure always frames the pattern.
pub const BHUPURA_SIZE_FACTOR: f32 = 0.38;
pub const BHUPURA_FRAME_WIDTH: f32 = 24.0;
pub const BHUPURA_GATE_WIDTH: f32 = 72.0;
pub const BHUPURA_GATE_DEPTH: f32 = 48.0;

/// Half-size of the bhupura wall for the current viewport.
pub fn bhupura_size(params: &SceneParameters) -> f32 {
    let min_side = params.viewport_width.min(params.viewport_height) as f32;
    BHUPURA_SIZE_FACTOR * min_side
}

/// Periodic pulse factor applied to every characteristic radius.
/// Audio raises the swing; with constant audio the factor is exactly
/// periodic in `1 / pulse_frequency`.
pub fn pulse(params: &SceneParameters) -> f32 {
    1.0 + params.pulse_amplitude
        * (0.04 + 0.12 * params.audio_level)
        * (TAU * params.pulse_frequency * params.elapsed_time).sin()
}

/// Unsigned union of the enabled layer boundaries. Each layer
/// contributes only its outline band; `px` is the device-scaled stroke
/// width that gives the circle bands their thickness.
pub fn composite_2d(p: Vec2, px: f32, params: &SceneParameters) -> f32 {
    let mut d = sdf::FAR;

    if params.show_circles {
        let d1 = sdf::sd_circle(p, params.inner_radius).abs() - px * 0.5;
        let d2 = sdf::sd_circle(p, params.outer_radius).abs() - px * 0.5;
        d = d.min(d1.min(d2));
    }

    if params.show_lotus {
        let dl = sdf::sd_lotus(p, params.lotus_radius, params.lotus_width, params.petal_count);
        d = d.min(dl.abs());
    }

    if params.show_triangles {
        let dt = sdf::sd_triangle_ring(
            p,
            params.triangle_count,
            params.triangle_radius,
            params.triangle_width,
            params.triangle_skew,
            params.triangle_rotation,
        );
        d = d.min(dt.abs());
    }

    if params.show_frame {
        let db = sdf::sd_bhupura(
            p,
            bhupura_size(params),
            BHUPURA_FRAME_WIDTH,
            BHUPURA_GATE_WIDTH,
            BHUPURA_GATE_DEPTH,
        );
        d = d.min(db.abs());
    }

    d
}

/// Angular+radial scene coordinate the 3D warp rides along.
pub fn along(p: Vec2) -> f32 {
    p.y.atan2(p.x) * 0.5 + p.length() * 0.01
}

/// 3D field: the 2D boundary network extruded along z, intersected with
/// a slab of half-thickness `slice_thickness`, with the slab itself
/// undulating along the angular coordinate. Audio opens the warp up.
pub fn composite_3d(p3: Vec3, px: f32, params: &SceneParameters) -> f32 {
    let u = along(p3.truncate());
    let warp = params.distortion_amplitude
        * (0.5 + 0.5 * params.audio_level)
        * (params.distortion_frequency * TAU * u + params.distortion_flow_speed * params.elapsed_time)
            .sin();
    let q = Vec3::new(p3.x, p3.y, p3.z - warp);

    let d2 = composite_2d(q.truncate(), px, params);
    let dz = q.z.abs() - params.slice_thickness;
    d2.max(dz)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_params() -> SceneParameters {
        let mut p = SceneParameters::default();
        p.viewport_width = 800;
        p.viewport_height = 600;
        p.distortion_amplitude = 0.0;
        p.sanitize();
        p
    }

    #[test]
    fn disabled_layers_leave_field_far() {
        let mut p = flat_params();
        p.show_frame = false;
        p.show_circles = false;
        p.show_lotus = false;
        p.show_triangles = false;
        assert_eq!(composite_2d(Vec2::new(12.0, -3.0), 2.0, &p), sdf::FAR);
    }

    #[test]
    fn undistorted_3d_field_is_slab_limited() {
        let p = flat_params();
        // Far above the slab the z term dominates regardless of xy.
        let d = composite_3d(Vec3::new(0.0, 0.0, 100.0), 2.0, &p);
        assert!((d - (100.0 - p.slice_thickness)).abs() < 1e-3);
    }
}
