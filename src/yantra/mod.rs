//! The rendering core: a pure function from pixel coordinate and
//! [`SceneParameters`] to color, plus the full-frame parallel dispatch.
//!
//! No state survives a frame. Every pixel is independent, so the frame
//! map can run on any parallel fabric; here it is a rayon row-chunk map.

pub mod raymarch;
pub mod scene;
pub mod sdf;

use crate::params::{FillMode, SceneParameters};
use glam::{Vec2, Vec3};
use rayon::prelude::*;

/// Fixed dot radius at the exact pattern center.
const CENTER_DOT_RADIUS: f32 = 3.5;

/// Antialiased coverage of a boundary line of half-width `px`.
pub fn stroke(d: f32, px: f32, sm: f32) -> f32 {
    1.0 - sdf::smoothstep(px - sm, px + sm, d.abs())
}

/// Antialiased interior coverage.
pub fn fill_mask(d: f32, sm: f32) -> f32 {
    1.0 - sdf::smoothstep(0.0, sm, d)
}

/// Shade one pixel of the 2D line-art projection. `pixel` is the pixel
/// center with y measured downward; all blending is linear, not
/// gamma-corrected.
pub fn shade_2d(pixel: Vec2, params: &SceneParameters) -> Vec3 {
    let resolution = Vec2::new(params.viewport_width as f32, params.viewport_height as f32);
    let t = params.elapsed_time;

    let mut p = pixel - 0.5 * resolution;
    let jitter = (sdf::hash12(pixel / resolution * 1000.0 + Vec2::splat(t * 0.02)) - 0.5)
        * 2.0
        * params.noise_amplitude;
    p += Vec2::splat(jitter);
    p *= params.scale;
    p = sdf::rotate(p, params.rotation);

    let pulse = scene::pulse(params);
    let px = params.outline_width * params.device_pixel_ratio;
    let sm = params.antialias_width * params.device_pixel_ratio;
    let fill = params.fill_mode == FillMode::FillAndOutline;

    let background = params.background.to_vec3();
    let line_color = params.line_color.to_vec3();
    let accent = params.accent_color.to_vec3();

    let mut col = background;
    let mut line = 0.0f32;

    if params.show_frame {
        let db = sdf::sd_bhupura(
            p,
            scene::bhupura_size(params) * pulse,
            scene::BHUPURA_FRAME_WIDTH,
            scene::BHUPURA_GATE_WIDTH,
            scene::BHUPURA_GATE_DEPTH,
        );
        if fill {
            col = col.lerp(accent, fill_mask(db, sm) * 0.08);
        }
        line = line.max(stroke(db, px, sm));
    }

    if params.show_circles {
        let d1 = sdf::sd_circle(p, params.inner_radius * pulse).abs() - px * 0.5;
        let d2 = sdf::sd_circle(p, params.outer_radius * pulse).abs() - px * 0.5;
        let s1 = 1.0 - sdf::smoothstep(px - sm, px + sm, d1.abs());
        let s2 = 1.0 - sdf::smoothstep(px - sm, px + sm, d2.abs());
        line = line.max(s1.max(s2));
    }

    if params.show_lotus {
        let dl = sdf::sd_lotus(
            p,
            params.lotus_radius * pulse,
            params.lotus_width,
            params.petal_count,
        );
        if fill {
            col = col.lerp(accent, fill_mask(dl, sm) * 0.06);
        }
        line = line.max(stroke(dl, px, sm));
    }

    if params.show_triangles {
        let dt = sdf::sd_triangle_ring(
            p,
            params.triangle_count,
            params.triangle_radius * pulse,
            params.triangle_width,
            params.triangle_skew,
            params.triangle_rotation,
        );
        if fill {
            col = col.lerp(accent, fill_mask(dt, sm) * 0.08);
        }
        line = line.max(stroke(dt, px, sm));
    }

    // Bindu. Only composited while something else is visible, so an
    // all-off frame stays uniformly background-colored.
    if params.any_layer_enabled() {
        let dc = sdf::sd_circle(p, CENTER_DOT_RADIUS * pulse);
        col = col.lerp(line_color, fill_mask(dc, sm));
    }

    col.lerp(line_color, line.max(0.0).min(1.0))
}

/// One pixel, either projection, packed to RGBA8. Assumes sanitized
/// parameters; use [`render_frame`] for the checked entry point.
pub fn shade_pixel(x: u32, y: u32, params: &SceneParameters) -> [u8; 4] {
    let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let color = if params.use_3d {
        raymarch::render_pixel(pixel, params)
    } else {
        shade_2d(pixel, params)
    };
    pack_rgba(color)
}

/// Render one full frame into `out` (RGBA8, row-major,
/// `viewport_width * viewport_height * 4` bytes). Sanitizes a copy of
/// the parameters first; pixels are evaluated independently across
/// row chunks.
pub fn render_frame(params: &SceneParameters, out: &mut [u8]) {
    let p = params.sanitized();
    let w = p.viewport_width as usize;
    let h = p.viewport_height as usize;
    let frame_len = w * h * 4;
    if out.len() < frame_len {
        return;
    }

    out[..frame_len]
        .par_chunks_exact_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                px.copy_from_slice(&shade_pixel(x as u32, y as u32, &p));
            }
        });
}

fn pack_rgba(color: Vec3) -> [u8; 4] {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 + Vec3::splat(0.5);
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_clamps_out_of_range_components() {
        assert_eq!(pack_rgba(Vec3::new(-1.0, 0.5, 7.0)), [0, 128, 255, 255]);
    }

    #[test]
    fn undersized_buffer_is_left_untouched() {
        let mut p = SceneParameters::default();
        p.viewport_width = 8;
        p.viewport_height = 8;
        let mut buf = vec![9u8; 16];
        render_frame(&p, &mut buf);
        assert!(buf.iter().all(|&b| b == 9));
    }
}
