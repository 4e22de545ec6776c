//! Sphere-traced 3D relief renderer.
//!
//! One ray per pixel from an orbiting camera through the warped,
//! slab-extruded field. The step/tolerance constants below set the
//! visual character of the relief and are not tunable independently of
//! each other.

use crate::params::SceneParameters;
use crate::yantra::scene;
use glam::{Vec2, Vec3};

pub const MAX_STEPS: usize = 128;
/// Field values below this count as a surface hit.
pub const HIT_TOLERANCE: f32 = 0.8;
/// Step clamp: the floor prevents stalls on flat regions, the ceiling
/// prevents overshoot past thin features.
pub const MIN_STEP: f32 = 0.8;
pub const MAX_STEP: f32 = 40.0;
/// Rays that travel this far without a hit are a miss.
pub const ESCAPE_DISTANCE: f32 = 4000.0;
/// Vertical field of view, radians.
pub const FIELD_OF_VIEW: f32 = 1.2;
/// Forward-difference offset for normal estimation, world units.
pub const NORMAL_EPSILON: f32 = 1.0;

const SPECULAR_POWER: f32 = 32.0;
const VIGNETTE_STRENGTH: f32 = 0.35;

/// Terminal outcome of one sphere trace. A surface at zero travel
/// distance is still a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trace {
    Hit(f32),
    Miss,
}

/// Orthonormal view basis with world-up +Z. Elevation is clamped by
/// `SceneParameters::sanitize` so `forward` never aligns with up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Camera {
    /// Orbit camera looking at the origin from
    /// `distance` along `(elevation, orbit)`.
    pub fn from_params(params: &SceneParameters) -> Self {
        let (se, ce) = params.camera_elevation.sin_cos();
        let (so, co) = params.camera_orbit.sin_cos();
        let dir = Vec3::new(ce * co, ce * so, se);
        let eye = -dir * params.camera_distance;

        let forward = dir;
        let right = forward.cross(Vec3::Z).normalize();
        let up = right.cross(forward);
        Self { eye, right, up, forward }
    }

    /// View ray for a pixel center, y measured downward from the top of
    /// the image.
    pub fn primary_ray(&self, pixel: Vec2, resolution: Vec2) -> Vec3 {
        let mut ndc = pixel / resolution - Vec2::splat(0.5);
        ndc.x *= resolution.x / resolution.y;
        let plane_dist = 1.0 / (FIELD_OF_VIEW * 0.5).tan();
        (self.right * ndc.x + self.up * ndc.y + self.forward * plane_dist).normalize()
    }
}

/// March from `eye` along `rd` until the field drops below the hit
/// tolerance or the ray escapes.
pub fn sphere_trace(eye: Vec3, rd: Vec3, px: f32, params: &SceneParameters) -> Trace {
    let mut t = 0.0f32;
    for _ in 0..MAX_STEPS {
        let d = scene::composite_3d(eye + rd * t, px, params);
        if d < HIT_TOLERANCE {
            return Trace::Hit(t);
        }
        t += d.max(MIN_STEP).min(MAX_STEP);
        if t > ESCAPE_DISTANCE {
            break;
        }
    }
    Trace::Miss
}

/// Forward-difference normal. `normalize_or_zero` keeps a flat
/// difference from poisoning the shade with NaN.
pub fn surface_normal(pos: Vec3, px: f32, params: &SceneParameters) -> Vec3 {
    let d = scene::composite_3d(pos, px, params);
    let e = NORMAL_EPSILON;
    Vec3::new(
        scene::composite_3d(pos + Vec3::new(e, 0.0, 0.0), px, params) - d,
        scene::composite_3d(pos + Vec3::new(0.0, e, 0.0), px, params) - d,
        scene::composite_3d(pos + Vec3::new(0.0, 0.0, e), px, params) - d,
    )
    .normalize_or_zero()
}

/// Fixed-light surface shade: Lambert diffuse plus a specular lobe, over
/// a base color that drifts between line and accent with time.
pub fn shade_hit(pos: Vec3, rd: Vec3, px: f32, params: &SceneParameters) -> Vec3 {
    let n = surface_normal(pos, px, params);
    let light = Vec3::new(0.6, 0.4, 0.8).normalize();
    let diffuse = n.dot(light).max(0.0);
    let specular = reflect(-light, n).dot(-rd).max(0.0).powf(SPECULAR_POWER);

    let blend = 0.25 + 0.25 * (0.5 * params.elapsed_time).sin();
    let base = params
        .line_color
        .to_vec3()
        .lerp(params.accent_color.to_vec3(), blend);
    base * (0.2 + 0.8 * diffuse) + Vec3::splat(specular * 0.6)
}

/// Aspect-corrected radial darkening, applied to every 3D pixel.
pub fn vignette(color: Vec3, pixel: Vec2, resolution: Vec2) -> Vec3 {
    let centered = (pixel / resolution - Vec2::splat(0.5))
        * Vec2::new(resolution.x / resolution.y, 1.0);
    let r2 = centered.length_squared();
    color * (1.0 - VIGNETTE_STRENGTH * r2)
}

/// Full 3D pixel: trace, shade or fall back to the background, vignette.
pub fn render_pixel(pixel: Vec2, params: &SceneParameters) -> Vec3 {
    let resolution = Vec2::new(params.viewport_width as f32, params.viewport_height as f32);
    let px = params.outline_width * params.device_pixel_ratio;

    let camera = Camera::from_params(params);
    let rd = camera.primary_ray(pixel, resolution);

    let color = match sphere_trace(camera.eye, rd, px, params) {
        Trace::Hit(t) => shade_hit(camera.eye + rd * t, rd, px, params),
        Trace::Miss => params.background.to_vec3(),
    };

    vignette(color, pixel, resolution)
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}
