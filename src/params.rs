use glam::Vec3;
use std::f32::consts::PI;
use std::fmt;

/// Smallest value accepted for fields documented as strictly positive.
pub const MIN_POSITIVE: f32 = 1e-3;

/// Elevation is kept inside the original control range so the camera
/// basis (world-up +Z) never degenerates.
pub const MAX_CAMERA_ELEVATION: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Outline,
    FillAndOutline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseRgbError {
    BadLength(usize),
    BadDigit(String),
}

impl fmt::Display for ParseRgbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength(len) => {
                write!(f, "expected 6 hex digits (\"#rrggbb\"), got {len}")
            }
            Self::BadDigit(s) => write!(f, "invalid hex color: {s}"),
        }
    }
}

impl std::error::Error for ParseRgbError {}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional) into unit-range channels.
    pub fn from_hex(s: &str) -> Result<Self, ParseRgbError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ParseRgbError::BadLength(digits.len()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ParseRgbError::BadDigit(s.to_string()))?;
        let r = ((value >> 16) & 0xff) as f32 / 255.0;
        let g = ((value >> 8) & 0xff) as f32 / 255.0;
        let b = (value & 0xff) as f32 / 255.0;
        Ok(Self { r, g, b })
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    fn clamped(self) -> Self {
        Self {
            r: self.r.max(0.0).min(1.0),
            g: self.g.max(0.0).min(1.0),
            b: self.b.max(0.0).min(1.0),
        }
    }
}

/// The complete per-frame control record. Owned and mutated by the app
/// loop (the control surface) between frames; the renderer reads one
/// coherent copy per frame and never writes back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParameters {
    // Layer toggles.
    pub show_frame: bool,
    pub show_circles: bool,
    pub show_lotus: bool,
    pub show_triangles: bool,

    // Geometry.
    pub petal_count: u32,
    pub lotus_radius: f32,
    pub lotus_width: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub triangle_count: u32,
    pub triangle_radius: f32,
    pub triangle_width: f32,
    pub triangle_skew: f32,
    pub triangle_rotation: f32,

    // Rendering.
    pub outline_width: f32,
    pub antialias_width: f32,
    pub rotation: f32,
    pub scale: f32,
    pub fill_mode: FillMode,

    // Palette.
    pub background: Rgb,
    pub line_color: Rgb,
    pub accent_color: Rgb,

    // Animation.
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    pub noise_amplitude: f32,

    // 3D mode.
    pub use_3d: bool,
    pub camera_orbit: f32,
    pub camera_elevation: f32,
    pub camera_distance: f32,
    pub distortion_amplitude: f32,
    pub distortion_frequency: f32,
    pub distortion_flow_speed: f32,
    pub slice_thickness: f32,

    // Live inputs.
    pub elapsed_time: f32,
    pub audio_level: f32,
    pub device_pixel_ratio: f32,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            show_frame: true,
            show_circles: true,
            show_lotus: true,
            show_triangles: true,

            petal_count: 8,
            lotus_radius: 150.0,
            lotus_width: 36.0,
            inner_radius: 90.0,
            outer_radius: 220.0,
            triangle_count: 2,
            triangle_radius: 120.0,
            triangle_width: 28.0,
            triangle_skew: 0.1,
            triangle_rotation: PI / 2.0,

            outline_width: 2.0,
            antialias_width: 1.5,
            rotation: 0.0,
            scale: 1.0,
            fill_mode: FillMode::Outline,

            background: Rgb::new(0x0b as f32 / 255.0, 0x0b as f32 / 255.0, 0x0e as f32 / 255.0),
            line_color: Rgb::new(0xf4 as f32 / 255.0, 0xf2 as f32 / 255.0, 0xf0 as f32 / 255.0),
            accent_color: Rgb::new(0x2a as f32 / 255.0, 0xb3 as f32 / 255.0, 0xa6 as f32 / 255.0),

            pulse_amplitude: 0.6,
            pulse_frequency: 0.25,
            noise_amplitude: 0.35,

            use_3d: true,
            camera_orbit: 0.35,
            camera_elevation: 0.3,
            camera_distance: 1200.0,
            distortion_amplitude: 12.0,
            distortion_frequency: 0.9,
            distortion_flow_speed: 1.2,
            slice_thickness: 6.0,

            elapsed_time: 0.0,
            audio_level: 0.0,
            device_pixel_ratio: 1.0,
            viewport_width: 2,
            viewport_height: 2,
        }
    }
}

impl SceneParameters {
    /// Clamp every field to its documented valid range. Malformed input
    /// is a caller contract violation, but rendering must stay
    /// uninterrupted and NaN-free, so the renderer sanitizes a copy
    /// instead of failing. `max`/`min` chains also scrub NaN.
    pub fn sanitize(&mut self) {
        self.petal_count = self.petal_count.max(1);
        self.lotus_radius = self.lotus_radius.max(MIN_POSITIVE);
        self.lotus_width = self.lotus_width.max(MIN_POSITIVE);
        self.inner_radius = self.inner_radius.max(MIN_POSITIVE);
        self.outer_radius = self.outer_radius.max(MIN_POSITIVE);
        self.triangle_count = self.triangle_count.max(1);
        self.triangle_radius = self.triangle_radius.max(MIN_POSITIVE);
        self.triangle_width = self.triangle_width.max(MIN_POSITIVE);
        self.triangle_skew = self.triangle_skew.max(0.0).min(1.0);
        self.triangle_rotation = finite_or(self.triangle_rotation, 0.0);

        self.outline_width = self.outline_width.max(MIN_POSITIVE);
        self.antialias_width = self.antialias_width.max(MIN_POSITIVE);
        self.rotation = finite_or(self.rotation, 0.0);
        self.scale = self.scale.max(MIN_POSITIVE);

        self.background = self.background.clamped();
        self.line_color = self.line_color.clamped();
        self.accent_color = self.accent_color.clamped();

        self.pulse_amplitude = self.pulse_amplitude.max(0.0);
        self.pulse_frequency = self.pulse_frequency.max(0.0);
        self.noise_amplitude = self.noise_amplitude.max(0.0);

        self.camera_orbit = finite_or(self.camera_orbit, 0.0);
        self.camera_elevation = self
            .camera_elevation
            .max(-MAX_CAMERA_ELEVATION)
            .min(MAX_CAMERA_ELEVATION);
        self.camera_distance = self.camera_distance.max(MIN_POSITIVE);
        self.distortion_amplitude = self.distortion_amplitude.max(0.0);
        self.distortion_frequency = self.distortion_frequency.max(0.0);
        self.distortion_flow_speed = finite_or(self.distortion_flow_speed, 0.0);
        self.slice_thickness = self.slice_thickness.max(MIN_POSITIVE);

        self.elapsed_time = self.elapsed_time.max(0.0);
        self.audio_level = self.audio_level.max(0.0).min(1.0);
        self.device_pixel_ratio = self.device_pixel_ratio.max(MIN_POSITIVE);
        self.viewport_width = self.viewport_width.max(1);
        self.viewport_height = self.viewport_height.max(1);
    }

    /// Sanitized copy, for render entry points.
    pub fn sanitized(&self) -> Self {
        let mut copy = *self;
        copy.sanitize();
        copy
    }

    pub fn any_layer_enabled(&self) -> bool {
        self.show_frame || self.show_circles || self.show_lotus || self.show_triangles
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_accepts_leading_hash() {
        let c = Rgb::from_hex("#2ab3a6").unwrap();
        assert!((c.r - 42.0 / 255.0).abs() < 1e-6);
        assert!((c.g - 179.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 166.0 / 255.0).abs() < 1e-6);
        assert_eq!(Rgb::from_hex("2ab3a6").unwrap(), c);
    }

    #[test]
    fn hex_parse_rejects_garbage() {
        assert!(matches!(Rgb::from_hex("#fff"), Err(ParseRgbError::BadLength(3))));
        assert!(matches!(Rgb::from_hex("zzzzzz"), Err(ParseRgbError::BadDigit(_))));
    }

    #[test]
    fn sanitize_scrubs_nan() {
        let mut p = SceneParameters::default();
        p.rotation = f32::NAN;
        p.scale = f32::NAN;
        p.audio_level = f32::NAN;
        p.sanitize();
        assert_eq!(p.rotation, 0.0);
        assert_eq!(p.scale, MIN_POSITIVE);
        assert_eq!(p.audio_level, 0.0);
    }
}
