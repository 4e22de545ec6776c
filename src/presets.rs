use crate::params::SceneParameters;
use std::f32::consts::PI;

/// A named partial overlay: only the fields a preset names are touched,
/// and the whole bundle lands atomically between frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay {
    pub show_frame: Option<bool>,
    pub show_circles: Option<bool>,
    pub show_lotus: Option<bool>,
    pub show_triangles: Option<bool>,

    pub petal_count: Option<u32>,
    pub lotus_radius: Option<f32>,
    pub lotus_width: Option<f32>,
    pub inner_radius: Option<f32>,
    pub outer_radius: Option<f32>,
    pub triangle_count: Option<u32>,
    pub triangle_radius: Option<f32>,
    pub triangle_width: Option<f32>,
    pub triangle_skew: Option<f32>,
    pub triangle_rotation: Option<f32>,

    pub pulse_amplitude: Option<f32>,
    pub pulse_frequency: Option<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct PresetBundle {
    pub name: &'static str,
    pub overlay: Overlay,
}

impl PresetBundle {
    pub fn apply(&self, params: &mut SceneParameters) {
        let o = &self.overlay;
        if let Some(v) = o.show_frame {
            params.show_frame = v;
        }
        if let Some(v) = o.show_circles {
            params.show_circles = v;
        }
        if let Some(v) = o.show_lotus {
            params.show_lotus = v;
        }
        if let Some(v) = o.show_triangles {
            params.show_triangles = v;
        }
        if let Some(v) = o.petal_count {
            params.petal_count = v;
        }
        if let Some(v) = o.lotus_radius {
            params.lotus_radius = v;
        }
        if let Some(v) = o.lotus_width {
            params.lotus_width = v;
        }
        if let Some(v) = o.inner_radius {
            params.inner_radius = v;
        }
        if let Some(v) = o.outer_radius {
            params.outer_radius = v;
        }
        if let Some(v) = o.triangle_count {
            params.triangle_count = v;
        }
        if let Some(v) = o.triangle_radius {
            params.triangle_radius = v;
        }
        if let Some(v) = o.triangle_width {
            params.triangle_width = v;
        }
        if let Some(v) = o.triangle_skew {
            params.triangle_skew = v;
        }
        if let Some(v) = o.triangle_rotation {
            params.triangle_rotation = v;
        }
        if let Some(v) = o.pulse_amplitude {
            params.pulse_amplitude = v;
        }
        if let Some(v) = o.pulse_frequency {
            params.pulse_frequency = v;
        }
        params.sanitize();
    }
}

pub fn make_presets() -> Vec<PresetBundle> {
    vec![
        PresetBundle {
            name: "Classic Star + Lotus",
            overlay: Overlay {
                show_frame: Some(true),
                show_circles: Some(true),
                show_lotus: Some(true),
                show_triangles: Some(true),
                petal_count: Some(8),
                lotus_radius: Some(150.0),
                lotus_width: Some(36.0),
                inner_radius: Some(90.0),
                outer_radius: Some(220.0),
                triangle_count: Some(2),
                triangle_radius: Some(120.0),
                triangle_width: Some(28.0),
                triangle_skew: Some(0.1),
                triangle_rotation: Some(PI / 2.0),
                pulse_amplitude: Some(0.6),
                pulse_frequency: Some(0.25),
            },
        },
        PresetBundle {
            name: "Shakti Ring",
            overlay: Overlay {
                show_frame: Some(true),
                show_circles: Some(false),
                show_lotus: Some(true),
                show_triangles: Some(true),
                petal_count: Some(12),
                lotus_radius: Some(170.0),
                lotus_width: Some(30.0),
                triangle_count: Some(3),
                triangle_radius: Some(135.0),
                triangle_width: Some(24.0),
                triangle_skew: Some(0.05),
                triangle_rotation: Some(0.0),
                ..Overlay::default()
            },
        },
        PresetBundle {
            name: "Fierce",
            overlay: Overlay {
                show_frame: Some(true),
                show_circles: Some(true),
                show_lotus: Some(true),
                show_triangles: Some(true),
                petal_count: Some(12),
                lotus_radius: Some(160.0),
                lotus_width: Some(40.0),
                inner_radius: Some(100.0),
                outer_radius: Some(240.0),
                triangle_count: Some(6),
                triangle_radius: Some(130.0),
                triangle_width: Some(22.0),
                triangle_skew: Some(0.15),
                triangle_rotation: Some(0.0),
                pulse_amplitude: Some(1.0),
                pulse_frequency: Some(0.45),
                ..Overlay::default()
            },
        },
        PresetBundle {
            name: "Minimal",
            overlay: Overlay {
                show_frame: Some(false),
                show_circles: Some(true),
                show_lotus: Some(false),
                show_triangles: Some(true),
                inner_radius: Some(110.0),
                outer_radius: Some(210.0),
                triangle_count: Some(2),
                triangle_radius: Some(140.0),
                triangle_width: Some(18.0),
                ..Overlay::default()
            },
        },
    ]
}

/// Resolve a preset by index or case-insensitive name substring.
pub fn select_preset(query: &str, presets: &[PresetBundle]) -> Option<usize> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }
    if let Ok(i) = q.parse::<usize>() {
        return (i < presets.len()).then_some(i);
    }
    let q = q.to_lowercase();
    presets
        .iter()
        .position(|p| p.name.to_lowercase().contains(&q))
}
