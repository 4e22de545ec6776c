use glam::Vec2;

use yantra_visualizer::params::{FillMode, SceneParameters};
use yantra_visualizer::render::{Frame, HalfBlockRenderer, KittyRenderer, Renderer};
use yantra_visualizer::yantra::{render_frame, shade_2d};

fn flat_params(w: u32, h: u32) -> SceneParameters {
    let mut p = SceneParameters::default();
    p.use_3d = false;
    p.viewport_width = w;
    p.viewport_height = h;
    p.device_pixel_ratio = 1.0;
    p.noise_amplitude = 0.0;
    p.pulse_amplitude = 0.0;
    p.rotation = 0.0;
    p.scale = 1.0;
    p.sanitize();
    p
}

fn bg_bytes(p: &SceneParameters) -> [u8; 3] {
    [
        (p.background.r * 255.0 + 0.5) as u8,
        (p.background.g * 255.0 + 0.5) as u8,
        (p.background.b * 255.0 + 0.5) as u8,
    ]
}

// ── Full-frame 2D rendering ─────────────────────────────────────────────────

#[test]
fn all_layers_off_renders_a_uniform_background() {
    let mut p = flat_params(64, 48);
    p.show_frame = false;
    p.show_circles = false;
    p.show_lotus = false;
    p.show_triangles = false;
    // Jitter on purpose: with nothing to hit it must not matter.
    p.noise_amplitude = 1.5;

    let mut buf = vec![0u8; 64 * 48 * 4];
    render_frame(&p, &mut buf);

    let bg = bg_bytes(&p);
    for px in buf.chunks_exact(4) {
        assert_eq!(&px[..3], &bg, "expected uniform background");
        assert_eq!(px[3], 255);
    }
}

#[test]
fn enabled_layers_leave_background_only_frames_behind() {
    let mut p = flat_params(128, 128);
    p.show_frame = false;
    p.show_lotus = false;
    p.show_triangles = false;
    p.show_circles = true;
    p.inner_radius = 30.0;
    p.outer_radius = 50.0;

    let mut buf = vec![0u8; 128 * 128 * 4];
    render_frame(&p, &mut buf);

    let bg = bg_bytes(&p);
    let non_bg = buf
        .chunks_exact(4)
        .filter(|px| &px[..3] != &bg)
        .count();
    assert!(non_bg > 0, "circle strokes should touch some pixels");
}

// ── Center-circle scenario ──────────────────────────────────────────────────

#[test]
fn stroke_coverage_peaks_on_the_circle_boundary() {
    let mut p = flat_params(600, 600);
    p.show_frame = false;
    p.show_lotus = false;
    p.show_triangles = false;
    p.show_circles = true;
    p.inner_radius = 90.0;
    p.outer_radius = 220.0;
    p.outline_width = 2.0;
    p.antialias_width = 1.5;

    let center = Vec2::new(300.0, 300.0);
    let line = p.line_color.to_vec3();
    let bg = p.background.to_vec3();

    // The exact image center sits 90 device units from the nearest
    // circle boundary (before jitter/pulse).
    let center_dist = yantra_visualizer::yantra::sdf::sd_circle(Vec2::ZERO, p.inner_radius)
        .abs()
        .min(yantra_visualizer::yantra::sdf::sd_circle(Vec2::ZERO, p.outer_radius).abs());
    assert_eq!(center_dist, 90.0);

    // On the inner radius: near-maximal coverage.
    let on = shade_2d(center + Vec2::new(90.0, 0.0), &p);
    assert!(
        (on - line).length() < 0.15,
        "expected near line color on the boundary, got {on:?}"
    );

    // Well away from both radii (and the center dot): pure background.
    let off = shade_2d(center + Vec2::new(50.0, 0.0), &p);
    assert!(
        (off - bg).length() < 1e-4,
        "expected background away from the boundary, got {off:?}"
    );

    // Just outside the outline+antialias reach: background again.
    let reach = p.outline_width / 2.0 + p.antialias_width;
    let outside = shade_2d(center + Vec2::new(90.0 + reach + 3.0, 0.0), &p);
    assert!((outside - bg).length() < 1e-3);
}

#[test]
fn center_dot_marks_the_origin_when_layers_are_visible() {
    let mut p = flat_params(400, 400);
    p.show_frame = false;
    p.show_lotus = false;
    p.show_triangles = false;
    p.show_circles = true;

    let center = shade_2d(Vec2::new(200.0, 200.0), &p);
    let line = p.line_color.to_vec3();
    assert!(
        (center - line).length() < 1e-3,
        "center dot should shade the origin with the line color"
    );
}

// ── Pulse periodicity, end to end ───────────────────────────────────────────

#[test]
fn pulse_period_reproduces_the_same_image() {
    let mut p = flat_params(96, 96);
    p.show_frame = false;
    p.show_lotus = false;
    p.show_triangles = false;
    p.show_circles = true;
    p.inner_radius = 25.0;
    p.outer_radius = 40.0;
    p.pulse_amplitude = 0.8;
    p.pulse_frequency = 0.5;
    p.audio_level = 0.42;

    let mut a = vec![0u8; 96 * 96 * 4];
    let mut b = vec![0u8; 96 * 96 * 4];
    p.elapsed_time = 1.3;
    render_frame(&p, &mut a);
    p.elapsed_time = 1.3 + 1.0 / p.pulse_frequency;
    render_frame(&p, &mut b);

    let diff = a
        .iter()
        .zip(&b)
        .map(|(x, y)| (*x as i32 - *y as i32).abs())
        .max()
        .unwrap_or(0);
    assert!(diff <= 1, "one pulse period should reproduce the frame, max channel diff {diff}");
}

// ── Fill mode ───────────────────────────────────────────────────────────────

#[test]
fn fill_mode_tints_shape_interiors_with_the_accent() {
    let mut outline = flat_params(300, 300);
    outline.show_frame = false;
    outline.show_circles = false;
    outline.show_lotus = false;
    outline.show_triangles = true;
    outline.triangle_count = 1;
    outline.triangle_radius = 100.0;
    outline.triangle_rotation = 0.0;
    let mut filled = outline;
    filled.fill_mode = FillMode::FillAndOutline;

    // The ring field is an unsigned band, so the fillable interior is
    // the band itself; probe the triangle edge at the band's center.
    let probe = Vec2::new(150.0, 150.0 - 100.0 / 3.0f32.sqrt());
    let o = shade_2d(probe, &outline);
    let f = shade_2d(probe, &filled);
    assert!(
        (o - f).length() > 1e-4,
        "fill mode should tint the interior ({o:?} vs {f:?})"
    );
}

// ── Terminal backends ───────────────────────────────────────────────────────

fn solid_pixels(w: usize, h: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for px in buf.chunks_exact_mut(4) {
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = 255;
    }
    buf
}

fn make_frame<'a>(
    cols: u16,
    visual_rows: u16,
    pw: usize,
    ph: usize,
    pixels: &'a [u8],
    sync: bool,
) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 1,
        visual_rows,
        pixel_width: pw,
        pixel_height: ph,
        pixels_rgba: pixels,
        hud: "Classic Star + Lotus | 2D | 60.0 fps",
        hud_rows: 1,
        overlay: None,
        sync_updates: sync,
    }
}

#[test]
fn halfblock_emits_colors_and_sync_framing() {
    let cols = 8u16;
    let rows = 4u16;
    let pixels = solid_pixels(8, 8, 200, 100, 50);
    let frame = make_frame(cols, rows, 8, 8, &pixels, true);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("\x1b[?2026h"), "missing sync-begin");
    assert!(s.contains("\x1b[?2026l"), "missing sync-end");
    assert!(s.contains("\u{2580}"), "missing half-block char");
    assert!(s.contains("38;2;200;100;50"), "missing FG color");
    assert!(s.contains("48;2;200;100;50"), "missing BG color");
    assert!(s.contains("Classic Star + Lotus"), "HUD text missing");
}

#[test]
fn halfblock_skips_dimension_mismatch() {
    // pixel_height must be visual_rows*2.
    let pixels = solid_pixels(4, 4, 10, 10, 10);
    let frame = make_frame(4, 4, 4, 4, &pixels, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty(), "expected no output on mismatch");
}

#[test]
fn halfblock_name() {
    assert_eq!(HalfBlockRenderer::new().name(), "halfblock");
}

#[test]
fn kitty_transmits_base64_rgba() {
    let cols = 4u16;
    let rows = 2u16;
    let pixels = solid_pixels(8, 8, 1, 2, 3);
    let frame = make_frame(cols, rows, 8, 8, &pixels, false);
    let mut out = Vec::new();
    KittyRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("\x1b_G"), "missing kitty escape");
    assert!(s.contains("a=T"), "missing transmit-and-place");
    assert!(s.contains("f=32"), "missing RGBA format");
    assert!(s.contains("s=8,v=8"), "missing pixel dimensions");
    assert!(s.contains("Classic Star + Lotus"), "HUD text missing");
}

#[test]
fn kitty_alternates_image_ids_between_frames() {
    let pixels = solid_pixels(4, 4, 9, 9, 9);
    let frame = make_frame(2, 1, 4, 4, &pixels, false);
    let mut renderer = KittyRenderer::new();

    let mut out1 = Vec::new();
    renderer.render(&frame, &mut out1).unwrap();
    let mut out2 = Vec::new();
    renderer.render(&frame, &mut out2).unwrap();

    let s1 = String::from_utf8_lossy(&out1);
    let s2 = String::from_utf8_lossy(&out2);
    let id1 = s1.contains("i=2,");
    let id2 = s2.contains("i=1,");
    assert!(id1 && id2, "expected alternating image ids");
}

#[test]
fn kitty_name() {
    assert_eq!(KittyRenderer::new().name(), "kitty");
}

// ── Snapshot ────────────────────────────────────────────────────────────────

#[test]
fn snapshot_round_trips_dimensions() {
    let mut p = flat_params(40, 30);
    let mut buf = vec![0u8; 40 * 30 * 4];
    p.show_circles = true;
    render_frame(&p, &mut buf);

    let dir = std::env::temp_dir();
    let path = dir.join("yantra-render-suite-test.png");
    yantra_visualizer::snapshot::write_png(&path, 40, 30, &buf).unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.width(), 40);
    assert_eq!(img.height(), 30);
    let _ = std::fs::remove_file(&path);
}
