use crate::audio::{AtomicAudioLevel, AudioSystem};
use crate::config::{Config, RendererMode, ViewMode};
use crate::params::{FillMode, SceneParameters};
use crate::presets::{PresetBundle, make_presets, select_preset};
use crate::render::{Frame, HalfBlockRenderer, KittyRenderer, Renderer};
use crate::snapshot;
use crate::terminal::TerminalGuard;
use crate::yantra::render_frame;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::f32::consts::PI;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::{Duration, Instant};

const ORBIT_STEP: f32 = 0.08;
const ELEVATION_STEP: f32 = 0.05;
const DISTANCE_STEP: f32 = 60.0;
const ROTATION_STEP: f32 = PI / 48.0;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Kitty => Box::new(KittyRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = match cfg.renderer {
        RendererMode::HalfBlock => (1usize, 2usize),
        // 2x4 pixels per cell: kitty draws real pixels, so render sharper.
        RendererMode::Kitty => (2usize, 4usize),
    };

    // A failed microphone is a note on the HUD, never a reason to stop
    // rendering. The level cell then simply stays at its last value.
    let mut status_note: Option<String> = None;
    let (_audio, level): (Option<AudioSystem>, Arc<AtomicAudioLevel>) = if cfg.no_audio {
        (None, Arc::new(AtomicAudioLevel::new()))
    } else {
        match AudioSystem::start(cfg.device.as_deref()) {
            Ok(sys) => {
                let level = sys.level();
                (Some(sys), level)
            }
            Err(err) => {
                status_note = Some(format!("audio unavailable: {err:#}"));
                (None, Arc::new(AtomicAudioLevel::new()))
            }
        }
    };

    let presets = make_presets();
    let mut preset_idx = cfg
        .preset
        .as_deref()
        .and_then(|q| select_preset(q, &presets))
        .unwrap_or(0);

    let mut params = SceneParameters::default();
    presets[preset_idx].apply(&mut params);
    apply_config_overrides(&cfg, &mut params);

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.0 < 4 || last_size.1 < 2 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut show_hud = true;
    let mut show_help = false;
    let mut hud_rows: u16 = if show_hud { 1 } else { 0 };

    let mut pixels: Vec<u8> = Vec::new();

    let start = Instant::now();
    let mut last_frame = start;
    let mut elapsed = 0.0f32;
    let mut paused = false;
    let mut fps = FpsCounter::new();

    loop {
        let now = Instant::now();

        // Drain input events (non-blocking). Parameter mutations land
        // here, between frames; the render below sees one snapshot.
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    let action = handle_key(
                        k.code,
                        k.modifiers,
                        &mut params,
                        &presets,
                        &mut preset_idx,
                        &mut paused,
                        &mut show_hud,
                        &mut show_help,
                    );
                    match action {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Snapshot => {
                            let note = match snapshot::save_png(
                                cfg.snapshot_dir.as_deref(),
                                params.viewport_width,
                                params.viewport_height,
                                &pixels,
                            ) {
                                Ok(path) => format!("saved {}", path.display()),
                                Err(err) => format!("snapshot failed: {err:#}"),
                            };
                            status_note = Some(note);
                        }
                        KeyAction::None => {}
                    }
                    hud_rows = if show_hud { 1 } else { 0 };
                }
                Event::Resize(c, r) => {
                    last_size = (c, r);
                }
                _ => {}
            }
        }

        // Resize events can be missed in some terminals; check once per
        // frame. New dimensions must be visible before the next render.
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
        }
        let (term_cols, term_rows) = last_size;
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let w = (term_cols as usize).saturating_mul(px_w_mul);
        let h = (visual_rows as usize).saturating_mul(px_h_mul);
        params.viewport_width = w as u32;
        params.viewport_height = h as u32;
        params.device_pixel_ratio = 1.0;

        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;
        if !paused {
            elapsed += dt;
        }
        params.elapsed_time = elapsed;
        params.audio_level = level.load();

        // A paused loop keeps presenting the retained buffer so HUD and
        // overlays stay current, but renders no new frame.
        let frame_len = w * h * 4;
        if pixels.len() != frame_len {
            pixels = vec![0u8; frame_len];
            render_frame(&params, &mut pixels);
        } else if !paused {
            render_frame(&params, &mut pixels);
        }

        let hud = if show_hud {
            build_hud(
                &params,
                presets[preset_idx].name,
                paused,
                fps.fps(),
                level.load(),
                renderer.name(),
                status_note.as_deref(),
            )
        } else {
            String::new()
        };

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: &pixels,
            hud: &hud,
            hud_rows,
            overlay: show_help.then(help_popup_text),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;

        fps.tick();

        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let frame_time = now.elapsed();
        if frame_time < target {
            std::thread::sleep(target - frame_time);
        }
    }
}

fn apply_config_overrides(cfg: &Config, params: &mut SceneParameters) {
    if let Some(mode) = cfg.mode {
        params.use_3d = mode == ViewMode::Relief;
    }
    if let Some(c) = cfg.background {
        params.background = c;
    }
    if let Some(c) = cfg.line_color {
        params.line_color = c;
    }
    if let Some(c) = cfg.accent_color {
        params.accent_color = c;
    }
    params.sanitize();
}

enum KeyAction {
    None,
    Quit,
    Snapshot,
}

#[allow(clippy::too_many_arguments)]
fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    params: &mut SceneParameters,
    presets: &[PresetBundle],
    preset_idx: &mut usize,
    paused: &mut bool,
    show_hud: &mut bool,
    show_help: &mut bool,
) -> KeyAction {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return KeyAction::Quit;
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
        KeyCode::Char(' ') => *paused = !*paused,
        KeyCode::Char('d') | KeyCode::Char('D') => params.use_3d = !params.use_3d,
        KeyCode::Char('1') => params.show_frame = !params.show_frame,
        KeyCode::Char('2') => params.show_circles = !params.show_circles,
        KeyCode::Char('3') => params.show_lotus = !params.show_lotus,
        KeyCode::Char('4') => params.show_triangles = !params.show_triangles,
        KeyCode::Char(']') => {
            *preset_idx = (*preset_idx + 1) % presets.len();
            presets[*preset_idx].apply(params);
        }
        KeyCode::Char('[') => {
            *preset_idx = (*preset_idx + presets.len() - 1) % presets.len();
            presets[*preset_idx].apply(params);
        }
        KeyCode::Left => params.camera_orbit -= ORBIT_STEP,
        KeyCode::Right => params.camera_orbit += ORBIT_STEP,
        KeyCode::Up => params.camera_elevation += ELEVATION_STEP,
        KeyCode::Down => params.camera_elevation -= ELEVATION_STEP,
        KeyCode::Char('+') | KeyCode::Char('=') => params.camera_distance -= DISTANCE_STEP,
        KeyCode::Char('-') | KeyCode::Char('_') => params.camera_distance += DISTANCE_STEP,
        KeyCode::Char(',') => params.rotation -= ROTATION_STEP,
        KeyCode::Char('.') => params.rotation += ROTATION_STEP,
        KeyCode::Char('f') | KeyCode::Char('F') => {
            params.fill_mode = match params.fill_mode {
                FillMode::Outline => FillMode::FillAndOutline,
                FillMode::FillAndOutline => FillMode::Outline,
            };
        }
        KeyCode::Char('s') | KeyCode::Char('S') => return KeyAction::Snapshot,
        KeyCode::Char('i') | KeyCode::Char('I') => *show_hud = !*show_hud,
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
            *show_help = !*show_help;
        }
        _ => return KeyAction::None,
    }
    params.sanitize();
    KeyAction::None
}

fn build_hud(
    params: &SceneParameters,
    preset_name: &str,
    paused: bool,
    fps: f32,
    audio_level: f32,
    renderer_name: &str,
    note: Option<&str>,
) -> String {
    let mode = if params.use_3d { "3D" } else { "2D" };
    let layers = format!(
        "{}{}{}{}",
        if params.show_frame { 'B' } else { '-' },
        if params.show_circles { 'C' } else { '-' },
        if params.show_lotus { 'L' } else { '-' },
        if params.show_triangles { 'T' } else { '-' },
    );
    let state = if paused { " | PAUSED" } else { "" };
    let note = note.map(|n| format!(" | {n}")).unwrap_or_default();
    format!(
        "{preset_name} | {mode} [{layers}] | {renderer_name} | {fps:4.1} fps | mic {audio_level:.2}{state}{note} | ? help"
    )
}

fn help_popup_text() -> &'static str {
    "Yantra Visualizer\n\
     \n\
     space   pause / resume\n\
     d       toggle 2D line-art / 3D relief\n\
     1..4    toggle bhupura / circles / lotus / triangles\n\
     [ ]     previous / next preset\n\
     arrows  orbit + elevate the 3D camera\n\
     + -     camera distance\n\
     , .     rotate the 2D pattern\n\
     f       outline / fill+outline\n\
     s       save PNG snapshot\n\
     i       toggle HUD\n\
     q, Esc  quit"
}

struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.window_start.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.window_start = Instant::now();
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
