use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use yantra_visualizer::params::{Rgb, SceneParameters};
use yantra_visualizer::presets::{make_presets, select_preset};
use yantra_visualizer::snapshot::write_png;
use yantra_visualizer::yantra::render_frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    #[value(alias = "2d")]
    Flat,
    #[value(alias = "3d")]
    Relief,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_frame",
    version,
    about = "Offline single-frame yantra export (no terminal, PNG output)"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "PNG", default_value = "yantra.png")]
    pub(crate) out: PathBuf,

    #[arg(long, default_value_t = 1280)]
    pub(crate) width: u32,

    #[arg(long, default_value_t = 720)]
    pub(crate) height: u32,

    /// Animation time to render at, seconds.
    #[arg(long, default_value_t = 0.0)]
    pub(crate) time: f32,

    /// Fixed audio level in [0, 1] fed to pulse and warp.
    #[arg(long, default_value_t = 0.0)]
    pub(crate) audio_level: f32,

    /// Preset index or name substring.
    #[arg(long, value_name = "INDEX_OR_SUBSTRING")]
    pub(crate) preset: Option<String>,

    #[arg(long, value_enum)]
    pub(crate) mode: Option<ModeArg>,

    #[arg(long, value_parser = Rgb::from_hex, value_name = "HEX")]
    pub(crate) background: Option<Rgb>,
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if !args.time.is_finite() || args.time < 0.0 {
        bail!("--time must be a non-negative number of seconds");
    }
    if !(0.0..=1.0).contains(&args.audio_level) {
        bail!("--audio-level must lie in [0, 1]");
    }
    Ok(())
}

pub(crate) fn build_params(args: &Cli) -> Result<SceneParameters> {
    let mut params = SceneParameters::default();

    let presets = make_presets();
    if let Some(query) = args.preset.as_deref() {
        let idx = select_preset(query, &presets)
            .with_context(|| format!("no preset matching {query:?}"))?;
        presets[idx].apply(&mut params);
    }

    if let Some(mode) = args.mode {
        params.use_3d = mode == ModeArg::Relief;
    }
    if let Some(bg) = args.background {
        params.background = bg;
    }

    params.viewport_width = args.width;
    params.viewport_height = args.height;
    params.device_pixel_ratio = 1.0;
    params.elapsed_time = args.time;
    params.audio_level = args.audio_level;
    params.sanitize();
    Ok(params)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    validate_args(&args)?;

    let params = build_params(&args)?;
    let mut pixels = vec![0u8; (args.width as usize) * (args.height as usize) * 4];
    render_frame(&params, &mut pixels);

    write_png(&args.out, args.width, args.height, &pixels)?;
    println!(
        "wrote {} ({}x{}, t={}s)",
        args.out.display(),
        args.width,
        args.height,
        args.time
    );
    Ok(())
}
