use crate::params::Rgb;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "yantra-visualizer",
    version,
    about = "Audio-reactive SDF yantra renderer for the terminal (2D line-art / 3D relief)"
)]
pub struct Config {
    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Preset index or name substring applied at startup.
    #[arg(long)]
    pub preset: Option<String>,

    /// Start in flat line-art or raymarched relief (default: relief).
    #[arg(long, value_enum)]
    pub mode: Option<ViewMode>,

    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    /// Input device name substring; default input device otherwise.
    #[arg(long)]
    pub device: Option<String>,

    /// Run without microphone capture (audio level stays at 0).
    #[arg(long, default_value_t = false)]
    pub no_audio: bool,

    #[arg(long, value_parser = Rgb::from_hex, value_name = "HEX")]
    pub background: Option<Rgb>,

    #[arg(long, value_parser = Rgb::from_hex, value_name = "HEX")]
    pub line_color: Option<Rgb>,

    #[arg(long, value_parser = Rgb::from_hex, value_name = "HEX")]
    pub accent_color: Option<Rgb>,

    /// Directory for PNG snapshots (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    Kitty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    #[value(alias = "2d")]
    Flat,
    #[value(alias = "3d")]
    Relief,
}
