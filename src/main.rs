use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = yantra_visualizer::config::Config::parse();
    if cfg.list_devices {
        yantra_visualizer::audio::list_input_devices()?;
        return Ok(());
    }

    yantra_visualizer::app::run(cfg)
}
