use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write an already-rendered RGBA frame to a timestamped PNG. This is a
/// pass-through of the presented buffer, never a re-render.
pub fn save_png(dir: Option<&Path>, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let name = format!("yantra-{stamp}.png");
    let path = match dir {
        Some(d) => d.join(name),
        None => PathBuf::from(name),
    };
    write_png(&path, width, height, rgba)?;
    Ok(path)
}

/// Encode `rgba` (row-major, `width * height * 4` bytes) to `path`.
pub fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    let need = (width as usize) * (height as usize) * 4;
    let buf = rgba
        .get(..need)
        .with_context(|| format!("pixel buffer too small (need {need}, got {})", rgba.len()))?;
    let img = image::RgbaImage::from_raw(width, height, buf.to_vec())
        .context("assemble image from pixel buffer")?;
    img.save(path)
        .with_context(|| format!("write snapshot to {}", path.display()))?;
    Ok(())
}
