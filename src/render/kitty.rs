use crate::render::{Frame, Renderer, draw_overlay_popup, write_hud};
use base64::Engine;
use std::io::Write;

/// Kitty graphics protocol escape chunks are limited to 4096 payload
/// bytes.
const CHUNK: usize = 4096;

/// True-pixel backend: transmits the RGBA frame inline (base64, `t=d`)
/// and places it over the visual rows. Image and placement ids alternate
/// per frame so the terminal swaps rather than flickers.
pub struct KittyRenderer {
    image_id: u32,
    b64_buf: String,
}

impl KittyRenderer {
    pub fn new() -> Self {
        Self {
            image_id: 1,
            b64_buf: String::new(),
        }
    }
}

impl Default for KittyRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for KittyRenderer {
    fn name(&self) -> &'static str {
        "kitty"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        let w = frame.pixel_width;
        let h = frame.pixel_height;

        if cols == 0 || visual_rows == 0 || w == 0 || h == 0 {
            return Ok(());
        }
        if frame.pixels_rgba.len() < w.saturating_mul(h).saturating_mul(4) {
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        out.write_all(b"\x1b[H\x1b[0m")?;

        // Alternate between two ids so the previous placement stays
        // visible until the new one replaces it.
        self.image_id = if self.image_id == 1 { 2 } else { 1 };
        let id = self.image_id;

        self.b64_buf.clear();
        base64::engine::general_purpose::STANDARD
            .encode_string(&frame.pixels_rgba[..w * h * 4], &mut self.b64_buf);

        let payload = self.b64_buf.as_bytes();
        let mut offset = 0usize;
        let mut first = true;
        while offset < payload.len() {
            let end = (offset + CHUNK).min(payload.len());
            let more = if end < payload.len() { 1 } else { 0 };
            if first {
                write!(
                    out,
                    "\x1b_Ga=T,f=32,t=d,s={},v={},i={},p=1,c={},r={},C=1,q=2,m={};",
                    w, h, id, cols, visual_rows, more
                )?;
                first = false;
            } else {
                write!(out, "\x1b_Gm={};", more)?;
            }
            out.write_all(&payload[offset..end])?;
            out.write_all(b"\x1b\\")?;
            offset = end;
        }

        // Drop the frame before last.
        let stale = if id == 1 { 2 } else { 1 };
        write!(out, "\x1b_Ga=d,d=i,i={},q=2;\x1b\\", stale)?;

        write_hud(out, frame)?;

        if let Some(text) = frame.overlay {
            draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
