use orb_core::frame::FrameBuffer;
use orb_source::resize::Resizer;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::canvas::RasterCanvas;

/// Affiche le canvas haute résolution dans le terminal en demi-blocs.
///
/// Each terminal cell covers two vertical pixels of a downsampled copy of the
/// canvas: top pixel → background, bottom pixel → foreground, character '▄'.
/// The scratch buffer is reused across frames and only reallocated when the
/// terminal area changes.
pub struct TerminalPresenter {
    resizer: Resizer,
    scratch: FrameBuffer,
}

impl TerminalPresenter {
    /// Create a presenter with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            scratch: FrameBuffer::new(0, 0),
        }
    }

    /// Downsampled pixels from the last `present` call.
    #[must_use]
    pub fn scratch(&self) -> &FrameBuffer {
        &self.scratch
    }

    /// Rastérise `canvas` dans `area` du buffer ratatui.
    pub fn present(&mut self, buf: &mut Buffer, area: Rect, canvas: &RasterCanvas) {
        let (w, h) = (u32::from(area.width), u32::from(area.height) * 2);
        if w == 0 || h == 0 {
            return;
        }
        if self.scratch.width != w || self.scratch.height != h {
            self.scratch = FrameBuffer::new(w, h);
        }

        let size = canvas.size();
        if let Err(e) = self.resizer.resize_rgba(
            canvas.data(),
            size.width,
            size.height,
            &mut self.scratch.data,
            w,
            h,
        ) {
            log::warn!("Réduction du canvas impossible : {e}");
            return;
        }

        write_halfblocks(buf, area, &self.scratch);
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Écrit `pixels` (hauteur = 2 × lignes) dans `area` en caractères '▄'.
///
/// # Example
/// ```
/// use orb_core::frame::FrameBuffer;
/// use orb_render::present::write_halfblocks;
/// use ratatui::buffer::Buffer;
/// use ratatui::layout::Rect;
///
/// let mut px = FrameBuffer::new(1, 2);
/// px.set_rgb(0, 0, 255, 0, 0);
/// px.set_rgb(0, 1, 0, 0, 255);
/// let area = Rect::new(0, 0, 1, 1);
/// let mut buf = Buffer::empty(area);
/// write_halfblocks(&mut buf, area, &px);
/// assert_eq!(buf[(0, 0)].symbol(), "▄");
/// ```
pub fn write_halfblocks(buf: &mut Buffer, area: Rect, pixels: &FrameBuffer) {
    let rows = (pixels.height / 2).min(u32::from(area.height)) as u16;
    let cols = pixels.width.min(u32::from(area.width)) as u16;

    for cy in 0..rows {
        for cx in 0..cols {
            let (tr, tg, tb, _) = pixels.pixel(u32::from(cx), u32::from(cy) * 2);
            let (br, bg, bb, _) = pixels.pixel(u32::from(cx), u32::from(cy) * 2 + 1);
            if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                cell.set_char('▄')
                    .set_fg(Color::Rgb(br, bg, bb))
                    .set_bg(Color::Rgb(tr, tg, tb));
            }
        }
    }
}
