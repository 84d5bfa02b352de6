use super::{
    background_pipeline::BgPipeline,
    buffer::{FIRST_VISIBLE_SCANLINE, FrameBuffer, LAST_VISIBLE_SCANLINE},
    palette,
    registers::{Mask, VramAddr},
};
use crate::{bus::VideoBus, memory::vram::PALETTE_BASE};

/// Whether `(scanline, dot)` lands in the frame buffer.
#[inline]
pub(crate) fn is_visible(scanline: u16, dot: u16) -> bool {
    (FIRST_VISIBLE_SCANLINE..=LAST_VISIBLE_SCANLINE).contains(&scanline) && (1..=256).contains(&dot)
}

/// Palette address driving the pixel at the current dot.
///
/// With the background layer off the PPU still outputs a color: normally the
/// backdrop at `$3F00`, but if `v` already points into palette memory that
/// entry is shown instead.
pub fn pixel_palette_addr(mask: Mask, background: &BgPipeline, fine_x: u8, v: VramAddr) -> u16 {
    if mask.background_enabled() {
        background.palette_addr(fine_x)
    } else if v.raw() >= PALETTE_BASE {
        v.raw()
    } else {
        PALETTE_BASE
    }
}

/// Reads `palette_addr` and stores the resulting color for `(scanline, dot)`.
pub(crate) fn draw<B: VideoBus>(
    bus: &mut B,
    frame: &mut FrameBuffer,
    scanline: u16,
    dot: u16,
    palette_addr: u16,
) -> Result<(), B::Error> {
    let entry = bus.read_vram(palette_addr)?;
    frame.set(
        usize::from(scanline - FIRST_VISIBLE_SCANLINE),
        usize::from(dot - 1),
        palette::lookup(entry),
    );
    Ok(())
}
