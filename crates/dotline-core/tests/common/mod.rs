#![allow(dead_code)]

use anyhow::Result;
use dotline_core::{FlatVideoBus, Ppu, SCREEN_HEIGHT, SCREEN_WIDTH, ppu::palette};

/// `$2001` value with only the background layer on.
pub const MASK_BACKGROUND: u8 = 0x08;

/// Writes tile 0 as a solid color-1 block: low plane all set, high plane clear.
pub fn solid_tile_zero(bus: &mut FlatVideoBus) {
    for row in 0..8 {
        bus.write(row, 0xFF);
        bus.write(row + 8, 0x00);
    }
}

/// Palette entry drawn for solid pixels by [`striped_columns`].
pub const STRIPE_ENTRY: u8 = 0x30;

/// Solid tile 1 in even tile columns, empty tile 0 in odd ones, on every
/// nametable.
pub fn striped_columns(bus: &mut FlatVideoBus) {
    for row in 0..8 {
        bus.write(0x10 + row, 0xFF);
    }
    for nametable in [0x2000u16, 0x2400, 0x2800, 0x2C00] {
        for offset in (0..0x3C0u16).step_by(2) {
            bus.write(nametable + offset, 1);
        }
    }
    bus.write(0x3F00, 0x0F);
    bus.write(0x3F01, STRIPE_ENTRY);
}

/// One frame-buffer row as `#` (stripe color) and `.` (anything else).
pub fn row_pattern(ppu: &Ppu, row: usize) -> String {
    let solid = palette::lookup(STRIPE_ENTRY);
    (0..SCREEN_WIDTH)
        .map(|col| {
            if ppu.frame_buffer().get(row, col) == Some(solid) {
                '#'
            } else {
                '.'
            }
        })
        .collect()
}

/// Fills the attribute table of every nametable with `value`.
pub fn fill_attributes(bus: &mut FlatVideoBus, value: u8) {
    for nametable in [0x2000u16, 0x2400, 0x2800, 0x2C00] {
        for offset in 0x3C0..0x400 {
            bus.write(nametable + offset, value);
        }
    }
}

/// Runs `frames` whole frames from the current position.
pub fn run_frames(ppu: &mut Ppu, bus: &mut FlatVideoBus, frames: usize) -> Result<()> {
    for _ in 0..frames {
        ppu.run_frame(bus)?;
    }
    Ok(())
}

/// Asserts every pixel of the last frame shows palette entry `entry`.
pub fn assert_uniform(ppu: &Ppu, entry: u8) {
    let expected = palette::lookup(entry).channels();
    assert_eq!(ppu.frame_buffer().rows().count(), SCREEN_HEIGHT);
    for (row, pixels) in ppu.frame_buffer().rows().enumerate() {
        for (col, pixel) in pixels.iter().enumerate() {
            assert_eq!(*pixel, expected, "pixel ({row}, {col})");
        }
    }
}
