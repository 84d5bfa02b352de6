//! RGB frame buffer written by the pixel renderer.
//!
//! Only scanlines 8..=231 reach the screen, so the buffer is 224 rows of 256
//! RGB888 pixels, stored row-major in a single allocation.

use core::ops::Index;

use super::palette::Color;

/// Visible columns (dots 1..=256).
pub const SCREEN_WIDTH: usize = 256;
/// Visible rows (scanlines 8..=231).
pub const SCREEN_HEIGHT: usize = 224;
/// Bytes per pixel (R, G, B).
pub const CHANNELS: usize = 3;
/// First scanline stored in row 0.
pub const FIRST_VISIBLE_SCANLINE: u16 = 8;
/// Last scanline stored in the buffer.
pub const LAST_VISIBLE_SCANLINE: u16 = FIRST_VISIBLE_SCANLINE + SCREEN_HEIGHT as u16 - 1;

/// 224×256×3 byte grid indexed `[row][column][channel]`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[[u8; CHANNELS]]>,
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![[0; CHANNELS]; SCREEN_HEIGHT * SCREEN_WIDTH].into_boxed_slice(),
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill([0; CHANNELS]);
    }

    /// Writes one pixel. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, color: Color) {
        if row < SCREEN_HEIGHT && col < SCREEN_WIDTH {
            self.pixels[row * SCREEN_WIDTH + col] = color.channels();
        }
    }

    /// Reads one pixel, `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        (row < SCREEN_HEIGHT && col < SCREEN_WIDTH).then(|| {
            let [r, g, b] = self[row][col];
            Color::new(r, g, b)
        })
    }

    /// Packed RGB888 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Iterates rows as `&[[u8; 3]]` slices.
    pub fn rows(&self) -> impl Iterator<Item = &[[u8; CHANNELS]]> {
        (0..SCREEN_HEIGHT).map(move |row| &self[row])
    }
}

impl Index<usize> for FrameBuffer {
    type Output = [[u8; CHANNELS]];

    /// Row `row` as an array of RGB triples.
    fn index(&self, row: usize) -> &Self::Output {
        &self.pixels[row * SCREEN_WIDTH..(row + 1) * SCREEN_WIDTH]
    }
}
