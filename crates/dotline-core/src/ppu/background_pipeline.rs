use super::registers::VramAddr;
use crate::memory::vram;

/// 16-bit right-shifting pattern register.
///
/// Layout:
///   [ next tile (loaded) | current tile (draining) ]
///
/// Fresh pattern bytes are OR-ed into the high byte; eight right shifts move
/// them into the low byte, where the fine X selector samples them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct Shift16(pub(crate) u16);

impl Shift16 {
    #[inline]
    fn load_high_byte(&mut self, byte: u8) {
        self.0 |= u16::from(byte) << 8;
    }

    #[inline]
    fn shift(&mut self) {
        self.0 >>= 1;
    }

    /// Bit `fine_x` (0..7) of the register.
    #[inline]
    pub(crate) fn select(self, fine_x: u8) -> u8 {
        ((self.0 >> (fine_x & 0b111)) & 1) as u8
    }
}

/// Returns bit `fine_x` (0..7) of an 8-bit attribute register.
#[inline]
fn select8(value: u8, fine_x: u8) -> u8 {
    (value >> (fine_x & 0b111)) & 1
}

/// Picks the 2-bit palette group of the 16×16 pixel quadrant `v` points at.
///
/// Coarse X bit 0 chooses left/right, coarse Y bit 0 (address bit 5)
/// top/bottom: `(0,0)` bits 0-1, `(1,0)` bits 4-5, `(0,1)` bits 2-3,
/// `(1,1)` bits 6-7.
pub(crate) fn attribute_bits(attribute: u8, v: VramAddr) -> (bool, bool) {
    let x_odd = v.raw() & 0x0001 != 0;
    let y_odd = v.raw() & 0x0020 != 0;
    let shift = match (x_odd, y_odd) {
        (true, true) => 6,
        (true, false) => 4,
        (false, true) => 2,
        (false, false) => 0,
    };
    let low = attribute & (1 << shift) != 0;
    let high = attribute & (2 << shift) != 0;
    (low, high)
}

#[inline]
fn replicate(bit: bool) -> u8 {
    if bit { 0xFF } else { 0x00 }
}

/// Background shifters: two pattern bitplanes and two attribute registers.
///
/// The pattern registers shift one bit per eligible dot. The attribute
/// registers are rebuilt at every reload and stay static in between, so a
/// fine X offset samples the same palette group for all eight pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BgPipeline {
    /// Pattern bitplanes: [low, high].
    pub(crate) pattern: [Shift16; 2],
    /// Replicated attribute bits: [low, high].
    pub(crate) attribute: [u8; 2],
}

impl BgPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile boundary reload.
    ///
    /// `tile_pattern` carries the low and high bitplane bytes of the next
    /// tile row; the attribute registers are recomputed from the latched
    /// attribute byte and the parity bits of `v`.
    pub fn reload(&mut self, tile_pattern: [u8; 2], attribute: u8, v: VramAddr) {
        for (shifter, byte) in self.pattern.iter_mut().zip(tile_pattern) {
            shifter.load_high_byte(byte);
        }
        let (low, high) = attribute_bits(attribute, v);
        self.attribute = [replicate(low), replicate(high)];
    }

    /// Advances both pattern registers by one dot.
    pub fn shift(&mut self) {
        for shifter in &mut self.pattern {
            shifter.shift();
        }
    }

    /// 4-bit palette index at the current dot:
    /// `attr_high << 3 | attr_low << 2 | pattern_high << 1 | pattern_low`.
    pub fn sample(&self, fine_x: u8) -> u8 {
        self.pattern[0].select(fine_x)
            | (self.pattern[1].select(fine_x) << 1)
            | (select8(self.attribute[0], fine_x) << 2)
            | (select8(self.attribute[1], fine_x) << 3)
    }

    /// Palette RAM address of the background pixel at the current dot.
    pub fn palette_addr(&self, fine_x: u8) -> u16 {
        vram::PALETTE_BASE | u16::from(self.sample(fine_x))
    }
}
