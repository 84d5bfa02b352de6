use bitflags::bitflags;

use crate::memory::vram;

// Layout (bits 0-14):
//  14 13 12 11 10 9 8 7 6 5 4 3 2 1 0
//  [fine_y][nt][coarse_y   ][coarse_x   ]
//  yyy     VH   YYYYY         XXXXX
bitflags! {
    /// Field masks of the 15-bit VRAM address (`v`/`t`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct VramAddrMask: u16 {
        const COARSE_X = 0x001F;
        const COARSE_Y = 0x03E0;
        const NAMETABLE_H = 0x0400;
        const NAMETABLE_V = 0x0800;
        const FINE_Y = 0x7000;

        const NAMETABLE = Self::NAMETABLE_H.bits() | Self::NAMETABLE_V.bits();
        /// Fields reloaded from `t` at dot 257.
        const HORIZONTAL = Self::COARSE_X.bits() | Self::NAMETABLE_H.bits();
        /// Fields reloaded from `t` during the pre-render line.
        const VERTICAL = Self::COARSE_Y.bits()
            | Self::NAMETABLE_V.bits()
            | Self::FINE_Y.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

const COARSE_Y_SHIFT: u16 = 5;
const NAMETABLE_SHIFT: u16 = 10;
const FINE_Y_SHIFT: u16 = 12;

/// 15-bit VRAM address used by the live (`v`) and temporary (`t`) registers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct VramAddr(pub(crate) u16);

impl VramAddr {
    /// Coarse X scroll (0..31).
    #[inline]
    pub fn coarse_x(self) -> u8 {
        (self.0 & VramAddrMask::COARSE_X.bits()) as u8
    }

    #[inline]
    pub fn set_coarse_x(&mut self, cx: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_X.bits()) | u16::from(cx & 0b1_1111);
    }

    /// Coarse Y scroll (0..31). Values 30 and 31 point into attribute data.
    #[inline]
    pub fn coarse_y(self) -> u8 {
        ((self.0 & VramAddrMask::COARSE_Y.bits()) >> COARSE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_coarse_y(&mut self, cy: u8) {
        self.0 = (self.0 & !VramAddrMask::COARSE_Y.bits())
            | (u16::from(cy & 0b1_1111) << COARSE_Y_SHIFT);
    }

    /// Selected nametable (0..3). Bit 0 is horizontal, bit 1 vertical.
    #[inline]
    pub fn nametable(self) -> u8 {
        ((self.0 & VramAddrMask::NAMETABLE.bits()) >> NAMETABLE_SHIFT) as u8
    }

    #[inline]
    pub fn set_nametable(&mut self, nt: u8) {
        self.0 =
            (self.0 & !VramAddrMask::NAMETABLE.bits()) | (u16::from(nt & 0b11) << NAMETABLE_SHIFT);
    }

    #[inline]
    pub fn toggle_horizontal_nametable(&mut self) {
        self.0 ^= VramAddrMask::NAMETABLE_H.bits();
    }

    #[inline]
    pub fn toggle_vertical_nametable(&mut self) {
        self.0 ^= VramAddrMask::NAMETABLE_V.bits();
    }

    /// Fine Y scroll (0..7).
    #[inline]
    pub fn fine_y(self) -> u8 {
        ((self.0 & VramAddrMask::FINE_Y.bits()) >> FINE_Y_SHIFT) as u8
    }

    #[inline]
    pub fn set_fine_y(&mut self, fy: u8) {
        self.0 = (self.0 & !VramAddrMask::FINE_Y.bits()) | (u16::from(fy & 0b111) << FINE_Y_SHIFT);
    }

    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Replaces the raw address, masking to 15 bits.
    #[inline]
    pub fn set_raw(&mut self, v: u16) {
        self.0 = v & VramAddrMask::ALL.bits();
    }

    /// Drops everything above the 14-bit PPU address space.
    ///
    /// Applied to `v` at the top of every tick; note that this also clears
    /// bit 2 of fine Y.
    #[inline]
    pub fn wrap_to_address_space(&mut self) {
        self.0 &= vram::ADDRESS_MASK;
    }

    /// Copies coarse X and the horizontal nametable bit from `src`.
    #[inline]
    pub fn copy_horizontal(&mut self, src: VramAddr) {
        let mask = VramAddrMask::HORIZONTAL.bits();
        self.0 = (self.0 & !mask) | (src.0 & mask);
    }

    /// Copies coarse Y, fine Y and the vertical nametable bit from `src`.
    #[inline]
    pub fn copy_vertical(&mut self, src: VramAddr) {
        let mask = VramAddrMask::VERTICAL.bits();
        self.0 = (self.0 & !mask) | (src.0 & mask);
    }
}

impl core::fmt::Debug for VramAddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VramAddr")
            .field("raw", &format_args!("{:#06X}", self.0))
            .field("fine_y", &self.fine_y())
            .field("nametable", &self.nametable())
            .field("coarse_y", &self.coarse_y())
            .field("coarse_x", &self.coarse_x())
            .finish()
    }
}

impl From<u16> for VramAddr {
    #[inline]
    fn from(v: u16) -> Self {
        VramAddr(v & VramAddrMask::ALL.bits())
    }
}

impl From<VramAddr> for u16 {
    #[inline]
    fn from(v: VramAddr) -> Self {
        v.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_preserve_packing() {
        let mut v = VramAddr::default();
        v.set_coarse_x(0x1F);
        v.set_coarse_y(29);
        v.set_nametable(0b10);
        v.set_fine_y(5);
        assert_eq!(v.raw(), 0x5000 | 0x0800 | (29 << 5) | 0x1F);
        assert_eq!(
            (v.coarse_x(), v.coarse_y(), v.nametable(), v.fine_y()),
            (31, 29, 2, 5)
        );
    }

    #[test]
    fn copies_touch_only_their_fields() {
        let src = VramAddr::from(0x7FFF);
        let mut v = VramAddr::default();
        v.copy_horizontal(src);
        assert_eq!(v.raw(), 0x041F);
        v.copy_vertical(src);
        assert_eq!(v.raw(), 0x7FFF);
    }

    #[test]
    fn wrap_clears_bit_14() {
        let mut v = VramAddr::from(0x7FFF);
        v.wrap_to_address_space();
        assert_eq!(v.raw(), 0x3FFF);
        assert_eq!(v.fine_y(), 3);
    }
}
