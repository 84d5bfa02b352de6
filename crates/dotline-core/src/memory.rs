//! Shared definitions for the PPU address space.
//!
//! Every fetch formula in the renderer is built from these constants, so the
//! hardware layout lives in one place instead of leaking magic numbers into
//! the pipeline stages.

/// VRAM layout and mirroring rules.
pub mod vram {
    /// Size of the 14-bit PPU address space.
    pub const ADDRESS_SPACE_SIZE: usize = 0x4000;
    /// Mask keeping an address inside the 14-bit space.
    pub const ADDRESS_MASK: u16 = 0x3FFF;

    /// Pattern table base address for table 0.
    pub const PATTERN_TABLE_0: u16 = 0x0000;
    /// Pattern table base address for table 1.
    pub const PATTERN_TABLE_1: u16 = 0x1000;
    /// Offset between the low and high bitplane of a tile row.
    pub const PATTERN_PLANE_STRIDE: u16 = 8;

    /// Base address of nametable 0.
    pub const NAMETABLE_BASE: u16 = 0x2000;
    /// Bits of `v` that select a nametable entry (nametable + coarse Y/X).
    pub const NAMETABLE_OFFSET_MASK: u16 = 0x0FFF;
    /// Attribute table offset inside nametable 0.
    pub const ATTRIBUTE_BASE: u16 = 0x23C0;

    /// Palette RAM base address (`$3F00`).
    pub const PALETTE_BASE: u16 = 0x3F00;
    /// Palette RAM byte count (mirrored every 32 bytes up to `$3FFF`).
    pub const PALETTE_RAM_SIZE: usize = 0x20;
}

/// Frame timing constants.
pub mod timing {
    /// Dots per scanline (0..=340).
    pub const DOTS_PER_SCANLINE: u16 = 341;
    /// Scanlines per frame (0..=261).
    pub const SCANLINES_PER_FRAME: u16 = 262;
    /// Last visible scanline.
    pub const LAST_VISIBLE_SCANLINE: u16 = 239;
    /// Idle line after the picture.
    pub const POST_RENDER_SCANLINE: u16 = 240;
    /// Scanline on which vertical blank begins.
    pub const VBLANK_SCANLINE: u16 = 241;
    /// Pre-render scanline; clears the status flags and reloads vertical scroll.
    pub const PRE_RENDER_SCANLINE: u16 = 261;
}
