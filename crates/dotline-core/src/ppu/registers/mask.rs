use bitflags::bitflags;

bitflags! {
    /// Snapshot of the mask register (`$2001`).
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// B G R S B s b g
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mask: u8 {
        const GRAYSCALE = 0b0000_0001;
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        /// Background layer enable (bit 3).
        const SHOW_BACKGROUND = 0b0000_1000;
        /// Sprite layer enable (bit 4).
        const SHOW_SPRITES = 0b0001_0000;
        const EMPHASIZE_RED = 0b0010_0000;
        const EMPHASIZE_GREEN = 0b0100_0000;
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    /// Either layer enabled. This is what drives the fetch/scroll machinery,
    /// even when only sprites are visible.
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }

    pub fn background_enabled(self) -> bool {
        self.contains(Mask::SHOW_BACKGROUND)
    }
}
