use bitflags::bitflags;

use crate::memory::vram;

bitflags! {
    /// Snapshot of the control register (`$2000`) taken at the top of a tick.
    ///
    /// ```text
    /// 7 6 5 4 3 2 1 0
    /// N M S B s I n n
    /// ```
    /// Only `B` and `N` influence the background core; the remaining bits are
    /// kept so a snapshot round-trips the byte unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Control: u8 {
        /// Base nametable select. Scroll writes latch these into `t`.
        const NAMETABLE = 0b0000_0011;
        /// VRAM increment of 32 instead of 1 after `$2007` accesses.
        const INCREMENT_32 = 0b0000_0100;
        /// Sprite pattern table at `$1000`.
        const SPRITE_TABLE = 0b0000_1000;
        /// Background pattern table at `$1000`.
        const BACKGROUND_TABLE = 0b0001_0000;
        /// 8x16 sprites.
        const SPRITE_SIZE_16 = 0b0010_0000;
        /// EXT pin direction.
        const MASTER_SLAVE = 0b0100_0000;
        /// Request an interrupt when vertical blank starts.
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl Control {
    /// Base address OR-ed into every background pattern fetch.
    pub fn background_pattern_table(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE) {
            vram::PATTERN_TABLE_1
        } else {
            vram::PATTERN_TABLE_0
        }
    }

    pub fn nmi_enabled(self) -> bool {
        self.contains(Control::GENERATE_NMI)
    }
}
