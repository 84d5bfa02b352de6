use super::VramAddr;

/// Externally latched scroll state: `t`, fine X and the shared write toggle.
///
/// The core only reads this block. A register front-end feeds it through
/// [`write_scroll`](Self::write_scroll) and [`write_addr`](Self::write_addr),
/// mirroring what CPU writes to `$2005`/`$2006` do on hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScrollLatch {
    /// Temporary VRAM address (`t`).
    pub t: VramAddr,
    /// Fine X scroll (0..7).
    pub fine_x: u8,
    /// Write toggle: false => first write, true => second write.
    pub w: bool,
}

impl ScrollLatch {
    /// `$2000` write: the nametable bits land in `t`.
    pub fn write_control(&mut self, value: u8) {
        self.t.set_nametable(value & 0b11);
    }

    /// `$2005` write: X on the first write, Y on the second.
    pub fn write_scroll(&mut self, value: u8) {
        if !self.w {
            self.t.set_coarse_x(value >> 3);
            self.fine_x = value & 0b111;
        } else {
            self.t.set_coarse_y(value >> 3);
            self.t.set_fine_y(value & 0b111);
        }
        self.w = !self.w;
    }

    /// `$2006` write: high byte first, then low byte.
    ///
    /// Returns the completed address after the second write so the caller
    /// can commit it to `v`.
    pub fn write_addr(&mut self, value: u8) -> Option<VramAddr> {
        let second_write = self.w;
        if !second_write {
            let hi = u16::from(value & 0b0011_1111) << 8;
            let lo = self.t.raw() & 0x00FF;
            self.t.set_raw(hi | lo);
        } else {
            let hi = self.t.raw() & 0x7F00;
            self.t.set_raw(hi | u16::from(value));
        }
        self.w = !self.w;
        second_write.then_some(self.t)
    }

    /// `$2002` read side effect.
    pub fn reset_toggle(&mut self) {
        self.w = false;
    }
}
