use tracing::trace;

use super::registers::{Control, Status};
use crate::{
    bus::{AccessSource, VideoBus},
    memory::timing::{PRE_RENDER_SCANLINE, VBLANK_SCANLINE},
};

/// Dot on which both status edges happen.
const EDGE_DOT: u16 = 1;

/// Status flags and the interrupt request line.
///
/// Only [`VBlank::step`] and the explicit sprite-flag setter change these;
/// the interrupt request stays raised until the consumer acknowledges it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct VBlank {
    pub(crate) status: Status,
    pub(crate) nmi_pending: bool,
    /// Set on the vblank rising edge; consumed by status observers.
    pub(crate) edge: bool,
}

impl VBlank {
    pub(crate) fn active(&self) -> bool {
        self.status.contains(Status::VERTICAL_BLANK)
    }

    /// Applies the status edges due at `(scanline, dot)` and publishes the
    /// resulting status byte.
    pub(crate) fn step<B: VideoBus>(
        &mut self,
        scanline: u16,
        dot: u16,
        control: Control,
        bus: &mut B,
    ) -> Result<(), B::Error> {
        if dot != EDGE_DOT {
            return Ok(());
        }

        match scanline {
            VBLANK_SCANLINE => {
                let status = self.status | Status::VERTICAL_BLANK;
                bus.write_status(status.bits(), AccessSource::Ppu)?;
                self.status = status;
                self.edge = true;
                if control.nmi_enabled() {
                    self.nmi_pending = true;
                }
                trace!(nmi = self.nmi_pending, "vblank start");
            }
            PRE_RENDER_SCANLINE => {
                let status = self.status.difference(
                    Status::VERTICAL_BLANK | Status::SPRITE_ZERO_HIT | Status::SPRITE_OVERFLOW,
                );
                bus.write_status(status.bits(), AccessSource::Ppu)?;
                self.status = status;
                trace!("vblank end");
            }
            _ => {}
        }
        Ok(())
    }
}
