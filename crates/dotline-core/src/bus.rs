//! Contract between the rendering core and the external memory subsystem.
//!
//! The PPU core owns none of the memories it reads. Control registers, VRAM
//! and palette storage live behind [`VideoBus`], which the driver lends to
//! [`Ppu::clock`](crate::ppu::Ppu::clock) once per tick.

use std::fmt::Debug;

use crate::memory::vram;

mod flat;
#[cfg(test)]
pub(crate) mod mock;

pub use flat::FlatVideoBus;

/// Identifies which device initiated a register write.
///
/// Status register writes are only meaningful when they originate from the
/// PPU itself; the CPU-facing side of `$2002` is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessSource {
    Cpu,
    Ppu,
}

/// Memory-mapped view of everything the background renderer touches.
///
/// Accesses are synchronous and must not have side effects beyond the
/// addressed location. Any error is handed back to the driver untouched; the
/// core never retries or masks a failed access.
pub trait VideoBus: Debug {
    type Error: std::error::Error;

    /// Latched copy of the control register (`$2000`).
    fn control(&self) -> u8;

    /// Latched copy of the mask register (`$2001`).
    fn mask(&self) -> u8;

    /// Generic VRAM read, including palette mirroring for `$3F00-$3FFF`.
    fn read_vram(&mut self, addr: u16) -> Result<u8, Self::Error>;

    /// Raw VRAM image, indexed directly by two fetch stages.
    ///
    /// Unlike [`read_vram`](Self::read_vram) this does not route palette
    /// addresses through palette RAM.
    fn vram(&self) -> &[u8; vram::ADDRESS_SPACE_SIZE];

    /// Stores a new status register (`$2002`) value.
    fn write_status(&mut self, value: u8, source: AccessSource) -> Result<(), Self::Error>;
}

impl<T: VideoBus + ?Sized> VideoBus for &mut T {
    type Error = T::Error;

    fn control(&self) -> u8 {
        (**self).control()
    }

    fn mask(&self) -> u8 {
        (**self).mask()
    }

    fn read_vram(&mut self, addr: u16) -> Result<u8, Self::Error> {
        (**self).read_vram(addr)
    }

    fn vram(&self) -> &[u8; vram::ADDRESS_SPACE_SIZE] {
        (**self).vram()
    }

    fn write_status(&mut self, value: u8, source: AccessSource) -> Result<(), Self::Error> {
        (**self).write_status(value, source)
    }
}
