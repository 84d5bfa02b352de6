use std::convert::Infallible;

use tracing::debug;

use super::{AccessSource, VideoBus};
use crate::{
    error::Error,
    mem_block::{PaletteRam, VramImage},
    memory::vram,
};

/// Plain in-memory bus: a 16 KiB VRAM image, palette RAM and the three PPU
/// registers the renderer reads or writes.
///
/// Useful for tests and offline rendering of VRAM dumps. Every access
/// succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatVideoBus {
    vram: VramImage,
    palette_ram: PaletteRam,
    control: u8,
    mask: u8,
    status: u8,
}

impl Default for FlatVideoBus {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatVideoBus {
    pub fn new() -> Self {
        Self {
            vram: VramImage::new(),
            palette_ram: PaletteRam::new(),
            control: 0,
            mask: 0,
            status: 0,
        }
    }

    /// Builds a bus from a raw dump of the PPU address space.
    ///
    /// The image must be exactly 16 KiB. Bytes at `$3F00-$3F1F` also seed
    /// palette RAM.
    pub fn from_image(image: &[u8]) -> Result<Self, Error> {
        if image.len() != vram::ADDRESS_SPACE_SIZE {
            return Err(Error::ImageSize {
                expected: vram::ADDRESS_SPACE_SIZE,
                actual: image.len(),
            });
        }
        let mut bus = Self::new();
        bus.vram.copy_from_slice(image);
        let base = vram::PALETTE_BASE as usize;
        bus.palette_ram
            .copy_from_slice(&image[base..base + vram::PALETTE_RAM_SIZE]);
        debug!(len = image.len(), "loaded VRAM image");
        Ok(bus)
    }

    pub fn set_control(&mut self, value: u8) {
        self.control = value;
    }

    pub fn set_mask(&mut self, value: u8) {
        self.mask = value;
    }

    /// Current `$2002` contents as last written by the PPU.
    pub fn status(&self) -> u8 {
        self.status
    }

    /// Writes a byte into the address space, routing palette addresses to
    /// palette RAM the same way [`VideoBus::read_vram`] does.
    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = addr & vram::ADDRESS_MASK;
        if addr >= vram::PALETTE_BASE {
            self.palette_ram[palette_index(addr)] = value;
        } else {
            self.vram[addr as usize] = value;
        }
    }

    /// Writes a byte into the raw VRAM image only.
    pub fn write_raw(&mut self, addr: u16, value: u8) {
        self.vram[(addr & vram::ADDRESS_MASK) as usize] = value;
    }
}

impl VideoBus for FlatVideoBus {
    type Error = Infallible;

    fn control(&self) -> u8 {
        self.control
    }

    fn mask(&self) -> u8 {
        self.mask
    }

    fn read_vram(&mut self, addr: u16) -> Result<u8, Self::Error> {
        let addr = addr & vram::ADDRESS_MASK;
        if addr >= vram::PALETTE_BASE {
            Ok(self.palette_ram[palette_index(addr)])
        } else {
            Ok(self.vram[addr as usize])
        }
    }

    fn vram(&self) -> &[u8; vram::ADDRESS_SPACE_SIZE] {
        self.vram.as_array()
    }

    fn write_status(&mut self, value: u8, source: AccessSource) -> Result<(), Self::Error> {
        // `$2002` is read-only from the CPU side.
        if source == AccessSource::Ppu {
            self.status = value;
        }
        Ok(())
    }
}

/// Folds a `$3F00-$3FFF` address onto the 32-byte palette RAM.
///
/// `$3F10/$3F14/$3F18/$3F1C` mirror the backdrop entries of the background
/// palettes.
fn palette_index(addr: u16) -> usize {
    let mut index = ((addr - vram::PALETTE_BASE) as usize) % vram::PALETTE_RAM_SIZE;
    if index >= 16 && index % 4 == 0 {
        index -= 16;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_reads_are_mirrored() {
        let mut bus = FlatVideoBus::new();
        bus.write(0x3F10, 0x21);
        bus.write(0x3F25, 0x07);
        assert_eq!(bus.read_vram(0x3F00), Ok(0x21));
        assert_eq!(bus.read_vram(0x3F05), Ok(0x07));
        assert_eq!(bus.read_vram(0x7F05), Ok(0x07));
    }

    #[test]
    fn raw_image_is_not_palette_routed() {
        let mut bus = FlatVideoBus::new();
        bus.write(0x3F01, 0x11);
        assert_eq!(bus.vram()[0x3F01], 0);
        bus.write_raw(0x23C0, 0xE4);
        assert_eq!(bus.vram()[0x23C0], 0xE4);
    }

    #[test]
    fn cpu_status_writes_are_ignored() {
        let mut bus = FlatVideoBus::new();
        bus.write_status(0x80, AccessSource::Cpu).unwrap();
        assert_eq!(bus.status(), 0);
        bus.write_status(0x80, AccessSource::Ppu).unwrap();
        assert_eq!(bus.status(), 0x80);
    }

    #[test]
    fn image_must_cover_the_address_space() {
        let err = FlatVideoBus::from_image(&[0; 16]).unwrap_err();
        assert!(matches!(
            err,
            Error::ImageSize {
                expected: 0x4000,
                actual: 16
            }
        ));

        let mut image = vec![0u8; 0x4000];
        image[0x3F03] = 0x2A;
        let mut bus = FlatVideoBus::from_image(&image).unwrap();
        assert_eq!(bus.read_vram(0x3F03), Ok(0x2A));
    }
}
