use thiserror::Error;

use super::{AccessSource, FlatVideoBus, VideoBus};
use crate::memory::vram;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("bus fault at {addr:#06X}")]
pub(crate) struct BusFault {
    pub(crate) addr: u16,
}

/// Flat bus that logs every generic read and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct MockBus {
    pub(crate) inner: FlatVideoBus,
    pub(crate) reads: Vec<u16>,
    pub(crate) status_writes: Vec<(u8, AccessSource)>,
    pub(crate) fail_at: Option<u16>,
    /// Rejects every status write, reported at `$2002`.
    pub(crate) fail_status: bool,
}

impl VideoBus for MockBus {
    type Error = BusFault;

    fn control(&self) -> u8 {
        self.inner.control()
    }

    fn mask(&self) -> u8 {
        self.inner.mask()
    }

    fn read_vram(&mut self, addr: u16) -> Result<u8, Self::Error> {
        if self.fail_at == Some(addr) {
            return Err(BusFault { addr });
        }
        self.reads.push(addr);
        Ok(self.inner.read_vram(addr).unwrap_or_default())
    }

    fn vram(&self) -> &[u8; vram::ADDRESS_SPACE_SIZE] {
        self.inner.vram()
    }

    fn write_status(&mut self, value: u8, source: AccessSource) -> Result<(), Self::Error> {
        if self.fail_status {
            return Err(BusFault { addr: 0x2002 });
        }
        self.status_writes.push((value, source));
        Ok(())
    }
}
