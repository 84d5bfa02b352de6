#[cfg(feature = "savestate-serde")]
use serde::{Deserialize, Serialize};

/// Serializable state for the background shifters.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BgPipelineState {
    pub pattern: [u16; 2],
    pub attribute: [u8; 2],
}

/// Serializable state for the fetch sequencer and its latches.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchState {
    pub stage: u8,
    pub nametable: u8,
    pub attribute: u8,
    pub pattern_low: u8,
    pub pattern_high: u8,
    pub pattern_addr: u16,
    pub idle_counter: u16,
}

/// Serializable state for `v`, `t`, fine X, the write toggle and the scroll
/// checkpoints.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    pub v: u16,
    pub t: u16,
    pub fine_x: u8,
    pub w: bool,
    pub increment_dot: u16,
    pub reload_dot: u16,
}

/// Everything needed to resume the core mid-frame. The frame buffer is not
/// included; it is fully rewritten every frame.
#[cfg_attr(feature = "savestate-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PpuState {
    pub dot: u16,
    pub scanline: u16,
    pub frame: u64,
    pub odd_frame: bool,
    pub status: u8,
    pub nmi_pending: bool,
    pub vblank_edge: bool,
    pub scroll: ScrollState,
    pub fetch: FetchState,
    pub background: BgPipelineState,
}

#[cfg(feature = "savestate-postcard")]
impl PpuState {
    /// Compact binary encoding.
    pub fn to_postcard(&self) -> Result<Vec<u8>, crate::error::Error> {
        Ok(postcard::to_stdvec(self)?)
    }

    pub fn from_postcard(bytes: &[u8]) -> Result<Self, crate::error::Error> {
        Ok(postcard::from_bytes(bytes)?)
    }
}
