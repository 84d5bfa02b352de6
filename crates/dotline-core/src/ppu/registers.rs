//! Register views consumed by the background core.
//!
//! Control and mask are snapshots of bytes owned by the memory subsystem;
//! the status flags and the VRAM address pair are owned by the PPU.

mod control;
mod mask;
mod scroll_latch;
mod status;
mod vram_addr;

pub use control::Control;
pub use mask::Mask;
pub use scroll_latch::ScrollLatch;
pub use status::Status;
pub use vram_addr::VramAddr;
