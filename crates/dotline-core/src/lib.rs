//! Cycle-stepped NES background renderer.
//!
//! [`Ppu`] owns the timing, scroll, fetch and shifter state; memory and the
//! CPU-visible registers sit behind a [`VideoBus`] handed to every
//! [`Ppu::clock`] call. [`FlatVideoBus`] is a ready-made bus backed by a flat
//! 16 KiB VRAM image.

pub mod bus;
pub mod error;
pub mod mem_block;
pub mod memory;
pub mod ppu;

pub use bus::{AccessSource, FlatVideoBus, VideoBus};
pub use error::Error;
pub use ppu::{
    Ppu,
    buffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH},
    savestate::PpuState,
};
