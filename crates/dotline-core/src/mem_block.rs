use core::ops::{Deref, DerefMut};

use crate::memory::vram;

/// Heap-backed fixed-size memory block.
///
/// The 16 KiB VRAM image is boxed so that a bus can be moved around (or
/// embedded in another struct) without copying the whole array on the stack.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemBlock<T, const N: usize>(Box<[T; N]>);

/// Convenience alias for a `MemBlock` of bytes.
pub type ByteBlock<const N: usize> = MemBlock<u8, N>;

/// Full 14-bit PPU address space (`$0000-$3FFF`).
pub type VramImage = ByteBlock<{ vram::ADDRESS_SPACE_SIZE }>;
/// Palette RAM (`$3F00-$3F1F`).
pub type PaletteRam = ByteBlock<{ vram::PALETTE_RAM_SIZE }>;

impl<T: Copy + Default, const N: usize> MemBlock<T, N> {
    pub fn new() -> Self {
        Self(Box::new([T::default(); N]))
    }
}

impl<T, const N: usize> MemBlock<T, N> {
    #[inline]
    pub fn as_array(&self) -> &[T; N] {
        &self.0
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &*self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.0
    }
}

impl<T: Copy + Default, const N: usize> Default for MemBlock<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for MemBlock<T, N> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for MemBlock<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}
