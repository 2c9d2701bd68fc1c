//! MMIO Region Abstraction
//!
//! Provides offset-based access to memory-mapped I/O regions.
//! All reads and writes use volatile operations so the compiler can neither
//! reorder nor elide peripheral register accesses.
//!
//! SAM4S peripherals sit on a 32-bit APB, so only word access is offered.
//!
//! # Safety
//!
//! The caller is responsible for ensuring the base address points to a
//! valid peripheral register block.

use core::ptr::{read_volatile, write_volatile};

/// A memory-mapped I/O region.
///
/// # Example
///
/// ```ignore
/// let pioc = unsafe { MmioRegion::new(0x400E_1200, 0x200) };
///
/// // Set PC10 as output
/// pioc.write32(0x10, 1 << 10);
/// ```
#[derive(Clone, Copy)]
pub struct MmioRegion {
    base: usize,
    size: usize,
}

impl MmioRegion {
    /// Create a new MMIO region.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    /// - `base` points to a valid register block of at least `size` bytes
    /// - No other code accesses this region concurrently without synchronisation
    #[inline]
    #[must_use]
    pub const unsafe fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    /// Get the base address of this region.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Get the size of this region.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Read a 32-bit value from the given offset.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if offset is out of bounds or misaligned.
    #[inline]
    #[must_use]
    pub fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset + 4 <= self.size, "MMIO read32 offset out of bounds");
        debug_assert!(offset.is_multiple_of(4), "MMIO read32 offset not aligned");
        // SAFETY: Caller ensured base is valid MMIO, offset is within bounds
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    /// Write a 32-bit value to the given offset.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if offset is out of bounds or misaligned.
    #[inline]
    pub fn write32(&self, offset: usize, value: u32) {
        debug_assert!(offset + 4 <= self.size, "MMIO write32 offset out of bounds");
        debug_assert!(offset.is_multiple_of(4), "MMIO write32 offset not aligned");
        // SAFETY: Caller ensured base is valid MMIO, offset is within bounds
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Modify a 32-bit register using read-modify-write.
    ///
    /// Note: This is NOT atomic. A status bit may change between the read
    /// and the write-back.
    #[inline]
    pub fn modify32<F>(&self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }

    /// Set bits in a 32-bit register.
    #[inline]
    pub fn set_bits32(&self, offset: usize, bits: u32) {
        self.modify32(offset, |v| v | bits);
    }

    /// Clear bits in a 32-bit register.
    #[inline]
    pub fn clear_bits32(&self, offset: usize, bits: u32) {
        self.modify32(offset, |v| v & !bits);
    }
}

impl core::fmt::Debug for MmioRegion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MmioRegion")
            .field("base", &format_args!("{:#x}", self.base))
            .field("size", &format_args!("{:#x}", self.size))
            .finish()
    }
}
