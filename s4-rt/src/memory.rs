//! RAM Initialisation
//!
//! The first two things the reset sequence does, before anything may rely
//! on a `static`:
//! - copy the initialised-data image from flash into `.data`
//! - clear `.bss`
//!
//! Both work word by word through [`MemoryBus`], finishing a section that
//! ends part-way into a word byte by byte, so tests can run them against a
//! simulated address space instead of real RAM.

use s4_common::MemoryLayout;

/// Word and byte access to physical memory
pub trait MemoryBus {
    fn read_word(&self, addr: usize) -> u32;

    fn write_word(&self, addr: usize, value: u32);

    fn read_byte(&self, addr: usize) -> u8;

    fn write_byte(&self, addr: usize, value: u8);
}

impl<B: MemoryBus + ?Sized> MemoryBus for &B {
    fn read_word(&self, addr: usize) -> u32 {
        (**self).read_word(addr)
    }

    fn write_word(&self, addr: usize, value: u32) {
        (**self).write_word(addr, value)
    }

    fn read_byte(&self, addr: usize) -> u8 {
        (**self).read_byte(addr)
    }

    fn write_byte(&self, addr: usize, value: u8) {
        (**self).write_byte(addr, value)
    }
}

/// Direct volatile access to the address space
pub struct RawBus {
    _private: (),
}

impl RawBus {
    /// # Safety
    ///
    /// Every address later passed to the bus must be mapped and not in use
    /// by anything the compiler can see. Word accesses must be word aligned.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl MemoryBus for RawBus {
    #[inline]
    fn read_word(&self, addr: usize) -> u32 {
        // SAFETY: Guaranteed by RawBus::new()
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write_word(&self, addr: usize, value: u32) {
        // SAFETY: Guaranteed by RawBus::new()
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }

    #[inline]
    fn read_byte(&self, addr: usize) -> u8 {
        // SAFETY: Guaranteed by RawBus::new()
        unsafe { core::ptr::read_volatile(addr as *const u8) }
    }

    #[inline]
    fn write_byte(&self, addr: usize, value: u8) {
        // SAFETY: Guaranteed by RawBus::new()
        unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
    }
}

/// Copy the `.data` load image to its run address.
///
/// Skipped when the section is empty or already in place. Returns the
/// number of bytes copied.
pub fn copy_data<B: MemoryBus>(bus: &B, layout: &MemoryLayout) -> usize {
    if !layout.needs_copy() {
        return 0;
    }
    // Load and run regions have the same length and both start on a word
    let offset = layout.data_load.start();
    let run = layout.data.start();
    for dst in layout.data.word_addrs() {
        bus.write_word(dst, bus.read_word(offset + (dst - run)));
    }
    for dst in layout.data.tail_addrs() {
        bus.write_byte(dst, bus.read_byte(offset + (dst - run)));
    }
    layout.data.len()
}

/// Zero every byte of `.bss`. Returns the number of bytes cleared.
pub fn zero_bss<B: MemoryBus>(bus: &B, layout: &MemoryLayout) -> usize {
    if !layout.needs_zero() {
        return 0;
    }
    for addr in layout.bss.word_addrs() {
        bus.write_word(addr, 0);
    }
    for addr in layout.bss.tail_addrs() {
        bus.write_byte(addr, 0);
    }
    layout.bss.len()
}
