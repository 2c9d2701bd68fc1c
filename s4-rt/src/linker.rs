//! Linker Script Symbols
//!
//! `link.x` exports the section boundaries the reset sequence works from.
//! Only their addresses carry meaning; none of them is ever read.

use s4_common::{LayoutError, MemoryLayout, MemoryRegion};

use crate::init_array::{InitArray, Initializer};

unsafe extern "C" {
    /// End of code; `.data` load image starts here
    static __etext: u32;
    static __data_start__: u32;
    static __data_end__: u32;
    static __bss_start__: u32;
    static __bss_end__: u32;

    static __init_array_start: Initializer;
    static __init_array_end: Initializer;

    /// Initial main stack pointer (top of SRAM). Not a function: declared
    /// as one so its address can go into the vector table in a `const`.
    pub(crate) fn __StackTop();
}

/// RAM layout of the running image, as linked
pub fn layout() -> Result<MemoryLayout, LayoutError> {
    // SAFETY: Only the symbol addresses are taken
    let (etext, data_start, data_end, bss_start, bss_end) = unsafe {
        (
            &raw const __etext as usize,
            &raw const __data_start__ as usize,
            &raw const __data_end__ as usize,
            &raw const __bss_start__ as usize,
            &raw const __bss_end__ as usize,
        )
    };
    let stack_top = __StackTop as usize;

    let data = MemoryRegion::new(data_start, data_end)?;
    let data_load = MemoryRegion::with_len(etext, data.len())?;
    let bss = MemoryRegion::new(bss_start, bss_end)?;
    MemoryLayout::new(data_load, data, bss, stack_top)
}

/// Static constructors collected in `.init_array`
pub fn init_array() -> InitArray<'static> {
    // SAFETY: The linker script brackets .init_array with these symbols,
    // and the section is part of the flash image
    unsafe {
        InitArray::from_bounds(
            &raw const __init_array_start,
            &raw const __init_array_end,
        )
    }
}
