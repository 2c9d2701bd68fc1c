//! Memory Barrier Helpers
//!
//! Ordering primitives for register sequences where the hardware must see
//! one write land before the next access (flash wait-states before a clock
//! switch, for instance).
//!
//! # Cortex-M Mapping
//!
//! - `dsb()`: Data Synchronisation Barrier (all memory accesses complete)
//! - `isb()`: Instruction Synchronisation Barrier (pipeline flush)
//!
//! Off-target (host tests) both degrade to a sequentially consistent fence.

use core::sync::atomic::{Ordering, fence};

/// Data Synchronisation Barrier (DSB SY).
///
/// Use after register writes that must take effect before continuing,
/// e.g. after programming flash wait-states.
#[inline]
pub fn dsb() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    cortex_m::asm::dsb();
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    fence(Ordering::SeqCst);
}

/// Instruction Synchronisation Barrier (ISB).
///
/// Flushes the pipeline so subsequent instructions are fetched with the
/// new configuration in effect.
#[inline]
pub fn isb() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    cortex_m::asm::isb();
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    fence(Ordering::SeqCst);
}
