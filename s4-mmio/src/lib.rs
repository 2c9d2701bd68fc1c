//! MMIO Abstraction Layer for the SAM4S Boot Substrate
//!
//! Building blocks for talking to memory-mapped peripheral registers before
//! (and after) the runtime is up.
//!
//! # Modules
//!
//! - [`region`]: Type-safe MMIO region access with offset-based reads/writes
//! - [`barrier`]: Barriers for register writes that must land before the next step
//! - [`wait`]: Wait-until-ready polling with an optional attempt bound
//!
//! # Example
//!
//! ```ignore
//! use s4_mmio::{MmioRegion, PollLimit, wait_until};
//!
//! // PMC at 0x400E_0400
//! let pmc = unsafe { MmioRegion::new(0x400E_0400, 0x200) };
//!
//! // Spin until the master clock reports ready
//! wait_until(|| pmc.read32(0x68) & (1 << 3) != 0, PollLimit::Unbounded)?;
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod barrier;
pub mod region;
pub mod wait;

// Re-exports for convenience
pub use barrier::{dsb, isb};
pub use region::MmioRegion;
pub use wait::{PollLimit, WaitTimeout, wait_until};
