//! # s4-common
//!
//! Shared types for the SAM4S boot substrate.
//!
//! This crate defines the data handed between the link stage, the reset
//! sequencer and the fault handlers:
//! - [`MemoryRegion`](memory::MemoryRegion) / [`MemoryLayout`](memory::MemoryLayout):
//!   the `.data`/`.bss` boundaries produced by the linker script
//! - [`FaultCause`](fault::FaultCause) / [`FaultRecord`](fault::FaultRecord):
//!   what a fatal handler passes to the panic sink
//!
//! # no_std
//!
//! This crate is `#![no_std]` and has zero dependencies, so it can be used
//! before RAM is initialised.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod fault;
pub mod memory;

// Re-export commonly used types
pub use fault::{FaultCause, FaultRecord};
pub use memory::{LayoutError, MemoryLayout, MemoryRegion, WORD_SIZE};
