//! # s4-arch
//!
//! ARMv7-M (Cortex-M4) architecture support for the SAM4S boot substrate.
//!
//! Provides:
//! - [`exceptions`]: Architecture-defined exception numbers and vector slots
//! - [`vectors`]: Vector table model and the hardware image built from it
//! - [`cpu`]: CPU control (halt loops, interrupt masking, fault enables)
//!
//! # Safety
//!
//! Instruction and core-register access only happens on the firmware
//! target (`target_arch = "arm"`, `target_os = "none"`). Host builds get
//! inert fallbacks so the table logic can be tested.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod cpu;
pub mod exceptions;
pub mod vectors;

pub use cpu::{halt, spin_halt, wait_for_interrupt};
pub use exceptions::CoreException;
pub use vectors::{Handler, ResetHandler, SlotKind, Vector, VectorEntry, VectorImage, VectorTable};
