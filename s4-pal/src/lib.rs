//! Platform Abstraction Layer
//!
//! Provides the SAM4S platform the boot path runs on:
//! - [`sam4s`]: chip description (interrupt map, variants) and register blocks
//! - [`clock`]: RC → crystal → PLL bring-up state machine
//! - [`frequency`]: the core clock frequency, published once
//! - [`console`]: transmit-only UART0 early console
//! - [`board`]: board descriptions and the board-init entry point
//!
//! Everything that touches real registers sits behind either a trait
//! ([`clock::ClockRegisters`], [`board::Board`]) or an `unsafe` constructor,
//! so the logic builds and runs on the host for testing.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod board;
pub mod clock;
pub mod config;
pub mod console;
pub mod frequency;
pub mod sam4s;

pub use board::{Board, BoardError, SAM4S_XPLAINED, SamXplained};
pub use clock::{ClockConfig, ClockError, ClockMachine, ClockStage};
pub use frequency::{CORE_CLOCK, CoreClock, Hertz, core_clock};
pub use sam4s::{CHIP, Irq, Variant};
