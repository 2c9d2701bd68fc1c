//! Board Configuration
//!
//! Compile-time constants for the SAM4S Xplained.

use log::LevelFilter;
use s4_mmio::PollLimit;

use crate::frequency::Hertz;

/// Target core frequency
pub const F_CPU: Hertz = Hertz::mhz(120);

/// External crystal on XIN/XOUT
pub const CRYSTAL: Hertz = Hertz::mhz(12);

/// Internal RC oscillator frequency out of reset
pub const RC_DEFAULT: Hertz = Hertz::mhz(4);

/// Flash wait states required at [`F_CPU`]
pub const FLASH_WAIT_STATES: u8 = 5;

/// Crystal start-up time, in units of 8 slow clock cycles
pub const MAIN_OSC_STARTUP: u8 = 8;

/// PLLB multiplier field (the PLL multiplies by `MULB + 1`)
pub const PLLB_MUL: u16 = 29;

/// PLLB divider
pub const PLLB_DIV: u8 = 3;

/// PLLB lock counter, in slow clock cycles × 8
pub const PLLB_COUNT: u8 = 1;

/// Console baud rate
pub const STDIO_BAUDRATE: u32 = 115_200;

/// LED1 (green): PC10
pub const LED1_PIN: u32 = 10;

/// LED2 (red): PC17
pub const LED2_PIN: u32 = 17;

/// Maximum level the logger passes through
pub const LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// How long clock bring-up waits for a ready bit.
///
/// If the crystal or PLL never report ready, the board hangs here.
pub const CLOCK_POLL_LIMIT: PollLimit = PollLimit::Unbounded;

// The PLL arithmetic has to land on F_CPU
const _: () = assert!(
    CRYSTAL.raw() / PLLB_DIV as u32 * (PLLB_MUL as u32 + 1) == F_CPU.raw(),
    "PLLB settings do not produce F_CPU"
);
const _: () = assert!(PLLB_DIV != 0 && PLLB_MUL != 0);
