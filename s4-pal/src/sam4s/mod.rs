//! SAM4S Chip Support
//!
//! Peripheral map, family variants and the register blocks the boot path
//! touches.
//!
//! # Memory Map
//!
//! ```text
//! 0x0040_0000  Internal flash (vector table at the start)
//! 0x2000_0000  Internal SRAM
//! 0x400E_0400  PMC
//! 0x400E_0600  UART0
//! 0x400E_0A00  EFC0
//! 0x400E_0C00  EFC1 (dual bank parts)
//! 0x400E_0E00  PIOA
//! 0x400E_1000  PIOB
//! 0x400E_1200  PIOC
//! ```

pub mod efc;
pub mod irq;
pub mod pio;
pub mod pmc;
pub mod uart;
pub mod variant;

pub use irq::{IRQ_SLOTS, Irq};
pub use variant::{SAM4S16C, SAM4SD32C, Variant};

pub const FLASH_BASE: usize = 0x0040_0000;
pub const SRAM_BASE: usize = 0x2000_0000;

pub const PMC_BASE: usize = 0x400E_0400;
pub const UART0_BASE: usize = 0x400E_0600;
pub const EFC0_BASE: usize = 0x400E_0A00;
pub const EFC1_BASE: usize = 0x400E_0C00;
pub const PIOA_BASE: usize = 0x400E_0E00;
pub const PIOB_BASE: usize = 0x400E_1000;
pub const PIOC_BASE: usize = 0x400E_1200;

/// The part this build targets
#[cfg(not(feature = "sam4sd32c"))]
pub const CHIP: Variant = SAM4S16C;

/// The part this build targets
#[cfg(feature = "sam4sd32c")]
pub const CHIP: Variant = SAM4SD32C;
