//! Board Support
//!
//! A board fixes the things the chip leaves open: which part is fitted,
//! the crystal and PLL settings, where the LEDs are soldered and which UART
//! the console uses. [`init`] is the board-init step of the reset sequence.

use core::fmt;

use tock_registers::interfaces::Writeable;

use crate::clock::{self, ClockConfig, ClockError};
use crate::config;
use crate::console::{self, ConsoleError};
use crate::frequency::Hertz;
use crate::sam4s::pio::{Led, PeripheralFunction, Pio};
use crate::sam4s::pmc::{self, PmcRegisters};
use crate::sam4s::{self, CHIP, Irq, Variant};

/// Where the early console lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsolePort {
    pub uart_base: usize,
    /// Peripheral ID, used to gate the UART clock
    pub uart: Irq,
    /// PIO controller owning the RX/TX pins
    pub pio_base: usize,
    pub pins: u32,
    pub function: PeripheralFunction,
    pub baud: u32,
}

pub trait Board: Send + Sync {
    /// Get the board name
    fn name(&self) -> &'static str;

    /// The SAM4S part fitted
    fn variant(&self) -> &'static Variant;

    /// Oscillator and PLL settings
    fn clock_config(&self) -> ClockConfig {
        ClockConfig::for_variant(self.variant())
    }

    /// On-board LEDs, initialised as outputs and switched off
    fn leds(&self) -> &'static [Led];

    /// Early console, if the board has one
    fn console(&self) -> Option<ConsolePort>;
}

/// Board initialisation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    Clock(ClockError),
    Console(ConsoleError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock(e) => write!(f, "clock bring-up failed: {}", e),
            Self::Console(e) => write!(f, "console setup failed: {}", e),
        }
    }
}

impl From<ClockError> for BoardError {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}

impl From<ConsoleError> for BoardError {
    fn from(e: ConsoleError) -> Self {
        Self::Console(e)
    }
}

/// Atmel SAM4S Xplained
pub struct SamXplained;

static XPLAINED_VARIANT: Variant = CHIP;

static XPLAINED_LEDS: [Led; 2] = [
    Led::new(sam4s::PIOC_BASE, config::LED1_PIN),
    Led::new(sam4s::PIOC_BASE, config::LED2_PIN),
];

/// UART0 RX (URXD0)
const PA9: u32 = 1 << 9;
/// UART0 TX (UTXD0)
const PA10: u32 = 1 << 10;

impl Board for SamXplained {
    fn name(&self) -> &'static str {
        "SAM4S Xplained"
    }

    fn variant(&self) -> &'static Variant {
        &XPLAINED_VARIANT
    }

    fn leds(&self) -> &'static [Led] {
        &XPLAINED_LEDS
    }

    fn console(&self) -> Option<ConsolePort> {
        Some(ConsolePort {
            uart_base: sam4s::UART0_BASE,
            uart: Irq::Uart0,
            pio_base: sam4s::PIOA_BASE,
            pins: PA9 | PA10,
            function: PeripheralFunction::A,
            baud: config::STDIO_BAUDRATE,
        })
    }
}

pub static SAM4S_XPLAINED: SamXplained = SamXplained;

/// Bring the board up: core clock, fault handlers, LEDs, console.
///
/// Does not return if the crystal or PLL never report ready.
///
/// # Safety
///
/// Must run exactly once, on the board `board` describes, before anything
/// else uses the PMC, the flash controllers, the LED PIO or the console UART.
pub unsafe fn init(board: &dyn Board) -> Result<Hertz, BoardError> {
    // SAFETY: Sole user of the PMC and flash controllers, per this
    // function's contract
    let mck = unsafe { clock::bring_up(board.clock_config()) }?;

    s4_arch::cpu::enable_fault_handlers();

    for led in board.leds() {
        // SAFETY: LED ports are PIO controller addresses of this board
        let pio = unsafe { Pio::new(led.port) };
        pio.configure_output(led.mask());
    }

    if let Some(port) = board.console() {
        // SAFETY: PMC_BASE is the PMC register block
        let pmc = unsafe { &*(sam4s::PMC_BASE as *const PmcRegisters) };
        if let Some(bit) = pmc::pcer0_bit(port.uart) {
            pmc.pcer0.set(bit);
        }

        // SAFETY: The board names a PIO controller for the console pins
        let pio = unsafe { Pio::new(port.pio_base) };
        pio.set_peripheral(port.pins, port.function);

        // SAFETY: Pins routed and clock enabled just above
        unsafe { console::init(port.uart_base, mck, port.baud)? };
    }

    log::info!("{} ({}) up at {}", board.name(), board.variant().name, mck);
    Ok(mck)
}
