//! SAM4S Xplained Firmware
//!
//! Places the vector table, registers the board bring-up and a kernel
//! placeholder with the runtime, and provides the panic handler every
//! fault report ends in.
//!
//! Build with `--features firmware --target thumbv7em-none-eabi`.

#![no_std]
#![no_main]
#![deny(unsafe_op_in_unsafe_fn)]

use core::fmt::Write;
use core::panic::PanicInfo;

use s4_arch::{VectorImage, cpu};
use s4_pal::sam4s::CHIP;
use s4_pal::sam4s::pio::Pio;
use s4_pal::{Board, SAM4S_XPLAINED, board, console};
use s4_rt::VECTOR_COUNT;

/// Hardware vector table, first thing in flash
#[unsafe(no_mangle)]
#[unsafe(link_section = ".vector_table")]
#[used]
pub static VECTORS: VectorImage<VECTOR_COUNT> = s4_rt::vectors::linked(&CHIP).image();

s4_rt::entry!(board = board_init, kernel = kernel_main);

fn board_init() {
    // SAFETY: Called once by the reset sequence, before anything else
    // touches the clocks, the LEDs or the console
    if let Err(e) = unsafe { board::init(&SAM4S_XPLAINED) } {
        panic!("board init failed: {}", e);
    }
}

fn kernel_main() -> ! {
    log::info!("{}: no kernel linked, idling", SAM4S_XPLAINED.name());

    // LED1 on as a sign of life
    if let Some(led) = SAM4S_XPLAINED.leds().first() {
        // SAFETY: LED ports are PIO controllers of this board
        unsafe { Pio::new(led.port) }.set(led.mask());
    }

    cpu::halt()
}

/// Panic handler: print once, then stop for good
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    cpu::disable_interrupts();
    let _ = writeln!(console::PanicWriter, "\n*** {}", info);
    cpu::halt()
}
