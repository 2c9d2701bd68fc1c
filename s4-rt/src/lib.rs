//! # s4-rt
//!
//! Runtime for SAM4S firmware: everything from the reset vector to the
//! kernel entry point.
//!
//! - [`vectors`]: the SAM4S vector table with the fault handlers bound
//! - [`startup`]: the reset sequence (`.data`, `.bss`, board, runtime, kernel)
//! - [`memory`]: RAM initialisation over a memory bus
//! - [`init_array`]: static constructors
//! - [`faults`]: fault policy, handlers and the panic sink
//! - [`logging`]: `log` backend on the early console
//!
//! A firmware binary names its board-init and kernel functions with
//! [`entry!`] and places `vectors::linked(..).image()` in `.vector_table`;
//! `reset_handler` does the rest.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod faults;
pub mod init_array;
pub mod logging;
pub mod memory;
pub mod startup;
pub mod vectors;

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod linker;

pub use faults::{FaultPolicy, core_panic};
pub use memory::{MemoryBus, RawBus};
pub use startup::{BootHooks, BootStage, Sequencer};
pub use vectors::{VECTOR_COUNT, Sam4sVectors};

/// Register the board-init and kernel entry functions.
///
/// ```ignore
/// s4_rt::entry!(board = board_init, kernel = kernel_main);
///
/// fn board_init() { /* clocks, LEDs, console */ }
/// fn kernel_main() -> ! { loop {} }
/// ```
#[macro_export]
macro_rules! entry {
    (board = $board:path, kernel = $kernel:path $(,)?) => {
        #[doc(hidden)]
        #[unsafe(export_name = "__s4_board_init")]
        pub unsafe fn __s4_board_init() {
            // Type-check the given path
            let f: fn() = $board;
            f()
        }

        #[doc(hidden)]
        #[unsafe(export_name = "__s4_kernel_main")]
        pub unsafe fn __s4_kernel_main() -> ! {
            let f: fn() -> ! = $kernel;
            f()
        }
    };
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
unsafe extern "Rust" {
    fn __s4_board_init();
    fn __s4_kernel_main() -> !;
}

/// Hooks bound to the functions registered with [`entry!`]
#[cfg(all(target_arch = "arm", target_os = "none"))]
struct LinkedHooks;

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl BootHooks for LinkedHooks {
    fn board_init(&mut self) {
        // RAM is initialised, so the logger's statics are usable. Output
        // starts once the board has brought the console up.
        logging::init();
        // SAFETY: Provided by entry!, called once
        unsafe { __s4_board_init() };
    }

    fn runtime_init(&mut self) {
        // SAFETY: Constructors run once, after RAM and board init
        let ran = unsafe { linker::init_array().run() };
        log::debug!("startup: {} static constructors", ran);
    }

    fn kernel_start(&mut self) -> ! {
        // SAFETY: Provided by entry!
        unsafe { __s4_kernel_main() }
    }
}

/// Reset entry point (vector slot 1)
///
/// # Safety
///
/// Only the core jumps here, out of reset, with the stack pointer loaded
/// from slot 0.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn reset_handler() -> ! {
    let Ok(layout) = linker::layout() else {
        // Nothing is initialised yet, not even enough to report this
        s4_arch::spin_halt()
    };
    // SAFETY: The bus only sees addresses from the validated link layout
    let bus = unsafe { RawBus::new() };
    Sequencer::new(layout, bus, LinkedHooks).start()
}
