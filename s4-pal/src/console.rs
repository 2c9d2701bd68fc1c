/// Console implementation
/// Provides basic output over UART0 for early boot logging.
/// Transmit only; nothing is printed until `init` has run.
use core::fmt::{self, Write};

use spin::mutex::SpinMutex;

use crate::frequency::Hertz;
use crate::sam4s::uart::{Uart, UartRegisters, baud_divisor};

pub use crate::sam4s::uart::ConsoleError;

struct Console {
    base: usize,
    initialized: bool,
}

impl Console {
    const fn new() -> Self {
        Self {
            base: 0,
            initialized: false,
        }
    }

    fn uart(&self) -> Option<Uart<'_>> {
        if !self.initialized || self.base == 0 {
            return None;
        }
        // SAFETY: base was handed to the unsafe init() as a UART block
        let regs = unsafe { &*(self.base as *const UartRegisters) };
        Some(Uart::new(regs))
    }

    fn putc(&self, c: u8) {
        if let Some(uart) = self.uart() {
            uart.write_byte(c);
        }
    }

    fn puts(&self, s: &str) {
        let Some(uart) = self.uart() else {
            return;
        };
        for c in s.bytes() {
            if c == b'\n' {
                uart.write_byte(b'\r');
            }
            uart.write_byte(c);
        }
    }
}

impl Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.puts(s);
        Ok(())
    }
}

/// Global console instance
static CONSOLE: SpinMutex<Console> = SpinMutex::new(Console::new());

/// Initialise the console on the UART at `base`.
///
/// The divisor is derived from `mck`, so this must run after the clock
/// bring-up has settled.
///
/// # Safety
///
/// `base` must be the address of a UART register block whose pins are
/// already routed to it and whose peripheral clock is enabled.
pub unsafe fn init(base: usize, mck: Hertz, baud: u32) -> Result<(), ConsoleError> {
    let divisor = baud_divisor(mck, baud)?;

    // SAFETY: Guaranteed by the caller
    let regs = unsafe { &*(base as *const UartRegisters) };
    Uart::new(regs).configure(divisor);

    let mut console = CONSOLE.lock();
    console.base = base;
    console.initialized = true;
    Ok(())
}

/// Whether output currently goes anywhere
pub fn is_initialized() -> bool {
    CONSOLE.lock().initialized
}

/// Print a string to the console
pub fn puts(s: &str) {
    let console = CONSOLE.lock();
    console.puts(s);
}

/// Print a character to the console
pub fn putc(c: u8) {
    let console = CONSOLE.lock();
    console.putc(c);
}

/// Print from a context that may have interrupted a holder of the lock
/// (fault handlers, the panic handler). Output may interleave.
pub fn puts_unlocked(s: &str) {
    if let Some(console) = CONSOLE.try_lock() {
        console.puts(s);
        return;
    }
    // SAFETY: Single core. The holder was interrupted and never resumes, so
    // breaking the lock only risks interleaved characters.
    unsafe { CONSOLE.force_unlock() };
    CONSOLE.lock().puts(s);
}

/// Console writer for fmt::Write
pub struct ConsoleWriter;

impl Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        puts(s);
        Ok(())
    }
}

/// Lock-free writer for the panic path
pub struct PanicWriter;

impl Write for PanicWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        puts_unlocked(s);
        Ok(())
    }
}

/// Print formatted output to the console
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = write!($crate::console::ConsoleWriter, $($arg)*);
    }};
}

/// Print formatted output with newline to the console
#[macro_export]
macro_rules! println {
    () => {
        $crate::console::puts("\n")
    };
    ($($arg:tt)*) => {{
        use core::fmt::Write;
        let _ = writeln!($crate::console::ConsoleWriter, $($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialised_console_is_silent() {
        let console = Console::new();
        assert!(console.uart().is_none());
        // Must not touch address 0
        console.puts("boot\n");
        console.putc(b'x');
    }

    #[test]
    fn test_newline_becomes_crlf() {
        #[repr(C, align(4))]
        struct Block([u32; 9]);

        let mut block = Block([0; 9]);
        block.0[5] = 1 << 1; // TXRDY always set
        let console = Console {
            base: block.0.as_mut_ptr() as usize,
            initialized: true,
        };
        // THR only holds the last byte
        console.puts("ok\n");
        assert_eq!(block.0[7], u32::from(b'\n'));
        console.puts("a");
        assert_eq!(block.0[7], u32::from(b'a'));
    }
}
