//! Boot Logging
//!
//! Provides logging infrastructure using the `log` crate.
//!
//! # Log Output
//!
//! Each record is formatted into a fixed stack buffer and written to the
//! console as one `[LEVEL] target: message` line. Records longer than the
//! buffer are truncated. The logger is installed as soon as RAM is ready;
//! records logged before the board brings the console up go nowhere.

use core::fmt::Write;

use log::{Level, Log, Metadata, Record};
use s4_pal::{config, console};

/// Longest line written in one piece
const LINE_SIZE: usize = 160;

/// Stack buffer for formatting log messages
struct MessageBuffer {
    data: [u8; LINE_SIZE],
    len: usize,
}

impl MessageBuffer {
    const fn new() -> Self {
        Self {
            data: [0u8; LINE_SIZE],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        // Truncation may have split a multi-byte character
        match core::str::from_utf8(&self.data[..self.len]) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.data[..e.valid_up_to()]).unwrap_or("<invalid>"),
        }
    }
}

impl Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = LINE_SIZE - self.len;
        let to_copy = bytes.len().min(remaining);
        self.data[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Format one record as it appears on the console
fn format_record(buf: &mut MessageBuffer, level: Level, target: &str, args: core::fmt::Arguments<'_>) {
    let _ = write!(buf, "[{}] {}: {}", level_tag(level), target, args);
    if buf.len == LINE_SIZE {
        buf.len -= 1;
    }
    let _ = buf.write_str("\n");
}

/// Console logger implementation
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= config::LOG_LEVEL
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = MessageBuffer::new();
        format_record(&mut line, record.level(), record.target(), *record.args());
        console::puts(line.as_str());
    }

    fn flush(&self) {}
}

/// Global logger instance
static LOGGER: ConsoleLogger = ConsoleLogger;

/// Initialise the logging system
pub fn init() {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(config::LOG_LEVEL))
        .ok();
}
