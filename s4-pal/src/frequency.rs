//! Core Clock Frequency
//!
//! The frequency the core runs at is decided once, by the clock bring-up,
//! and read by everything that derives timing from it (baud rates, delays).
//! Until then readers see the frequency the chip comes out of reset with:
//! the 4 MHz internal RC oscillator.

use core::fmt;

use spin::Once;

/// A frequency in hertz
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hertz(pub u32);

impl Hertz {
    #[must_use]
    pub const fn hz(hz: u32) -> Self {
        Self(hz)
    }

    #[must_use]
    pub const fn khz(khz: u32) -> Self {
        Self(khz * 1_000)
    }

    #[must_use]
    pub const fn mhz(mhz: u32) -> Self {
        Self(mhz * 1_000_000)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Hertz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1_000_000 == 0 {
            write!(f, "{} MHz", self.0 / 1_000_000)
        } else if self.0 % 1_000 == 0 {
            write!(f, "{} kHz", self.0 / 1_000)
        } else {
            write!(f, "{} Hz", self.0)
        }
    }
}

/// Frequency of the internal RC oscillator selected out of reset
pub const RESET_FREQUENCY: Hertz = Hertz::mhz(4);

/// The core clock was already published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyPublished(pub Hertz);

impl fmt::Display for AlreadyPublished {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core clock already published as {}", self.0)
    }
}

/// Write-once core clock frequency
pub struct CoreClock {
    published: Once<Hertz>,
}

impl CoreClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            published: Once::new(),
        }
    }

    /// Record the final frequency.
    ///
    /// Only the first call takes effect; later calls report the value
    /// already in place.
    pub fn publish(&self, hz: Hertz) -> Result<(), AlreadyPublished> {
        let mut fresh = false;
        let current = *self.published.call_once(|| {
            fresh = true;
            hz
        });
        if fresh {
            log::debug!("core clock published: {}", current);
            Ok(())
        } else {
            Err(AlreadyPublished(current))
        }
    }

    /// The published frequency, if bring-up has finished
    #[must_use]
    pub fn get(&self) -> Option<Hertz> {
        self.published.get().copied()
    }

    /// Current core frequency (the reset RC frequency until published)
    #[must_use]
    pub fn hz(&self) -> Hertz {
        self.get().unwrap_or(RESET_FREQUENCY)
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.published.is_completed()
    }

    /// Core cycles per millisecond at the current frequency
    #[must_use]
    pub fn cycles_per_ms(&self) -> u32 {
        self.hz().raw() / 1_000
    }
}

impl Default for CoreClock {
    fn default() -> Self {
        Self::new()
    }
}

/// The system-wide core clock
pub static CORE_CLOCK: CoreClock = CoreClock::new();

/// Current system core frequency
#[inline]
#[must_use]
pub fn core_clock() -> Hertz {
    CORE_CLOCK.hz()
}
