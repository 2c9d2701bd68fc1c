//! Fault Causes
//!
//! The closed set of fatal conditions reported through the panic sink.

use core::fmt;

/// Why a fatal handler fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaultCause {
    /// An interrupt fired for a slot with no registered handler
    DummyHandler = 0,
    /// Escalated or unrecoverable fault
    HardFault = 1,
    /// Bus error on instruction fetch or data access
    BusFault = 2,
    /// Undefined instruction, invalid state, unaligned access, division by zero
    UsageFault = 3,
}

impl FaultCause {
    /// Every cause, in code order
    pub const ALL: [FaultCause; 4] = [
        Self::DummyHandler,
        Self::HardFault,
        Self::BusFault,
        Self::UsageFault,
    ];

    /// Numeric cause code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Literal description passed alongside the cause
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DummyHandler => "DUMMY HANDLER",
            Self::HardFault => "HARD FAULT",
            Self::BusFault => "BUS FAULT",
            Self::UsageFault => "USAGE FAULT",
        }
    }

    /// Symbolic name of the cause
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DummyHandler => "DUMMY_HANDLER",
            Self::HardFault => "HARD_FAULT",
            Self::BusFault => "BUS_FAULT",
            Self::UsageFault => "USAGE_FAULT",
        }
    }
}

impl fmt::Display for FaultCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fault as handed to the panic sink.
///
/// Lives only for the duration of the halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultRecord {
    pub cause: FaultCause,
    pub message: &'static str,
}

impl FaultRecord {
    #[must_use]
    pub const fn new(cause: FaultCause) -> Self {
        Self {
            cause,
            message: cause.description(),
        }
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.cause, self.message)
    }
}
