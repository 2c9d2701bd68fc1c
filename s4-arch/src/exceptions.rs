//! ARMv7-M Exception Numbers
//!
//! The first 16 vector slots are fixed by the architecture:
//!
//! ```text
//!  0  initial main stack pointer
//!  1  Reset
//!  2  NMI                 9  reserved
//!  3  HardFault          10  reserved
//!  4  MemManage          11  SVCall
//!  5  BusFault           12  DebugMonitor
//!  6  UsageFault         13  reserved
//!  7  reserved           14  PendSV
//!  8  reserved           15  SysTick
//! ```
//!
//! Device interrupt `n` lives in slot `FIRST_IRQ_SLOT + n`.

use core::fmt;

/// Slot holding the initial stack pointer
pub const STACK_TOP_SLOT: usize = 0;

/// Slot holding the reset entry point
pub const RESET_SLOT: usize = 1;

/// First slot owned by device-specific interrupts
pub const FIRST_IRQ_SLOT: usize = 16;

/// Architecture-defined exceptions that take a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CoreException {
    NonMaskableInt = 2,
    HardFault = 3,
    MemoryManagement = 4,
    BusFault = 5,
    UsageFault = 6,
    SVCall = 11,
    DebugMonitor = 12,
    PendSV = 14,
    SysTick = 15,
}

impl CoreException {
    /// Every handler-bearing core exception, in slot order
    pub const ALL: [CoreException; 9] = [
        Self::NonMaskableInt,
        Self::HardFault,
        Self::MemoryManagement,
        Self::BusFault,
        Self::UsageFault,
        Self::SVCall,
        Self::DebugMonitor,
        Self::PendSV,
        Self::SysTick,
    ];

    /// Vector table slot (equal to the exception number)
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// The core exception bound to `slot`, if any.
    ///
    /// Returns `None` for the stack/reset slots, the reserved slots and
    /// device interrupt slots.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            2 => Some(Self::NonMaskableInt),
            3 => Some(Self::HardFault),
            4 => Some(Self::MemoryManagement),
            5 => Some(Self::BusFault),
            6 => Some(Self::UsageFault),
            11 => Some(Self::SVCall),
            12 => Some(Self::DebugMonitor),
            14 => Some(Self::PendSV),
            15 => Some(Self::SysTick),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NonMaskableInt => "NMI",
            Self::HardFault => "HardFault",
            Self::MemoryManagement => "MemManage",
            Self::BusFault => "BusFault",
            Self::UsageFault => "UsageFault",
            Self::SVCall => "SVCall",
            Self::DebugMonitor => "DebugMonitor",
            Self::PendSV => "PendSV",
            Self::SysTick => "SysTick",
        }
    }
}

impl fmt::Display for CoreException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exception number currently being serviced (ICSR.VECTACTIVE).
///
/// Returns 0 in thread mode and always 0 off-target.
#[must_use]
#[inline]
pub fn active_vector() -> usize {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    {
        use cortex_m::peripheral::{SCB, scb::VectActive};

        match SCB::vect_active() {
            VectActive::ThreadMode => 0,
            VectActive::Exception(exception) => {
                (FIRST_IRQ_SLOT as isize + isize::from(exception.irqn())) as usize
            }
            VectActive::Interrupt { irqn } => FIRST_IRQ_SLOT + usize::from(irqn),
        }
    }
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_reserved_core_slot(slot: usize) -> bool {
        matches!(slot, 7..=10 | 13)
    }

    #[test]
    fn test_slot_roundtrip() {
        for exc in CoreException::ALL {
            assert_eq!(CoreException::from_slot(exc.slot()), Some(exc));
        }
    }

    #[test]
    fn test_non_handler_slots() {
        assert_eq!(CoreException::from_slot(STACK_TOP_SLOT), None);
        assert_eq!(CoreException::from_slot(RESET_SLOT), None);
        for slot in [7, 8, 9, 10, 13] {
            assert!(is_reserved_core_slot(slot));
            assert_eq!(CoreException::from_slot(slot), None);
        }
        assert_eq!(CoreException::from_slot(FIRST_IRQ_SLOT), None);
    }

    #[test]
    fn test_architecture_slots_fully_classified() {
        // Every slot 2..16 is either a handler slot or reserved, never both
        for slot in 2..FIRST_IRQ_SLOT {
            assert_ne!(
                CoreException::from_slot(slot).is_some(),
                is_reserved_core_slot(slot),
                "slot {}",
                slot
            );
        }
    }
}
