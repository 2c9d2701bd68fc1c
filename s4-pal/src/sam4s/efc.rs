//! Enhanced Embedded Flash Controller (EEFC)
//!
//! Only the flash mode register matters at boot: the number of wait states
//! must cover the fastest clock the core is about to run at.

use tock_registers::{
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

register_bitfields![u32,
    /// EEFC Flash Mode Register
    pub EEFC_FMR [
        /// Flash ready interrupt enable
        FRDY OFFSET(0) NUMBITS(1) [],
        /// Flash wait states (cycles = FWS + 1)
        FWS OFFSET(8) NUMBITS(4) [],
        /// Sequential code optimisation disable
        SCOD OFFSET(16) NUMBITS(1) [],
        /// Flash access mode
        FAM OFFSET(24) NUMBITS(1) [],
        /// Code loop optimisation enable
        CLOE OFFSET(26) NUMBITS(1) []
    ]
];

register_structs! {
    /// EEFC register block
    pub EfcRegisters {
        (0x00 => pub fmr: ReadWrite<u32, EEFC_FMR::Register>),
        (0x04 => pub fcr: WriteOnly<u32>),
        (0x08 => pub fsr: ReadOnly<u32>),
        (0x0C => pub frr: ReadOnly<u32>),
        (0x10 => @END),
    }
}

/// Largest wait-state count the FWS field can hold
pub const MAX_WAIT_STATES: u8 = 15;

/// FMR value selecting `wait_states`, everything else at reset default
#[must_use]
pub fn fmr_value(wait_states: u8) -> u32 {
    EEFC_FMR::FWS.val(u32::from(wait_states)).value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmr_five_wait_states() {
        assert_eq!(fmr_value(5), 0x500);
    }

    #[test]
    fn test_fmr_field_is_masked() {
        assert_eq!(fmr_value(MAX_WAIT_STATES), 0xF00);
    }
}
