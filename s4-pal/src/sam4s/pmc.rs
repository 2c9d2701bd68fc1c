//! Power Management Controller (PMC)
//!
//! Register layout for the clock generator (main oscillator, PLLB) and the
//! master clock selection, plus the peripheral clock enables.
//!
//! CKGR_MOR is write-protected: every write must carry `KEY = 0x37` or the
//! controller silently drops it.

use tock_registers::{
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

use super::irq::Irq;

register_bitfields![u32,
    /// Main Oscillator Register
    pub CKGR_MOR [
        /// Main crystal oscillator enable
        MOSCXTEN OFFSET(0) NUMBITS(1) [],
        /// Main crystal oscillator bypass
        MOSCXTBY OFFSET(1) NUMBITS(1) [],
        /// Main on-chip RC oscillator enable
        MOSCRCEN OFFSET(3) NUMBITS(1) [],
        /// Main on-chip RC oscillator frequency selection
        MOSCRCF OFFSET(4) NUMBITS(3) [
            Rc4Mhz = 0,
            Rc8Mhz = 1,
            Rc12Mhz = 2
        ],
        /// Main crystal oscillator start-up time (× 8 slow clock cycles)
        MOSCXTST OFFSET(8) NUMBITS(8) [],
        /// Write access password
        KEY OFFSET(16) NUMBITS(8) [
            Passwd = 0x37
        ],
        /// Main oscillator selection (0 = RC, 1 = crystal)
        MOSCSEL OFFSET(24) NUMBITS(1) [],
        /// Clock failure detector enable
        CFDEN OFFSET(25) NUMBITS(1) []
    ],

    /// PLLB Register
    pub CKGR_PLLBR [
        /// Divider (0 = output off)
        DIVB OFFSET(0) NUMBITS(8) [],
        /// Lock counter (× 8 slow clock cycles)
        PLLBCOUNT OFFSET(8) NUMBITS(6) [],
        /// Multiplier (PLL output = input × (MULB + 1) / DIVB, 0 = PLL off)
        MULB OFFSET(16) NUMBITS(11) []
    ],

    /// Master Clock Register
    pub PMC_MCKR [
        /// Master clock source selection
        CSS OFFSET(0) NUMBITS(2) [
            SlowClk = 0,
            MainClk = 1,
            PllaClk = 2,
            PllbClk = 3
        ],
        /// Processor clock prescaler
        PRES OFFSET(4) NUMBITS(3) [
            Clk1 = 0,
            Clk2 = 1,
            Clk4 = 2,
            Clk8 = 3,
            Clk16 = 4,
            Clk32 = 5,
            Clk64 = 6,
            Clk3 = 7
        ],
        /// PLLA divide-by-2
        PLLADIV2 OFFSET(12) NUMBITS(1) [],
        /// PLLB divide-by-2
        PLLBDIV2 OFFSET(13) NUMBITS(1) []
    ],

    /// Status Register
    pub PMC_SR [
        /// Main crystal oscillator stabilised
        MOSCXTS OFFSET(0) NUMBITS(1) [],
        /// PLLA locked
        LOCKA OFFSET(1) NUMBITS(1) [],
        /// PLLB locked
        LOCKB OFFSET(2) NUMBITS(1) [],
        /// Master clock ready
        MCKRDY OFFSET(3) NUMBITS(1) [],
        /// Main oscillator selection done
        MOSCSELS OFFSET(16) NUMBITS(1) [],
        /// Main RC oscillator stabilised
        MOSCRCS OFFSET(17) NUMBITS(1) []
    ]
];

register_structs! {
    /// PMC register block (up to the status register)
    pub PmcRegisters {
        (0x00 => pub scer: WriteOnly<u32>),
        (0x04 => pub scdr: WriteOnly<u32>),
        (0x08 => pub scsr: ReadOnly<u32>),
        (0x0C => _reserved0),
        (0x10 => pub pcer0: WriteOnly<u32>),
        (0x14 => pub pcdr0: WriteOnly<u32>),
        (0x18 => pub pcsr0: ReadOnly<u32>),
        (0x1C => _reserved1),
        (0x20 => pub ckgr_mor: ReadWrite<u32, CKGR_MOR::Register>),
        (0x24 => pub ckgr_mcfr: ReadOnly<u32>),
        (0x28 => pub ckgr_pllar: ReadWrite<u32>),
        (0x2C => pub ckgr_pllbr: ReadWrite<u32, CKGR_PLLBR::Register>),
        (0x30 => pub pmc_mckr: ReadWrite<u32, PMC_MCKR::Register>),
        (0x34 => _reserved2),
        (0x68 => pub pmc_sr: ReadOnly<u32, PMC_SR::Register>),
        (0x6C => @END),
    }
}

/// PCER0 bit enabling the clock of peripheral `irq`.
///
/// PCER0 covers IDs 0..31; IDs 0..7 are always clocked and ignore it.
#[must_use]
pub const fn pcer0_bit(irq: Irq) -> Option<u32> {
    let id = irq.id();
    if id >= 8 && id < 32 { Some(1 << id) } else { None }
}
