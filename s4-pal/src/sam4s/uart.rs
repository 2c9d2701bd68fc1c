//! Universal Asynchronous Receiver Transmitter (UART)
//!
//! Two-pin UART used for the early console. Only transmission is driven.
//! The baud rate generator divides the master clock by `16 × CD`.

use core::fmt;

use tock_registers::{
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

use crate::frequency::Hertz;

register_bitfields![u32,
    /// Control Register
    pub UART_CR [
        /// Reset receiver
        RSTRX OFFSET(2) NUMBITS(1) [],
        /// Reset transmitter
        RSTTX OFFSET(3) NUMBITS(1) [],
        /// Receiver enable
        RXEN OFFSET(4) NUMBITS(1) [],
        /// Receiver disable
        RXDIS OFFSET(5) NUMBITS(1) [],
        /// Transmitter enable
        TXEN OFFSET(6) NUMBITS(1) [],
        /// Transmitter disable
        TXDIS OFFSET(7) NUMBITS(1) [],
        /// Reset status bits
        RSTSTA OFFSET(8) NUMBITS(1) []
    ],

    /// Mode Register
    pub UART_MR [
        /// Parity type
        PAR OFFSET(9) NUMBITS(3) [
            Even = 0,
            Odd = 1,
            Space = 2,
            Mark = 3,
            No = 4
        ],
        /// Channel mode
        CHMODE OFFSET(14) NUMBITS(2) [
            Normal = 0,
            Automatic = 1,
            LocalLoopback = 2,
            RemoteLoopback = 3
        ]
    ],

    /// Status Register
    pub UART_SR [
        /// Receiver ready
        RXRDY OFFSET(0) NUMBITS(1) [],
        /// Transmitter ready
        TXRDY OFFSET(1) NUMBITS(1) [],
        /// Overrun error
        OVRE OFFSET(5) NUMBITS(1) [],
        /// Framing error
        FRAME OFFSET(6) NUMBITS(1) [],
        /// Parity error
        PARE OFFSET(7) NUMBITS(1) [],
        /// Transmitter empty
        TXEMPTY OFFSET(9) NUMBITS(1) []
    ],

    /// Baud Rate Generator Register
    pub UART_BRGR [
        /// Clock divisor (0 = baud clock disabled)
        CD OFFSET(0) NUMBITS(16) []
    ]
];

register_structs! {
    /// UART register block
    pub UartRegisters {
        (0x00 => pub cr: WriteOnly<u32, UART_CR::Register>),
        (0x04 => pub mr: ReadWrite<u32, UART_MR::Register>),
        (0x08 => pub ier: WriteOnly<u32>),
        (0x0C => pub idr: WriteOnly<u32>),
        (0x10 => pub imr: ReadOnly<u32>),
        (0x14 => pub sr: ReadOnly<u32, UART_SR::Register>),
        (0x18 => pub rhr: ReadOnly<u32>),
        (0x1C => pub thr: WriteOnly<u32>),
        (0x20 => pub brgr: ReadWrite<u32, UART_BRGR::Register>),
        (0x24 => @END),
    }
}

/// UART errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// No 16-bit divisor produces this baud rate from this clock
    InvalidBaud { mck: Hertz, baud: u32 },
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaud { mck, baud } => {
                write!(f, "baud rate {} unreachable from {}", baud, mck)
            }
        }
    }
}

/// Baud rate divisor: `round(mck / (16 × baud))`.
///
/// A result of 0 would switch the baud clock off and anything above
/// 16 bits does not fit CD, so both are rejected.
pub fn baud_divisor(mck: Hertz, baud: u32) -> Result<u16, ConsoleError> {
    let err = ConsoleError::InvalidBaud { mck, baud };
    let sample = u64::from(baud) * 16;
    if sample == 0 {
        return Err(err);
    }
    let cd = (u64::from(mck.raw()) + sample / 2) / sample;
    match u16::try_from(cd) {
        Ok(0) | Err(_) => Err(err),
        Ok(cd) => Ok(cd),
    }
}

/// Transmit side of one UART
pub struct Uart<'a> {
    regs: &'a UartRegisters,
}

impl<'a> Uart<'a> {
    #[must_use]
    pub const fn new(regs: &'a UartRegisters) -> Self {
        Self { regs }
    }

    /// Reset the channel and bring the transmitter up at 8N1 with `divisor`.
    pub fn configure(&self, divisor: u16) {
        self.regs.cr.write(
            UART_CR::RSTRX::SET + UART_CR::RSTTX::SET + UART_CR::RXDIS::SET + UART_CR::TXDIS::SET,
        );
        self.regs
            .mr
            .write(UART_MR::PAR::No + UART_MR::CHMODE::Normal);
        self.regs.brgr.write(UART_BRGR::CD.val(u32::from(divisor)));
        self.regs.cr.write(UART_CR::TXEN::SET);
    }

    /// Whether the holding register can take another byte
    #[must_use]
    pub fn tx_ready(&self) -> bool {
        self.regs.sr.is_set(UART_SR::TXRDY)
    }

    /// Wait for room and send one byte
    pub fn write_byte(&self, byte: u8) {
        while !self.tx_ready() {
            core::hint::spin_loop();
        }
        self.regs.thr.set(u32::from(byte));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C, align(4))]
    struct Block([u32; 9]);

    fn regs(block: &mut Block) -> &UartRegisters {
        // SAFETY: Block has the size and alignment of the register block and
        // every register is a transparent cell over a u32
        unsafe { &*(block.0.as_mut_ptr() as *const UartRegisters) }
    }

    #[test]
    fn test_divisor_at_120mhz() {
        // 120 MHz / (16 × 115200) = 65.1
        assert_eq!(baud_divisor(Hertz::mhz(120), 115_200), Ok(65));
    }

    #[test]
    fn test_divisor_rounds_to_nearest() {
        // 4 MHz / (16 × 9600) = 26.04
        assert_eq!(baud_divisor(Hertz::mhz(4), 9_600), Ok(26));
        // 12 MHz / (16 × 115200) = 6.51
        assert_eq!(baud_divisor(Hertz::mhz(12), 115_200), Ok(7));
    }

    #[test]
    fn test_divisor_out_of_range() {
        assert!(baud_divisor(Hertz::mhz(4), 1_000_000).is_err());
        assert!(baud_divisor(Hertz::mhz(120), 0).is_err());
        assert!(baud_divisor(Hertz::mhz(120), 100).is_err());
    }

    #[test]
    fn test_configure_programs_transmitter() {
        let mut block = Block([0; 9]);
        Uart::new(regs(&mut block)).configure(65);
        // Last CR write enables the transmitter
        assert_eq!(block.0[0], 1 << 6);
        assert_eq!(block.0[1], 4 << 9);
        assert_eq!(block.0[8], 65);
    }

    #[test]
    fn test_write_byte_lands_in_thr() {
        let mut block = Block([0; 9]);
        block.0[5] = 1 << 1; // TXRDY
        Uart::new(regs(&mut block)).write_byte(b'A');
        assert_eq!(block.0[7], u32::from(b'A'));
    }
}
