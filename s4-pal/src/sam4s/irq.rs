//! SAM4S Peripheral Interrupt Map
//!
//! Peripheral identifiers double as interrupt numbers: peripheral `n`
//! signals through vector slot `16 + n`. IDs 16 and 17 are unused on the
//! whole family.

use core::fmt;

/// Number of device interrupt slots in the vector table
pub const IRQ_SLOTS: usize = 35;

/// SAM4S peripheral interrupts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Irq {
    Supc = 0,
    Rstc = 1,
    Rtc = 2,
    Rtt = 3,
    Wdt = 4,
    Pmc = 5,
    Efc0 = 6,
    Efc1 = 7,
    Uart0 = 8,
    Uart1 = 9,
    Smc = 10,
    Pioa = 11,
    Piob = 12,
    Pioc = 13,
    Usart0 = 14,
    Usart1 = 15,
    Hsmci = 18,
    Twi0 = 19,
    Twi1 = 20,
    Spi = 21,
    Ssc = 22,
    Tc0 = 23,
    Tc1 = 24,
    Tc2 = 25,
    Tc3 = 26,
    Tc4 = 27,
    Tc5 = 28,
    Adc = 29,
    Dacc = 30,
    Pwm = 31,
    Crccu = 32,
    Acc = 33,
    Udp = 34,
}

impl Irq {
    /// Every peripheral interrupt, in ID order
    pub const ALL: [Irq; 33] = [
        Self::Supc,
        Self::Rstc,
        Self::Rtc,
        Self::Rtt,
        Self::Wdt,
        Self::Pmc,
        Self::Efc0,
        Self::Efc1,
        Self::Uart0,
        Self::Uart1,
        Self::Smc,
        Self::Pioa,
        Self::Piob,
        Self::Pioc,
        Self::Usart0,
        Self::Usart1,
        Self::Hsmci,
        Self::Twi0,
        Self::Twi1,
        Self::Spi,
        Self::Ssc,
        Self::Tc0,
        Self::Tc1,
        Self::Tc2,
        Self::Tc3,
        Self::Tc4,
        Self::Tc5,
        Self::Adc,
        Self::Dacc,
        Self::Pwm,
        Self::Crccu,
        Self::Acc,
        Self::Udp,
    ];

    /// Peripheral identifier (interrupt number)
    #[must_use]
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Vector table slot for this interrupt
    #[must_use]
    pub const fn slot(self) -> usize {
        16 + self.id()
    }

    #[must_use]
    pub const fn from_id(id: usize) -> Option<Self> {
        let mut i = 0;
        while i < Self::ALL.len() {
            if Self::ALL[i].id() == id {
                return Some(Self::ALL[i]);
            }
            i += 1;
        }
        None
    }

    /// Whether the peripheral exists only on some family members
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(
            self,
            Self::Efc1
                | Self::Pioc
                | Self::Usart1
                | Self::Hsmci
                | Self::Tc3
                | Self::Tc4
                | Self::Tc5
                | Self::Dacc
        )
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Supc => "SUPC",
            Self::Rstc => "RSTC",
            Self::Rtc => "RTC",
            Self::Rtt => "RTT",
            Self::Wdt => "WDT",
            Self::Pmc => "PMC",
            Self::Efc0 => "EFC0",
            Self::Efc1 => "EFC1",
            Self::Uart0 => "UART0",
            Self::Uart1 => "UART1",
            Self::Smc => "SMC",
            Self::Pioa => "PIOA",
            Self::Piob => "PIOB",
            Self::Pioc => "PIOC",
            Self::Usart0 => "USART0",
            Self::Usart1 => "USART1",
            Self::Hsmci => "HSMCI",
            Self::Twi0 => "TWI0",
            Self::Twi1 => "TWI1",
            Self::Spi => "SPI",
            Self::Ssc => "SSC",
            Self::Tc0 => "TC0",
            Self::Tc1 => "TC1",
            Self::Tc2 => "TC2",
            Self::Tc3 => "TC3",
            Self::Tc4 => "TC4",
            Self::Tc5 => "TC5",
            Self::Adc => "ADC",
            Self::Dacc => "DACC",
            Self::Pwm => "PWM",
            Self::Crccu => "CRCCU",
            Self::Acc => "ACC",
            Self::Udp => "UDP",
        }
    }
}

impl fmt::Display for Irq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique_and_in_range() {
        let mut seen = [false; IRQ_SLOTS];
        for irq in Irq::ALL {
            assert!(irq.id() < IRQ_SLOTS);
            assert!(!seen[irq.id()], "{} listed twice", irq);
            seen[irq.id()] = true;
        }
        // Only the two family-wide holes remain
        for (id, used) in seen.iter().enumerate() {
            assert_eq!(*used, id != 16 && id != 17, "id {}", id);
        }
    }

    #[test]
    fn test_from_id_roundtrip() {
        for irq in Irq::ALL {
            assert_eq!(Irq::from_id(irq.id()), Some(irq));
        }
        assert_eq!(Irq::from_id(16), None);
        assert_eq!(Irq::from_id(17), None);
        assert_eq!(Irq::from_id(IRQ_SLOTS), None);
    }

    #[test]
    fn test_slots() {
        assert_eq!(Irq::Supc.slot(), 16);
        assert_eq!(Irq::Uart0.slot(), 24);
        assert_eq!(Irq::Udp.slot(), 50);
    }
}
