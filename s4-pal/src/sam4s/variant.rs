//! SAM4S Family Variants
//!
//! Members of the family differ in which optional peripherals they carry.
//! A variant records that, and from it the set of live interrupt slots.

use super::irq::{IRQ_SLOTS, Irq};

/// Peripheral complement of one SAM4S part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    pub name: &'static str,
    /// Second flash bank controller
    pub efc1: bool,
    pub pioc: bool,
    pub usart1: bool,
    pub hsmci: bool,
    /// Second timer counter block (TC3..TC5)
    pub tc1: bool,
    pub dacc: bool,
}

/// SAM4S16C: single 1 MiB flash bank, 100-pin package
pub const SAM4S16C: Variant = Variant {
    name: "SAM4S16C",
    efc1: false,
    pioc: true,
    usart1: true,
    hsmci: true,
    tc1: true,
    dacc: true,
};

/// SAM4SD32C: two 1 MiB flash banks, 100-pin package
pub const SAM4SD32C: Variant = Variant {
    name: "SAM4SD32C",
    efc1: true,
    pioc: true,
    usart1: true,
    hsmci: true,
    tc1: true,
    dacc: true,
};

impl Variant {
    /// Whether this part has the peripheral behind `irq`
    #[must_use]
    pub const fn has(&self, irq: Irq) -> bool {
        if !irq.is_optional() {
            return true;
        }
        match irq {
            Irq::Efc1 => self.efc1,
            Irq::Pioc => self.pioc,
            Irq::Usart1 => self.usart1,
            Irq::Hsmci => self.hsmci,
            Irq::Tc3 | Irq::Tc4 | Irq::Tc5 => self.tc1,
            Irq::Dacc => self.dacc,
            _ => false,
        }
    }

    /// Per-slot presence mask, indexed by interrupt number
    #[must_use]
    pub const fn irq_present(&self) -> [bool; IRQ_SLOTS] {
        let mut present = [false; IRQ_SLOTS];
        let mut i = 0;
        while i < Irq::ALL.len() {
            let irq = Irq::ALL[i];
            present[irq.id()] = self.has(irq);
            i += 1;
        }
        present
    }

    /// Number of embedded flash controllers to configure
    #[must_use]
    pub const fn flash_banks(&self) -> usize {
        if self.efc1 { 2 } else { 1 }
    }
}
