//! Parallel I/O Controller (PIO)
//!
//! Each controller drives 32 pins. Registers come in set/clear pairs, so
//! almost every operation is a single write of a pin mask.

use s4_mmio::MmioRegion;

/// PIO Enable Register
const PIO_PER: usize = 0x00;
/// PIO Disable Register (pin goes to its peripheral)
const PIO_PDR: usize = 0x04;
/// Output Enable Register
const PIO_OER: usize = 0x10;
/// Set Output Data Register
const PIO_SODR: usize = 0x30;
/// Clear Output Data Register
const PIO_CODR: usize = 0x34;
/// Pull-up Disable Register
const PIO_PUDR: usize = 0x60;
/// Output Write Enable Register
const PIO_OWER: usize = 0xA0;
/// Peripheral ABCD Select Register 1
const PIO_ABCDSR1: usize = 0x70;
/// Peripheral ABCD Select Register 2
const PIO_ABCDSR2: usize = 0x74;

/// Size of one PIO register block
pub const PIO_SIZE: usize = 0x200;

/// Peripheral function a pin can be handed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralFunction {
    A,
    B,
    C,
    D,
}

/// One PIO controller
#[derive(Debug, Clone, Copy)]
pub struct Pio {
    region: MmioRegion,
}

impl Pio {
    /// # Safety
    ///
    /// `base` must be the address of a PIO controller register block (or,
    /// in tests, of at least [`PIO_SIZE`] bytes of writable memory).
    #[must_use]
    pub const unsafe fn new(base: usize) -> Self {
        // SAFETY: Forwarded from the caller
        Self {
            region: unsafe { MmioRegion::new(base, PIO_SIZE) },
        }
    }

    /// Drive the pins in `mask` as plain outputs, initially low.
    ///
    /// Order: PIO control, output enable, direct ODSR writes allowed,
    /// pull-ups off, then cleared.
    pub fn configure_output(&self, mask: u32) {
        self.region.write32(PIO_PER, mask);
        self.region.write32(PIO_OER, mask);
        self.region.write32(PIO_OWER, mask);
        self.region.write32(PIO_PUDR, mask);
        self.region.write32(PIO_CODR, mask);
    }

    /// Hand the pins in `mask` to peripheral `function`.
    pub fn set_peripheral(&self, mask: u32, function: PeripheralFunction) {
        let (sel1, sel2) = match function {
            PeripheralFunction::A => (false, false),
            PeripheralFunction::B => (true, false),
            PeripheralFunction::C => (false, true),
            PeripheralFunction::D => (true, true),
        };
        for (offset, selected) in [(PIO_ABCDSR1, sel1), (PIO_ABCDSR2, sel2)] {
            if selected {
                self.region.set_bits32(offset, mask);
            } else {
                self.region.clear_bits32(offset, mask);
            }
        }
        self.region.write32(PIO_PDR, mask);
    }

    /// Drive the pins in `mask` high
    pub fn set(&self, mask: u32) {
        self.region.write32(PIO_SODR, mask);
    }
}

/// An on-board LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Led {
    pub port: usize,
    pub pin: u32,
}

impl Led {
    #[must_use]
    pub const fn new(port: usize, pin: u32) -> Self {
        Self { port, pin }
    }

    #[must_use]
    pub const fn mask(&self) -> u32 {
        1 << self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pio_over(regs: &mut [u32; PIO_SIZE / 4]) -> Pio {
        // SAFETY: The array outlives the Pio in every test
        unsafe { Pio::new(regs.as_mut_ptr() as usize) }
    }

    #[test]
    fn test_configure_output_writes_every_register() {
        let mut regs = [0u32; PIO_SIZE / 4];
        let mask = (1 << 10) | (1 << 17);
        pio_over(&mut regs).configure_output(mask);
        for offset in [PIO_PER, PIO_OER, PIO_OWER, PIO_PUDR, PIO_CODR] {
            assert_eq!(regs[offset / 4], mask, "offset {:#x}", offset);
        }
        assert_eq!(regs[PIO_PDR / 4], 0);
    }

    #[test]
    fn test_peripheral_a_clears_selects() {
        let mut regs = [0u32; PIO_SIZE / 4];
        regs[PIO_ABCDSR1 / 4] = 0xFFFF_FFFF;
        let mask = (1 << 9) | (1 << 10);
        pio_over(&mut regs).set_peripheral(mask, PeripheralFunction::A);
        assert_eq!(regs[PIO_ABCDSR1 / 4], !mask);
        assert_eq!(regs[PIO_ABCDSR2 / 4], 0);
        assert_eq!(regs[PIO_PDR / 4], mask);
    }

    #[test]
    fn test_peripheral_d_sets_both_selects() {
        let mut regs = [0u32; PIO_SIZE / 4];
        regs[PIO_ABCDSR1 / 4] = 1 << 3;
        let mask = 1 << 4;
        pio_over(&mut regs).set_peripheral(mask, PeripheralFunction::D);
        // Other pins keep their selection
        assert_eq!(regs[PIO_ABCDSR1 / 4], (1 << 3) | mask);
        assert_eq!(regs[PIO_ABCDSR2 / 4], mask);
        assert_eq!(regs[PIO_PDR / 4], mask);
    }

    #[test]
    fn test_set_drives_high() {
        let mut regs = [0u32; PIO_SIZE / 4];
        pio_over(&mut regs).set(1 << 10);
        assert_eq!(regs[PIO_SODR / 4], 1 << 10);
        assert_eq!(regs[PIO_CODR / 4], 0);
    }

    #[test]
    fn test_led_mask() {
        assert_eq!(Led::new(0, 17).mask(), 1 << 17);
    }
}
