//! Clock Bring-Up
//!
//! Moves the SAM4S from the 4 MHz RC oscillator it resets on to PLLB
//! running off the 12 MHz crystal. Every transition writes one register
//! and then waits for a ready bit in PMC_SR:
//!
//! ```text
//!  1 RcDefault          running from the RC oscillator
//!  2 FlashWaitConfig    EEFC_FMR.FWS on every bank (before any speed-up)
//!  3 MainOscEnable      CKGR_MOR crystal on          wait MOSCXTS
//!  4 MainOscSelect      CKGR_MOR main = crystal      wait MOSCSELS
//!  5 SystemClockToMain  PMC_MCKR.CSS = MAIN          wait MCKRDY
//!  6 PllConfigure       CKGR_PLLBR mul/div/count     wait LOCKB
//!  7 SystemClockToPll   PMC_MCKR = MAIN, then PLLB   wait MCKRDY (each)
//!  8 Done               frequency published
//! ```
//!
//! Step 3 only acts if the crystal is not already the main clock source
//! (CKGR_MOR.MOSCSEL clear when it is entered). Step 4 always writes the
//! selection and waits for MOSCSELS.
//!
//! The machine is driven through [`ClockRegisters`] so a simulated register
//! file can stand in for the PMC. Waits use [`wait_until`] with the
//! machine's [`PollLimit`]: firmware passes [`PollLimit::Unbounded`] and
//! hangs on a dead crystal or PLL, tests pass a bound and observe
//! [`ClockError::Stalled`] instead.

use core::fmt;

use s4_mmio::{PollLimit, WaitTimeout, wait_until};
use tock_registers::{
    LocalRegisterCopy,
    fields::Field,
    interfaces::{Readable, Writeable},
};

use crate::config;
use crate::frequency::{AlreadyPublished, CORE_CLOCK, CoreClock, Hertz};
use crate::sam4s::efc::{self, EfcRegisters};
use crate::sam4s::pmc::{CKGR_MOR, CKGR_PLLBR, PMC_MCKR, PMC_SR, PmcRegisters};
use crate::sam4s::{EFC0_BASE, EFC1_BASE, PMC_BASE, Variant};

/// Fastest master clock the SAM4S is rated for
pub const MAX_MCK: Hertz = Hertz::mhz(120);

/// Bring-up stages, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClockStage {
    RcDefault,
    FlashWaitConfig,
    MainOscEnable,
    MainOscSelect,
    SystemClockToMain,
    PllConfigure,
    SystemClockToPll,
    Done,
}

impl ClockStage {
    pub const ALL: [ClockStage; 8] = [
        Self::RcDefault,
        Self::FlashWaitConfig,
        Self::MainOscEnable,
        Self::MainOscSelect,
        Self::SystemClockToMain,
        Self::PllConfigure,
        Self::SystemClockToPll,
        Self::Done,
    ];

    /// Stage number, 1 to 8
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::RcDefault => Some(Self::FlashWaitConfig),
            Self::FlashWaitConfig => Some(Self::MainOscEnable),
            Self::MainOscEnable => Some(Self::MainOscSelect),
            Self::MainOscSelect => Some(Self::SystemClockToMain),
            Self::SystemClockToMain => Some(Self::PllConfigure),
            Self::PllConfigure => Some(Self::SystemClockToPll),
            Self::SystemClockToPll => Some(Self::Done),
            Self::Done => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RcDefault => "rc-default",
            Self::FlashWaitConfig => "flash-wait-config",
            Self::MainOscEnable => "main-osc-enable",
            Self::MainOscSelect => "main-osc-select",
            Self::SystemClockToMain => "sysclk-to-main",
            Self::PllConfigure => "pll-configure",
            Self::SystemClockToPll => "sysclk-to-pll",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ClockStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clock bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The configuration cannot be programmed or drives the part past its ratings
    InvalidConfig(&'static str),
    /// A ready bit never arrived within a bounded wait
    Stalled {
        stage: ClockStage,
        timeout: WaitTimeout,
    },
    /// Another bring-up already published the core clock
    AlreadyPublished(Hertz),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid clock configuration: {}", reason),
            Self::Stalled { stage, timeout } => write!(f, "clock stalled in {}: {}", stage, timeout),
            Self::AlreadyPublished(hz) => write!(f, "core clock already published as {}", hz),
        }
    }
}

impl From<AlreadyPublished> for ClockError {
    fn from(e: AlreadyPublished) -> Self {
        Self::AlreadyPublished(e.0)
    }
}

/// Oscillator, PLL and flash settings for one bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    pub crystal: Hertz,
    pub rc_default: Hertz,
    pub flash_wait_states: u8,
    /// Crystal start-up time (CKGR_MOR.MOSCXTST)
    pub startup_time: u8,
    /// PLLB multiplier field; the PLL multiplies by `pll_mul + 1`
    pub pll_mul: u16,
    pub pll_div: u8,
    /// PLLB lock counter (CKGR_PLLBR.PLLBCOUNT)
    pub pll_count: u8,
    /// Flash controllers that need wait states programmed
    pub flash_banks: usize,
}

impl ClockConfig {
    /// Board defaults for `variant`
    #[must_use]
    pub const fn for_variant(variant: &Variant) -> Self {
        Self {
            crystal: config::CRYSTAL,
            rc_default: config::RC_DEFAULT,
            flash_wait_states: config::FLASH_WAIT_STATES,
            startup_time: config::MAIN_OSC_STARTUP,
            pll_mul: config::PLLB_MUL,
            pll_div: config::PLLB_DIV,
            pll_count: config::PLLB_COUNT,
            flash_banks: variant.flash_banks(),
        }
    }

    /// PLLB output frequency, which becomes the master clock
    #[must_use]
    pub const fn target(&self) -> Hertz {
        if self.pll_div == 0 {
            return Hertz(0);
        }
        let hz = self.crystal.raw() as u64 * (self.pll_mul as u64 + 1) / self.pll_div as u64;
        if hz > u32::MAX as u64 {
            Hertz(u32::MAX)
        } else {
            Hertz(hz as u32)
        }
    }

    /// Check every field fits its register and the result stays within the part ratings.
    pub fn validate(&self) -> Result<Hertz, ClockError> {
        if self.pll_div == 0 {
            return Err(ClockError::InvalidConfig("PLL divider is zero"));
        }
        if self.pll_mul == 0 {
            return Err(ClockError::InvalidConfig("PLL multiplier is zero (PLL disabled)"));
        }
        if self.pll_mul > 0x7FF {
            return Err(ClockError::InvalidConfig("PLL multiplier exceeds MULB"));
        }
        if self.pll_count > 0x3F {
            return Err(ClockError::InvalidConfig("PLL lock count exceeds PLLBCOUNT"));
        }
        if self.flash_wait_states > efc::MAX_WAIT_STATES {
            return Err(ClockError::InvalidConfig("flash wait states exceed FWS"));
        }
        if !(1..=2).contains(&self.flash_banks) {
            return Err(ClockError::InvalidConfig("SAM4S has one or two flash banks"));
        }
        let target = self.target();
        if target > MAX_MCK {
            return Err(ClockError::InvalidConfig("target frequency above 120 MHz"));
        }
        Ok(target)
    }

    fn osc_enable(&self) -> u32 {
        (CKGR_MOR::KEY::Passwd
            + CKGR_MOR::MOSCXTST.val(u32::from(self.startup_time))
            + CKGR_MOR::MOSCRCEN::SET
            + CKGR_MOR::MOSCXTEN::SET)
            .value
    }

    fn osc_select(&self) -> u32 {
        self.osc_enable() | CKGR_MOR::MOSCSEL::SET.value
    }

    fn pllbr(&self) -> u32 {
        (CKGR_PLLBR::MULB.val(u32::from(self.pll_mul))
            + CKGR_PLLBR::PLLBCOUNT.val(u32::from(self.pll_count))
            + CKGR_PLLBR::DIVB.val(u32::from(self.pll_div)))
        .value
    }
}

/// Registers the bring-up reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockRegister {
    /// EEFC_FMR of flash bank `n`
    FlashMode(usize),
    /// CKGR_MOR
    MainOscillator,
    /// CKGR_PLLBR
    PllB,
    /// PMC_MCKR
    MasterClock,
    /// PMC_SR (read-only)
    Status,
}

/// Access to the clock registers by name
pub trait ClockRegisters {
    fn read(&self, reg: ClockRegister) -> u32;

    fn write(&mut self, reg: ClockRegister, value: u32);
}

/// The real PMC and EEFC register blocks
pub struct Sam4sClockRegisters {
    pmc: usize,
    efc: [usize; 2],
}

impl Sam4sClockRegisters {
    /// # Safety
    ///
    /// Must only be used on a SAM4S, by the single owner of the PMC and the
    /// flash controllers.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            pmc: PMC_BASE,
            efc: [EFC0_BASE, EFC1_BASE],
        }
    }

    fn pmc(&self) -> &PmcRegisters {
        // SAFETY: PMC_BASE is the PMC register block, guaranteed by new()
        unsafe { &*(self.pmc as *const PmcRegisters) }
    }

    fn efc(&self, bank: usize) -> Option<&EfcRegisters> {
        // SAFETY: Both addresses are EEFC register blocks, guaranteed by new()
        self.efc
            .get(bank)
            .map(|&base| unsafe { &*(base as *const EfcRegisters) })
    }
}

impl ClockRegisters for Sam4sClockRegisters {
    fn read(&self, reg: ClockRegister) -> u32 {
        let pmc = self.pmc();
        match reg {
            ClockRegister::FlashMode(bank) => self.efc(bank).map_or(0, |efc| efc.fmr.get()),
            ClockRegister::MainOscillator => pmc.ckgr_mor.get(),
            ClockRegister::PllB => pmc.ckgr_pllbr.get(),
            ClockRegister::MasterClock => pmc.pmc_mckr.get(),
            ClockRegister::Status => pmc.pmc_sr.get(),
        }
    }

    fn write(&mut self, reg: ClockRegister, value: u32) {
        let pmc = self.pmc();
        match reg {
            ClockRegister::FlashMode(bank) => {
                if let Some(efc) = self.efc(bank) {
                    efc.fmr.set(value);
                    // New wait states must be in effect before the clock speeds up
                    s4_mmio::dsb();
                    s4_mmio::isb();
                }
            }
            ClockRegister::MainOscillator => pmc.ckgr_mor.set(value),
            ClockRegister::PllB => pmc.ckgr_pllbr.set(value),
            ClockRegister::MasterClock => pmc.pmc_mckr.set(value),
            ClockRegister::Status => {}
        }
    }
}

/// Clock bring-up state machine
pub struct ClockMachine<'c, R: ClockRegisters> {
    regs: R,
    config: ClockConfig,
    target: Hertz,
    clock: &'c CoreClock,
    limit: PollLimit,
    stage: ClockStage,
    failed: Option<ClockError>,
}

impl<'c, R: ClockRegisters> ClockMachine<'c, R> {
    /// Validate `config` and start in [`ClockStage::RcDefault`].
    pub fn new(
        regs: R,
        config: ClockConfig,
        clock: &'c CoreClock,
        limit: PollLimit,
    ) -> Result<Self, ClockError> {
        let target = config.validate()?;
        Ok(Self {
            regs,
            config,
            target,
            clock,
            limit,
            stage: ClockStage::RcDefault,
            failed: None,
        })
    }

    /// Stage most recently entered
    #[must_use]
    pub fn stage(&self) -> ClockStage {
        self.stage
    }

    /// Frequency published on reaching [`ClockStage::Done`]
    #[must_use]
    pub fn target(&self) -> Hertz {
        self.target
    }

    #[must_use]
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Enter the next stage and perform its action.
    ///
    /// Returns the stage entered. Once [`ClockStage::Done`] is reached
    /// further calls do nothing. After a failure the machine stays where
    /// it failed and every call reports the same error. A stall leaves it
    /// in the stalled stage; [`ClockStage::Done`] is only entered once the
    /// frequency has been published.
    pub fn step(&mut self) -> Result<ClockStage, ClockError> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        let Some(next) = self.stage.next() else {
            return Ok(self.stage);
        };

        if next != ClockStage::Done {
            self.stage = next;
        }
        log::trace!("clock: entering {} ({}/8)", next, next.number());

        if let Err(e) = self.enter(next) {
            self.failed = Some(e);
            return Err(e);
        }
        self.stage = next;
        Ok(next)
    }

    /// Step until [`ClockStage::Done`], returning the published frequency.
    pub fn run(&mut self) -> Result<Hertz, ClockError> {
        while self.stage != ClockStage::Done {
            self.step()?;
        }
        Ok(self.target)
    }

    fn enter(&mut self, stage: ClockStage) -> Result<(), ClockError> {
        match stage {
            ClockStage::RcDefault => {}
            ClockStage::FlashWaitConfig => {
                let fmr = efc::fmr_value(self.config.flash_wait_states);
                for bank in 0..self.config.flash_banks {
                    self.regs.write(ClockRegister::FlashMode(bank), fmr);
                }
            }
            ClockStage::MainOscEnable => {
                let mor = LocalRegisterCopy::<u32, CKGR_MOR::Register>::new(
                    self.regs.read(ClockRegister::MainOscillator),
                );
                // Already running from the crystal: nothing to start
                if !mor.is_set(CKGR_MOR::MOSCSEL) {
                    self.regs
                        .write(ClockRegister::MainOscillator, self.config.osc_enable());
                    self.wait(stage, PMC_SR::MOSCXTS)?;
                }
            }
            ClockStage::MainOscSelect => {
                self.regs
                    .write(ClockRegister::MainOscillator, self.config.osc_select());
                self.wait(stage, PMC_SR::MOSCSELS)?;
            }
            ClockStage::SystemClockToMain => {
                let mut mckr = LocalRegisterCopy::<u32, PMC_MCKR::Register>::new(
                    self.regs.read(ClockRegister::MasterClock),
                );
                mckr.modify(PMC_MCKR::CSS::MainClk);
                self.regs.write(ClockRegister::MasterClock, mckr.get());
                self.wait(stage, PMC_SR::MCKRDY)?;
            }
            ClockStage::PllConfigure => {
                self.regs.write(ClockRegister::PllB, self.config.pllbr());
                self.wait(stage, PMC_SR::LOCKB)?;
            }
            ClockStage::SystemClockToPll => {
                // Prescaler first while still on MAIN, then switch source
                self.regs.write(
                    ClockRegister::MasterClock,
                    (PMC_MCKR::PRES::Clk1 + PMC_MCKR::CSS::MainClk).value,
                );
                self.wait(stage, PMC_SR::MCKRDY)?;
                self.regs.write(
                    ClockRegister::MasterClock,
                    (PMC_MCKR::PRES::Clk1 + PMC_MCKR::CSS::PllbClk).value,
                );
                self.wait(stage, PMC_SR::MCKRDY)?;
            }
            ClockStage::Done => {
                self.clock.publish(self.target)?;
                log::info!("clock: core running at {}", self.target);
            }
        }
        Ok(())
    }

    fn wait(&self, stage: ClockStage, ready: Field<u32, PMC_SR::Register>) -> Result<(), ClockError> {
        let regs = &self.regs;
        wait_until(
            || LocalRegisterCopy::<u32, PMC_SR::Register>::new(regs.read(ClockRegister::Status)).is_set(ready),
            self.limit,
        )
        .map(|_| ())
        .map_err(|timeout| ClockError::Stalled { stage, timeout })
    }
}

/// Bring the real PMC up to `settings` and publish the result to
/// [`CORE_CLOCK`]. Never returns if the hardware never reports ready.
///
/// # Safety
///
/// Must run on a SAM4S, with nothing else touching the PMC or the flash
/// controllers for the duration.
pub unsafe fn bring_up(settings: ClockConfig) -> Result<Hertz, ClockError> {
    if let Some(hz) = CORE_CLOCK.get() {
        return Err(ClockError::AlreadyPublished(hz));
    }
    // SAFETY: Exclusive PMC and EEFC access is the caller's contract
    let regs = unsafe { Sam4sClockRegisters::new() };
    ClockMachine::new(regs, settings, &CORE_CLOCK, config::CLOCK_POLL_LIMIT)?.run()
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::sam4s::{SAM4S16C, SAM4SD32C};

    const MOSCXTS: u32 = 1 << 0;
    const LOCKB: u32 = 1 << 2;
    const MCKRDY: u32 = 1 << 3;
    const MOSCSELS: u32 = 1 << 16;

    const MAX_WRITES: usize = 16;

    /// PMC/EEFC stand-in raising status bits in response to writes
    struct SimPmc {
        fmr: [u32; 2],
        mor: u32,
        pllbr: u32,
        mckr: u32,
        sr: u32,
        /// Status bits that never assert
        dead: u32,
        /// MCKR value after which MCKRDY never asserts
        stuck_mckr: Option<u32>,
        writes: [(ClockRegister, u32); MAX_WRITES],
        count: usize,
        status_reads: Cell<usize>,
    }

    impl SimPmc {
        fn new() -> Self {
            Self {
                fmr: [0; 2],
                mor: 0x0000_0008, // RC on, RC selected
                pllbr: 0,
                mckr: 0x0000_0011, // PRES = /2, CSS = MAIN
                sr: MCKRDY,
                dead: 0,
                stuck_mckr: None,
                writes: [(ClockRegister::Status, 0); MAX_WRITES],
                count: 0,
                status_reads: Cell::new(0),
            }
        }

        fn dead(bits: u32) -> Self {
            Self {
                dead: bits,
                ..Self::new()
            }
        }

        fn writes(&self) -> &[(ClockRegister, u32)] {
            &self.writes[..self.count]
        }

        fn raise(&mut self, bit: u32) {
            if self.dead & bit == 0 {
                self.sr |= bit;
            }
        }
    }

    impl ClockRegisters for SimPmc {
        fn read(&self, reg: ClockRegister) -> u32 {
            match reg {
                ClockRegister::FlashMode(bank) => self.fmr[bank],
                ClockRegister::MainOscillator => self.mor,
                ClockRegister::PllB => self.pllbr,
                ClockRegister::MasterClock => self.mckr,
                ClockRegister::Status => {
                    self.status_reads.set(self.status_reads.get() + 1);
                    self.sr
                }
            }
        }

        fn write(&mut self, reg: ClockRegister, value: u32) {
            self.writes[self.count] = (reg, value);
            self.count += 1;
            match reg {
                ClockRegister::FlashMode(bank) => self.fmr[bank] = value,
                ClockRegister::MainOscillator => {
                    self.mor = value;
                    if value & 1 != 0 {
                        self.raise(MOSCXTS);
                    }
                    if value & (1 << 24) != 0 {
                        self.raise(MOSCSELS);
                    }
                }
                ClockRegister::PllB => {
                    self.pllbr = value;
                    if value & 0x07FF_0000 != 0 {
                        self.raise(LOCKB);
                    }
                }
                ClockRegister::MasterClock => {
                    self.mckr = value;
                    self.sr &= !MCKRDY;
                    if self.stuck_mckr != Some(value) {
                        self.raise(MCKRDY);
                    }
                }
                ClockRegister::Status => {}
            }
        }
    }

    fn machine(sim: SimPmc, clock: &CoreClock) -> ClockMachine<'_, SimPmc> {
        ClockMachine::new(
            sim,
            ClockConfig::for_variant(&SAM4S16C),
            clock,
            PollLimit::Attempts(32),
        )
        .unwrap()
    }

    #[test]
    fn test_board_config_targets_120mhz() {
        let config = ClockConfig::for_variant(&SAM4S16C);
        assert_eq!(config.validate(), Ok(Hertz::mhz(120)));
        assert_eq!(config.target(), config::F_CPU);
    }

    #[test]
    fn test_stages_entered_once_in_order() {
        let clock = CoreClock::new();
        let mut m = machine(SimPmc::new(), &clock);
        assert_eq!(m.stage(), ClockStage::RcDefault);
        for expected in &ClockStage::ALL[1..] {
            assert_eq!(m.step(), Ok(*expected));
            assert_eq!(m.stage(), *expected);
        }
        for (i, stage) in ClockStage::ALL.iter().enumerate() {
            assert_eq!(usize::from(stage.number()), i + 1);
        }
    }

    #[test]
    fn test_done_is_terminal() {
        let clock = CoreClock::new();
        let mut m = machine(SimPmc::new(), &clock);
        assert_eq!(m.run(), Ok(Hertz::mhz(120)));
        let writes = m.registers().count;
        assert_eq!(m.step(), Ok(ClockStage::Done));
        assert_eq!(m.registers().count, writes);
    }

    #[test]
    fn test_register_sequence() {
        let clock = CoreClock::new();
        let mut m = machine(SimPmc::new(), &clock);
        m.run().unwrap();
        assert_eq!(
            m.registers().writes(),
            &[
                (ClockRegister::FlashMode(0), 0x0000_0500),
                (ClockRegister::MainOscillator, 0x0037_0809),
                (ClockRegister::MainOscillator, 0x0137_0809),
                // Prescaler kept, source switched to MAIN
                (ClockRegister::MasterClock, 0x0000_0011),
                (ClockRegister::PllB, 0x001D_0103),
                (ClockRegister::MasterClock, 0x0000_0001),
                (ClockRegister::MasterClock, 0x0000_0003),
            ]
        );
    }

    #[test]
    fn test_publishes_target() {
        let clock = CoreClock::new();
        let mut m = machine(SimPmc::new(), &clock);
        assert_eq!(clock.hz(), Hertz::mhz(4));
        m.run().unwrap();
        assert_eq!(clock.get(), Some(Hertz::mhz(120)));
    }

    #[test]
    fn test_dual_bank_programs_both_flash_controllers() {
        let clock = CoreClock::new();
        let mut m = ClockMachine::new(
            SimPmc::new(),
            ClockConfig::for_variant(&SAM4SD32C),
            &clock,
            PollLimit::Attempts(32),
        )
        .unwrap();
        m.step().unwrap();
        assert_eq!(m.registers().fmr, [0x500, 0x500]);
        // Nothing else touched before the wait states are in place
        assert_eq!(m.registers().count, 2);
    }

    #[test]
    fn test_preselected_crystal_skips_oscillator_enable() {
        let clock = CoreClock::new();
        let mut sim = SimPmc::new();
        sim.mor = 0x0100_0001;
        let mut m = machine(sim, &clock);
        assert_eq!(m.run(), Ok(Hertz::mhz(120)));
        let mor_writes = m
            .registers()
            .writes()
            .iter()
            .filter(|(reg, _)| *reg == ClockRegister::MainOscillator)
            .count();
        assert_eq!(mor_writes, 1);
        assert_eq!(m.registers().writes()[1], (ClockRegister::MainOscillator, 0x0137_0809));
        assert_eq!(m.stage(), ClockStage::Done);
    }

    #[test]
    fn test_preselected_crystal_still_waits_for_selection() {
        let mut sim = SimPmc::dead(MOSCSELS);
        sim.mor = 0x0100_0001;
        assert_stalls_in(sim, ClockStage::MainOscSelect);
    }

    fn assert_stalls_in(sim: SimPmc, stalled: ClockStage) {
        let clock = CoreClock::new();
        let mut m = machine(sim, &clock);
        let expected = ClockError::Stalled {
            stage: stalled,
            timeout: WaitTimeout { attempts: 32 },
        };
        assert_eq!(m.run(), Err(expected));
        assert_eq!(m.stage(), stalled);
        assert!(!clock.is_published());
        assert_eq!(clock.hz(), Hertz::mhz(4));

        // No retries, no further register traffic
        let writes = m.registers().count;
        assert_eq!(m.step(), Err(expected));
        assert_eq!(m.stage(), stalled);
        assert_eq!(m.registers().count, writes);
    }

    #[test]
    fn test_crystal_never_stabilises() {
        assert_stalls_in(SimPmc::dead(MOSCXTS), ClockStage::MainOscEnable);
    }

    #[test]
    fn test_oscillator_switch_never_completes() {
        assert_stalls_in(SimPmc::dead(MOSCSELS), ClockStage::MainOscSelect);
    }

    #[test]
    fn test_master_clock_never_ready_on_main() {
        assert_stalls_in(SimPmc::dead(MCKRDY), ClockStage::SystemClockToMain);
    }

    #[test]
    fn test_pll_never_locks() {
        assert_stalls_in(SimPmc::dead(LOCKB), ClockStage::PllConfigure);
    }

    #[test]
    fn test_master_clock_never_ready_on_pll() {
        let mut sim = SimPmc::new();
        sim.stuck_mckr = Some(0x3);
        assert_stalls_in(sim, ClockStage::SystemClockToPll);
    }

    #[test]
    fn test_zero_attempts_stalls_without_polling() {
        let clock = CoreClock::new();
        let mut m = ClockMachine::new(
            SimPmc::new(),
            ClockConfig::for_variant(&SAM4S16C),
            &clock,
            PollLimit::Attempts(0),
        )
        .unwrap();
        assert_eq!(
            m.run(),
            Err(ClockError::Stalled {
                stage: ClockStage::MainOscEnable,
                timeout: WaitTimeout { attempts: 0 },
            })
        );
        assert_eq!(m.registers().status_reads.get(), 0);
    }

    #[test]
    fn test_second_bring_up_cannot_republish() {
        let clock = CoreClock::new();
        clock.publish(Hertz::mhz(48)).unwrap();
        let mut m = machine(SimPmc::new(), &clock);
        let failed = Err(ClockError::AlreadyPublished(Hertz::mhz(48)));
        assert_eq!(m.run(), failed);
        assert_eq!(clock.hz(), Hertz::mhz(48));

        // Never reports Done after the publish was refused
        assert_eq!(m.stage(), ClockStage::SystemClockToPll);
        let writes = m.registers().count;
        assert_eq!(m.step(), Err(ClockError::AlreadyPublished(Hertz::mhz(48))));
        assert_eq!(m.run(), failed);
        assert_eq!(m.stage(), ClockStage::SystemClockToPll);
        assert_eq!(m.registers().count, writes);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let base = ClockConfig::for_variant(&SAM4S16C);
        let cases = [
            ClockConfig { pll_div: 0, ..base },
            ClockConfig { pll_mul: 0, ..base },
            ClockConfig { pll_mul: 0x800, ..base },
            ClockConfig { pll_count: 0x40, ..base },
            ClockConfig { flash_wait_states: 16, ..base },
            ClockConfig { flash_banks: 0, ..base },
            ClockConfig { flash_banks: 3, ..base },
            // 12 MHz × 40 / 3 = 160 MHz
            ClockConfig { pll_mul: 39, ..base },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ClockError::InvalidConfig(_))),
                "{:?}",
                config
            );
            let clock = CoreClock::new();
            assert!(ClockMachine::new(SimPmc::new(), config, &clock, PollLimit::Attempts(1)).is_err());
        }
    }
}
