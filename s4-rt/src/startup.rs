//! Reset Sequence
//!
//! What runs between the reset vector and the kernel:
//!
//! ```text
//! Reset → CopyData → ZeroBss → BoardInit → RuntimeInit → KernelStart
//! ```
//!
//! Each stage runs exactly once and in this order. Until `ZeroBss` has
//! finished no `static` may be trusted, so nothing logs before `BoardInit`
//! (which is also what brings the console up).
//!
//! The sequencer takes the memory layout and the memory bus as values and
//! calls out to [`BootHooks`] for everything board- or kernel-specific.

use core::fmt;

use s4_common::MemoryLayout;

use crate::memory::{self, MemoryBus};

/// Position in the reset sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootStage {
    Reset,
    CopyData,
    ZeroBss,
    BoardInit,
    RuntimeInit,
    KernelStart,
}

impl BootStage {
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Reset => Some(Self::CopyData),
            Self::CopyData => Some(Self::ZeroBss),
            Self::ZeroBss => Some(Self::BoardInit),
            Self::BoardInit => Some(Self::RuntimeInit),
            Self::RuntimeInit => Some(Self::KernelStart),
            Self::KernelStart => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::CopyData => "copy-data",
            Self::ZeroBss => "zero-bss",
            Self::BoardInit => "board-init",
            Self::RuntimeInit => "runtime-init",
            Self::KernelStart => "kernel-start",
        }
    }
}

impl fmt::Display for BootStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Board and kernel collaborators of the reset sequence
pub trait BootHooks {
    /// Clocks, CPU and board peripherals. RAM is ready when this runs.
    fn board_init(&mut self);

    /// Language runtime initialisers (static constructors).
    fn runtime_init(&mut self);

    /// Hand over to the kernel. Never returns.
    fn kernel_start(&mut self) -> !;
}

/// Drives the reset sequence over a memory bus
pub struct Sequencer<B: MemoryBus, H: BootHooks> {
    layout: MemoryLayout,
    bus: B,
    hooks: H,
    stage: BootStage,
}

impl<B: MemoryBus, H: BootHooks> Sequencer<B, H> {
    #[must_use]
    pub fn new(layout: MemoryLayout, bus: B, hooks: H) -> Self {
        Self {
            layout,
            bus,
            hooks,
            stage: BootStage::Reset,
        }
    }

    /// Last stage completed
    #[must_use]
    pub fn stage(&self) -> BootStage {
        self.stage
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    #[must_use]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Run everything up to and including `RuntimeInit`.
    ///
    /// # Panics
    ///
    /// Panics if called a second time: re-copying `.data` or re-clearing
    /// `.bss` under live code would corrupt it.
    pub fn prepare(&mut self) {
        assert!(
            self.stage == BootStage::Reset,
            "reset sequence already ran up to {}",
            self.stage
        );

        memory::copy_data(&self.bus, &self.layout);
        self.stage = BootStage::CopyData;

        memory::zero_bss(&self.bus, &self.layout);
        self.stage = BootStage::ZeroBss;

        self.hooks.board_init();
        self.stage = BootStage::BoardInit;
        log::debug!(
            "startup: .data {} bytes, .bss {} bytes, stack top {:#010x}",
            self.layout.data.len(),
            self.layout.bss.len(),
            self.layout.stack_top
        );

        self.hooks.runtime_init();
        self.stage = BootStage::RuntimeInit;
    }

    /// Run the whole sequence and enter the kernel.
    pub fn start(mut self) -> ! {
        if self.stage == BootStage::Reset {
            self.prepare();
        }
        self.stage = BootStage::KernelStart;
        log::info!("startup: entering kernel");
        self.hooks.kernel_start()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use s4_common::{MemoryRegion, WORD_SIZE};

    use super::*;

    /// A small word-addressed RAM starting at address 0
    struct SimRam {
        words: RefCell<[u32; 64]>,
    }

    impl MemoryBus for SimRam {
        fn read_word(&self, addr: usize) -> u32 {
            self.words.borrow()[addr / WORD_SIZE]
        }

        fn write_word(&self, addr: usize, value: u32) {
            self.words.borrow_mut()[addr / WORD_SIZE] = value;
        }

        fn read_byte(&self, addr: usize) -> u8 {
            self.read_word(addr - addr % WORD_SIZE).to_le_bytes()[addr % WORD_SIZE]
        }

        fn write_byte(&self, addr: usize, value: u8) {
            let word = addr - addr % WORD_SIZE;
            let mut bytes = self.read_word(word).to_le_bytes();
            bytes[addr % WORD_SIZE] = value;
            self.write_word(word, u32::from_le_bytes(bytes));
        }
    }

    /// Records which hook ran at which step, and what RAM looked like
    struct Recorder<'a> {
        ram: &'a SimRam,
        clock: Cell<u32>,
        board_at: Option<u32>,
        runtime_at: Option<u32>,
        data_seen_by_board: u32,
        bss_seen_by_board: u32,
    }

    impl<'a> Recorder<'a> {
        fn new(ram: &'a SimRam) -> Self {
            Self {
                ram,
                clock: Cell::new(0),
                board_at: None,
                runtime_at: None,
                data_seen_by_board: 0,
                bss_seen_by_board: 0,
            }
        }

        fn tick(&self) -> u32 {
            let t = self.clock.get() + 1;
            self.clock.set(t);
            t
        }
    }

    impl BootHooks for Recorder<'_> {
        fn board_init(&mut self) {
            self.board_at = Some(self.tick());
            self.data_seen_by_board = self.ram.read_word(0x40);
            self.bss_seen_by_board = self.ram.read_word(0x80);
        }

        fn runtime_init(&mut self) {
            self.runtime_at = Some(self.tick());
        }

        fn kernel_start(&mut self) -> ! {
            panic!("kernel entered after {} hooks", self.tick() - 1);
        }
    }

    fn ram() -> SimRam {
        let mut words = [0xFFFF_FFFF; 64];
        words[0] = 0xC0FF_EE00; // load image
        words[1] = 0xC0FF_EE01;
        SimRam {
            words: RefCell::new(words),
        }
    }

    fn layout() -> MemoryLayout {
        MemoryLayout::new(
            MemoryRegion::new(0x00, 0x08).unwrap(),
            MemoryRegion::new(0x40, 0x48).unwrap(),
            MemoryRegion::new(0x80, 0xC0).unwrap(),
            0x100,
        )
        .unwrap()
    }

    #[test]
    fn test_stage_order() {
        let mut stage = BootStage::Reset;
        let mut seen = 1;
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            seen += 1;
        }
        assert_eq!(stage, BootStage::KernelStart);
        assert_eq!(seen, 6);
    }

    #[test]
    fn test_prepare_runs_ram_init_before_hooks() {
        let ram = ram();
        let mut seq = Sequencer::new(layout(), &ram, Recorder::new(&ram));
        seq.prepare();

        assert_eq!(seq.stage(), BootStage::RuntimeInit);
        let hooks = seq.hooks();
        assert_eq!(hooks.board_at, Some(1));
        assert_eq!(hooks.runtime_at, Some(2));
        // Board init already sees initialised RAM
        assert_eq!(hooks.data_seen_by_board, 0xC0FF_EE00);
        assert_eq!(hooks.bss_seen_by_board, 0);

        assert_eq!(ram.read_word(0x44), 0xC0FF_EE01);
        assert_eq!(ram.read_word(0xBC), 0);
        assert_eq!(ram.read_word(0xC0), 0xFFFF_FFFF);
    }

    #[test]
    #[should_panic(expected = "already ran")]
    fn test_prepare_twice_panics() {
        let ram = ram();
        let mut seq = Sequencer::new(layout(), &ram, Recorder::new(&ram));
        seq.prepare();
        seq.prepare();
    }

    #[test]
    #[should_panic(expected = "kernel entered after 2 hooks")]
    fn test_start_reaches_kernel_last() {
        let ram = ram();
        Sequencer::new(layout(), &ram, Recorder::new(&ram)).start();
    }

    #[test]
    #[should_panic(expected = "kernel entered after 2 hooks")]
    fn test_start_after_prepare_does_not_repeat() {
        let ram = ram();
        let mut seq = Sequencer::new(layout(), &ram, Recorder::new(&ram));
        seq.prepare();
        seq.start();
    }
}
