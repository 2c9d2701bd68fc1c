//! Memory Regions and Link-Time Layout
//!
//! Describes the RAM sections the reset sequencer has to prepare. The
//! values come from the linker script; this crate only checks that they
//! describe something the sequencer can act on.

use core::fmt;

/// Unit in which `.data` is copied and `.bss` is cleared. A region that
/// ends part-way into a word has its last bytes handled one at a time.
pub const WORD_SIZE: usize = core::mem::size_of::<u32>();

const WORD_MASK: usize = WORD_SIZE - 1;

/// Errors in a link-time memory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Region end lies below its start
    Inverted { start: usize, end: usize },
    /// Region start is not word aligned
    Misaligned { addr: usize },
    /// `.data` load image and run region differ in size
    LengthMismatch { load: usize, run: usize },
    /// Two regions that must be disjoint overlap
    Overlap,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted { start, end } => {
                write!(f, "region end {:#x} below start {:#x}", end, start)
            }
            Self::Misaligned { addr } => write!(f, "region start {:#x} not word aligned", addr),
            Self::LengthMismatch { load, run } => {
                write!(f, "data load image is {} bytes, run region is {} bytes", load, run)
            }
            Self::Overlap => write!(f, "memory regions overlap"),
        }
    }
}

/// A half-open `[start, end)` byte range starting on a word boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    start: usize,
    end: usize,
}

impl MemoryRegion {
    /// Create a region, checking ordering and start alignment. The end
    /// may fall anywhere.
    pub const fn new(start: usize, end: usize) -> Result<Self, LayoutError> {
        if end < start {
            return Err(LayoutError::Inverted { start, end });
        }
        if start & WORD_MASK != 0 {
            return Err(LayoutError::Misaligned { addr: start });
        }
        Ok(Self { start, end })
    }

    /// Create a region from a start address and a byte length.
    pub const fn with_len(start: usize, len: usize) -> Result<Self, LayoutError> {
        match start.checked_add(len) {
            Some(end) => Self::new(start, end),
            None => Err(LayoutError::Inverted { start, end: usize::MAX }),
        }
    }

    /// An empty region anchored at `at`
    #[must_use]
    pub const fn empty(at: usize) -> Self {
        let at = at & !WORD_MASK;
        Self { start: at, end: at }
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Size in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whole words in the region
    #[must_use]
    pub const fn words(&self) -> usize {
        self.len() / WORD_SIZE
    }

    /// Bytes after the last whole word (0 to 3)
    #[must_use]
    pub const fn tail(&self) -> usize {
        self.len() & WORD_MASK
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end
    }

    /// Whether the two regions share at least one byte
    #[must_use]
    pub const fn overlaps(&self, other: &MemoryRegion) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    /// Iterate over the address of every whole word in the region
    pub fn word_addrs(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end - self.tail()).step_by(WORD_SIZE)
    }

    /// Iterate over the address of every byte after the last whole word
    pub fn tail_addrs(&self) -> impl Iterator<Item = usize> {
        self.end - self.tail()..self.end
    }
}

/// RAM layout of the running image.
///
/// `data_load` is the initialised-data image in flash, `data` where it
/// runs from, `bss` the region that must read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    pub data_load: MemoryRegion,
    pub data: MemoryRegion,
    pub bss: MemoryRegion,
    /// Initial main stack pointer (vector slot 0)
    pub stack_top: usize,
}

impl MemoryLayout {
    /// Build and validate a layout.
    pub fn new(
        data_load: MemoryRegion,
        data: MemoryRegion,
        bss: MemoryRegion,
        stack_top: usize,
    ) -> Result<Self, LayoutError> {
        if data_load.len() != data.len() {
            return Err(LayoutError::LengthMismatch {
                load: data_load.len(),
                run: data.len(),
            });
        }
        // The load image either is the run region (execution from RAM) or
        // sits somewhere else entirely.
        if data_load != data && data_load.overlaps(&data) {
            return Err(LayoutError::Overlap);
        }
        if data.overlaps(&bss) {
            return Err(LayoutError::Overlap);
        }
        Ok(Self {
            data_load,
            data,
            bss,
            stack_top,
        })
    }

    /// Whether `.data` has to be copied from its load address
    #[must_use]
    pub const fn needs_copy(&self) -> bool {
        !self.data.is_empty() && self.data_load.start() != self.data.start()
    }

    /// Whether `.bss` has anything to clear
    #[must_use]
    pub const fn needs_zero(&self) -> bool {
        !self.bss.is_empty()
    }
}
