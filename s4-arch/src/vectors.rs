//! Vector Table
//!
//! The Cortex-M core fetches slot 0 (initial SP) and slot 1 (reset entry)
//! straight out of flash, and on every exception indexes the same table by
//! exception number. Nothing in software ever reads it.
//!
//! The table is modelled in two layers:
//! - [`VectorTable`]: a tagged description of every slot, built in `const`
//!   context so the final table is fixed at compile time
//! - [`VectorImage`]: the `#[repr(C)]` word array the hardware consumes,
//!   produced from the model with [`VectorTable::image`]
//!
//! A freshly built table binds every core exception and every peripheral
//! present on the chip to one default handler. Individual slots are then
//! overridden. Slots of peripherals the chip does not have stay zero: the
//! builder refuses to bind a handler there.

use crate::exceptions::{CoreException, FIRST_IRQ_SLOT, RESET_SLOT, STACK_TOP_SLOT};

/// Exception or interrupt handler
pub type Handler = unsafe extern "C" fn();

/// Reset entry point
pub type ResetHandler = unsafe extern "C" fn() -> !;

/// What a vector slot holds
#[derive(Debug, Clone, Copy)]
pub enum Vector {
    /// Initial stack pointer. Typed as a handler so a linker symbol can be
    /// placed here without a const pointer-to-integer cast.
    StackTop(Handler),
    /// Reset entry point
    Reset(ResetHandler),
    /// Architecture exception handler
    Exception(Handler),
    /// Device interrupt handler
    Interrupt(Handler),
    /// Reserved slot, must read as zero
    Reserved,
}

impl Vector {
    /// Classification of this slot
    #[must_use]
    pub const fn kind(&self) -> SlotKind {
        match self {
            Self::StackTop(_) => SlotKind::StackTop,
            Self::Reset(_) => SlotKind::Reset,
            Self::Exception(_) => SlotKind::Exception,
            Self::Interrupt(_) => SlotKind::Interrupt,
            Self::Reserved => SlotKind::Reserved,
        }
    }

    /// Address stored in the slot (0 for reserved)
    #[must_use]
    pub fn address(&self) -> usize {
        match self {
            Self::StackTop(h) | Self::Exception(h) | Self::Interrupt(h) => *h as usize,
            Self::Reset(r) => *r as usize,
            Self::Reserved => 0,
        }
    }
}

/// Slot classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    StackTop,
    Reset,
    Exception,
    Interrupt,
    Reserved,
}

/// One word of the hardware vector table
#[derive(Clone, Copy)]
#[repr(C)]
pub union VectorEntry {
    handler: Handler,
    reset: ResetHandler,
    reserved: usize,
}

impl VectorEntry {
    /// Raw word value
    #[must_use]
    pub fn raw(&self) -> usize {
        // SAFETY: Every variant is one pointer-sized word
        unsafe { self.reserved }
    }
}

/// The word array placed at the start of flash
#[repr(C)]
pub struct VectorImage<const N: usize> {
    entries: [VectorEntry; N],
}

impl<const N: usize> VectorImage<N> {
    /// Raw word in `slot`
    #[must_use]
    pub fn raw(&self, slot: usize) -> Option<usize> {
        self.entries.get(slot).map(VectorEntry::raw)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

/// Compile-time description of an `N`-slot vector table
#[derive(Debug, Clone, Copy)]
pub struct VectorTable<const N: usize> {
    vectors: [Vector; N],
}

impl<const N: usize> VectorTable<N> {
    /// Build a table with every live slot bound to `default`.
    ///
    /// `irq_present[n]` says whether device interrupt `n` exists on this
    /// chip; absent ones become reserved (zero) slots.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used for a static) if `irq_present`
    /// does not cover exactly the `N - 16` device slots.
    #[must_use]
    pub const fn new(
        stack_top: Handler,
        reset: ResetHandler,
        default: Handler,
        irq_present: &[bool],
    ) -> Self {
        assert!(N >= FIRST_IRQ_SLOT, "vector table shorter than the architecture part");
        assert!(
            irq_present.len() == N - FIRST_IRQ_SLOT,
            "interrupt presence map does not match the table length"
        );

        let mut vectors = [Vector::Reserved; N];
        vectors[STACK_TOP_SLOT] = Vector::StackTop(stack_top);
        vectors[RESET_SLOT] = Vector::Reset(reset);

        let mut slot = RESET_SLOT + 1;
        while slot < FIRST_IRQ_SLOT {
            if CoreException::from_slot(slot).is_some() {
                vectors[slot] = Vector::Exception(default);
            }
            slot += 1;
        }

        let mut irq = 0;
        while irq < irq_present.len() {
            if irq_present[irq] {
                vectors[FIRST_IRQ_SLOT + irq] = Vector::Interrupt(default);
            }
            irq += 1;
        }

        Self { vectors }
    }

    /// Bind `handler` to a core exception.
    #[must_use]
    pub const fn with_exception(mut self, exception: CoreException, handler: Handler) -> Self {
        self.vectors[exception.slot()] = Vector::Exception(handler);
        self
    }

    /// Bind `handler` to device interrupt `irq`.
    ///
    /// # Panics
    ///
    /// Panics if `irq` is outside the table or the chip does not have
    /// that peripheral. For a `static` table that is a build error.
    #[must_use]
    pub const fn with_interrupt(mut self, irq: usize, handler: Handler) -> Self {
        let slot = FIRST_IRQ_SLOT + irq;
        assert!(slot < N, "interrupt number outside the vector table");
        assert!(
            matches!(self.vectors[slot], Vector::Interrupt(_)),
            "cannot bind a handler to a reserved interrupt slot"
        );
        self.vectors[slot] = Vector::Interrupt(handler);
        self
    }

    /// Vector in `slot`
    #[must_use]
    pub const fn get(&self, slot: usize) -> Option<Vector> {
        if slot < N { Some(self.vectors[slot]) } else { None }
    }

    /// Classification of `slot`
    #[must_use]
    pub const fn kind(&self, slot: usize) -> Option<SlotKind> {
        match self.get(slot) {
            Some(v) => Some(v.kind()),
            None => None,
        }
    }

    /// Number of slots
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Number of device interrupt slots (live or reserved)
    #[must_use]
    pub const fn irq_slots(&self) -> usize {
        N - FIRST_IRQ_SLOT
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector> {
        self.vectors.iter()
    }

    /// Lower the model into the word array the hardware reads.
    #[must_use]
    pub const fn image(&self) -> VectorImage<N> {
        let mut entries = [VectorEntry { reserved: 0 }; N];
        let mut slot = 0;
        while slot < N {
            entries[slot] = match self.vectors[slot] {
                Vector::StackTop(h) | Vector::Exception(h) | Vector::Interrupt(h) => {
                    VectorEntry { handler: h }
                }
                Vector::Reset(r) => VectorEntry { reset: r },
                Vector::Reserved => VectorEntry { reserved: 0 },
            };
            slot += 1;
        }
        VectorImage { entries }
    }
}
