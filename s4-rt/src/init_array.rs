//! Static Constructors
//!
//! The linker collects `.init_array` entries from every object into one
//! contiguous table of function pointers. Running them in order is the
//! runtime-init step of the reset sequence.

/// A static constructor
pub type Initializer = unsafe extern "C" fn();

/// A contiguous run of initialisers
pub struct InitArray<'a> {
    entries: &'a [Initializer],
}

impl<'a> InitArray<'a> {
    #[must_use]
    pub const fn new(entries: &'a [Initializer]) -> Self {
        Self { entries }
    }

    /// Table bounded by two linker symbols.
    ///
    /// # Safety
    ///
    /// `[start, end)` must be a word-aligned array of valid initialisers,
    /// `end >= start`, and it must live for `'a`.
    #[must_use]
    pub unsafe fn from_bounds(start: *const Initializer, end: *const Initializer) -> Self {
        // SAFETY: Both bounds delimit the same array, guaranteed by the caller
        let len = unsafe { end.offset_from(start) };
        let len = usize::try_from(len).unwrap_or(0);
        if len == 0 {
            return Self::new(&[]);
        }
        // SAFETY: Guaranteed by the caller
        Self::new(unsafe { core::slice::from_raw_parts(start, len) })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every initialiser in table order. Returns how many ran.
    ///
    /// # Safety
    ///
    /// Each initialiser must be safe to call once, at this point of boot.
    pub unsafe fn run(&self) -> usize {
        for init in self.entries {
            // SAFETY: Guaranteed by the caller
            unsafe { init() };
        }
        self.entries.len()
    }
}
