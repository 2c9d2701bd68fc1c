//! CPU Control
//!
//! Low-level Cortex-M operations used by the boot path and the fault
//! handlers.

/// SHCSR: MemManage fault enable
const SHCSR_MEMFAULTENA: u32 = 1 << 16;
/// SHCSR: BusFault enable
const SHCSR_BUSFAULTENA: u32 = 1 << 17;
/// SHCSR: UsageFault enable
const SHCSR_USGFAULTENA: u32 = 1 << 18;

/// Fault enable bits set by [`enable_fault_handlers`]
pub const SHCSR_FAULT_ENABLES: u32 = SHCSR_MEMFAULTENA | SHCSR_BUSFAULTENA | SHCSR_USGFAULTENA;

/// Stop forever in a NOP loop.
///
/// Used where the condition is either benign-but-unhandled or too severe to
/// say anything useful about.
#[inline]
pub fn spin_halt() -> ! {
    loop {
        #[cfg(all(target_arch = "arm", target_os = "none"))]
        cortex_m::asm::nop();
        #[cfg(not(all(target_arch = "arm", target_os = "none")))]
        core::hint::spin_loop();
    }
}

/// Halt the CPU (sleep between interrupts, never return)
#[inline]
pub fn halt() -> ! {
    loop {
        wait_for_interrupt();
    }
}

/// Wait for interrupt (WFI instruction)
#[inline]
pub fn wait_for_interrupt() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    cortex_m::asm::wfi();
    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    core::hint::spin_loop();
}

/// Mask all configurable-priority interrupts (PRIMASK)
#[inline]
pub fn disable_interrupts() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    cortex_m::interrupt::disable();
}

/// Route MemManage, BusFault and UsageFault to their own vectors.
///
/// Out of reset these are disabled and every such fault escalates to
/// HardFault, which would make the dedicated handlers unreachable.
#[inline]
pub fn enable_fault_handlers() {
    #[cfg(all(target_arch = "arm", target_os = "none"))]
    {
        // SAFETY: Single-threaded boot context, nothing else owns SCB yet
        let peripherals = unsafe { cortex_m::Peripherals::steal() };
        // SAFETY: Only the fault enable bits are changed
        unsafe {
            peripherals.SCB.shcsr.modify(|v| v | SHCSR_FAULT_ENABLES);
        }
        cortex_m::asm::dsb();
        cortex_m::asm::isb();
    }
}
