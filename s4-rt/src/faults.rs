//! Fault and Default Handlers
//!
//! Every exception either stops the core silently or is reported as a
//! [`FaultRecord`] through [`core_panic`]:
//!
//! | exception                        | action                   |
//! |----------------------------------|--------------------------|
//! | NMI, MemManage, DebugMonitor     | spin forever             |
//! | HardFault                        | report `HARD_FAULT`      |
//! | BusFault                         | report `BUS_FAULT`       |
//! | UsageFault                       | report `USAGE_FAULT`     |
//! | anything else with no handler    | report `DUMMY_HANDLER`   |
//!
//! SVCall, PendSV, SysTick and every peripheral interrupt start out bound
//! to [`dummy_handler`]; whoever owns one of them rebinds its slot.

use s4_arch::{CoreException, cpu, exceptions};
use s4_common::{FaultCause, FaultRecord};

/// What a core exception does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Stop in a NOP loop without saying anything
    SpinHalt,
    /// Report through the panic sink
    Report(FaultCause),
}

/// Policy for each core exception
#[must_use]
pub const fn policy(exception: CoreException) -> FaultPolicy {
    match exception {
        CoreException::NonMaskableInt
        | CoreException::MemoryManagement
        | CoreException::DebugMonitor => FaultPolicy::SpinHalt,
        CoreException::HardFault => FaultPolicy::Report(FaultCause::HardFault),
        CoreException::BusFault => FaultPolicy::Report(FaultCause::BusFault),
        CoreException::UsageFault => FaultPolicy::Report(FaultCause::UsageFault),
        CoreException::SVCall | CoreException::PendSV | CoreException::SysTick => {
            FaultPolicy::Report(FaultCause::DummyHandler)
        }
    }
}

/// Panic sink: log the record and panic with it. Never returns.
pub fn core_panic(record: FaultRecord) -> ! {
    log::error!("fatal: {} (code {})", record, record.cause.code());
    panic!("{}", record)
}

fn report(cause: FaultCause) -> ! {
    core_panic(FaultRecord::new(cause))
}

/// Carry out the policy for `exception`
fn handle(exception: CoreException) -> ! {
    match policy(exception) {
        FaultPolicy::SpinHalt => cpu::spin_halt(),
        FaultPolicy::Report(cause) => report(cause),
    }
}

/// Bound to every slot that has no handler of its own
///
/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn dummy_handler() {
    let vector = exceptions::active_vector();
    log::error!("unhandled exception {}", vector);
    match CoreException::from_slot(vector) {
        Some(exception) => handle(exception),
        None => report(FaultCause::DummyHandler),
    }
}

/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn isr_nmi() {
    handle(CoreException::NonMaskableInt)
}

/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn isr_hard_fault() {
    handle(CoreException::HardFault)
}

/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn isr_mem_manage() {
    handle(CoreException::MemoryManagement)
}

/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn isr_bus_fault() {
    handle(CoreException::BusFault)
}

/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn isr_usage_fault() {
    handle(CoreException::UsageFault)
}

/// # Safety
///
/// Only the core calls this, through the vector table.
pub unsafe extern "C" fn isr_debug_mon() {
    handle(CoreException::DebugMonitor)
}
