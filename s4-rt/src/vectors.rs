//! SAM4S Vector Table
//!
//! 16 architecture slots followed by 35 peripheral slots. Every live slot
//! starts out on [`dummy_handler`]; the fault handlers are then bound over
//! their own slots. Peripherals the variant does not have stay zero.

use s4_arch::exceptions::FIRST_IRQ_SLOT;
use s4_arch::{CoreException, Handler, ResetHandler, VectorTable};
use s4_pal::sam4s::{IRQ_SLOTS, Variant};

use crate::faults::{
    dummy_handler, isr_bus_fault, isr_debug_mon, isr_hard_fault, isr_mem_manage, isr_nmi,
    isr_usage_fault,
};

/// Peripheral interrupt slots
pub const IRQ_COUNT: usize = IRQ_SLOTS;

/// Total vector table length
pub const VECTOR_COUNT: usize = FIRST_IRQ_SLOT + IRQ_COUNT;

pub type Sam4sVectors = VectorTable<VECTOR_COUNT>;

/// Vector table for `variant` with the standard fault handlers
#[must_use]
pub const fn table(stack_top: Handler, reset: ResetHandler, variant: &Variant) -> Sam4sVectors {
    VectorTable::new(stack_top, reset, dummy_handler, &variant.irq_present())
        .with_exception(CoreException::NonMaskableInt, isr_nmi)
        .with_exception(CoreException::HardFault, isr_hard_fault)
        .with_exception(CoreException::MemoryManagement, isr_mem_manage)
        .with_exception(CoreException::BusFault, isr_bus_fault)
        .with_exception(CoreException::UsageFault, isr_usage_fault)
        .with_exception(CoreException::DebugMonitor, isr_debug_mon)
}

/// The table the firmware image links: stack top from the linker script,
/// reset into [`crate::reset_handler`].
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[must_use]
pub const fn linked(variant: &Variant) -> Sam4sVectors {
    table(crate::linker::__StackTop, crate::reset_handler, variant)
}

#[cfg(test)]
mod tests {
    use s4_arch::SlotKind;
    use s4_pal::sam4s::{Irq, SAM4S16C, SAM4SD32C};

    use super::*;

    unsafe extern "C" fn stack_top() {}
    unsafe extern "C" fn reset() -> ! {
        loop {
            core::hint::spin_loop();
        }
    }

    fn address(t: &Sam4sVectors, slot: usize) -> usize {
        t.get(slot).map_or(usize::MAX, |v| v.address())
    }

    #[test]
    fn test_length() {
        assert_eq!(VECTOR_COUNT, 51);
        assert_eq!(table(stack_top, reset, &SAM4S16C).len(), 51);
    }

    #[test]
    fn test_stack_and_reset_first() {
        let t = table(stack_top, reset, &SAM4S16C);
        assert_eq!(t.kind(0), Some(SlotKind::StackTop));
        assert_eq!(t.kind(1), Some(SlotKind::Reset));
        assert_eq!(address(&t, 0), stack_top as usize);
        assert_eq!(address(&t, 1), reset as usize);
    }

    #[test]
    fn test_core_exception_handlers() {
        let t = table(stack_top, reset, &SAM4S16C);
        let expected: [(CoreException, Handler); 9] = [
            (CoreException::NonMaskableInt, isr_nmi),
            (CoreException::HardFault, isr_hard_fault),
            (CoreException::MemoryManagement, isr_mem_manage),
            (CoreException::BusFault, isr_bus_fault),
            (CoreException::UsageFault, isr_usage_fault),
            (CoreException::SVCall, dummy_handler),
            (CoreException::DebugMonitor, isr_debug_mon),
            (CoreException::PendSV, dummy_handler),
            (CoreException::SysTick, dummy_handler),
        ];
        for (exc, handler) in expected {
            assert_eq!(t.kind(exc.slot()), Some(SlotKind::Exception), "{}", exc);
            assert_eq!(address(&t, exc.slot()), handler as usize, "{}", exc);
        }
        for slot in [7, 8, 9, 10, 13] {
            assert_eq!(t.kind(slot), Some(SlotKind::Reserved));
            assert_eq!(address(&t, slot), 0);
        }
    }

    #[test]
    fn test_peripheral_slots_follow_variant() {
        for variant in [SAM4S16C, SAM4SD32C] {
            let t = table(stack_top, reset, &variant);
            for id in 0..IRQ_COUNT {
                let slot = FIRST_IRQ_SLOT + id;
                let live = Irq::from_id(id).is_some_and(|irq| variant.has(irq));
                if live {
                    assert_eq!(t.kind(slot), Some(SlotKind::Interrupt), "{} id {}", variant.name, id);
                    assert_eq!(address(&t, slot), dummy_handler as usize);
                } else {
                    assert_eq!(t.kind(slot), Some(SlotKind::Reserved), "{} id {}", variant.name, id);
                    assert_eq!(address(&t, slot), 0);
                }
            }
        }
    }

    #[test]
    fn test_efc1_slot_depends_on_variant() {
        let slot = Irq::Efc1.slot();
        assert_eq!(slot, 23);
        assert_eq!(table(stack_top, reset, &SAM4S16C).kind(slot), Some(SlotKind::Reserved));
        assert_eq!(table(stack_top, reset, &SAM4SD32C).kind(slot), Some(SlotKind::Interrupt));
    }

    #[test]
    fn test_each_peripheral_has_its_own_slot() {
        let mut owner = [None; VECTOR_COUNT];
        for irq in Irq::ALL {
            assert!(owner[irq.slot()].is_none(), "{} shares a slot", irq);
            owner[irq.slot()] = Some(irq);
        }
        assert!(owner[..FIRST_IRQ_SLOT].iter().all(Option::is_none));
    }

    #[test]
    fn test_image_matches_table() {
        let t = table(stack_top, reset, &SAM4SD32C);
        let image = t.image();
        for slot in 0..VECTOR_COUNT {
            assert_eq!(image.raw(slot), Some(address(&t, slot)), "slot {}", slot);
        }
    }
}
