//! Interrupt priority, stacking and wait states.

use emu_core::{Bus, Cpu, SimpleBus};
use motorola_6809::flags::{E, F, I};
use motorola_6809::{Cpu6809, InterruptLine, Variant, WaitState};

const NMI_HANDLER: u16 = 0x2000;
const FIRQ_HANDLER: u16 = 0x2100;
const IRQ_HANDLER: u16 = 0x2200;

/// Reset into a program at $1000 whose first instruction is LDS #$3000.
fn boot(rest: &[u8]) -> (Cpu6809, SimpleBus) {
    let mut bus = SimpleBus::new();
    bus.set_word(0xFFFE, 0x1000);
    bus.set_word(0xFFFC, NMI_HANDLER);
    bus.set_word(0xFFF6, FIRQ_HANDLER);
    bus.set_word(0xFFF8, IRQ_HANDLER);
    // Every handler is a bare RTI.
    for handler in [NMI_HANDLER, FIRQ_HANDLER, IRQ_HANDLER] {
        bus.write(handler, 0x3B);
    }
    let mut program = vec![0x10, 0xCE, 0x30, 0x00];
    program.extend_from_slice(rest);
    bus.load(0x1000, &program);

    let mut cpu = Cpu6809::new(Variant::Mc6809);
    cpu.reset(&mut bus);
    assert_eq!(cpu.step(&mut bus), 4);
    (cpu, bus)
}

#[test]
fn priority_nmi_then_firq_then_irq() {
    // ANDCC #$AF unmasks both IRQ and FIRQ.
    let (mut cpu, mut bus) = boot(&[0x1C, 0xAF, 0x12, 0x12, 0x12]);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x1006);

    cpu.assert_interrupt(InterruptLine::Nmi);
    cpu.assert_interrupt(InterruptLine::Firq);
    cpu.assert_interrupt(InterruptLine::Irq);

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.pc(), NMI_HANDLER);
    assert!(cpu.regs.cc.is_set(I));
    assert!(cpu.regs.cc.is_set(F));

    // RTI with the entire state stacked.
    assert_eq!(cpu.step(&mut bus), 6 + 9);
    assert_eq!(cpu.pc(), 0x1006);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.pc(), FIRQ_HANDLER);
    cpu.deassert_interrupt(InterruptLine::Firq);

    assert_eq!(cpu.step(&mut bus), 6);
    assert_eq!(cpu.pc(), 0x1006);

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.pc(), IRQ_HANDLER);
}

#[test]
fn masked_irq_is_held_until_unmasked() {
    // NOP ; ANDCC #$EF
    let (mut cpu, mut bus) = boot(&[0x12, 0x1C, 0xEF, 0x12]);
    cpu.assert_interrupt(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.pc(), 0x1005);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), IRQ_HANDLER);
}

#[test]
fn deassert_withdraws_untaken_irq() {
    let (mut cpu, mut bus) = boot(&[0x1C, 0xEF, 0x12]);
    cpu.assert_interrupt(InterruptLine::Irq);
    cpu.deassert_interrupt(InterruptLine::Irq);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x1007);
}

#[test]
fn irq_stacks_entire_state() {
    let (mut cpu, mut bus) = boot(&[0x1C, 0xEF, 0x12]);
    cpu.step(&mut bus);
    cpu.regs.a = 0xAA;
    cpu.regs.b = 0xBB;
    cpu.assert_interrupt(InterruptLine::Irq);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.s, 0x3000 - 12);
    let cc = bus.peek(0x3000 - 12);
    assert_ne!(cc & E, 0);
    assert_eq!(bus.peek(0x3000 - 11), 0xAA);
    assert_eq!(bus.peek(0x3000 - 10), 0xBB);
    // Return address is the instruction after ANDCC.
    assert_eq!(bus.peek(0x3000 - 2), 0x10);
    assert_eq!(bus.peek(0x3000 - 1), 0x06);
}

#[test]
fn firq_stacks_pc_and_cc_only() {
    // ANDCC #$BF clears F
    let (mut cpu, mut bus) = boot(&[0x1C, 0xBF, 0x12]);
    cpu.step(&mut bus);
    cpu.assert_interrupt(InterruptLine::Firq);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.s, 0x3000 - 3);
    assert_eq!(bus.peek(0x3000 - 3) & E, 0);
    assert_eq!(cpu.pc(), FIRQ_HANDLER);
}

#[test]
fn nmi_waits_for_first_stack_load() {
    let mut bus = SimpleBus::new();
    bus.set_word(0xFFFE, 0x1000);
    bus.set_word(0xFFFC, NMI_HANDLER);
    bus.load(0x1000, &[0x12, 0x10, 0xCE, 0x30, 0x00, 0x12]);
    let mut cpu = Cpu6809::new(Variant::Mc6809);
    cpu.reset(&mut bus);

    cpu.assert_interrupt(InterruptLine::Nmi);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x1001);
    assert!(!cpu.nmi_armed());

    cpu.step(&mut bus);
    assert!(cpu.nmi_armed());
    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.pc(), NMI_HANDLER);
}

#[test]
fn nmi_ignores_mask_bits() {
    let (mut cpu, mut bus) = boot(&[0x12]);
    assert!(cpu.regs.cc.is_set(I));
    cpu.assert_interrupt(InterruptLine::Nmi);
    cpu.deassert_interrupt(InterruptLine::Nmi);
    // The latched edge survives the line going high again.
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), NMI_HANDLER);
}

#[test]
fn cwai_stacks_then_waits() {
    // CWAI #$EF
    let (mut cpu, mut bus) = boot(&[0x3C, 0xEF, 0x12]);
    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.wait_state(), WaitState::Cwai);
    assert_eq!(cpu.regs.s, 0x3000 - 12);
    assert!(cpu.is_halted());

    assert_eq!(cpu.step(&mut bus), 0);
    assert_eq!(cpu.execute(&mut bus, 100), 100);

    cpu.assert_interrupt(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.pc(), IRQ_HANDLER);
    // No second frame was pushed.
    assert_eq!(cpu.regs.s, 0x3000 - 12);

    // RTI resumes after CWAI.
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x1006);
}

#[test]
fn sync_resumes_inline_on_masked_interrupt() {
    // SYNC ; NOP
    let (mut cpu, mut bus) = boot(&[0x13, 0x12]);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.wait_state(), WaitState::Sync);
    assert_eq!(cpu.step(&mut bus), 0);

    cpu.assert_interrupt(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), 2);
    assert_eq!(cpu.wait_state(), WaitState::Running);
    assert_eq!(cpu.pc(), 0x1006);
}

#[test]
fn sync_services_unmasked_interrupt() {
    // ANDCC #$EF ; SYNC
    let (mut cpu, mut bus) = boot(&[0x1C, 0xEF, 0x13, 0x12]);
    cpu.step(&mut bus);
    cpu.step(&mut bus);
    cpu.assert_interrupt(InterruptLine::Irq);
    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.pc(), IRQ_HANDLER);
    cpu.step(&mut bus);
    assert_eq!(cpu.pc(), 0x1007);
}

#[test]
fn swi_masks_but_swi2_does_not() {
    let (mut cpu, mut bus) = boot(&[0x1C, 0xAF, 0x3F]);
    bus.set_word(0xFFFA, 0x2300);
    bus.load(0x2300, &[0x10, 0x3F]);
    bus.set_word(0xFFF4, 0x2400);
    cpu.step(&mut bus);

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.pc(), 0x2300);
    assert!(cpu.regs.cc.is_set(I) && cpu.regs.cc.is_set(F));

    cpu.regs.cc.clear(I | F);
    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.pc(), 0x2400);
    assert!(!cpu.regs.cc.is_set(I));
}
