//! Motorola MC6809 and Hitachi HD6309 CPU interpreter.
//!
//! Each call to `step()` runs one whole instruction (or one interrupt
//! entry) and returns its cost in CPU cycles. The HD6309 is modelled as a
//! superset of the MC6809: the extra registers, opcodes and native-mode
//! timings are only reachable when the variant is [`Variant::Hd6309`].

pub mod alu;
mod cpu;
mod cycles;
pub mod flags;
mod interrupts;
mod registers;
mod variant;

pub use cpu::{Cpu6809, WaitState};
pub use flags::ConditionCodes;
pub use interrupts::{InterruptController, InterruptLine};
pub use registers::{MD_DIV_ZERO, MD_FIRQ_ENTIRE, MD_ILLEGAL, MD_NATIVE, Registers};
pub use variant::Variant;
