//! CPU core trait.

use crate::Bus;

/// A CPU core driven by cycle budgets.
///
/// The CPU does not own the bus. It is passed to `execute()` so the same
/// bus can be shared with the scheduler and peripherals between calls.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute whole instructions until at least `budget` cycles have been
    /// consumed, and return the cycles actually consumed.
    ///
    /// Instructions are never split, so the result may exceed the budget by
    /// up to one instruction (or interrupt entry). A budget of zero runs
    /// nothing.
    fn execute<B: Bus>(&mut self, bus: &mut B, budget: u32) -> u32;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true while the CPU is stopped waiting for an interrupt.
    fn is_halted(&self) -> bool;

    /// Reset the CPU and load the program counter from the reset vector.
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
