//! Interrupt lines and priority.
//!
//! Each line tracks the level driven by its source (`asserted`) and an
//! unserviced request (`pending`). Asserting latches a request. The CPU
//! consumes the request when it stacks state and vectors. Deasserting IRQ
//! or FIRQ withdraws a request the CPU has not taken yet; NMI is edge
//! triggered, so its latched request survives the line going high again.

use crate::flags::{ConditionCodes, F, I};

/// One of the three interrupt inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptLine {
    Nmi,
    Firq,
    Irq,
}

impl InterruptLine {
    /// Vector address for this line.
    #[must_use]
    pub const fn vector(self) -> u16 {
        match self {
            Self::Nmi => 0xFFFC,
            Self::Firq => 0xFFF6,
            Self::Irq => 0xFFF8,
        }
    }

    /// Condition code bit that masks this line, if any.
    #[must_use]
    pub const fn mask(self) -> Option<u8> {
        match self {
            Self::Nmi => None,
            Self::Firq => Some(F),
            Self::Irq => Some(I),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineState {
    asserted: bool,
    pending: bool,
}

/// Interrupt controller state for the three lines.
#[derive(Debug, Clone, Default)]
pub struct InterruptController {
    nmi: LineState,
    firq: LineState,
    irq: LineState,
}

impl InterruptController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&self, line: InterruptLine) -> &LineState {
        match line {
            InterruptLine::Nmi => &self.nmi,
            InterruptLine::Firq => &self.firq,
            InterruptLine::Irq => &self.irq,
        }
    }

    fn line_mut(&mut self, line: InterruptLine) -> &mut LineState {
        match line {
            InterruptLine::Nmi => &mut self.nmi,
            InterruptLine::Firq => &mut self.firq,
            InterruptLine::Irq => &mut self.irq,
        }
    }

    /// Drive the line active and latch a request.
    pub fn assert(&mut self, line: InterruptLine) {
        let state = self.line_mut(line);
        state.asserted = true;
        state.pending = true;
    }

    /// Release the line.
    pub fn deassert(&mut self, line: InterruptLine) {
        let state = self.line_mut(line);
        state.asserted = false;
        if line != InterruptLine::Nmi {
            state.pending = false;
        }
    }

    /// Drive the line to the given level. Only an inactive-to-active
    /// transition latches a new request.
    pub fn set_level(&mut self, line: InterruptLine, active: bool) {
        let was = self.line(line).asserted;
        if active && !was {
            self.assert(line);
        } else if !active && was {
            self.deassert(line);
        }
    }

    #[must_use]
    pub fn is_asserted(&self, line: InterruptLine) -> bool {
        self.line(line).asserted
    }

    #[must_use]
    pub fn is_pending(&self, line: InterruptLine) -> bool {
        self.line(line).pending
    }

    /// Mark the request as taken by the CPU. The level is left alone.
    pub fn consume(&mut self, line: InterruptLine) {
        self.line_mut(line).pending = false;
    }

    /// Highest-priority pending request not masked by `cc`.
    ///
    /// NMI is only eligible once `nmi_armed` is true (the 6809 ignores NMI
    /// after reset until S has been loaded).
    #[must_use]
    pub fn highest_pending(&self, cc: ConditionCodes, nmi_armed: bool) -> Option<InterruptLine> {
        [InterruptLine::Nmi, InterruptLine::Firq, InterruptLine::Irq]
            .into_iter()
            .find(|&line| {
                let state = self.line(line);
                if !state.pending {
                    return false;
                }
                match line.mask() {
                    None => nmi_armed,
                    Some(mask) => !cc.is_set(mask),
                }
            })
    }

    /// True if any line has a request, masked or not. Ends SYNC.
    #[must_use]
    pub fn any_pending(&self) -> bool {
        self.nmi.pending || self.firq.pending || self.irq.pending
    }

    /// Drop all requests and levels.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
