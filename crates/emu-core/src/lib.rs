//! Core traits shared by every chip and machine crate.
//!
//! Time is counted in CPU cycles. The CPU talks to the world only through
//! [`Bus`], and every component exposes its state through [`Observable`].

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
