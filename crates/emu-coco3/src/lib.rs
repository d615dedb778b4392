//! Tandy Color Computer 3 emulator core.
//!
//! An MC6809 or HD6309 CPU, the GIME memory manager and timer, two MC6821
//! PIAs, the keyboard matrix and the joystick comparator, driven by a
//! nanosecond scheduler that interleaves CPU execution with timer
//! interrupts and audio sampling. Video generation is out of scope: the
//! core delivers a border-filled frame and a stream of DAC samples.
//!
//! [`Emulator`] is the host-facing entry point; [`Coco3`] is the machine.

pub mod audio;
pub mod bus;
pub mod cartridge;
mod coco3;
pub mod config;
mod emulator;
pub mod error;
pub mod gime;
pub mod input;
pub mod joystick;
pub mod keyboard;
pub mod memory;
pub mod scheduler;
pub mod video;

pub use audio::AudioInfo;
pub use bus::CocoBus;
pub use cartridge::Cartridge;
pub use coco3::Coco3;
pub use config::{CpuType, EmulatorConfig, RamSize};
pub use emulator::Emulator;
pub use error::{CartridgeError, ConfigError, EmulatorError};
pub use input::{InputHandle, InputState};
pub use joystick::{Axis, Button, Stick};
pub use keyboard::KeyboardMatrix;
pub use scheduler::SliceEvents;
pub use video::FramebufferInfo;
