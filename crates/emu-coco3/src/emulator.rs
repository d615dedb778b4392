//! Host-facing lifecycle wrapper.
//!
//! [`Emulator`] owns an optional [`Coco3`]. Until [`Emulator::init`]
//! succeeds every machine operation is a no-op that reports
//! [`EmulatorError::NotReady`] or an empty result. Input and cartridge
//! state live outside the machine so they survive re-initialisation.

use log::{info, warn};
use motorola_6809::Registers;

use crate::audio::AudioInfo;
use crate::cartridge::Cartridge;
use crate::coco3::Coco3;
use crate::config::{CpuType, EmulatorConfig};
use crate::error::EmulatorError;
use crate::input::InputHandle;
use crate::joystick::{Axis, Button, Stick};
use crate::scheduler::SliceEvents;
use crate::video::{FRAME_HEIGHT, FRAME_WIDTH, FramebufferInfo};

/// CoCo 3 emulator instance.
pub struct Emulator {
    machine: Option<Coco3>,
    config: EmulatorConfig,
    /// CPU to fit at the next reset.
    cpu_type: CpuType,
    input: InputHandle,
    /// Cartridge held while no machine exists.
    cartridge: Option<Cartridge>,
    last_error: Option<String>,
}

impl Emulator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            machine: None,
            config: EmulatorConfig::default(),
            cpu_type: CpuType::default(),
            input: InputHandle::new(),
            cartridge: None,
            last_error: None,
        }
    }

    /// Build the machine. On failure the emulator is left not ready and
    /// the message is kept for [`Emulator::last_error`].
    pub fn init(&mut self, config: EmulatorConfig) -> Result<(), EmulatorError> {
        self.shutdown();
        match Coco3::with_input(&config, self.input.clone()) {
            Ok(mut machine) => {
                if let Some(cart) = self.cartridge.take() {
                    machine.insert_cartridge(cart);
                    machine.reset();
                }
                self.cpu_type = config.cpu_type;
                self.config = config;
                self.machine = Some(machine);
                self.last_error = None;
                info!("emulator ready");
                Ok(())
            }
            Err(err) => {
                warn!("init failed: {err}");
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Reset the machine, switching CPU if one was requested.
    pub fn reset(&mut self) {
        let cpu_type = self.cpu_type;
        if let Some(machine) = self.machine.as_mut() {
            machine.set_variant(cpu_type.variant());
            machine.reset();
            info!("reset");
        }
    }

    /// Drop the machine. A held cartridge is kept for the next `init`.
    pub fn shutdown(&mut self) {
        if let Some(mut machine) = self.machine.take() {
            self.cartridge = machine.eject_cartridge();
            info!("emulator shut down");
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.machine.is_some()
    }

    fn ready(&mut self) -> Result<&mut Coco3, EmulatorError> {
        self.machine.as_mut().ok_or(EmulatorError::NotReady)
    }

    /// Run one 60 Hz field.
    pub fn run_frame(&mut self) -> Result<SliceEvents, EmulatorError> {
        Ok(self.ready()?.run_frame())
    }

    /// Run `nanos` of machine time.
    pub fn run_slice(&mut self, nanos: f64) -> Result<SliceEvents, EmulatorError> {
        Ok(self.ready()?.run_slice(nanos))
    }

    /// Execute CPU cycles without timer or audio events.
    pub fn run_cycles(&mut self, cycles: u32) -> Result<u32, EmulatorError> {
        Ok(self.ready()?.run_cycles(cycles))
    }

    /// Press or release the key at a matrix position (row 0-6, col 0-7).
    pub fn set_key(&self, row: u8, col: u8, pressed: bool) {
        self.input.set_key(row, col, pressed);
    }

    pub fn set_joystick_axis(&self, stick: Stick, axis: Axis, value: u8) {
        self.input.set_joystick_axis(stick, axis, value);
    }

    pub fn set_joystick_button(&self, stick: Stick, button: Button, pressed: bool) {
        self.input.set_joystick_button(stick, button, pressed);
    }

    /// Release all input, e.g. when the host window loses focus.
    pub fn release_all_input(&self) {
        self.input.release_all();
    }

    /// Handle for writing input from another thread.
    #[must_use]
    pub fn input_handle(&self) -> InputHandle {
        self.input.clone()
    }

    #[must_use]
    pub fn framebuffer_info(&self) -> FramebufferInfo {
        FramebufferInfo {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            pitch: FRAME_WIDTH * 4,
        }
    }

    /// Copy the last frame into `out`. Returns `false` if not ready or the
    /// buffer is too small.
    pub fn read_framebuffer(&self, out: &mut [u32]) -> bool {
        self.machine
            .as_ref()
            .is_some_and(|machine| machine.framebuffer().copy_to(out))
    }

    #[must_use]
    pub fn audio_info(&self) -> AudioInfo {
        AudioInfo {
            sample_rate: self.config.audio_rate,
            channels: 1,
        }
    }

    /// Drain buffered samples into `out`. Returns how many were written.
    pub fn read_audio_samples(&mut self, out: &mut [i16]) -> usize {
        self.machine
            .as_mut()
            .map_or(0, |machine| machine.audio_mut().drain_into(out))
    }

    /// CPU that is or will be fitted after the next reset.
    #[must_use]
    pub fn cpu_type(&self) -> CpuType {
        self.cpu_type
    }

    /// Choose the CPU. Takes effect at the next [`Emulator::reset`].
    pub fn set_cpu_type(&mut self, cpu_type: CpuType) {
        if cpu_type != self.cpu_type {
            info!("CPU change to {cpu_type:?} pending reset");
            self.cpu_type = cpu_type;
        }
    }

    /// Insert a cartridge image and reset so it can autostart.
    pub fn load_cartridge(&mut self, name: &str, data: &[u8]) -> Result<(), EmulatorError> {
        let cart = match Cartridge::from_bytes(name, data) {
            Ok(cart) => cart,
            Err(err) => {
                warn!("cartridge {name} rejected: {err}");
                self.last_error = Some(err.to_string());
                return Err(err.into());
            }
        };
        match self.machine.as_mut() {
            Some(machine) => {
                machine.insert_cartridge(cart);
                self.reset();
            }
            None => self.cartridge = Some(cart),
        }
        Ok(())
    }

    pub fn eject_cartridge(&mut self) {
        self.cartridge = None;
        if let Some(machine) = self.machine.as_mut() {
            machine.eject_cartridge();
        }
    }

    #[must_use]
    pub fn has_cartridge(&self) -> bool {
        self.cartridge_name().is_some()
    }

    #[must_use]
    pub fn cartridge_name(&self) -> Option<&str> {
        self.machine
            .as_ref()
            .and_then(Coco3::cartridge)
            .or(self.cartridge.as_ref())
            .map(Cartridge::name)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// CPU register snapshot.
    #[must_use]
    pub fn registers(&self) -> Option<Registers> {
        self.machine.as_ref().map(Coco3::registers)
    }

    /// Side-effect-free read of a logical address.
    #[must_use]
    pub fn peek(&self, addr: u16) -> Option<u8> {
        self.machine.as_ref().map(|machine| machine.peek(addr))
    }

    #[must_use]
    pub fn machine(&self) -> Option<&Coco3> {
        self.machine.as_ref()
    }

    pub fn machine_mut(&mut self) -> Option<&mut Coco3> {
        self.machine.as_mut()
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
