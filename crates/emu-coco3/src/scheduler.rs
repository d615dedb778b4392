//! Time slicing between the CPU, the GIME timer and audio sampling.
//!
//! Time is measured in nanoseconds. A slice is cut at whichever comes
//! first: the end of the slice, the next timer interrupt or the next audio
//! sample. Each piece is converted to CPU cycles and run. The CPU finishes
//! whole instructions, so it overruns slightly; the difference is carried
//! as drift and taken off the next piece, so rounding never accumulates.
//!
//! When a timer expiry and a sample fall on the same instant the sample is
//! taken first, then the timer fires, in the same step.

use std::ops::AddAssign;

/// Colour burst crystal.
pub const COLORBURST_HZ: f64 = 3_579_545.0;
/// CPU clock at the slow SAM rate, trimmed to the 59.923 Hz field rate.
pub const CPU_HZ: f64 = (COLORBURST_HZ / 4.0) * (60.0 / 59.923);
/// Scanlines per field.
pub const LINES_PER_FRAME: u32 = 262;
/// Scanlines per second.
pub const LINES_PER_SECOND: f64 = 60.0 * 262.0;
/// Length of one scanline.
pub const NANOS_PER_LINE: f64 = 1.0e9 / LINES_PER_SECOND;
/// CPU cycles in one scanline at the slow rate.
pub const CYCLES_PER_LINE: f64 = CPU_HZ / LINES_PER_SECOND;
/// Width of the HSYNC pulse at the end of each line.
pub const HSYNC_NANOS: f64 = 5_000.0;

const CYCLES_PER_NANO: f64 = CPU_HZ / 1.0e9;

/// What the scheduler drives. Implemented by the machine.
pub trait SchedulerHost {
    /// Run the CPU for about `cycles` cycles. Returns cycles consumed,
    /// which may exceed the budget by the tail of the last instruction.
    fn run_cpu(&mut self, cycles: u32) -> u32;

    /// The GIME timer counted down to zero.
    fn timer_expired(&mut self);

    /// Take one audio sample.
    fn audio_sample(&mut self);

    /// Pending timer change if software reprogrammed the timer.
    fn timer_update(&mut self) -> Option<TimerUpdate>;

    /// CPU clock multiplier from the SAM rate select.
    fn clock_multiplier(&self) -> u32;
}

/// A change to the GIME timer, reported by the host between CPU runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerUpdate {
    /// Count down from this period, in nanoseconds.
    Period(f64),
    /// Timer value 0: no further expiries.
    Stop,
}

/// What happened during a slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceEvents {
    /// CPU cycles executed.
    pub cycles: u64,
    /// Timer expiries.
    pub timer_interrupts: u32,
    /// Audio samples taken.
    pub samples: u32,
}

impl AddAssign for SliceEvents {
    fn add_assign(&mut self, rhs: Self) {
        self.cycles += rhs.cycles;
        self.timer_interrupts += rhs.timer_interrupts;
        self.samples += rhs.samples;
    }
}

/// Scheduler state. Survives across slices so that drift and the event
/// countdowns carry over.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Fractional (or, after an overrun, negative) cycles owed.
    drift: f64,
    /// Slice time not yet run, always below one nanosecond between calls.
    pending: f64,
    timer_period: Option<f64>,
    nanos_to_timer: f64,
    sample_period: Option<f64>,
    nanos_to_sample: f64,
    overclock: u32,
}

impl Scheduler {
    /// `audio_rate` of 0 disables sampling.
    #[must_use]
    pub fn new(audio_rate: u32, overclock: u32) -> Self {
        let sample_period = (audio_rate != 0).then(|| 1.0e9 / f64::from(audio_rate));
        Self {
            drift: 0.0,
            pending: 0.0,
            timer_period: None,
            nanos_to_timer: 0.0,
            sample_period,
            nanos_to_sample: sample_period.unwrap_or(0.0),
            overclock: overclock.max(1),
        }
    }

    /// Stop the timer and restart the sample countdown.
    pub fn reset(&mut self) {
        self.drift = 0.0;
        self.pending = 0.0;
        self.timer_period = None;
        self.nanos_to_timer = 0.0;
        self.nanos_to_sample = self.sample_period.unwrap_or(0.0);
    }

    /// Program the timer period. A running timer finishes its current
    /// countdown first; an idle timer starts counting now.
    pub fn set_timer_period(&mut self, period: f64) {
        if self.timer_period.is_none() {
            self.nanos_to_timer = period;
        }
        self.timer_period = Some(period);
    }

    /// Stop the timer. The next `set_timer_period` starts a fresh countdown.
    pub fn stop_timer(&mut self) {
        self.timer_period = None;
        self.nanos_to_timer = 0.0;
    }

    #[must_use]
    pub fn timer_period(&self) -> Option<f64> {
        self.timer_period
    }

    /// Change the audio rate. Takes effect at the next sample.
    pub fn set_audio_rate(&mut self, audio_rate: u32) {
        let period = (audio_rate != 0).then(|| 1.0e9 / f64::from(audio_rate));
        if self.sample_period.is_none() {
            self.nanos_to_sample = period.unwrap_or(0.0);
        }
        self.sample_period = period;
    }

    pub fn set_overclock(&mut self, overclock: u32) {
        self.overclock = overclock.max(1);
    }

    #[must_use]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Run `nanos` of machine time.
    pub fn run<H: SchedulerHost>(&mut self, host: &mut H, nanos: f64) -> SliceEvents {
        let mut events = SliceEvents::default();
        self.pending += nanos;

        while self.pending >= 1.0 {
            let mut step = self.pending;
            if self.sample_period.is_some() {
                step = step.min(self.nanos_to_sample);
            }
            if self.timer_period.is_some() {
                step = step.min(self.nanos_to_timer);
            }

            events.cycles += u64::from(self.run_cpu(host, step));
            self.pending -= step;

            if let Some(period) = self.sample_period {
                self.nanos_to_sample -= step;
                if self.nanos_to_sample <= 0.0 {
                    host.audio_sample();
                    events.samples += 1;
                    self.nanos_to_sample = period;
                }
            }
            if let Some(period) = self.timer_period {
                self.nanos_to_timer -= step;
                if self.nanos_to_timer <= 0.0 {
                    host.timer_expired();
                    events.timer_interrupts += 1;
                    self.nanos_to_timer = period;
                }
            }
            match host.timer_update() {
                Some(TimerUpdate::Period(period)) => self.set_timer_period(period),
                Some(TimerUpdate::Stop) => self.stop_timer(),
                None => {}
            }
        }
        events
    }

    /// Run the CPU for `nanos`, settling the fractional cycle into drift.
    fn run_cpu<H: SchedulerHost>(&mut self, host: &mut H, nanos: f64) -> u32 {
        let multiplier = f64::from(self.overclock * host.clock_multiplier());
        let cycles = self.drift + nanos * CYCLES_PER_NANO * multiplier;
        if cycles >= 1.0 {
            let whole = cycles.floor();
            let consumed = host.run_cpu(whole as u32);
            self.drift = (whole - f64::from(consumed)) + (cycles - whole);
            consumed
        } else {
            self.drift = cycles;
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        Sample,
        Timer,
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<Event>,
        overrun: u32,
        multiplier: u32,
        update: Option<TimerUpdate>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                multiplier: 1,
                ..Self::default()
            }
        }
    }

    impl SchedulerHost for Recorder {
        fn run_cpu(&mut self, cycles: u32) -> u32 {
            cycles + self.overrun
        }

        fn timer_expired(&mut self) {
            self.log.push(Event::Timer);
        }

        fn audio_sample(&mut self) {
            self.log.push(Event::Sample);
        }

        fn timer_update(&mut self) -> Option<TimerUpdate> {
            self.update.take()
        }

        fn clock_multiplier(&self) -> u32 {
            self.multiplier
        }
    }

    #[test]
    fn line_converts_to_cycles() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        let events = sched.run(&mut host, NANOS_PER_LINE);
        assert_eq!(events.cycles, CYCLES_PER_LINE.floor() as u64);
        assert!(sched.drift() >= 0.0 && sched.drift() < 1.0);
    }

    #[test]
    fn drift_does_not_accumulate() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        let mut total = 0u64;
        for _ in 0..10_000 {
            total += sched.run(&mut host, NANOS_PER_LINE).cycles;
        }
        let expected = CYCLES_PER_LINE * 10_000.0;
        assert!((total as f64 - expected).abs() < 2.0);
    }

    #[test]
    fn overrun_is_paid_back() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        host.overrun = 3;
        let mut total = 0u64;
        for _ in 0..10_000 {
            total += sched.run(&mut host, NANOS_PER_LINE).cycles;
        }
        let expected = CYCLES_PER_LINE * 10_000.0;
        assert!((total as f64 - expected).abs() < 5.0);
        assert!(sched.drift().abs() < 5.0);
    }

    #[test]
    fn timer_splits_slice() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        sched.set_timer_period(16_000.0);
        let events = sched.run(&mut host, 64_000.0);
        assert_eq!(events.timer_interrupts, 4);
        assert_eq!(host.log, vec![Event::Timer; 4]);
    }

    #[test]
    fn samples_at_audio_rate() {
        let mut sched = Scheduler::new(8_000, 1);
        let mut host = Recorder::new();
        let events = sched.run(&mut host, 1.0e6);
        assert_eq!(events.samples, 8);
    }

    #[test]
    fn coincident_boundaries_sample_first() {
        let mut sched = Scheduler::new(1_000_000, 1);
        let mut host = Recorder::new();
        sched.set_timer_period(1_000.0);
        let events = sched.run(&mut host, 1_000.0);
        assert_eq!(events.samples, 1);
        assert_eq!(events.timer_interrupts, 1);
        assert_eq!(host.log, vec![Event::Sample, Event::Timer]);
    }

    #[test]
    fn reprogramming_waits_for_current_countdown() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        sched.set_timer_period(1_000.0);
        sched.run(&mut host, 400.0);
        sched.set_timer_period(5_000.0);
        let events = sched.run(&mut host, 600.0);
        assert_eq!(events.timer_interrupts, 1);
        let events = sched.run(&mut host, 4_999.0);
        assert_eq!(events.timer_interrupts, 0);
        let events = sched.run(&mut host, 1.0);
        assert_eq!(events.timer_interrupts, 1);
    }

    #[test]
    fn host_timer_update_applies_between_steps() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        host.update = Some(TimerUpdate::Period(2_000.0));
        sched.run(&mut host, 1_000.0);
        assert_eq!(sched.timer_period(), Some(2_000.0));
        let events = sched.run(&mut host, 2_000.0);
        assert_eq!(events.timer_interrupts, 1);
    }

    #[test]
    fn stopped_timer_stays_quiet() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        sched.set_timer_period(1_000.0);
        sched.run(&mut host, 2_500.0);
        host.update = Some(TimerUpdate::Stop);
        let events = sched.run(&mut host, 100.0);
        assert_eq!(events.timer_interrupts, 0);
        assert_eq!(sched.timer_period(), None);
        let events = sched.run(&mut host, 10_000.0);
        assert_eq!(events.timer_interrupts, 0);

        // Restarting counts a full period from now.
        sched.set_timer_period(1_000.0);
        assert_eq!(sched.run(&mut host, 999.0).timer_interrupts, 0);
        assert_eq!(sched.run(&mut host, 1.0).timer_interrupts, 1);
    }

    #[test]
    fn clock_multipliers_scale_cycles() {
        let mut sched = Scheduler::new(0, 2);
        let mut host = Recorder::new();
        host.multiplier = 2;
        let events = sched.run(&mut host, 1.0e6);
        let expected = CPU_HZ / 1.0e3 * 4.0;
        assert!((events.cycles as f64 - expected).abs() < 1.0);
    }

    #[test]
    fn sub_nanosecond_remainder_carries() {
        let mut sched = Scheduler::new(0, 1);
        let mut host = Recorder::new();
        let events = sched.run(&mut host, 0.5);
        assert_eq!(events.cycles, 0);
        sched.run(&mut host, 0.5);
        assert_eq!(sched.pending, 0.0);
    }
}
