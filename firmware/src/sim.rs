//! In-memory peripherals for host tests and the simulator.
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};

use crate::hid::{HID_REPORT_SIZE, HidTransport};
use crate::indicator::{Indicator, Rgb};
use crate::system::Watchdog;

pub use crate::storage::memory::{MemoryError, MemoryStorage};

/// Records every report and exposes a configurable readiness schedule.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    reports: Vec<[u8; HID_REPORT_SIZE]>,
    ready: bool,
    ready_every: u32,
    polls: u32,
    attached: bool,
    reattachments: u32,
}

impl RecordingTransport {
    pub fn always_ready() -> Self {
        Self::ready_every(1)
    }

    /// Ready only on passes whose poll count is a multiple of `passes`.
    pub fn ready_every(passes: u32) -> Self {
        Self {
            reports: Vec::new(),
            ready: true,
            ready_every: passes.max(1),
            polls: 0,
            attached: true,
            reattachments: 0,
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn reports(&self) -> &[[u8; HID_REPORT_SIZE]] {
        &self.reports
    }

    pub fn take_reports(&mut self) -> Vec<[u8; HID_REPORT_SIZE]> {
        core::mem::take(&mut self.reports)
    }

    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub fn reattachments(&self) -> u32 {
        self.reattachments
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::always_ready()
    }
}

impl HidTransport for RecordingTransport {
    fn is_ready(&self) -> bool {
        self.ready && self.attached && self.polls.is_multiple_of(self.ready_every)
    }

    fn transmit(&mut self, report: &[u8; HID_REPORT_SIZE]) {
        self.reports.push(*report);
    }

    fn poll(&mut self) {
        self.polls = self.polls.wrapping_add(1);
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn attach(&mut self) {
        if !self.attached {
            self.reattachments += 1;
        }
        self.attached = true;
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingIndicator {
    shown: Vec<Rgb>,
}

impl RecordingIndicator {
    pub fn shown(&self) -> &[Rgb] {
        &self.shown
    }

    pub fn last(&self) -> Option<Rgb> {
        self.shown.last().copied()
    }
}

impl Indicator for RecordingIndicator {
    fn show(&mut self, color: Rgb) {
        self.shown.push(color);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CountingWatchdog {
    feeds: usize,
}

impl CountingWatchdog {
    pub fn feeds(&self) -> usize {
        self.feeds
    }
}

impl Watchdog for CountingWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinReadError;

impl digital::Error for PinReadError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Push button whose level is set by the test.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedButton {
    active_low: bool,
    pressed: bool,
    failing: bool,
}

impl ScriptedButton {
    /// Pull-up wiring: the pin reads low while pressed.
    pub fn active_low() -> Self {
        Self {
            active_low: true,
            pressed: false,
            failing: false,
        }
    }

    pub fn active_high() -> Self {
        Self {
            active_low: false,
            ..Self::active_low()
        }
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn fail_reads(&mut self, failing: bool) {
        self.failing = failing;
    }

    fn level_high(&self) -> Result<bool, PinReadError> {
        if self.failing {
            return Err(PinReadError);
        }
        Ok(self.pressed != self.active_low)
    }
}

impl ErrorType for ScriptedButton {
    type Error = PinReadError;
}

impl InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level_high().map(|high| !high)
    }
}

/// Returns immediately and adds up the requested time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelay {
    total_ns: u64,
}

impl NoopDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
