//! Owns the single input report and hands it to the transport one phase at a time.
//!
//! Hosts collapse repeated identical reports, so every key press is followed by an all-zero
//! release before the next character goes out.
use shared::hid::KeyboardReport;

use super::HidTransport;

#[derive(Debug, Default)]
pub struct KeystrokeTransmitter {
    report: KeyboardReport,
    sent: usize,
}

impl KeystrokeTransmitter {
    pub const fn new() -> Self {
        Self {
            report: KeyboardReport::empty(),
            sent: 0,
        }
    }

    /// Press the key for `ch`. Returns `false`, leaving the report untouched, if the transport
    /// is busy.
    pub fn send_key<T>(&mut self, transport: &mut T, ch: u8) -> bool
    where
        T: HidTransport + ?Sized,
    {
        self.transmit(transport, KeyboardReport::for_char(ch))
    }

    /// Release every key. Returns `false` if the transport is busy.
    pub fn release_key<T>(&mut self, transport: &mut T) -> bool
    where
        T: HidTransport + ?Sized,
    {
        self.transmit(transport, KeyboardReport::empty())
    }

    /// Last report handed to the transport.
    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }

    pub fn reports_sent(&self) -> usize {
        self.sent
    }

    fn transmit<T>(&mut self, transport: &mut T, report: KeyboardReport) -> bool
    where
        T: HidTransport + ?Sized,
    {
        if !transport.is_ready() {
            return false;
        }
        self.report = report;
        transport.transmit(&self.report.to_bytes());
        self.sent = self.sent.wrapping_add(1);
        true
    }
}
