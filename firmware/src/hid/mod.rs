//! Keyboard side of the gadget: the transport contract and the press/release transmitter.
pub mod core;

pub use self::core::KeystrokeTransmitter;
pub use shared::hid::{HID_REPORT_SIZE, KeyboardReport};

/// USB interrupt endpoint carrying boot-keyboard input reports.
///
/// Enumeration and bit timing live behind this trait.
pub trait HidTransport {
    /// The host has collected the previous report and will accept another.
    fn is_ready(&self) -> bool;

    /// Hand one report to the endpoint. Only called after `is_ready` returned `true`.
    fn transmit(&mut self, report: &[u8; HID_REPORT_SIZE]);

    /// Service the bus. Called once per polling pass.
    fn poll(&mut self);

    /// Drop off the bus so the host re-enumerates on `attach`.
    fn detach(&mut self) {}

    fn attach(&mut self) {}
}

impl<T: HidTransport + ?Sized> HidTransport for &mut T {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn transmit(&mut self, report: &[u8; HID_REPORT_SIZE]) {
        (**self).transmit(report)
    }

    fn poll(&mut self) {
        (**self).poll()
    }

    fn detach(&mut self) {
        (**self).detach()
    }

    fn attach(&mut self) {
        (**self).attach()
    }
}
