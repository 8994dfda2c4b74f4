#![cfg_attr(not(test), no_std)]

//! Firmware core for a one-button USB keyboard gadget that stores a handful of secrets and types
//! the selected one into the host.
//!
//! Everything here is hardware-agnostic: the board crate supplies the USB transport, LED driver,
//! watchdog, EEPROM, button pin, and timer interrupt through the traits re-exported below, then
//! calls [`KeyManager::start`] once and [`KeyManager::poll`] forever.

#[cfg(any(test, feature = "sim"))]
extern crate alloc;

pub mod config;
pub mod controller;
pub mod gesture;
pub mod hid;
pub mod indicator;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod storage;
pub mod system;
pub mod tick;

pub use config::{Config, GestureTiming};
pub use controller::{Controller, Outcome, PlaybackSource, Selection, Step};
pub use gesture::{Gesture, GestureClassifier, Target};
pub use hid::{HidTransport, KeystrokeTransmitter};
pub use indicator::{Indicator, Rgb};
pub use storage::{REGENERATED_MESSAGE, SecretStore, StorageError};
pub use system::{KeyManager, Pass, Peripherals, Watchdog};
pub use tick::{Tick, TickCounter, TickSource};
