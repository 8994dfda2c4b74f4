#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod hid;
pub mod layout;
#[cfg(feature = "std")]
pub mod error;
