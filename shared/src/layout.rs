//! Persistent slot layout: `SLOT_COUNT` slots of `SLOT_LEN` bytes, back to back, no header.

pub const SLOT_COUNT: usize = 7;
pub const SLOT_LEN: usize = 32;
pub const STORE_LEN: usize = SLOT_COUNT * SLOT_LEN;

/// Symbols a generated secret is drawn from.
pub const ALPHABET: &[u8; 63] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-";

/// Byte offset of `slot` in the backing storage.
pub const fn slot_offset(slot: usize) -> u32 {
    (slot * SLOT_LEN) as u32
}

pub fn is_secret_symbol(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}
