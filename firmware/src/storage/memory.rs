//! RAM-backed stand-in for the EEPROM, with optional write failure injection.
use embedded_storage::{ReadStorage, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    OutOfBounds { offset: u32, len: usize },
    /// The configured number of byte writes was exhausted, as if power had been lost.
    PowerLoss,
}

#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    bytes: [u8; N],
    writes_left: Option<usize>,
}

impl<const N: usize> MemoryStorage<N> {
    /// Erased EEPROM reads back as `0xFF`.
    pub fn erased() -> Self {
        Self::filled(0xFF)
    }

    pub fn filled(value: u8) -> Self {
        Self {
            bytes: [value; N],
            writes_left: None,
        }
    }

    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self {
            bytes,
            writes_left: None,
        }
    }

    /// Accept `bytes` more byte writes, then fail every write after that.
    pub fn fail_writes_after(&mut self, bytes: usize) {
        self.writes_left = Some(bytes);
    }

    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8; N] {
        &mut self.bytes
    }

    fn window(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, MemoryError> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= N => Ok(start..end),
            _ => Err(MemoryError::OutOfBounds { offset, len }),
        }
    }
}

impl<const N: usize> ReadStorage for MemoryStorage<N> {
    type Error = MemoryError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.window(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for MemoryStorage<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.window(offset, bytes.len())?;
        for (target, value) in self.bytes[range].iter_mut().zip(bytes) {
            if let Some(left) = self.writes_left.as_mut() {
                if *left == 0 {
                    return Err(MemoryError::PowerLoss);
                }
                *left -= 1;
            }
            *target = *value;
        }
        Ok(())
    }
}
