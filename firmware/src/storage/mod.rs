//! Slot storage on byte-addressable persistent memory.
//!
//! Layout is `SLOT_COUNT` slots of `SLOT_LEN` bytes starting at offset 0, with no header and no
//! checksum. A regenerate pass writes one byte at a time and is not transactional: losing power
//! part way through leaves the slot being written half old, half new.
use embedded_storage::{ReadStorage, Storage};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use shared::layout::{ALPHABET, SLOT_COUNT, SLOT_LEN, STORE_LEN, slot_offset};
use zeroize::Zeroizing;

use crate::system::Watchdog;
use crate::tick::Tick;

/// Played back after a successful regenerate pass.
pub const REGENERATED_MESSAGE: &[u8] = b"new keys generated\n";

/// Largest multiple of the alphabet size that fits in a byte; draws at or above it are rejected.
const SYMBOL_DRAW_LIMIT: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

pub type SlotContent = Zeroizing<[u8; SLOT_LEN]>;

#[derive(Debug, PartialEq, Eq)]
pub enum StorageError<E> {
    Read(E),
    Write(E),
    SlotOutOfRange { slot: usize },
    CapacityTooSmall { required: usize, available: usize },
}

impl<E> core::fmt::Display for StorageError<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::Read(err) => write!(f, "storage read failed: {err:?}"),
            StorageError::Write(err) => write!(f, "storage write failed: {err:?}"),
            StorageError::SlotOutOfRange { slot } => {
                write!(f, "slot {slot} outside 0..{SLOT_COUNT}")
            }
            StorageError::CapacityTooSmall {
                required,
                available,
            } => write!(
                f,
                "storage holds {available} bytes but {required} are required"
            ),
        }
    }
}

impl<E> core::error::Error for StorageError<E> where E: core::fmt::Debug {}

/// Exclusive owner of the persisted secrets.
pub struct SecretStore<S> {
    storage: S,
}

impl<S> SecretStore<S>
where
    S: ReadStorage + Storage,
{
    pub fn new(storage: S) -> Result<Self, StorageError<S::Error>> {
        let available = storage.capacity();
        if available < STORE_LEN {
            return Err(StorageError::CapacityTooSmall {
                required: STORE_LEN,
                available,
            });
        }
        Ok(Self { storage })
    }

    /// Read a whole slot. The copy is wiped when dropped.
    pub fn read(&mut self, slot: usize) -> Result<SlotContent, StorageError<S::Error>> {
        if slot >= SLOT_COUNT {
            return Err(StorageError::SlotOutOfRange { slot });
        }

        let mut content = Zeroizing::new([0u8; SLOT_LEN]);
        self.storage
            .read(slot_offset(slot), content.as_mut_slice())
            .map_err(StorageError::Read)?;
        Ok(content)
    }

    /// Rewrite every slot from a generator seeded with the current tick.
    ///
    /// The seed has at most 16 bits of entropy; see DESIGN.md before relying on these secrets.
    pub fn regenerate_all<W>(
        &mut self,
        seed: Tick,
        watchdog: &mut W,
    ) -> Result<&'static [u8], StorageError<S::Error>>
    where
        W: Watchdog + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed.value()));
        self.regenerate_with(&mut rng, watchdog)
    }

    /// Rewrite every slot from `rng`, feeding the watchdog before each byte write.
    pub fn regenerate_with<R, W>(
        &mut self,
        rng: &mut R,
        watchdog: &mut W,
    ) -> Result<&'static [u8], StorageError<S::Error>>
    where
        R: RngCore + ?Sized,
        W: Watchdog + ?Sized,
    {
        for offset in 0..STORE_LEN {
            watchdog.feed();
            let symbol = draw_symbol(rng);
            self.storage
                .write(offset as u32, &[symbol])
                .map_err(StorageError::Write)?;
        }

        log::info!("regenerated {SLOT_COUNT} slots");
        Ok(REGENERATED_MESSAGE)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn draw_symbol<R: RngCore + ?Sized>(rng: &mut R) -> u8 {
    loop {
        let byte = (rng.next_u32() & 0xFF) as u8;
        if byte < SYMBOL_DRAW_LIMIT {
            return ALPHABET[usize::from(byte) % ALPHABET.len()];
        }
    }
}

#[cfg(any(test, feature = "sim"))]
pub mod memory;
