//! Raw EEPROM images: exactly `STORE_LEN` bytes, slot after slot.
use std::fs;
use std::io;
use std::path::Path;

use firmware::Config;
use shared::error::SharedError;
use shared::layout::{SLOT_COUNT, SLOT_LEN, STORE_LEN};

pub type Image = [u8; STORE_LEN];

pub fn read(path: &Path) -> Result<Image, SharedError> {
    let bytes = fs::read(path).map_err(|err| io_error("failed to read image", path, err))?;
    let found = bytes.len();
    bytes.try_into().map_err(|_| SharedError::ImageSize {
        expected: STORE_LEN,
        found,
    })
}

pub fn write(path: &Path, image: &Image) -> Result<(), SharedError> {
    fs::write(path, image).map_err(|err| io_error("failed to write image", path, err))
}

pub fn slot(image: &Image, index: usize) -> Option<&[u8]> {
    (index < SLOT_COUNT).then(|| &image[index * SLOT_LEN..(index + 1) * SLOT_LEN])
}

/// Load a JSON configuration. Missing fields keep their defaults.
pub fn read_config(path: &Path) -> Result<Config, SharedError> {
    let content =
        fs::read_to_string(path).map_err(|err| io_error("failed to read config", path, err))?;
    serde_json::from_str(&content)
        .map_err(|err| SharedError::Config(format!("{}: {err}", path.display())))
}

pub(crate) fn io_error(context: &str, path: &Path, err: io::Error) -> SharedError {
    SharedError::Image(format!("{context} at '{}': {err}", path.display()))
}
