use firmware::sim::{CountingWatchdog, MemoryStorage};
use firmware::{SecretStore, Tick};
use shared::error::SharedError;
use shared::layout::STORE_LEN;

use crate::InitArgs;
use crate::image::{self, Image};

pub fn run(args: &InitArgs) -> Result<(), SharedError> {
    if args.image.exists() && !args.force {
        return Err(SharedError::Image(format!(
            "'{}' already exists, pass --force to replace it",
            args.image.display()
        )));
    }

    let image = generate(args.seed)?;
    image::write(&args.image, &image)?;
    println!("Wrote {STORE_LEN}-byte image to {}", args.image.display());
    Ok(())
}

/// Fill an erased image the way a regenerate hold at tick `seed` would.
pub fn generate(seed: u16) -> Result<Image, SharedError> {
    let mut store = SecretStore::new(MemoryStorage::<STORE_LEN>::erased())
        .map_err(|err| SharedError::Storage(err.to_string()))?;
    store
        .regenerate_all(Tick(seed), &mut CountingWatchdog::default())
        .map_err(|err| SharedError::Storage(err.to_string()))?;
    Ok(*store.storage().bytes())
}
