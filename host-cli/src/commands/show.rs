use shared::error::SharedError;
use shared::layout::SLOT_COUNT;

use crate::ImageArgs;
use crate::image;

pub fn run(args: &ImageArgs) -> Result<(), SharedError> {
    let image = image::read(&args.image)?;
    for index in 0..SLOT_COUNT {
        if let Some(content) = image::slot(&image, index) {
            println!("slot {index}: {}", String::from_utf8_lossy(content));
        }
    }
    Ok(())
}
