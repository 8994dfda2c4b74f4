//! Selection colour shown on the addressable LED.
use shared::layout::SLOT_COUNT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);
pub const GREEN: Rgb = Rgb::new(0x00, 0xFF, 0x00);
pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xFF);
pub const YELLOW: Rgb = Rgb::new(0xFF, 0xFF, 0x00);
pub const MAGENTA: Rgb = Rgb::new(0xFF, 0x00, 0xFF);
pub const CYAN: Rgb = Rgb::new(0x00, 0xFF, 0xFF);
pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
pub const OFF: Rgb = Rgb::new(0x00, 0x00, 0x00);

/// One colour per slot, then the regenerate selection, which leaves the LED dark.
pub const PALETTE: [Rgb; SLOT_COUNT + 1] = [RED, GREEN, BLUE, YELLOW, MAGENTA, CYAN, WHITE, OFF];

/// Fire-and-forget LED sink. Wire order (e.g. GRB) is the driver's concern.
pub trait Indicator {
    fn show(&mut self, color: Rgb);
}

impl<I: Indicator + ?Sized> Indicator for &mut I {
    fn show(&mut self, color: Rgb) {
        (**self).show(color)
    }
}

/// Palette colour for a selection cursor; out-of-range cursors are shown dark.
pub fn color_for(cursor: usize) -> Rgb {
    PALETTE.get(cursor).copied().unwrap_or(OFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_slot_has_a_distinct_lit_colour() {
        for (index, color) in PALETTE[..SLOT_COUNT].iter().enumerate() {
            assert_ne!(*color, OFF);
            assert!(!PALETTE[..index].contains(color));
        }
    }

    #[test]
    fn regenerate_selection_is_dark() {
        assert_eq!(color_for(SLOT_COUNT), OFF);
        assert_eq!(color_for(SLOT_COUNT + 5), OFF);
    }
}
