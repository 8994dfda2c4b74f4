//! Boot-keyboard input report and the character table used to fill it.

pub const KEYBOARD_ROLLOVER: usize = 6;
pub const HID_REPORT_SIZE: usize = KEYBOARD_ROLLOVER + 2;

/// Left shift in the modifier bit-set.
pub const MOD_SHIFT_LEFT: u8 = 1 << 1;

pub const KEY_A: u8 = 0x04;
pub const KEY_1: u8 = 0x1E;
pub const KEY_0: u8 = 0x27;
pub const KEY_ENTER: u8 = 0x28;
pub const KEY_TAB: u8 = 0x2B;
pub const KEY_SPACE: u8 = 0x2C;
pub const KEY_MINUS: u8 = 0x2D;
pub const KEY_DOT: u8 = 0x37;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; KEYBOARD_ROLLOVER],
}

impl KeyboardReport {
    pub const fn empty() -> Self {
        Self {
            modifiers: 0,
            keys: [0; KEYBOARD_ROLLOVER],
        }
    }

    /// Report that presses the key producing `ch`.
    ///
    /// The terminator (`0`) yields the all-zero release report and any byte outside the table
    /// yields a report with no usage, which the host ignores.
    pub const fn for_char(ch: u8) -> Self {
        let (modifiers, usage) = encode(ch);
        let mut report = Self::empty();
        report.modifiers = modifiers;
        report.keys[0] = usage;
        report
    }

    pub fn to_bytes(&self) -> [u8; HID_REPORT_SIZE] {
        let mut data = [0u8; HID_REPORT_SIZE];
        data[0] = self.modifiers;
        data[2..].copy_from_slice(&self.keys);
        data
    }

    pub fn from_bytes(bytes: &[u8; HID_REPORT_SIZE]) -> Self {
        let mut keys = [0u8; KEYBOARD_ROLLOVER];
        keys.copy_from_slice(&bytes[2..]);
        Self {
            modifiers: bytes[0],
            keys,
        }
    }

    pub fn is_release(&self) -> bool {
        self.modifiers == 0 && self.keys.iter().all(|key| *key == 0)
    }

    pub fn shifted(&self) -> bool {
        self.modifiers & MOD_SHIFT_LEFT != 0
    }
}

/// Map a character to `(modifiers, usage)`.
pub const fn encode(ch: u8) -> (u8, u8) {
    match ch {
        b'0' => (0, KEY_0),
        b'1'..=b'9' => (0, KEY_1 + (ch - b'1')),
        b'a'..=b'z' => (0, KEY_A + (ch - b'a')),
        b'A'..=b'Z' => (MOD_SHIFT_LEFT, KEY_A + (ch - b'A')),
        b'.' => (0, KEY_DOT),
        // Underscore is the hyphen key with shift held.
        b'_' => (MOD_SHIFT_LEFT, KEY_MINUS),
        b'-' => (0, KEY_MINUS),
        b' ' => (0, KEY_SPACE),
        b'\t' => (0, KEY_TAB),
        b'\n' => (0, KEY_ENTER),
        _ => (0, 0),
    }
}

/// Recover the character a report types on a US layout.
///
/// Release reports and reports without a usage return `None`.
pub fn decode(report: &KeyboardReport) -> Option<u8> {
    let usage = report.keys[0];
    let shift = report.shifted();
    let ch = match usage {
        KEY_A..=0x1D => {
            let offset = usage - KEY_A;
            if shift { b'A' + offset } else { b'a' + offset }
        }
        KEY_1..=0x26 if !shift => b'1' + (usage - KEY_1),
        KEY_0 if !shift => b'0',
        KEY_ENTER if !shift => b'\n',
        KEY_TAB if !shift => b'\t',
        KEY_SPACE if !shift => b' ',
        KEY_MINUS => {
            if shift { b'_' } else { b'-' }
        }
        KEY_DOT if !shift => b'.',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_follow_keypad_order() {
        assert_eq!(encode(b'1'), (0, 30));
        assert_eq!(encode(b'9'), (0, 38));
        assert_eq!(encode(b'0'), (0, 39));
    }

    #[test]
    fn letters_share_usage_and_differ_in_shift() {
        assert_eq!(encode(b'a'), (0, 4));
        assert_eq!(encode(b'z'), (0, 29));
        assert_eq!(encode(b'A'), (MOD_SHIFT_LEFT, 4));
        assert_eq!(encode(b'Z'), (MOD_SHIFT_LEFT, 29));
    }

    #[test]
    fn punctuation_and_whitespace() {
        assert_eq!(encode(b'.'), (0, 0x37));
        assert_eq!(encode(b'-'), (0, 0x2D));
        assert_eq!(encode(b'_'), (0x02, 0x2D));
        assert_eq!(encode(b' '), (0, 0x2C));
        assert_eq!(encode(b'\t'), (0, 0x2B));
        assert_eq!(encode(b'\n'), (0, 0x28));
    }

    #[test]
    fn terminator_is_a_release() {
        let report = KeyboardReport::for_char(0);
        assert!(report.is_release());
        assert_eq!(report.to_bytes(), [0u8; HID_REPORT_SIZE]);
    }

    #[test]
    fn unmapped_characters_carry_no_usage() {
        for ch in [b'!', b'@', b'~', 0x7F, 0xFF] {
            assert_eq!(KeyboardReport::for_char(ch).to_bytes(), [0u8; HID_REPORT_SIZE]);
        }
    }

    #[test]
    fn report_layout_is_boot_compatible() {
        let bytes = KeyboardReport::for_char(b'Q').to_bytes();
        assert_eq!(bytes, [MOD_SHIFT_LEFT, 0, 0x14, 0, 0, 0, 0, 0]);
        assert_eq!(KeyboardReport::from_bytes(&bytes), KeyboardReport::for_char(b'Q'));
    }

    #[test]
    fn decode_reads_back_shifted_underscore() {
        assert_eq!(decode(&KeyboardReport::for_char(b'_')), Some(b'_'));
        assert_eq!(decode(&KeyboardReport::empty()), None);
    }
}
