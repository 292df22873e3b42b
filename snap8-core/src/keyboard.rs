use crate::error::{Buffer, Error, Result};

pub const KEY_COUNT: usize = 16;

/// The usual layout of the hex keypad on the left-hand side of a QWERTY
/// keyboard.
pub const KEY_MAP: [(char, u8); KEY_COUNT] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// Looks up the keypad key bound to a keyboard character.
pub fn key_for_char(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    KEY_MAP
        .iter()
        .find(|(mapped, _)| *mapped == c)
        .map(|&(_, key)| key)
}

/// State of the 16-key hex keypad. Only the host changes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn set(&mut self, input: &[bool]) -> Result<()> {
        if input.len() != KEY_COUNT {
            return Err(Error::SizeMismatch {
                buffer: Buffer::Input,
                expected: KEY_COUNT,
                actual: input.len(),
            });
        }
        self.keys.copy_from_slice(input);
        Ok(())
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }

    /// Only the low nibble of `key` is significant.
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Lowest-numbered key currently held, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|i| i as u8)
    }

    /// Packs the keypad into 16 bits, bit `i` being key `i`.
    pub fn pack(&self) -> u16 {
        self.keys
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &down)| acc | ((down as u16) << i))
    }

    pub fn unpack(bits: u16) -> Self {
        let mut keypad = Self::default();
        for (i, key) in keypad.keys.iter_mut().enumerate() {
            *key = bits & (1u16 << i) != 0;
        }
        keypad
    }
}
