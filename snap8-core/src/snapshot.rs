//! Fixed-layout machine state serialization.
//!
//! Field order, multi-byte values big-endian:
//!
//! | field        | bytes |
//! |--------------|-------|
//! | memory       | 4096  |
//! | V0..VF       | 16    |
//! | I            | 2     |
//! | PC           | 2     |
//! | stack        | 32    |
//! | SP           | 1     |
//! | delay timer  | 1     |
//! | sound timer  | 1     |
//! | display      | 256   |
//! | keypad       | 2     |
//!
//! The display is packed 8 pixels per byte, low bit first, and the keypad is
//! a 16-bit mask with bit `i` for key `i`.

use crate::{
    display::{Display, PACKED_SIZE},
    error::{Buffer, Error, Result},
    keyboard::Keypad,
    state::{Chip8State, MEMORY_SIZE, REGISTER_COUNT, STACK_SIZE},
};

pub const STATE_SIZE: usize =
    MEMORY_SIZE + REGISTER_COUNT + 2 + 2 + STACK_SIZE * 2 + 1 + 1 + 1 + PACKED_SIZE + 2;

pub fn encode(state: &Chip8State) -> Vec<u8> {
    let mut out = Vec::with_capacity(STATE_SIZE);
    out.extend_from_slice(&state.ram);
    out.extend_from_slice(&state.data_registers);
    out.extend_from_slice(&state.index_register.to_be_bytes());
    out.extend_from_slice(&state.program_counter.to_be_bytes());
    for address in state.stack {
        out.extend_from_slice(&address.to_be_bytes());
    }
    out.push(state.stack_pointer);
    out.push(state.delay_timer);
    out.push(state.sound_timer);
    out.extend_from_slice(&state.display.pack());
    out.extend_from_slice(&state.keypad.pack().to_be_bytes());
    debug_assert_eq!(out.len(), STATE_SIZE);
    out
}

/// Rebuilds a state from `bytes`. The length is checked before anything is
/// read.
pub fn decode(bytes: &[u8]) -> Result<Chip8State> {
    if bytes.len() != STATE_SIZE {
        return Err(Error::SizeMismatch {
            buffer: Buffer::State,
            expected: STATE_SIZE,
            actual: bytes.len(),
        });
    }
    let mut reader = Reader { bytes };

    let mut state = Chip8State::default();
    state.ram.copy_from_slice(reader.take(MEMORY_SIZE));
    state.data_registers.copy_from_slice(reader.take(REGISTER_COUNT));
    state.index_register = reader.word();
    state.program_counter = reader.word();
    for slot in state.stack.iter_mut() {
        *slot = reader.word();
    }
    state.stack_pointer = reader.byte();
    state.delay_timer = reader.byte();
    state.sound_timer = reader.byte();
    let mut packed = [0; PACKED_SIZE];
    packed.copy_from_slice(reader.take(PACKED_SIZE));
    state.display = Display::unpack(&packed);
    state.keypad = Keypad::unpack(reader.word());
    Ok(state)
}

/// Cursor over a buffer already known to be `STATE_SIZE` long.
struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> &'a [u8] {
        let (head, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        head
    }

    fn byte(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn word(&mut self) -> u16 {
        let pair = self.take(2);
        u16::from_be_bytes([pair[0], pair[1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REGISTERS_AT: usize = MEMORY_SIZE;
    const PC_AT: usize = REGISTERS_AT + REGISTER_COUNT + 2;
    const SP_AT: usize = PC_AT + 2 + STACK_SIZE * 2;
    const DISPLAY_AT: usize = SP_AT + 3;
    const KEYPAD_AT: usize = DISPLAY_AT + PACKED_SIZE;

    #[test]
    fn test_state_size() {
        assert_eq!(STATE_SIZE, 4409);
        assert_eq!(encode(&Chip8State::default()).len(), STATE_SIZE);
    }

    #[test]
    fn test_layout() {
        let mut state = Chip8State::default();
        state.data_registers[0xF] = 0x77;
        state.index_register = 0x0ABC;
        state.stack[1] = 0x0123;
        state.stack_pointer = 2;
        state.delay_timer = 9;
        state.sound_timer = 4;
        state.display.draw(0, 0, &[0x40]);
        state.keypad = Keypad::unpack(0x0102);

        let bytes = encode(&state);
        assert_eq!(bytes[..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(bytes[REGISTERS_AT + 0xF], 0x77);
        assert_eq!(bytes[REGISTERS_AT + REGISTER_COUNT..PC_AT], [0x0A, 0xBC]);
        assert_eq!(bytes[PC_AT..PC_AT + 2], [0x02, 0x00]);
        assert_eq!(bytes[PC_AT + 4..PC_AT + 6], [0x01, 0x23]);
        assert_eq!(bytes[SP_AT..DISPLAY_AT], [2, 9, 4]);
        assert_eq!(bytes[DISPLAY_AT], 0b0000_0010);
        assert_eq!(bytes[KEYPAD_AT..], [0x01, 0x02]);
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        for len in [0, STATE_SIZE - 1, STATE_SIZE + 1] {
            let err = decode(&vec![0; len]).unwrap_err();
            assert!(matches!(
                err,
                Error::SizeMismatch {
                    buffer: Buffer::State,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_decode_overwrites_font() -> Result<()> {
        let bytes = vec![0; STATE_SIZE];
        let state = decode(&bytes)?;
        assert!(state.ram.iter().all(|&b| b == 0));
        assert_eq!(state.program_counter, 0);
        Ok(())
    }

    proptest! {
        #[test]
        fn decode_then_encode_is_identity(bytes in proptest::collection::vec(any::<u8>(), STATE_SIZE)) {
            let state = decode(&bytes).unwrap();
            prop_assert_eq!(encode(&state), bytes);
        }
    }
}
