use std::{fmt, io};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Names the fixed-size buffer a [`Error::SizeMismatch`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    Frame,
    Input,
    State,
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Buffer::Frame => "frame",
            Buffer::Input => "input",
            Buffer::State => "state",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("rom of {len} bytes does not fit in {capacity} bytes of program memory")]
    RomTooLarge { len: usize, capacity: usize },

    #[error("{buffer} buffer must be {expected} long, got {actual}")]
    SizeMismatch {
        buffer: Buffer,
        expected: usize,
        actual: usize,
    },

    #[error("unknown opcode {opcode:#06x} at {address:#05x}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("call stack overflow at {address:#05x}")]
    StackOverflow { address: u16 },

    #[error("return with empty call stack at {address:#05x}")]
    StackUnderflow { address: u16 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// True for faults raised while executing an instruction, as opposed to
    /// bad arguments handed to the engine.
    pub fn is_decode_fault(&self) -> bool {
        matches!(
            self,
            Error::UnknownOpcode { .. } | Error::StackOverflow { .. } | Error::StackUnderflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::UnknownOpcode {
            opcode: 0x5121,
            address: 0x200,
        };
        assert_eq!(err.to_string(), "unknown opcode 0x5121 at 0x200");

        let err = Error::SizeMismatch {
            buffer: Buffer::Frame,
            expected: 2048,
            actual: 12,
        };
        assert_eq!(err.to_string(), "frame buffer must be 2048 long, got 12");
    }

    #[test]
    fn test_decode_fault_classification() {
        assert!(Error::StackOverflow { address: 0x300 }.is_decode_fault());
        assert!(!Error::RomTooLarge {
            len: 4000,
            capacity: 3584
        }
        .is_decode_fault());
    }
}
