pub mod display;
pub mod emulator;
pub mod error;
pub mod interpreter;
pub mod keyboard;
pub mod snapshot;
pub mod state;

pub use display::{Display, HEIGHT, PIXEL_COUNT, WIDTH};
pub use emulator::Emulator;
pub use error::{Buffer, Error, Result};
pub use interpreter::Chip8;
pub use keyboard::{key_for_char, Keypad, KEY_COUNT, KEY_MAP};
pub use snapshot::STATE_SIZE;
pub use state::{Chip8State, MAX_PROGRAM_SIZE, PROGRAM_START};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_frame() -> Result<()> {
        // I = font '0', draw it, loop forever
        let program = [0xA0, 0x00, 0xD0, 0x05, 0x12, 0x04];
        let mut chip8 = Chip8::with_seed(1);
        chip8.load(&program)?;
        let mut frame = vec![0; PIXEL_COUNT];
        chip8.run_frame(10, &mut frame)?;
        assert_eq!(&frame[..4], &[255, 255, 255, 255]);
        assert_eq!(chip8.program_counter(), 0x204);
        Ok(())
    }

    #[test]
    fn test_state_transfer_between_engines() -> Result<()> {
        let program = [0x60, 0x0A, 0xA0, 0x05, 0xD0, 0x05, 0x61, 0x07, 0xF1, 0x15, 0x12, 0x0A];
        let mut source = Chip8::with_seed(3);
        source.load(&program)?;
        for _ in 0..5 {
            source.step()?;
        }
        source.set_input(&[true; KEY_COUNT])?;

        let mut target = Chip8::new();
        target.set_state(&source.get_state())?;
        assert_eq!(target.state(), source.state());
        assert_eq!(target.debug_display(), source.debug_display());

        source.step()?;
        target.step()?;
        assert_eq!(target.get_state(), source.get_state());
        Ok(())
    }

    #[test]
    fn test_set_state_rejects_without_mutation() {
        let mut chip8 = Chip8::with_seed(0);
        chip8.load(&[0x60, 0x01]).unwrap();
        let before = chip8.get_state();
        assert!(chip8.set_state(&before[1..]).is_err());
        assert!(chip8.set_input(&[true; 3]).is_err());
        assert_eq!(chip8.get_state(), before);
    }
}
