use crate::error::Result;

/// What a host layer needs from a machine: load a program, run it, look at
/// the screen, press keys, and snapshot everything.
pub trait Emulator {
    /// Loads a raw program image into program memory.
    fn load(&mut self, program: &[u8]) -> Result<()>;

    /// Runs one instruction and ticks the timers once.
    fn step(&mut self) -> Result<()>;

    /// Fills `buffer` with one byte per pixel, row-major.
    fn read_frame(&self, buffer: &mut [u8]) -> Result<()>;

    fn set_input(&mut self, input: &[bool]) -> Result<()>;

    fn get_state(&self) -> Vec<u8>;

    fn set_state(&mut self, bytes: &[u8]) -> Result<()>;

    fn debug_display(&self) -> String;

    /// Runs `steps` instructions and returns the frame that results.
    fn run_frame(&mut self, steps: usize, frame: &mut [u8]) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        self.read_frame(frame)
    }
}
