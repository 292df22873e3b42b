use std::{fs, path::Path};

use log::{debug, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    display::Display,
    error::{Error, Result},
    keyboard::Keypad,
    snapshot,
    state::{Chip8State, FONT_GLYPH_SIZE, STACK_SIZE},
    Emulator,
};

/// The CHIP-8 engine. Owns the machine state and the random source used by
/// `RND`.
#[derive(Debug, Clone)]
pub struct Chip8 {
    state: Chip8State,
    rng: StdRng,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Engine whose `RND` results are reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            state: Chip8State::default(),
            rng,
        }
    }

    /// Reads a ROM file in full and loads it.
    pub fn load_rom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let program = fs::read(path)?;
        self.load_program(&program)
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.state.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Returns the machine to its power-on state. The random source is kept.
    pub fn reset(&mut self) {
        self.state = Chip8State::default();
    }

    pub fn state(&self) -> &Chip8State {
        &self.state
    }

    pub fn display(&self) -> &Display {
        &self.state.display
    }

    pub fn keypad(&self) -> &Keypad {
        &self.state.keypad
    }

    pub fn program_counter(&self) -> u16 {
        self.state.program_counter
    }

    pub fn index_register(&self) -> u16 {
        self.state.index_register
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.state.register(register_index & 0xF)
    }

    pub fn stack_pointer(&self) -> u8 {
        self.state.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// True while the sound timer is running.
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Executes one instruction, then ticks both timers. On error the
    /// program counter has already moved past the faulting instruction and
    /// the timers have not ticked.
    pub fn step(&mut self) -> Result<()> {
        self.execute_instruction()?;
        self.state.tick_timers();
        Ok(())
    }

    fn execute_instruction(&mut self) -> Result<()> {
        let state = &mut self.state;

        //fetch
        let address_of_opcode = state.program_counter;
        let opcode = state.fetch();
        state.program_counter = state.program_counter.wrapping_add(2);

        //decode
        let [byte_a, byte_b] = opcode.to_be_bytes();
        let nibble_0 = (byte_a & 0xF0) >> 4;
        let nibble_1 = byte_a & 0x0F;
        let nibble_2 = (byte_b & 0xF0) >> 4;
        let nibble_3 = byte_b & 0x0F;

        let address = opcode & 0x0FFF;
        let immediate_value = byte_b;

        trace!("{:03x}: {:04x}", address_of_opcode, opcode);

        match [nibble_0, nibble_1, nibble_2, nibble_3] {
            //clear display
            [0x0, 0x0, 0xE, 0x0] => state.display.clear(),
            //return
            [0x0, 0x0, 0xE, 0xE] => match state.stack_pointer as usize {
                0 => {
                    warn!("RET with empty stack at {:03x}", address_of_opcode);
                    return Err(Error::StackUnderflow {
                        address: address_of_opcode,
                    });
                }
                depth if depth > STACK_SIZE => {
                    warn!("RET with corrupt stack pointer {} at {:03x}", depth, address_of_opcode);
                    return Err(Error::StackOverflow {
                        address: address_of_opcode,
                    });
                }
                _ => state.program_counter = state.pop(),
            },
            //jump to address
            [0x1, _, _, _] => state.program_counter = address,
            //call subroutine
            [0x2, _, _, _] => {
                if state.stack_is_full() {
                    warn!("CALL with full stack at {:03x}", address_of_opcode);
                    return Err(Error::StackOverflow {
                        address: address_of_opcode,
                    });
                }
                state.push(state.program_counter);
                state.program_counter = address;
            }
            //skip if Vx == NN
            [0x3, vx, _, _] => {
                if state.register(vx) == immediate_value {
                    state.program_counter = state.program_counter.wrapping_add(2);
                }
            }
            //skip if Vx != NN
            [0x4, vx, _, _] => {
                if state.register(vx) != immediate_value {
                    state.program_counter = state.program_counter.wrapping_add(2);
                }
            }
            //skip if Vx == Vy
            [0x5, vx, vy, _] => {
                if state.register(vx) == state.register(vy) {
                    state.program_counter = state.program_counter.wrapping_add(2);
                }
            }
            //Vx = value
            [0x6, vx, _, _] => *state.register_mut(vx) = immediate_value,
            //Vx += value
            [0x7, vx, _, _] => {
                *state.register_mut(vx) = state.register(vx).wrapping_add(immediate_value)
            }
            //Vx = Vy
            [0x8, vx, vy, 0x0] => *state.register_mut(vx) = state.register(vy),
            //Vx |= Vy
            [0x8, vx, vy, 0x1] => *state.register_mut(vx) |= state.register(vy),
            //Vx &= Vy
            [0x8, vx, vy, 0x2] => *state.register_mut(vx) &= state.register(vy),
            //Vx ^= Vy
            [0x8, vx, vy, 0x3] => *state.register_mut(vx) ^= state.register(vy),
            //Vx += Vy
            [0x8, vx, vy, 0x4] => {
                let (result, overflow) = state.register(vx).overflowing_add(state.register(vy));
                state.set_flag(overflow);
                *state.register_mut(vx) = result;
            }
            //Vx -= Vy
            [0x8, vx, vy, 0x5] => {
                let (x, y) = (state.register(vx), state.register(vy));
                state.set_flag(x > y);
                *state.register_mut(vx) = x.wrapping_sub(y);
            }
            //Vx >>= 1
            [0x8, vx, _, 0x6] => {
                let value = state.register(vx);
                state.set_flag(value & 0x01 != 0);
                *state.register_mut(vx) = value >> 1;
            }
            //Vx = Vy - Vx
            [0x8, vx, vy, 0x7] => {
                let (x, y) = (state.register(vx), state.register(vy));
                state.set_flag(y > x);
                *state.register_mut(vx) = y.wrapping_sub(x);
            }
            //Vx <<= 1
            [0x8, vx, _, 0xE] => {
                let value = state.register(vx);
                state.set_flag(value & 0x80 != 0);
                *state.register_mut(vx) = value << 1;
            }
            // Skip if Vx != Vy
            [0x9, vx, vy, _] => {
                if state.register(vx) != state.register(vy) {
                    state.program_counter = state.program_counter.wrapping_add(2);
                }
            }
            //I = address
            [0xA, _, _, _] => state.index_register = address,
            // Jump to NNN + v0
            [0xB, _, _, _] => state.program_counter = state.register(0x0) as u16 + address,
            // Vx = rand() & NN
            [0xC, vx, _, _] => *state.register_mut(vx) = immediate_value & self.rng.gen::<u8>(),
            //Display sprite
            [0xD, vx, vy, rows] => {
                let x = state.register(vx);
                let y = state.register(vy);
                let sprite = state.read_from_index(rows as usize);
                let collision = state.display.draw(x, y, &sprite);
                state.set_flag(collision);
            }
            // skip if key()
            [0xE, vx, 0x9, 0xE] => {
                if state.keypad.is_key_down(state.register(vx)) {
                    state.program_counter = state.program_counter.wrapping_add(2);
                }
            }
            // skip if !key()
            [0xE, vx, 0xA, 0x1] => {
                if !state.keypad.is_key_down(state.register(vx)) {
                    state.program_counter = state.program_counter.wrapping_add(2);
                }
            }
            // Vx = delay timer
            [0xF, vx, 0x0, 0x7] => *state.register_mut(vx) = state.delay_timer,
            // Vx = get_key()
            [0xF, vx, 0x0, 0xA] => match state.keypad.first_pressed() {
                Some(key) => *state.register_mut(vx) = key,
                None => state.program_counter = address_of_opcode,
            },
            // Set delay timer to vx
            [0xF, vx, 0x1, 0x5] => state.delay_timer = state.register(vx),
            // Set sound timer to vx
            [0xF, vx, 0x1, 0x8] => state.sound_timer = state.register(vx),
            // I += Vx
            [0xF, vx, 0x1, 0xE] => {
                state.index_register = state
                    .index_register
                    .wrapping_add(state.register(vx) as u16);
            }
            // I = Vx'th character index
            [0xF, vx, 0x2, 0x9] => {
                state.index_register = state.register(vx) as u16 * FONT_GLYPH_SIZE;
            }
            // Convert and store Vx to decimal
            [0xF, vx, 0x3, 0x3] => {
                let value = state.register(vx);
                let i = state.index_register;
                state.write_byte(i, value / 100);
                state.write_byte(i.wrapping_add(1), value / 10 % 10);
                state.write_byte(i.wrapping_add(2), value % 10);
            }
            // Store everything up until Vx
            [0xF, vx, 0x5, 0x5] => {
                for i in 0..=vx {
                    let address = state.index_register.wrapping_add(i as u16);
                    state.write_byte(address, state.register(i));
                }
            }
            // Load everything up until Vx
            [0xF, vx, 0x6, 0x5] => {
                for i in 0..=vx {
                    let address = state.index_register.wrapping_add(i as u16);
                    *state.register_mut(i) = state.read_byte(address);
                }
            }
            _ => {
                warn!("unknown opcode {:04x} at {:03x}", opcode, address_of_opcode);
                return Err(Error::UnknownOpcode {
                    opcode,
                    address: address_of_opcode,
                });
            }
        }
        Ok(())
    }
}

impl Emulator for Chip8 {
    fn load(&mut self, program: &[u8]) -> Result<()> {
        self.load_program(program)
    }

    fn step(&mut self) -> Result<()> {
        Chip8::step(self)
    }

    fn read_frame(&self, buffer: &mut [u8]) -> Result<()> {
        self.state.display.read_frame(buffer)
    }

    fn set_input(&mut self, input: &[bool]) -> Result<()> {
        self.state.keypad.set(input)
    }

    fn get_state(&self) -> Vec<u8> {
        snapshot::encode(&self.state)
    }

    fn set_state(&mut self, bytes: &[u8]) -> Result<()> {
        self.state = snapshot::decode(bytes)?;
        debug!("restored machine state, pc {:03x}", self.state.program_counter);
        Ok(())
    }

    fn debug_display(&self) -> String {
        self.state.display.to_ascii()
    }
}
