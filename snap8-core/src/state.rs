use crate::{
    display::Display,
    error::{Error, Result},
    keyboard::Keypad,
};

pub const MEMORY_SIZE: usize = 4096;
pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const PROGRAM_START: u16 = 0x200;
/// Largest ROM image that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Bytes per glyph in the built-in hex font.
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const FONT_SIZE: usize = 16 * FONT_GLYPH_SIZE as usize;

pub const FONT: [u8; FONT_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Complete machine state. Memory addresses wrap at 12 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8State {
    pub data_registers: [u8; REGISTER_COUNT],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub ram: [u8; MEMORY_SIZE],
    pub stack: [u16; STACK_SIZE],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub display: Display,
    pub keypad: Keypad,
}

impl Default for Chip8State {
    fn default() -> Self {
        let mut state = Self {
            data_registers: [0; REGISTER_COUNT],
            index_register: 0,
            program_counter: PROGRAM_START,
            stack_pointer: 0,
            ram: [0; MEMORY_SIZE],
            stack: [0; STACK_SIZE],
            delay_timer: 0,
            sound_timer: 0,
            display: Display::default(),
            keypad: Keypad::default(),
        };
        state.load_font_data(&FONT);
        state
    }
}

impl Chip8State {
    fn load_font_data(&mut self, fonts: &[u8; FONT_SIZE]) {
        self.ram[..FONT_SIZE].copy_from_slice(fonts);
    }

    /// Copies `program` to `PROGRAM_START`. Nothing else is touched, and
    /// nothing at all if the image does not fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::RomTooLarge {
                len: program.len(),
                capacity: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.data_registers[register_index as usize]
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.data_registers[register_index as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        *self.register_mut(0xF) = flag as u8;
    }

    pub fn read_byte(&self, address: u16) -> u8 {
        self.ram[address as usize % MEMORY_SIZE]
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.ram[address as usize % MEMORY_SIZE] = value;
    }

    /// Reads the big-endian instruction word at the program counter.
    pub fn fetch(&self) -> u16 {
        let pc = self.program_counter;
        u16::from_be_bytes([self.read_byte(pc), self.read_byte(pc.wrapping_add(1))])
    }

    /// `len` bytes starting at I, wrapping around the end of memory.
    pub fn read_from_index(&self, len: usize) -> Vec<u8> {
        (0..len as u16)
            .map(|offset| self.read_byte(self.index_register.wrapping_add(offset)))
            .collect()
    }

    pub fn stack_is_full(&self) -> bool {
        self.stack_pointer as usize >= STACK_SIZE
    }

    pub fn push(&mut self, address: u16) {
        self.stack[self.stack_pointer as usize] = address;
        self.stack_pointer += 1;
    }

    pub fn pop(&mut self) -> u16 {
        self.stack_pointer -= 1;
        self.stack[self.stack_pointer as usize]
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
