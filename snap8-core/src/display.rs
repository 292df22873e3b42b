use crate::error::{Buffer, Error, Result};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;
/// Size of the display once packed 8 pixels per byte.
pub const PACKED_SIZE: usize = PIXEL_COUNT / 8;

/// Value written to a frame buffer for a lit pixel.
pub const PIXEL_ON: u8 = 255;
pub const PIXEL_OFF: u8 = 0;

/// Monochrome 64x32 display, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [bool; PIXEL_COUNT],
}

impl Default for Display {
    fn default() -> Self {
        Self {
            pixels: [false; PIXEL_COUNT],
        }
    }
}

impl Display {
    pub fn clear(&mut self) {
        self.pixels = [false; PIXEL_COUNT];
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.pixels[y * WIDTH + x]
    }

    pub fn pixels(&self) -> &[bool; PIXEL_COUNT] {
        &self.pixels
    }

    /// XORs `data` onto the display with its top-left corner at (x, y), one
    /// byte per row, most significant bit leftmost. Pixels falling off the
    /// right or bottom edge are dropped. Returns true if any lit pixel was
    /// turned off.
    pub fn draw(&mut self, x: u8, y: u8, data: &[u8]) -> bool {
        let mut collision = false;
        for (i, row_bits) in data.iter().enumerate() {
            let row = y as usize + i;
            if row >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let col = x as usize + j;
                if col >= WIDTH {
                    break;
                }
                if row_bits & (0x80u8 >> j) == 0 {
                    continue;
                }
                let pixel = &mut self.pixels[row * WIDTH + col];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        collision
    }

    /// Writes one byte per pixel into `buffer`.
    pub fn read_frame(&self, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() != PIXEL_COUNT {
            return Err(Error::SizeMismatch {
                buffer: Buffer::Frame,
                expected: PIXEL_COUNT,
                actual: buffer.len(),
            });
        }
        for (out, &lit) in buffer.iter_mut().zip(self.pixels.iter()) {
            *out = if lit { PIXEL_ON } else { PIXEL_OFF };
        }
        Ok(())
    }

    /// Packs the display 8 pixels per byte, low bit first: bit `j` of byte
    /// `i` is pixel `i * 8 + j`.
    pub fn pack(&self) -> [u8; PACKED_SIZE] {
        let mut packed = [0; PACKED_SIZE];
        for (byte, chunk) in packed.iter_mut().zip(self.pixels.chunks_exact(8)) {
            *byte = chunk
                .iter()
                .enumerate()
                .fold(0, |acc, (j, &lit)| acc | ((lit as u8) << j));
        }
        packed
    }

    pub fn unpack(packed: &[u8; PACKED_SIZE]) -> Self {
        let mut display = Self::default();
        for (chunk, byte) in display.pixels.chunks_exact_mut(8).zip(packed.iter()) {
            for (j, pixel) in chunk.iter_mut().enumerate() {
                *pixel = byte & (1u8 << j) != 0;
            }
        }
        display
    }

    /// Renders the display as text, `#` for lit pixels and `.` otherwise.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((WIDTH + 1) * HEIGHT);
        for row in self.pixels.chunks_exact(WIDTH) {
            out.extend(row.iter().map(|&lit| if lit { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}
