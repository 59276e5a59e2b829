//! # Instruction set of the display controller
//!
//! The glass is a 64x48 panel on an SSD1306 class controller. The
//! controller has RAM for 128 columns and 8 pages; this panel only shows
//! columns 32..=95 and pages 0..=5, so every frame is written through a
//! column/page window.
//!
//! Instructions are modelled after the data sheet. Most are a single byte
//! with the argument OR-ed into the low bits, some take one or two parameter
//! bytes. Parameters go over the wire in command mode just like the opcode.

/// Contrast the init sequence leaves the panel at.
pub const DEFAULT_CONTRAST: u8 = 0xCF;

/// Power-up configuration, sent once as command bytes before anything is
/// drawn.
pub const INIT_SEQUENCE: [u8; 23] = [
    0xAE, // display off
    0xD5, 0x80, // clock divide ratio / oscillator
    0xA8, 0x2F, // multiplex ratio: 48 rows
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan reversed
    0xDA, 0x12, // alternative COM pins
    0x81, DEFAULT_CONTRAST,
    0xD9, 0xF1, // pre-charge period
    0xDB, 0x40, // VCOMH deselect level
    0xA4, // show RAM contents
    0xA6, // normal, not inverted
    0xAF, // display on
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// How the RAM pointer advances after each data byte.
pub enum AddressingMode {
    /// column first, wrapping into the next page at the end of the window
    Horizontal = 0b00,
    /// page first, wrapping into the next column
    Vertical = 0b01,
    /// column only, page stays put
    Page = 0b10,
}

/// Controller instructions, see data sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instruction {
    /// panel on or off (sleep); RAM is kept either way
    // 0xAE | on
    DisplayOn(bool),

    /// contrast, 0..=255
    // 0x81, contrast
    SetContrast(u8),

    /// light every pixel regardless of RAM
    // 0xA4 | on
    EntireDisplayOn(bool),

    /// swap lit and dark pixels
    // 0xA6 | inverse
    Inverse(bool),

    // 0xD5, divide ratio and oscillator frequency
    SetClockDivide(u8),

    /// number of rows driven, minus one
    // 0xA8, ratio
    SetMultiplexRatio(u8),

    // 0xD3, vertical shift
    SetDisplayOffset(u8),

    /// RAM row shown on the top line, 0..=63
    // 0x40 | line
    SetStartLine(u8),

    // 0x8D, 0x14 on / 0x10 off
    ChargePump(bool),

    // 0x20, mode
    SetAddressingMode(AddressingMode),

    /// mirror columns
    // 0xA0 | remap
    SegmentRemap(bool),

    /// mirror rows
    // 0xC0 normal, 0xC8 reversed
    ComScanReversed(bool),

    // 0xDA, pin configuration
    SetComPins(u8),

    // 0xD9, phase 1 and 2 periods
    SetPrecharge(u8),

    // 0xDB, level
    SetVcomDeselect(u8),

    /// column window for the following data, inclusive
    // 0x21, start, end
    ColumnRange(u8, u8),

    /// page window for the following data, inclusive
    // 0x22, start, end
    PageRange(u8, u8),
}

use Instruction::*;

/// An instruction as it goes over the wire, opcode plus parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    bytes: [u8; 3],
    len: usize,
}

impl Encoded {
    fn one(opcode: u8) -> Self {
        Encoded { bytes: [opcode, 0, 0], len: 1 }
    }

    fn two(opcode: u8, param: u8) -> Self {
        Encoded { bytes: [opcode, param, 0], len: 2 }
    }

    fn three(opcode: u8, first: u8, second: u8) -> Self {
        Encoded { bytes: [opcode, first, second], len: 3 }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Instruction {
    /// Returns the bytes to send in command mode
    pub fn encode(self) -> Encoded {
        match self {
            DisplayOn(on) => Encoded::one(0b1010_1110 | on as u8),
            SetContrast(contrast) => Encoded::two(0x81, contrast),
            EntireDisplayOn(on) => Encoded::one(0b1010_0100 | on as u8),
            Inverse(inverse) => Encoded::one(0b1010_0110 | inverse as u8),
            SetClockDivide(value) => Encoded::two(0xD5, value),
            SetMultiplexRatio(ratio) => Encoded::two(0xA8, ratio & 0x3F),
            SetDisplayOffset(offset) => Encoded::two(0xD3, offset & 0x3F),
            SetStartLine(line) => Encoded::one(0b0100_0000 | (line & 0x3F)),
            ChargePump(on) => Encoded::two(0x8D, if on { 0x14 } else { 0x10 }),
            SetAddressingMode(mode) => Encoded::two(0x20, mode as u8),
            SegmentRemap(remap) => Encoded::one(0b1010_0000 | remap as u8),
            ComScanReversed(reversed) => Encoded::one(if reversed { 0xC8 } else { 0xC0 }),
            SetComPins(value) => Encoded::two(0xDA, value),
            SetPrecharge(value) => Encoded::two(0xD9, value),
            SetVcomDeselect(level) => Encoded::two(0xDB, level),
            ColumnRange(start, end) => Encoded::three(0x21, start & 0x7F, end & 0x7F),
            PageRange(start, end) => Encoded::three(0x22, start & 0x07, end & 0x07),
        }
    }
}

/// A prelude for convenience, it pulls all enums into scope.
pub mod prelude {
    pub use super::{
        AddressingMode, AddressingMode::*,
        Instruction, Instruction::*,
    };
}
