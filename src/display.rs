//! # Display driver
//!
//! Keeps the configuration of the panel and turns frames and settings into
//! controller instructions. Bytes reach the controller through a
//! [`DisplayBackend`]; the frame itself lives in a separate
//! [`FrameBuffer`] owned by the caller, so drawing and sending are two
//! separate steps:
//!  - `FrameBuffer::clear()`
//!  - draw (see the `render` module)
//!  - `Display::flush()` writes the whole buffer through the RAM window
//!
//! `init()` has to run once after power-up before the first flush.
use crate::{
    backend::DisplayBackend,
    framebuffer::FrameBuffer,
    instructions::{prelude::*, DEFAULT_CONTRAST, INIT_SEQUENCE},
    PAGES, WIDTH,
};

/// Panel specific settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// First controller column that is visible on the glass
    pub column_offset: u8,
    pub contrast: u8,
}

impl Default for DisplayConfig {
    /// The common 64x48 module: columns 32..=95 of the controller RAM
    fn default() -> Self {
        DisplayConfig {
            column_offset: 32,
            contrast: DEFAULT_CONTRAST,
        }
    }
}

/// Driver for the 64x48 panel
pub struct Display<B> {
    backend: B,
    config: DisplayConfig,
}

impl<B> Display<B>
where
    B: DisplayBackend,
{
    pub fn new(backend: B, config: DisplayConfig) -> Self {
        Display { backend, config }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Gives the backend back
    pub fn release(self) -> B {
        self.backend
    }

    /// Sends the power-up configuration and, if it differs from the
    /// built-in value, the configured contrast.
    pub fn init(&mut self) -> Result<(), B::Error> {
        self.write_commands(&INIT_SEQUENCE)?;
        if self.config.contrast != DEFAULT_CONTRAST {
            self.write_instruction(SetContrast(self.config.contrast))?;
        }
        Ok(())
    }

    /// Writes the whole buffer to the visible window of display RAM.
    pub fn flush(&mut self, buffer: &FrameBuffer) -> Result<(), B::Error> {
        let first = self.config.column_offset;
        let window = [
            ColumnRange(first, first.saturating_add(WIDTH - 1)),
            PageRange(0, PAGES - 1),
        ];

        self.backend.select()?;
        for instruction in window.iter() {
            for &byte in instruction.encode().as_slice() {
                self.backend.write_command(byte)?;
            }
        }
        for byte in buffer.bytes() {
            self.backend.write_data(byte)?;
        }
        self.backend.deselect()
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), B::Error> {
        self.config.contrast = contrast;
        self.write_instruction(SetContrast(contrast))
    }

    /// Panel on or off; the display RAM survives an off period.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), B::Error> {
        self.write_instruction(DisplayOn(on))
    }

    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), B::Error> {
        self.write_instruction(Inverse(inverted))
    }

    /// Switches the panel off and parks the link lines for the halt.
    pub fn shutdown(&mut self) -> Result<(), B::Error> {
        self.set_display_on(false)?;
        self.backend.park()
    }

    /// Send a single instruction, opcode and parameters.
    pub fn write_instruction(&mut self, instruction: Instruction) -> Result<(), B::Error> {
        self.write_commands(instruction.encode().as_slice())
    }

    fn write_commands(&mut self, commands: &[u8]) -> Result<(), B::Error> {
        self.backend.select()?;
        for &command in commands {
            self.backend.write_command(command)?;
        }
        self.backend.deselect()
    }
}
