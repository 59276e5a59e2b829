//! `embedded_graphics` support for the pixel buffer
//!
//! Behind the "graphics" feature. Lets text, images or primitives from
//! `embedded_graphics` be drawn into the same [`FrameBuffer`] as the dial,
//! e.g. a battery glyph in a corner. Coordinates here are screen
//! coordinates (origin top left, y down), not dial coordinates.
use core::convert::TryInto;

use embedded_graphics_core::{pixelcolor::BinaryColor, prelude::*};

use crate::{framebuffer::FrameBuffer, HEIGHT, WIDTH};

const MAX_X: u32 = WIDTH as u32 - 1;
const MAX_Y: u32 = HEIGHT as u32 - 1;

impl DrawTarget for FrameBuffer {
    type Error = core::convert::Infallible;
    type Color = BinaryColor;

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        let byte: u8 = match color {
            BinaryColor::On => 0xff,
            BinaryColor::Off => 0x00,
        };
        self.fill(byte);
        Ok(())
    }

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Ok((x @ 0..=MAX_X, y @ 0..=MAX_Y)) = coord.try_into() {
                match color {
                    BinaryColor::On => self.set_pixel(x, y),
                    BinaryColor::Off => self.clear_pixel(x, y),
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH.into(), HEIGHT.into())
    }
}
