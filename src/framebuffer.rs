//! Off-screen pixel buffer
//!
//! The buffer has the same layout as the controller's display RAM: `PAGES`
//! horizontal bands of `WIDTH` bytes, each byte one column of 8 pixels with
//! bit 0 on top. A frame is built here and pushed out in one go by
//! [`Display::flush`](crate::display::Display::flush).
//!
//! Drawing uses dial coordinates: origin at the dial centre, y pointing up.
//! Pixels are only ever OR-ed in, so ticks can sit on the dial and hands on
//! the ticks without any ordering beyond drawing them last. That also means
//! the buffer has to be cleared before every frame or old hands linger.
use crate::{PAGES, RADIUS, WIDTH};

/// 1 bit per pixel, page organised frame buffer
#[derive(Clone)]
pub struct FrameBuffer {
    pages: [[u8; WIDTH as usize]; PAGES as usize],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        FrameBuffer {
            pages: [[0; WIDTH as usize]; PAGES as usize],
        }
    }

    /// Blank the whole buffer.
    pub fn clear(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0);
        }
    }

    /// Light the pixel at dial coordinates `(x, y)`.
    ///
    /// `row = RADIUS - y`, `col = x + RADIUS`. Anything that lands outside the
    /// buffer is dropped.
    pub fn plot(&mut self, x: i16, y: i16) {
        let row = i32::from(RADIUS) - i32::from(y);
        let col = i32::from(x) + i32::from(RADIUS);
        if row < 0 || col < 0 {
            return;
        }
        self.set_pixel(col as u32, row as u32);
    }

    /// Light the pixel at screen coordinates (origin top left, y down).
    pub fn set_pixel(&mut self, col: u32, row: u32) {
        if col < u32::from(WIDTH) && row < u32::from(PAGES) * 8 {
            self.pages[(row >> 3) as usize][col as usize] |= 1 << (row & 7);
        }
    }

    /// Turn the pixel at screen coordinates off.
    pub fn clear_pixel(&mut self, col: u32, row: u32) {
        if col < u32::from(WIDTH) && row < u32::from(PAGES) * 8 {
            self.pages[(row >> 3) as usize][col as usize] &= !(1 << (row & 7));
        }
    }

    pub fn is_set(&self, col: u32, row: u32) -> bool {
        col < u32::from(WIDTH)
            && row < u32::from(PAGES) * 8
            && self.pages[(row >> 3) as usize][col as usize] & (1 << (row & 7)) != 0
    }

    /// Buffer contents in display RAM order, page by page.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.pages.iter().flat_map(|page| page.iter().copied())
    }

    #[cfg(any(test, feature = "graphics"))]
    pub(crate) fn fill(&mut self, byte: u8) {
        self.pages = [[byte; WIDTH as usize]; PAGES as usize];
    }

    /// No pixel lit.
    pub fn is_blank(&self) -> bool {
        self.bytes().all(|byte| byte == 0)
    }
}

/// Pen position for line drawing
///
/// Lives for one render pass; `move_to` picks the pen up, `line_to` drags it
/// across the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pen {
    x: i16,
    y: i16,
}

impl Pen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> (i16, i16) {
        (self.x, self.y)
    }

    pub fn move_to(&mut self, x: i16, y: i16) {
        self.x = x;
        self.y = y;
    }

    /// Bresenham line from the pen to `(x, y)`, both ends included. The pen
    /// ends up at `(x, y)`.
    pub fn line_to(&mut self, buffer: &mut FrameBuffer, x: i16, y: i16) {
        let (x0, y0) = (i32::from(self.x), i32::from(self.y));
        let (x1, y1) = (i32::from(x), i32::from(y));
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        // every point lies between the two i16 ends
        let (mut cx, mut cy) = (x0, y0);
        loop {
            buffer.plot(cx as i16, cy as i16);
            if cx == x1 && cy == y1 {
                break;
            }
            let e2 = err << 1;
            if e2 > -dy {
                err -= dy;
                cx += sx;
            }
            if e2 < dx {
                err += dx;
                cy += sy;
            }
        }

        self.move_to(x, y);
    }
}
