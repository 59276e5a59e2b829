//! # dialclock
//!
//! Firmware core for a battery powered analog clock: a 64x48 monochrome
//! display driven over a bit-banged synchronous link, and an RTC peripheral
//! on a single-wire bus that keeps a rolling seconds counter across power
//! loss. The clock face is drawn with integer arithmetic only.
//!
//! Everything is generic over `embedded_hal` 0.2 pins and delays, so the
//! crate itself never touches registers. The typical flow is:
//!  - build a [`timer::BusyWait`] (or any `DelayUs` provider)
//!  - build an [`onewire::OneWire`] on the RTC line and wrap it in [`rtc::Rtc`]
//!  - build a [`backend::BitBangBackend`] and a [`display::Display`] on top
//!  - hand everything to [`clock::Clock`] and call
//!    [`clock::Clock::render_current_time`] on every wake-up
//!
//! The `graphics` feature adds an `embedded_graphics` `DrawTarget` for the
//! pixel buffer; the `defmt` feature adds logging and `defmt::Format`
//! derives.
#![cfg_attr(not(test), no_std)]

extern crate embedded_hal as hal;

/// Width of the visible window in pixels (display columns).
pub const WIDTH: u8 = 64;
/// Height of the visible window in pixels.
pub const HEIGHT: u8 = 48;
/// Number of 8 pixel high pages.
pub const PAGES: u8 = HEIGHT / 8;
/// Size of the pixel buffer in bytes.
pub const BUFFER_SIZE: usize = WIDTH as usize * PAGES as usize;
/// Dial radius in pixels; the dial centre sits at column and row `RADIUS`.
pub const RADIUS: i16 = 23;

pub mod backend;
pub mod clock;
pub mod display;
#[cfg(feature = "graphics")]
pub mod drawtarget;
pub mod dummypins;
pub mod framebuffer;
pub mod instructions;
pub mod onewire;
pub mod pins;
pub mod render;
pub mod rtc;
pub mod timer;

#[cfg(test)]
mod mock;

pub use crate::{
    backend::{BitBangBackend, DisplayBackend, NoDelay},
    clock::{Clock, ClockConfig, TimeSetWizard},
    display::{Display, DisplayConfig},
    framebuffer::{FrameBuffer, Pen},
    onewire::OneWire,
    render::{render_face, Point},
    rtc::{Rtc, TimeRecord},
    timer::{BusyWait, OneShotCounter},
};
