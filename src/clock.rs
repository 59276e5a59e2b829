//! # Session controller
//!
//! Glue between the clock peripheral, the renderer and the display. The
//! board's main loop decides what to do on each wake-up; this module only
//! knows how to do it:
//!
//!  - [`Clock::run_time_set_wizard`] on a cold boot: write a time, show it,
//!    wait, move on a minute, forever. The user resets the board once the
//!    face shows the right time, and the peripheral counts on from there.
//!  - [`Clock::render_current_time`] on a normal wake-up: read the time once,
//!    then keep the face ticking from elapsed wall time for a while.
//!  - [`Clock::shutdown_display`] before the halt.
//!
//! Each call runs to completion; nothing here can be interrupted halfway
//! through a bus transaction or a frame.
use hal::blocking::delay::{DelayMs, DelayUs};

use crate::{
    backend::DisplayBackend,
    display::Display,
    framebuffer::FrameBuffer,
    pins::OpenDrainLine,
    render::render_face,
    rtc::{Rtc, TimeRecord},
};

const SECONDS_PER_STEP: u32 = 60;

/// Errors from either side of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<BusErr, DisplayErr> {
    /// The single-wire bus line
    Bus(BusErr),
    /// The display link
    Display(DisplayErr),
}

/// Session timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    /// Wall time the wizard shows each minute before moving on.
    pub wizard_interval_ms: u16,
    /// Time between two frames while showing the time.
    pub frame_period_ms: u16,
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            wizard_interval_ms: 1_000,
            frame_period_ms: 1_000,
        }
    }
}

/// State of the time-set procedure: the time that goes out next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeSetWizard {
    baseline: u32,
}

impl TimeSetWizard {
    pub fn new(start: u32) -> Self {
        TimeSetWizard { baseline: start }
    }

    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    /// Record for the current baseline
    pub fn record(&self) -> TimeRecord {
        TimeRecord::new(self.baseline)
    }

    /// One interval has passed: the next write is a minute later.
    pub fn advance(&mut self) {
        self.baseline = self.baseline.wrapping_add(SECONDS_PER_STEP);
    }
}

/// Owns everything a render pass or a bus transaction needs
pub struct Clock<P, B, D> {
    rtc: Rtc<P>,
    display: Display<B>,
    buffer: FrameBuffer,
    delay: D,
    config: ClockConfig,
}

impl<P, B, D, BusErr> Clock<P, B, D>
where
    P: OpenDrainLine<Error = BusErr>,
    B: DisplayBackend,
    D: DelayUs<u16> + DelayMs<u16>,
{
    pub fn new(rtc: Rtc<P>, display: Display<B>, delay: D, config: ClockConfig) -> Self {
        Clock {
            rtc,
            display,
            buffer: FrameBuffer::new(),
            delay,
            config,
        }
    }

    /// Brings the display up; call once after power-up.
    pub fn init(&mut self) -> Result<(), Error<BusErr, B::Error>> {
        self.display.init().map_err(Error::Display)
    }

    /// The last frame drawn
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Gives the parts back
    pub fn release(self) -> (Rtc<P>, Display<B>, D) {
        (self.rtc, self.display, self.delay)
    }

    /// One round of the time-set procedure: persist the wizard's time, show
    /// it without a second hand, wait one interval, step a minute on.
    pub fn wizard_step(&mut self, wizard: &mut TimeSetWizard) -> Result<(), Error<BusErr, B::Error>> {
        let record = wizard.record();
        #[cfg(feature = "defmt")]
        defmt::debug!("wizard: writing {} s", record.seconds);
        self.rtc
            .write_time(&mut self.delay, &record)
            .map_err(Error::Bus)?;
        self.show(&record, false)?;
        self.delay.delay_ms(self.config.wizard_interval_ms);
        wizard.advance();
        Ok(())
    }

    /// Runs the time-set procedure from `start` until the board is reset.
    ///
    /// Only comes back if a pin reports an error.
    pub fn run_time_set_wizard(&mut self, start: u32) -> Error<BusErr, B::Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("time-set from {} s", start);
        let mut wizard = TimeSetWizard::new(start);
        loop {
            if let Err(error) = self.wizard_step(&mut wizard) {
                return error;
            }
        }
    }

    /// Reads the time once and keeps the face up to date for `budget_s`
    /// seconds of wall time. Returns the record that was read.
    pub fn render_current_time(&mut self, budget_s: u32) -> Result<TimeRecord, Error<BusErr, B::Error>> {
        let record = self.rtc.read_time(&mut self.delay).map_err(Error::Bus)?;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "showing {}:{}:{}",
            record.hours(),
            record.minutes(),
            record.second_of_minute()
        );

        let budget_ms = budget_s.saturating_mul(1_000);
        let mut elapsed_ms: u32 = 0;
        while elapsed_ms < budget_ms {
            let now = record.advanced(elapsed_ms / 1_000);
            self.show(&now, true)?;
            self.delay.delay_ms(self.config.frame_period_ms);
            elapsed_ms = elapsed_ms.saturating_add(u32::from(self.config.frame_period_ms));
        }
        Ok(record)
    }

    /// Display off and every line parked, ready for the halt.
    pub fn shutdown_display(&mut self) -> Result<(), Error<BusErr, B::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("display shutdown");
        self.display.shutdown().map_err(Error::Display)?;
        self.rtc.park().map_err(Error::Bus)
    }

    fn show(&mut self, record: &TimeRecord, with_seconds: bool) -> Result<(), Error<BusErr, B::Error>> {
        let seconds = if with_seconds {
            Some(record.second_of_minute())
        } else {
            None
        };
        render_face(&mut self.buffer, record.hours(), record.minutes(), seconds);
        self.display.flush(&self.buffer).map_err(Error::Display)
    }
}
