//! # Small module to provide "fake" pins
//!
//! Boards often tie the display chip select straight to ground, and a bench
//! setup may run without the RTC fitted. The driver structs still want a pin
//! for those, so hand them one of these.

use hal::digital::v2::{InputPin, OutputPin};

/// provides a dummy OutputPin.
///
/// Use it for a display line that is hard wired, typically chip select.
#[derive(Debug, Clone, Copy)]
pub struct DummyOutputPin;

impl OutputPin for DummyOutputPin {
    type Error = core::convert::Infallible;
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Provides a floating single-wire line with nothing attached.
///
/// Writes go nowhere and the pull-up keeps every read high, so a bus reset
/// reports no presence and every byte read comes back as `0xFF`.
#[derive(Debug, Clone, Copy)]
pub struct DummyLine;

impl OutputPin for DummyLine {
    type Error = core::convert::Infallible;
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl InputPin for DummyLine {
    type Error = core::convert::Infallible;
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
