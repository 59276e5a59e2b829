//! Open drain line capability used by the single-wire bus
//!
//! The bus only ever needs three things from its pin: pull it low, let go of
//! it so the pull-up (or the peripheral) decides the level, and read that
//! level back. Any `embedded_hal` pin that is both an `OutputPin` and an
//! `InputPin` with the same error type gets this for free, which covers the
//! open drain pin types of the usual HAL crates. Setting the pin up as open
//! drain is the board's job.
use hal::digital::v2::{InputPin, OutputPin};

/// A bidirectional line that is either driven low or released.
pub trait OpenDrainLine {
    type Error;

    /// Drive the line low.
    fn set_output_low(&mut self) -> Result<(), Self::Error>;

    /// Stop driving the line, it floats up to the pull-up level unless
    /// something else holds it low.
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Current line level, `true` for high.
    fn read_level(&self) -> Result<bool, Self::Error>;
}

impl<P, E> OpenDrainLine for P
where
    P: OutputPin<Error = E> + InputPin<Error = E>,
{
    type Error = E;

    fn set_output_low(&mut self) -> Result<(), E> {
        OutputPin::set_low(self)
    }

    fn release(&mut self) -> Result<(), E> {
        OutputPin::set_high(self)
    }

    fn read_level(&self) -> Result<bool, E> {
        InputPin::is_high(self)
    }
}
