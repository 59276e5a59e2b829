//! Software timed single-wire bus
//!
//! One open drain line carries everything: the controller opens each slot
//! by pulling the line low and the length of the low pulse (or whether the
//! peripheral keeps the line low afterwards) encodes the bit. Every slot is
//! 70 µs long whatever the bit value, the peripheral samples relative to the
//! falling edge and gets confused otherwise.
//!
//! Bytes go least significant bit first. There is no CRC on this bus; a
//! missing peripheral reads back as all ones and that is passed on as is.
//!
//! The delay is borrowed per call rather than owned, so the bus, the display
//! and the session loop can share the one hardware counter.
use hal::blocking::delay::DelayUs;

use crate::pins::OpenDrainLine;

/// Reset pulse length.
pub const RESET_LOW_US: u16 = 480;
/// Wait after the reset pulse before sampling for presence.
pub const PRESENCE_SAMPLE_US: u16 = 70;
/// Rest of the presence window after the sample.
pub const PRESENCE_TAIL_US: u16 = 410;

/// Low time of a `1` write slot.
pub const WRITE_ONE_LOW_US: u16 = 6;
/// Release time of a `1` write slot.
pub const WRITE_ONE_RELEASE_US: u16 = 64;
/// Low time of a `0` write slot.
pub const WRITE_ZERO_LOW_US: u16 = 60;
/// Release time of a `0` write slot.
pub const WRITE_ZERO_RELEASE_US: u16 = 10;

/// Low time opening a read slot.
pub const READ_LOW_US: u16 = 6;
/// Wait between releasing the line and sampling it.
pub const READ_SAMPLE_US: u16 = 9;
/// Rest of the read slot after the sample.
pub const READ_TAIL_US: u16 = 55;

/// Length of every read and write slot.
pub const SLOT_US: u16 = 70;

/// Bus master on a single open drain line
pub struct OneWire<P> {
    line: P,
}

impl<P, E> OneWire<P>
where
    P: OpenDrainLine<Error = E>,
{
    /// Takes the line and leaves it released (idle high).
    pub fn new(mut line: P) -> Result<OneWire<P>, E> {
        line.release()?;
        Ok(OneWire { line })
    }

    /// Gives the line back
    pub fn free(self) -> P {
        self.line
    }

    /// Releases the line so it idles at the pull-up level.
    pub fn park(&mut self) -> Result<(), E> {
        self.line.release()
    }

    /// Resets the bus and reports whether a peripheral answered with a
    /// presence pulse.
    ///
    /// No presence is not an error here; the caller decides whether to skip
    /// the transaction or carry on regardless.
    pub fn reset<D: DelayUs<u16>>(&mut self, delay: &mut D) -> Result<bool, E> {
        self.line.set_output_low()?;
        delay.delay_us(RESET_LOW_US);
        self.line.release()?;
        delay.delay_us(PRESENCE_SAMPLE_US);
        let present = !self.line.read_level()?;
        delay.delay_us(PRESENCE_TAIL_US);
        Ok(present)
    }

    pub fn write_bit<D: DelayUs<u16>>(&mut self, delay: &mut D, bit: bool) -> Result<(), E> {
        let (low, release) = if bit {
            (WRITE_ONE_LOW_US, WRITE_ONE_RELEASE_US)
        } else {
            (WRITE_ZERO_LOW_US, WRITE_ZERO_RELEASE_US)
        };
        self.line.set_output_low()?;
        delay.delay_us(low);
        self.line.release()?;
        delay.delay_us(release);
        Ok(())
    }

    pub fn read_bit<D: DelayUs<u16>>(&mut self, delay: &mut D) -> Result<bool, E> {
        self.line.set_output_low()?;
        delay.delay_us(READ_LOW_US);
        self.line.release()?;
        delay.delay_us(READ_SAMPLE_US);
        let bit = self.line.read_level()?;
        delay.delay_us(READ_TAIL_US);
        Ok(bit)
    }

    pub fn write_byte<D: DelayUs<u16>>(&mut self, delay: &mut D, mut value: u8) -> Result<(), E> {
        for _ in 0..8 {
            self.write_bit(delay, value & 0x01 == 0x01)?;
            value >>= 1;
        }
        Ok(())
    }

    pub fn read_byte<D: DelayUs<u16>>(&mut self, delay: &mut D) -> Result<u8, E> {
        let mut value = 0;
        for i in 0..8 {
            if self.read_bit(delay)? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    pub fn write_bytes<D: DelayUs<u16>>(&mut self, delay: &mut D, bytes: &[u8]) -> Result<(), E> {
        for &byte in bytes {
            self.write_byte(delay, byte)?;
        }
        Ok(())
    }

    pub fn read_bytes<D: DelayUs<u16>>(&mut self, delay: &mut D, bytes: &mut [u8]) -> Result<(), E> {
        for byte in bytes.iter_mut() {
            *byte = self.read_byte(delay)?;
        }
        Ok(())
    }
}
