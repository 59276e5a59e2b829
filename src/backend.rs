//! Bit-banged link to the display controller
//!
//! Two wires carry the bytes (clock and data, MSB first, sampled on the
//! rising clock edge), a third tells command bytes from data bytes and a
//! fourth selects the chip. The data line is only touched when the next
//! bit differs from the one before it, so runs of equal bits (most of a
//! clock face is blank) cost nothing but clock edges.
//!
//! Use `BitBangBackend::new()` on slow cores that need no extra settling
//! time and `BitBangBackend::new_with_delay()` on fast ones.
use hal::blocking::delay::DelayUs;
use hal::digital::v2::OutputPin;

/// Byte level access to the display controller.
pub trait DisplayBackend {
    type Error;

    /// Send one byte in command mode.
    fn write_command(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Send one byte to display RAM.
    fn write_data(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Assert chip select.
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release chip select.
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Put every line at its idle level, for low power.
    fn park(&mut self) -> Result<(), Self::Error>;
}

/// Used to run without delay on a slow enough clock speed (below 8Mhz)
pub struct NoDelay {}

impl DelayUs<u8> for NoDelay {
    #[inline]
    fn delay_us(&mut self, _us: u8) {}
}

/// Display backend on four plain output pins
pub struct BitBangBackend<CLK, DIN, DC, CS, DELAY> {
    clk: CLK,
    din: DIN,
    dc: DC,
    cs: CS,
    delay: DELAY,
    din_high: bool,
}

impl<CLK, DIN, DC, CS, ERR> BitBangBackend<CLK, DIN, DC, CS, NoDelay>
where
    CLK: OutputPin<Error = ERR>,
    DIN: OutputPin<Error = ERR>,
    DC: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
{
    /// Constructs the backend without clock delays.
    /// If your core runs faster than 8Mhz please consider `new_with_delay`.
    pub fn new(
        clk: CLK,
        din: DIN,
        dc: DC,
        cs: CS,
    ) -> Result<BitBangBackend<CLK, DIN, DC, CS, NoDelay>, ERR> {
        Self::new_with_delay(clk, din, dc, cs, NoDelay {})
    }
}

impl<CLK, DIN, DC, CS, DELAY, ERR> BitBangBackend<CLK, DIN, DC, CS, DELAY>
where
    CLK: OutputPin<Error = ERR>,
    DIN: OutputPin<Error = ERR>,
    DC: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
    DELAY: DelayUs<u8>,
{
    /// Constructs the backend with a 1 µs delay after every clock edge.
    ///
    /// Leaves the clock and data lines low, the link in data mode and the
    /// chip deselected.
    pub fn new_with_delay(
        mut clk: CLK,
        mut din: DIN,
        mut dc: DC,
        mut cs: CS,
        delay: DELAY,
    ) -> Result<BitBangBackend<CLK, DIN, DC, CS, DELAY>, ERR> {
        clk.set_low()?;
        din.set_low()?;
        dc.set_high()?;
        cs.set_high()?;
        Ok(BitBangBackend {
            clk,
            din,
            dc,
            cs,
            delay,
            din_high: false,
        })
    }

    /// Gives the pins and the delay back
    pub fn release(self) -> (CLK, DIN, DC, CS, DELAY) {
        (self.clk, self.din, self.dc, self.cs, self.delay)
    }

    #[inline]
    fn write_bit(&mut self, high: bool) -> Result<(), ERR> {
        if high != self.din_high {
            if high {
                self.din.set_high()?;
            } else {
                self.din.set_low()?;
            }
            self.din_high = high;
        }
        self.clk.set_high()?;
        self.delay.delay_us(1);
        self.clk.set_low()?;
        self.delay.delay_us(1);
        Ok(())
    }

    fn write_byte(&mut self, mut value: u8) -> Result<(), ERR> {
        for _ in 0..8 {
            self.write_bit((value & 0x80) == 0x80)?;
            value <<= 1;
        }
        Ok(())
    }
}

impl<CLK, DIN, DC, CS, DELAY, ERR> DisplayBackend for BitBangBackend<CLK, DIN, DC, CS, DELAY>
where
    CLK: OutputPin<Error = ERR>,
    DIN: OutputPin<Error = ERR>,
    DC: OutputPin<Error = ERR>,
    CS: OutputPin<Error = ERR>,
    DELAY: DelayUs<u8>,
{
    type Error = ERR;

    // DC low means command, the link idles in data mode
    fn write_command(&mut self, value: u8) -> Result<(), ERR> {
        self.dc.set_low()?;
        self.write_byte(value)?;
        self.dc.set_high()
    }

    fn write_data(&mut self, value: u8) -> Result<(), ERR> {
        self.write_byte(value)
    }

    fn select(&mut self) -> Result<(), ERR> {
        self.cs.set_low()
    }

    fn deselect(&mut self) -> Result<(), ERR> {
        self.cs.set_high()
    }

    fn park(&mut self) -> Result<(), ERR> {
        self.clk.set_low()?;
        self.din.set_low()?;
        self.din_high = false;
        self.dc.set_low()?;
        self.cs.set_high()
    }
}
