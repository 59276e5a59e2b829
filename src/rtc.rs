//! # Clock peripheral on the single-wire bus
//!
//! The peripheral keeps a 5 byte record that survives power loss: a control
//! byte followed by a little-endian 32 bit seconds counter that the
//! peripheral itself keeps counting up. Three commands are enough:
//!
//!  - `SKIP_ROM` (0xCC) addresses every device; there is only one on the bus
//!  - `WRITE_CLOCK` (0x99) followed by the 5 record bytes
//!  - `READ_CLOCK` (0x66) followed by 5 bytes read back, the transaction is
//!    then ended with another bus reset
//!
//! Nothing is checked on the way back. A missing peripheral reads as
//! `0xFF` bytes and that becomes the record; the only symptom is a wrong
//! face on the display.
use hal::blocking::delay::DelayUs;

use crate::{onewire::OneWire, pins::OpenDrainLine};

/// Address all devices on the bus.
pub const SKIP_ROM: u8 = 0xCC;
/// Write the clock record.
pub const WRITE_CLOCK: u8 = 0x99;
/// Read the clock record.
pub const READ_CLOCK: u8 = 0x66;

/// Record size on the wire.
pub const RECORD_LEN: usize = 5;
/// Control byte written with every time-set.
pub const CONTROL_MARKER: u8 = 0x0C;

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 60 * SECONDS_PER_MINUTE;

/// Time as stored by the clock peripheral
///
/// `seconds` counts up from the last time-set. It is a plain 32 bit counter
/// and wraps after roughly 136 years; nothing here tries to handle that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeRecord {
    pub control: u8,
    pub seconds: u32,
}

impl TimeRecord {
    /// A record as the write path produces it, with the fixed control marker.
    pub fn new(seconds: u32) -> Self {
        TimeRecord {
            control: CONTROL_MARKER,
            seconds,
        }
    }

    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> Self {
        TimeRecord {
            control: bytes[0],
            seconds: u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let [s0, s1, s2, s3] = self.seconds.to_le_bytes();
        [self.control, s0, s1, s2, s3]
    }

    /// Same record, `elapsed` seconds later.
    pub fn advanced(&self, elapsed: u32) -> Self {
        TimeRecord {
            control: self.control,
            seconds: self.seconds.wrapping_add(elapsed),
        }
    }

    /// Hour on a 12 hour dial, 0..12
    pub fn hours(&self) -> u8 {
        (self.seconds / SECONDS_PER_HOUR % 12) as u8
    }

    /// 0..60
    pub fn minutes(&self) -> u8 {
        (self.seconds / SECONDS_PER_MINUTE % 60) as u8
    }

    /// 0..60
    pub fn second_of_minute(&self) -> u8 {
        (self.seconds % SECONDS_PER_MINUTE) as u8
    }
}

/// Session layer for the clock peripheral
pub struct Rtc<P> {
    bus: OneWire<P>,
}

impl<P, E> Rtc<P>
where
    P: OpenDrainLine<Error = E>,
{
    pub fn new(bus: OneWire<P>) -> Self {
        Rtc { bus }
    }

    /// Gives the bus back
    pub fn free(self) -> OneWire<P> {
        self.bus
    }

    /// Releases the bus line, for shutdown.
    pub fn park(&mut self) -> Result<(), E> {
        self.bus.park()
    }

    /// Persists `record` on the peripheral.
    pub fn write_time<D: DelayUs<u16>>(&mut self, delay: &mut D, record: &TimeRecord) -> Result<(), E> {
        let _present = self.bus.reset(delay)?;
        #[cfg(feature = "defmt")]
        if !_present {
            defmt::warn!("rtc: no presence on write, {} s lost", record.seconds);
        }
        self.bus.write_byte(delay, SKIP_ROM)?;
        self.bus.write_byte(delay, WRITE_CLOCK)?;
        self.bus.write_bytes(delay, &record.to_bytes())
    }

    /// Reads the record back. Whatever 5 bytes arrive are the answer.
    pub fn read_time<D: DelayUs<u16>>(&mut self, delay: &mut D) -> Result<TimeRecord, E> {
        let _present = self.bus.reset(delay)?;
        #[cfg(feature = "defmt")]
        if !_present {
            defmt::warn!("rtc: no presence on read");
        }
        self.bus.write_byte(delay, SKIP_ROM)?;
        self.bus.write_byte(delay, READ_CLOCK)?;

        let mut staging = [0u8; RECORD_LEN];
        self.bus.read_bytes(delay, &mut staging)?;
        self.bus.reset(delay)?;

        let record = TimeRecord::from_bytes(staging);
        #[cfg(feature = "defmt")]
        defmt::debug!("rtc: read {}", record);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummypins::DummyLine;
    use crate::mock::{BusEvent, RtcSim, SimDelay, SimLine};
    use proptest::prelude::*;

    fn sim_rtc(present: bool) -> (std::rc::Rc<std::cell::RefCell<RtcSim>>, Rtc<SimLine>, SimDelay) {
        let sim = RtcSim::new(present);
        let rtc = Rtc::new(OneWire::new(SimLine(sim.clone())).unwrap());
        let delay = SimDelay(sim.clone());
        (sim, rtc, delay)
    }

    #[test]
    fn test_record_layout() {
        let record = TimeRecord::new(0x0403_0201);
        assert_eq!(record.to_bytes(), [0x0C, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(TimeRecord::from_bytes([0x0C, 0x01, 0x02, 0x03, 0x04]), record);
    }

    #[test]
    fn test_derived_fields() {
        // 15:42:07 shows as 3:42:07 on the dial
        let record = TimeRecord::new(15 * 3600 + 42 * 60 + 7);
        assert_eq!(record.hours(), 3);
        assert_eq!(record.minutes(), 42);
        assert_eq!(record.second_of_minute(), 7);

        let later = record.advanced(53);
        assert_eq!(later.minutes(), 43);
        assert_eq!(later.second_of_minute(), 0);
        assert_eq!(later.control, CONTROL_MARKER);
    }

    #[test]
    fn test_write_puts_record_on_the_wire() {
        let (sim, mut rtc, mut delay) = sim_rtc(true);

        rtc.write_time(&mut delay, &TimeRecord::new(180)).unwrap();

        assert_eq!(sim.borrow().writes, vec![[0x0C, 180, 0, 0, 0]]);
    }

    #[test]
    fn test_read_ends_with_reset() {
        let (sim, mut rtc, mut delay) = sim_rtc(true);
        sim.borrow_mut().memory = [0x0C, 1, 0, 0, 0];

        let record = rtc.read_time(&mut delay).unwrap();
        assert_eq!(record.seconds, 1);

        let sim = sim.borrow();
        let tail = &sim.events[sim.events.len() - 6..];
        assert_eq!(tail[0], BusEvent::Low);
        assert_eq!(tail[1], BusEvent::Wait(480));
        assert_eq!(tail[5], BusEvent::Wait(410));
    }

    #[test]
    fn test_missing_peripheral_reads_garbage() {
        let sim = RtcSim::new(false);
        let mut delay = SimDelay(sim);
        let mut rtc = Rtc::new(OneWire::new(DummyLine).unwrap());

        rtc.write_time(&mut delay, &TimeRecord::new(42)).unwrap();
        let record = rtc.read_time(&mut delay).unwrap();

        assert_eq!(record, TimeRecord { control: 0xFF, seconds: u32::MAX });
    }

    proptest! {
        #[test]
        fn test_time_round_trip(seconds in any::<u32>()) {
            let (_sim, mut rtc, mut delay) = sim_rtc(true);
            let record = TimeRecord::new(seconds);

            rtc.write_time(&mut delay, &record).unwrap();
            prop_assert_eq!(rtc.read_time(&mut delay).unwrap(), record);
        }
    }
}
