//! Test doubles shared by the module tests
//!
//! `RtcSim` is a single-wire peripheral that understands the three clock
//! commands and keeps its own microsecond clock, advanced by `SimDelay`.
//! `WireLog` records every edge on the display link so tests can decode
//! what went over the wire.
use std::{cell::RefCell, convert::Infallible, rc::Rc, vec::Vec};

use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::{InputPin, OutputPin};

use crate::rtc::{READ_CLOCK, RECORD_LEN, SKIP_ROM, WRITE_CLOCK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Low,
    Release,
    Sample(bool),
    Wait(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimState {
    Idle,
    Rom,
    Function,
    Receive(usize),
    Send(usize, u8),
}

pub struct RtcSim {
    now: u64,
    low_since: u64,
    master_low: bool,
    slave_low: bool,
    present: bool,
    state: SimState,
    rx_byte: u8,
    rx_bits: u8,
    staging: [u8; RECORD_LEN],
    pub memory: [u8; RECORD_LEN],
    pub writes: Vec<[u8; RECORD_LEN]>,
    pub events: Vec<BusEvent>,
}

impl RtcSim {
    pub fn new(present: bool) -> Rc<RefCell<RtcSim>> {
        Rc::new(RefCell::new(RtcSim {
            now: 0,
            low_since: 0,
            master_low: false,
            slave_low: false,
            present,
            state: SimState::Idle,
            rx_byte: 0,
            rx_bits: 0,
            staging: [0; RECORD_LEN],
            memory: [0; RECORD_LEN],
            writes: Vec::new(),
            events: Vec::new(),
        }))
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    fn pull_low(&mut self) {
        self.events.push(BusEvent::Low);
        // any slot or presence pulse the peripheral was holding ends here
        self.slave_low = false;
        if !self.master_low {
            self.master_low = true;
            self.low_since = self.now;
        }
    }

    fn release(&mut self) {
        self.events.push(BusEvent::Release);
        if !self.master_low {
            return;
        }
        self.master_low = false;
        let low_for = self.now - self.low_since;
        if low_for >= 480 {
            self.state = SimState::Rom;
            self.rx_byte = 0;
            self.rx_bits = 0;
            self.slave_low = self.present;
        } else if self.present {
            if let SimState::Send(index, bit) = self.state {
                self.send_bit(index, bit);
            } else {
                self.receive_bit(low_for < 15);
            }
        }
    }

    fn send_bit(&mut self, index: usize, bit: u8) {
        let value = (self.memory[index] >> bit) & 1;
        self.slave_low = value == 0;
        self.state = match (index + 1, bit + 1) {
            (RECORD_LEN, 8) => SimState::Idle,
            (next, 8) => SimState::Send(next, 0),
            (_, next_bit) => SimState::Send(index, next_bit),
        };
    }

    fn receive_bit(&mut self, bit: bool) {
        self.rx_byte |= (bit as u8) << self.rx_bits;
        self.rx_bits += 1;
        if self.rx_bits < 8 {
            return;
        }
        let byte = self.rx_byte;
        self.rx_byte = 0;
        self.rx_bits = 0;
        self.state = match self.state {
            SimState::Rom if byte == SKIP_ROM => SimState::Function,
            SimState::Function if byte == WRITE_CLOCK => SimState::Receive(0),
            SimState::Function if byte == READ_CLOCK => SimState::Send(0, 0),
            SimState::Receive(index) => {
                self.staging[index] = byte;
                if index + 1 == RECORD_LEN {
                    self.memory = self.staging;
                    self.writes.push(self.staging);
                    SimState::Idle
                } else {
                    SimState::Receive(index + 1)
                }
            }
            _ => SimState::Idle,
        };
    }

    fn level(&mut self) -> bool {
        let level = !(self.master_low || self.slave_low);
        self.events.push(BusEvent::Sample(level));
        level
    }
}

/// The bus line as seen by the controller
pub struct SimLine(pub Rc<RefCell<RtcSim>>);

impl OutputPin for SimLine {
    type Error = Infallible;
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().pull_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().release();
        Ok(())
    }
}

impl InputPin for SimLine {
    type Error = Infallible;
    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.0.borrow_mut().level())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that only moves the simulated clock forward
pub struct SimDelay(pub Rc<RefCell<RtcSim>>);

impl DelayUs<u16> for SimDelay {
    fn delay_us(&mut self, us: u16) {
        let mut sim = self.0.borrow_mut();
        sim.now += u64::from(us);
        sim.events.push(BusEvent::Wait(u32::from(us)));
    }
}

impl DelayMs<u16> for SimDelay {
    fn delay_ms(&mut self, ms: u16) {
        let mut sim = self.0.borrow_mut();
        sim.now += u64::from(ms) * 1_000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Clk,
    Din,
    Dc,
    Cs,
}

pub type WireLog = Rc<RefCell<Vec<(Signal, bool)>>>;

/// Output pin that appends every write to a shared log
pub struct RecordingPin {
    signal: Signal,
    log: WireLog,
}

impl RecordingPin {
    pub fn new(signal: Signal, log: &WireLog) -> Self {
        RecordingPin {
            signal,
            log: log.clone(),
        }
    }
}

impl OutputPin for RecordingPin {
    type Error = Infallible;
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push((self.signal, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push((self.signal, true));
        Ok(())
    }
}

/// A byte as clocked into the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clocked {
    pub data: bool,
    pub selected: bool,
    pub byte: u8,
}

/// Replays a wire log the way the controller samples it: MSB first on the
/// rising clock edge.
pub fn decode(log: &[(Signal, bool)]) -> Vec<Clocked> {
    let mut out = Vec::new();
    let (mut din, mut dc, mut cs, mut clk) = (false, true, true, false);
    let (mut byte, mut bits) = (0u8, 0);
    for &(signal, level) in log {
        match signal {
            Signal::Din => din = level,
            Signal::Dc => dc = level,
            Signal::Cs => cs = level,
            Signal::Clk => {
                if level && !clk {
                    byte = (byte << 1) | din as u8;
                    bits += 1;
                    if bits == 8 {
                        out.push(Clocked {
                            data: dc,
                            selected: !cs,
                            byte,
                        });
                        byte = 0;
                        bits = 0;
                    }
                }
                clk = level;
            }
        }
    }
    out
}

pub fn wire_display_pins(
    log: &WireLog,
) -> (RecordingPin, RecordingPin, RecordingPin, RecordingPin) {
    (
        RecordingPin::new(Signal::Clk, log),
        RecordingPin::new(Signal::Din, log),
        RecordingPin::new(Signal::Dc, log),
        RecordingPin::new(Signal::Cs, log),
    )
}
