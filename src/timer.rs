//! Busy-wait delays on a one-shot hardware counter
//!
//! Every protocol timing in this crate (single-wire slots, display edges,
//! frame pacing) comes out of this module. The counter runs at
//! [`TICKS_PER_US`] ticks per microsecond; a delay restarts it from zero,
//! programs the compare register with the scaled duration and spins on the
//! compare flag. No interrupts are involved.
//!
//! [`BusyWait`] implements the `embedded_hal` blocking delay traits, so the
//! bus and display code take any `DelayUs` provider and tests can swap in a
//! simulated clock.
use hal::blocking::delay::{DelayMs, DelayUs};

/// Counter resolution the protocol timings are calibrated for.
pub const TICKS_PER_US: u32 = 2;

// longest delay that still fits a 16 bit compare register
const MAX_CHUNK_US: u32 = u16::MAX as u32 / TICKS_PER_US;

/// A free running counter with a one-shot compare flag.
///
/// Implement this on whatever timer peripheral the board has spare.
pub trait OneShotCounter {
    /// Reset the counter to zero and clear a pending compare flag.
    fn restart(&mut self);

    /// Program the compare threshold, in counter ticks.
    fn set_compare(&mut self, ticks: u16);

    /// Whether the counter reached the compare threshold since `restart`.
    fn is_compare_pending(&mut self) -> bool;
}

/// Calibrated busy-wait delay provider.
pub struct BusyWait<C> {
    counter: C,
}

impl<C: OneShotCounter> BusyWait<C> {
    pub fn new(counter: C) -> Self {
        BusyWait { counter }
    }

    /// Releases the counter
    pub fn free(self) -> C {
        self.counter
    }

    fn wait_ticks(&mut self, ticks: u16) {
        self.counter.restart();
        self.counter.set_compare(ticks);
        while !self.counter.is_compare_pending() {
            core::hint::spin_loop();
        }
    }
}

impl<C: OneShotCounter> DelayUs<u32> for BusyWait<C> {
    fn delay_us(&mut self, us: u32) {
        let mut remaining = us;
        while remaining > 0 {
            let chunk = remaining.min(MAX_CHUNK_US);
            self.wait_ticks((chunk * TICKS_PER_US) as u16);
            remaining -= chunk;
        }
    }
}

impl<C: OneShotCounter> DelayUs<u16> for BusyWait<C> {
    fn delay_us(&mut self, us: u16) {
        DelayUs::<u32>::delay_us(self, u32::from(us));
    }
}

impl<C: OneShotCounter> DelayUs<u8> for BusyWait<C> {
    fn delay_us(&mut self, us: u8) {
        DelayUs::<u32>::delay_us(self, u32::from(us));
    }
}

impl<C: OneShotCounter> DelayMs<u32> for BusyWait<C> {
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            DelayUs::<u32>::delay_us(self, 1_000);
        }
    }
}

impl<C: OneShotCounter> DelayMs<u16> for BusyWait<C> {
    fn delay_ms(&mut self, ms: u16) {
        DelayMs::<u32>::delay_ms(self, u32::from(ms));
    }
}

impl<C: OneShotCounter> DelayMs<u8> for BusyWait<C> {
    fn delay_ms(&mut self, ms: u8) {
        DelayMs::<u32>::delay_ms(self, u32::from(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counter that reports the compare flag after a fixed number of polls
    struct MockCounter {
        compares: Vec<u16>,
        restarts: usize,
        polls_left: usize,
        polls_per_wait: usize,
    }

    impl MockCounter {
        fn new(polls_per_wait: usize) -> Self {
            Self {
                compares: Vec::new(),
                restarts: 0,
                polls_left: 0,
                polls_per_wait,
            }
        }
    }

    impl OneShotCounter for MockCounter {
        fn restart(&mut self) {
            self.restarts += 1;
            self.polls_left = self.polls_per_wait;
        }

        fn set_compare(&mut self, ticks: u16) {
            self.compares.push(ticks);
        }

        fn is_compare_pending(&mut self) -> bool {
            if self.polls_left == 0 {
                return true;
            }
            self.polls_left -= 1;
            false
        }
    }

    #[test]
    fn test_delay_scales_to_ticks() {
        let mut delay = BusyWait::new(MockCounter::new(3));
        DelayUs::<u16>::delay_us(&mut delay, 480);
        DelayUs::<u8>::delay_us(&mut delay, 6);

        let counter = delay.free();
        assert_eq!(counter.compares, vec![960, 12]);
        assert_eq!(counter.restarts, 2);
    }

    #[test]
    fn test_zero_delay_does_not_touch_counter() {
        let mut delay = BusyWait::new(MockCounter::new(1));
        DelayUs::<u32>::delay_us(&mut delay, 0);
        assert_eq!(delay.free().restarts, 0);
    }

    #[test]
    fn test_long_delay_is_chunked() {
        let mut delay = BusyWait::new(MockCounter::new(0));
        DelayUs::<u32>::delay_us(&mut delay, 70_000);

        let counter = delay.free();
        let total: u32 = counter.compares.iter().map(|&t| u32::from(t)).sum();
        assert_eq!(total, 70_000 * TICKS_PER_US);
        assert!(counter.compares.len() > 1);
    }

    #[test]
    fn test_delay_ms() {
        let mut delay = BusyWait::new(MockCounter::new(0));
        DelayMs::<u16>::delay_ms(&mut delay, 3);

        let counter = delay.free();
        assert_eq!(counter.compares, vec![2_000, 2_000, 2_000]);
    }
}
