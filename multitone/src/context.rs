//! This module provides the master clock context shared by every channel.
//! Currently, the only information wrapped is the master tick rate.

use crate::{ticks_for, Error, DEFAULT_MASTER_HZ, MIN_TONE_HZ};

/// The fastest supported master clock.  Anything faster would need a timer
/// period shorter than one microsecond.
const MAX_MASTER_HZ: u32 = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The single, fixed-rate time base driving all tone channels.  This is
/// configured once and does not change for the life of the process.
pub struct MasterClock {
    frequency_hz: u32,
}

impl MasterClock {
    /// Create a master clock running at 8kHz
    pub const fn new_8000() -> Self {
        Self {
            frequency_hz: DEFAULT_MASTER_HZ,
        }
    }
    /// Create a master clock if the rate provided is supported, or return
    /// `None` otherwise.
    pub fn maybe_create(frequency_hz: u32) -> Option<Self> {
        Self::try_from(frequency_hz).ok()
    }
    /// The tick rate, in Hz
    pub const fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }
    /// The interval between ticks, in whole microseconds
    pub const fn period_us(&self) -> u32 {
        1_000_000 / self.frequency_hz
    }
    /// The highest tone this clock can produce.  Half the tick rate, since a
    /// square wave needs at least one tick per half period.
    pub const fn max_tone_hz(&self) -> u32 {
        self.frequency_hz / 2
    }
    /// True if `desired_hz` can be played on this clock, i.e. it lies in
    /// `[MIN_TONE_HZ, max_tone_hz()]`
    pub const fn in_range(&self, desired_hz: u32) -> bool {
        desired_hz >= MIN_TONE_HZ && desired_hz <= self.max_tone_hz()
    }
    /// Number of ticks in one half period of `desired_hz` (see [ticks_for])
    pub const fn ticks_for(&self, desired_hz: u32) -> u32 {
        ticks_for(desired_hz, self.frequency_hz)
    }
}

impl Default for MasterClock {
    fn default() -> Self {
        Self::new_8000()
    }
}

impl TryFrom<u32> for MasterClock {
    type Error = Error;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1..=MAX_MASTER_HZ => Ok(Self {
                frequency_hz: value,
            }),
            _ => Err(Error::ClockOutOfRange(value)),
        }
    }
}
