//! A single tone channel and its per-tick state machine.

use embedded_hal::digital::v2::OutputPin;

use crate::{FrequencyFxP, MasterClock};

/// One tone slot, bound to one output pin.
///
/// A channel counts master clock ticks and, every `ticks_per_half_period`
/// ticks, performs an edge: if enabled the output level flips, otherwise it
/// is forced low.  A half period of zero means no frequency is set, and the
/// channel stays low and never toggles.
///
/// `enabled` and the half period are independent, so a channel can be
/// silenced while keeping its frequency and phase.  Disabling does not stop
/// the counter; it only changes what the next edge writes.
#[derive(Debug)]
pub struct Channel<P> {
    pin: P,
    ticks_per_half_period: u32,
    tick_counter: u32,
    enabled: bool,
    output_level: bool,
}

impl<P: OutputPin> Channel<P> {
    /// Create a channel with the given half period (in ticks).  The pin is
    /// driven low so the recorded level matches the hardware.
    pub(crate) fn new(mut pin: P, ticks_per_half_period: u32, enabled: bool) -> Self {
        let _ = pin.set_low();
        Self {
            pin,
            ticks_per_half_period,
            tick_counter: 0,
            enabled,
            output_level: false,
        }
    }

    /// Advance this channel by one master clock tick.  Constant time, never
    /// blocks.
    #[inline]
    pub(crate) fn step(&mut self) {
        if self.ticks_per_half_period == 0 {
            self.tick_counter = 0;
            if self.output_level {
                self.write_level(false);
            }
            return;
        }
        self.tick_counter += 1;
        if self.tick_counter >= self.ticks_per_half_period {
            self.tick_counter = 0;
            self.edge();
        }
    }

    /// Flip the output if enabled, otherwise force it low.  The only place a
    /// disable actually reaches the pin.
    fn edge(&mut self) {
        let level = self.enabled && !self.output_level;
        self.write_level(level);
    }

    fn write_level(&mut self, high: bool) {
        self.output_level = high;
        // A failed pin write has nowhere to be reported from interrupt
        // context; the next edge writes again anyway.
        let _ = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
    }

    /// Set a new half period and restart the count from zero
    pub(crate) fn retune(&mut self, ticks_per_half_period: u32) {
        self.tick_counter = 0;
        self.ticks_per_half_period = ticks_per_half_period;
    }

    /// Clear the frequency and drive the pin low immediately, whether or not
    /// the channel is enabled
    pub(crate) fn force_off(&mut self) {
        self.retune(0);
        self.write_level(false);
    }
}

impl<P> Channel<P> {
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// The pin this channel drives
    pub fn pin(&self) -> &P {
        &self.pin
    }
    /// Master clock ticks between consecutive edges, or 0 if silenced
    pub fn ticks_per_half_period(&self) -> u32 {
        self.ticks_per_half_period
    }
    /// Ticks elapsed since the last edge
    pub fn tick_counter(&self) -> u32 {
        self.tick_counter
    }
    /// True if edges toggle the output, false if they hold it low
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    /// The level most recently written to the pin (true is high)
    pub fn output_level(&self) -> bool {
        self.output_level
    }
    /// The frequency of the square wave this channel produces when enabled,
    /// or `None` if no frequency is set.
    ///
    /// A full cycle is two half periods, so this is
    /// `master / (2 * ticks_per_half_period)`: roughly half of the frequency
    /// that was requested through
    /// [MultiTone::set_frequency](crate::MultiTone::set_frequency).
    pub fn output_frequency(&self, clock: &MasterClock) -> Option<FrequencyFxP> {
        if self.ticks_per_half_period == 0 {
            return None;
        }
        let bits = (u64::from(clock.frequency_hz()) << FrequencyFxP::FRAC_NBITS)
            / (2 * u64::from(self.ticks_per_half_period));
        u32::try_from(bits).ok().map(FrequencyFxP::from_bits)
    }
}
