use arrayvec::ArrayVec;
use embedded_hal::digital::v2::OutputPin;

use crate::{Channel, MasterClock, TickTimer, MAX_TONES};

/// The tone engine: a fixed bank of up to [MAX_TONES] channels sharing one
/// [MasterClock].
///
/// This is the owned context behind the whole control API.  It is a plain
/// value with `&mut self` methods; to share it with an interrupt handler wrap
/// it in a [SharedMultiTone](crate::SharedMultiTone).
///
/// None of the control methods fail.  Indices past [MultiTone::len] are
/// ignored and out-of-range frequencies silence the channel.
#[derive(Debug)]
pub struct MultiTone<P> {
    clock: MasterClock,
    channels: ArrayVec<Channel<P>, MAX_TONES>,
}

impl<P: OutputPin> MultiTone<P> {
    /// Build the channel bank without starting any timer.
    ///
    /// Only the first `count` entries are used, and never more than
    /// [MAX_TONES] or more than `frequencies` and `pins` supply.  Each
    /// channel with a positive frequency starts enabled; a frequency of 0
    /// leaves it disabled and silent.  Every pin is driven low.
    pub fn new<I>(clock: MasterClock, frequencies: &[u32], pins: I, count: usize) -> Self
    where
        I: IntoIterator<Item = P>,
    {
        if count > MAX_TONES {
            log::warn!("{} tones requested, only using {}", count, MAX_TONES);
        }
        let channels: ArrayVec<Channel<P>, MAX_TONES> = frequencies
            .iter()
            .zip(pins)
            .take(count.min(MAX_TONES))
            .map(|(&hz, pin)| {
                if hz > 0 {
                    Channel::new(pin, clock.ticks_for(hz), true)
                } else {
                    Channel::new(pin, 0, false)
                }
            })
            .collect();
        log::debug!(
            "multitone: {} channels on a {} Hz master clock",
            channels.len(),
            clock.frequency_hz()
        );
        Self { clock, channels }
    }

    /// Build the channel bank and start the master clock on `timer`.
    ///
    /// The timer is the only thing that calls [MultiTone::tick], so the caller
    /// must already have arranged for its interrupt to reach this engine.
    /// Use [SharedMultiTone::start](crate::SharedMultiTone::start) when the
    /// engine lives in a `static`.
    pub fn initialize<I, T>(
        clock: MasterClock,
        frequencies: &[u32],
        pins: I,
        count: usize,
        timer: T,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        T: TickTimer,
    {
        let ret = Self::new(clock, frequencies, pins, count);
        start_clock(&clock, timer);
        ret
    }

    /// Run one master clock tick across every channel, in index order.
    ///
    /// This is the interrupt handler body.  It takes constant time per
    /// channel and never blocks.
    pub fn tick(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.step();
        }
    }

    /// Change the frequency of channel `index`.
    ///
    /// The tick counter restarts from zero.  A frequency outside
    /// `[MIN_TONE_HZ, max_tone_hz()]` clears the channel's half period and
    /// drives its pin low immediately, regardless of whether it is enabled.
    pub fn set_frequency(&mut self, index: usize, desired_hz: u32) {
        let clock = self.clock;
        let Some(channel) = self.channels.get_mut(index) else {
            return;
        };
        if clock.in_range(desired_hz) {
            let ticks = clock.ticks_for(desired_hz);
            log::trace!("multitone: channel {} at {} Hz ({} ticks)", index, desired_hz, ticks);
            channel.retune(ticks);
        } else {
            log::debug!("multitone: {} Hz out of range, silencing channel {}", desired_hz, index);
            channel.force_off();
        }
    }

    /// Clear channel `index`'s frequency and drive its pin low now
    pub fn silence(&mut self, index: usize) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.force_off();
        }
    }
}

impl<P> MultiTone<P> {
    /// Let channel `index` toggle again from wherever its counter stands.
    /// Nothing is written to the pin until its next edge.
    pub fn enable(&mut self, index: usize) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.set_enabled(true);
        }
    }

    /// Hold channel `index` low from its next edge on.  Its frequency and
    /// counter are kept, so [MultiTone::enable] resumes without realigning.
    pub fn disable(&mut self, index: usize) {
        if let Some(channel) = self.channels.get_mut(index) {
            channel.set_enabled(false);
        }
    }

    /// The master clock all channels run on
    pub fn clock(&self) -> &MasterClock {
        &self.clock
    }

    /// Number of active channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if no channels were configured
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel `index`, if it exists
    pub fn channel(&self, index: usize) -> Option<&Channel<P>> {
        self.channels.get(index)
    }

    /// All active channels, in index order
    pub fn channels(&self) -> impl Iterator<Item = &Channel<P>> {
        self.channels.iter()
    }
}

pub(crate) fn start_clock<T: TickTimer>(clock: &MasterClock, mut timer: T) {
    log::debug!("multitone: master clock every {} us", clock.period_us());
    timer.schedule(clock.period_us());
    timer.start();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockPin, MockTimer};
    use crate::ticks_for;

    fn pins(n: u8) -> impl Iterator<Item = MockPin> {
        (0..n).map(MockPin::new)
    }

    fn engine(freqs: &[u32]) -> MultiTone<MockPin> {
        MultiTone::new(MasterClock::new_8000(), freqs, pins(freqs.len() as u8), freqs.len())
    }

    #[test]
    fn initialize_enables_positive_frequencies() {
        let mut timer = MockTimer::default();
        let tones = MultiTone::initialize(
            MasterClock::new_8000(),
            &[0, 440, 0],
            pins(3),
            3,
            &mut timer,
        );
        assert_eq!(timer.period_us, Some(125));
        assert_eq!(timer.starts, 1);
        assert_eq!(tones.len(), 3);
        for i in [0, 2] {
            let chan = tones.channel(i).unwrap();
            assert!(!chan.is_enabled());
            assert_eq!(chan.ticks_per_half_period(), 0);
        }
        let chan = tones.channel(1).unwrap();
        assert!(chan.is_enabled());
        assert_eq!(chan.ticks_per_half_period(), ticks_for(440, 8000));
        assert!(tones.channels().all(|c| !c.pin().high && c.pin().writes == 1));
    }

    #[test]
    fn oversubscribed_count_is_truncated() {
        let freqs = [440u32; 10];
        let tones = MultiTone::new(MasterClock::new_8000(), &freqs, pins(10), 10);
        assert_eq!(tones.len(), MAX_TONES);
        assert!(tones.channel(MAX_TONES).is_none());
        assert_eq!(tones.channel(MAX_TONES - 1).unwrap().pin().id, 6);
    }

    #[test]
    fn count_limited_by_inputs() {
        let tones = MultiTone::new(MasterClock::new_8000(), &[440, 880], pins(5), 4);
        assert_eq!(tones.len(), 2);
        let tones = MultiTone::new(MasterClock::new_8000(), &[440, 880, 220], pins(3), 1);
        assert_eq!(tones.len(), 1);
        let tones = MultiTone::new(MasterClock::new_8000(), &[440], pins(1), 0);
        assert!(tones.is_empty());
    }

    #[test]
    fn below_floor_silences_regardless_of_enable() {
        let mut tones = engine(&[0, 1000, 0]);
        for _ in 0..8 {
            tones.tick();
        }
        assert!(tones.channel(1).unwrap().pin().high);
        tones.set_frequency(1, 30);
        assert!(!tones.channel(1).unwrap().pin().high);
        tones.tick();
        let chan = tones.channel(1).unwrap();
        assert_eq!(chan.ticks_per_half_period(), 0);
        assert!(!chan.pin().high);
        assert!(chan.is_enabled());

        tones.disable(2);
        tones.set_frequency(2, 30);
        tones.tick();
        assert!(!tones.channel(2).unwrap().pin().high);
    }

    #[test]
    fn above_nyquist_silences() {
        let mut tones = engine(&[1000]);
        tones.set_frequency(0, 4001);
        assert_eq!(tones.channel(0).unwrap().ticks_per_half_period(), 0);
        tones.set_frequency(0, 4000);
        assert_eq!(tones.channel(0).unwrap().ticks_per_half_period(), 2);
    }

    #[test]
    fn set_frequency_resets_counter() {
        let mut tones = engine(&[100]);
        for _ in 0..5 {
            tones.tick();
        }
        assert_eq!(tones.channel(0).unwrap().tick_counter(), 5);
        tones.set_frequency(0, 1000);
        let chan = tones.channel(0).unwrap();
        assert_eq!(chan.tick_counter(), 0);
        assert_eq!(chan.ticks_per_half_period(), 8);
    }

    #[test]
    fn set_frequency_enables_nothing() {
        let mut tones = engine(&[0]);
        tones.set_frequency(0, 1000);
        for _ in 0..32 {
            tones.tick();
        }
        assert!(!tones.channel(0).unwrap().pin().high);
        tones.enable(0);
        for _ in 0..8 {
            tones.tick();
        }
        assert!(tones.channel(0).unwrap().pin().high);
    }

    #[test]
    fn disable_enable_keeps_phase() {
        let mut tones = engine(&[1000]);
        for _ in 0..3 {
            tones.tick();
        }
        tones.disable(0);
        assert_eq!(tones.channel(0).unwrap().tick_counter(), 3);
        tones.enable(0);
        assert_eq!(tones.channel(0).unwrap().tick_counter(), 3);
        assert_eq!(tones.channel(0).unwrap().ticks_per_half_period(), 8);
        for _ in 0..5 {
            tones.tick();
        }
        // first edge lands where it would have without the disable
        assert!(tones.channel(0).unwrap().output_level());
    }

    #[test]
    fn disabled_channel_goes_low_on_next_edge() {
        let mut tones = engine(&[1000]);
        for _ in 0..8 {
            tones.tick();
        }
        assert!(tones.channel(0).unwrap().pin().high);
        tones.disable(0);
        for _ in 0..7 {
            tones.tick();
        }
        assert!(tones.channel(0).unwrap().pin().high);
        tones.tick();
        assert!(!tones.channel(0).unwrap().pin().high);
        for _ in 0..64 {
            tones.tick();
            assert!(!tones.channel(0).unwrap().pin().high);
        }
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut tones = engine(&[1000, 0]);
        tones.set_frequency(2, 440);
        tones.set_frequency(usize::MAX, 440);
        tones.enable(7);
        tones.disable(100);
        tones.silence(2);
        assert_eq!(tones.len(), 2);
        assert_eq!(tones.channel(0).unwrap().ticks_per_half_period(), 8);
        assert!(!tones.channel(1).unwrap().is_enabled());
    }

    #[test]
    fn channels_run_independently() {
        let mut tones = engine(&[1000, 2000, 0]);
        let mut edges = [0u32; 3];
        let mut levels = [false; 3];
        for _ in 0..800 {
            tones.tick();
            for (i, chan) in tones.channels().enumerate() {
                if chan.output_level() != levels[i] {
                    edges[i] += 1;
                    levels[i] = chan.output_level();
                }
            }
        }
        assert_eq!(edges, [100, 200, 0]);
    }
}
