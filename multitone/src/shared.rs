//! Sharing a [MultiTone] between the main line and the tick interrupt.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::v2::OutputPin;

use crate::engine::start_clock;
use crate::{Error, MasterClock, MultiTone, TickTimer};

/// A [MultiTone] that can live in a `static` and be driven from an interrupt.
///
/// Every method runs inside one short critical section, so the interrupt can
/// never observe a channel half way through an update (for example a reset
/// counter paired with a stale half period).  Each critical section is
/// bounded: a single channel update, or one tick across the bank.
///
/// Until [SharedMultiTone::start] succeeds every other method is a no-op.
///
/// ```ignore
/// static TONES: SharedMultiTone<MyPin> = SharedMultiTone::new();
///
/// #[interrupt]
/// fn TIMER_IRQ() {
///     TONES.on_tick();
/// }
/// ```
pub struct SharedMultiTone<P> {
    inner: Mutex<RefCell<Option<MultiTone<P>>>>,
}

impl<P> SharedMultiTone<P> {
    /// An engine with no channels, not yet started
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Run `f` on the engine inside a critical section.  Returns `None` if
    /// the engine has not been started.
    pub fn with<R>(&self, f: impl FnOnce(&mut MultiTone<P>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// True once [SharedMultiTone::start] has succeeded
    pub fn is_started(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// See [MultiTone::enable]
    pub fn enable(&self, index: usize) {
        self.with(|tones| tones.enable(index));
    }

    /// See [MultiTone::disable]
    pub fn disable(&self, index: usize) {
        self.with(|tones| tones.disable(index));
    }
}

impl<P: OutputPin> SharedMultiTone<P> {
    /// Build the channel bank (see [MultiTone::new]), store it, then start
    /// the master clock on `timer`.  The bank is in place before the first
    /// tick can fire.
    ///
    /// May only succeed once; later calls return [Error::AlreadyStarted] and
    /// leave both the running engine and the passed-in pins untouched.
    pub fn start<I, T>(
        &self,
        clock: MasterClock,
        frequencies: &[u32],
        pins: I,
        count: usize,
        timer: T,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = P>,
        T: TickTimer,
    {
        if self.is_started() {
            return Err(Error::AlreadyStarted);
        }
        let tones = MultiTone::new(clock, frequencies, pins, count);
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            if slot.is_some() {
                return Err(Error::AlreadyStarted);
            }
            *slot = Some(tones);
            Ok(())
        })?;
        start_clock(&clock, timer);
        Ok(())
    }

    /// The tick callback.  Call this from the master clock interrupt.
    pub fn on_tick(&self) {
        critical_section::with(|cs| {
            if let Some(tones) = self.inner.borrow_ref_mut(cs).as_mut() {
                tones.tick();
            }
        });
    }

    /// See [MultiTone::set_frequency]
    pub fn set_frequency(&self, index: usize, desired_hz: u32) {
        self.with(|tones| tones.set_frequency(index, desired_hz));
    }

    /// See [MultiTone::silence]
    pub fn silence(&self, index: usize) {
        self.with(|tones| tones.silence(index));
    }
}

impl<P> Default for SharedMultiTone<P> {
    fn default() -> Self {
        Self::new()
    }
}
