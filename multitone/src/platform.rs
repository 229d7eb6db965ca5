//! Collaborators supplied by the hosting platform.
//!
//! Pins are anything implementing [embedded_hal::digital::v2::OutputPin].
//! The periodic interrupt is abstracted by [TickTimer].

/// A hardware timer able to fire an interrupt at a fixed period, forever.
///
/// The tick callback itself is bound by the platform (usually an interrupt
/// handler that calls [SharedMultiTone::on_tick](crate::SharedMultiTone::on_tick)),
/// so this trait only covers configuring and starting the timer.  Both methods
/// are called exactly once, in order, when the tone engine starts.
pub trait TickTimer {
    /// Configure the timer to fire every `period_us` microseconds.
    fn schedule(&mut self, period_us: u32);
    /// Start firing.  The first tick may arrive before this returns.
    fn start(&mut self);
}

impl<T: TickTimer + ?Sized> TickTimer for &mut T {
    fn schedule(&mut self, period_us: u32) {
        (**self).schedule(period_us)
    }
    fn start(&mut self) {
        (**self).start()
    }
}
