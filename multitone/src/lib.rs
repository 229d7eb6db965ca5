//! This crate synthesizes several independent square-wave tones, each on its
//! own output pin, using a single periodic timer interrupt as the only time
//! base.  It is `no_std` and allocation free, intended for microcontroller
//! firmware where no scheduler is available.
//!
//! The moving parts are:
//!
//!  - a [MasterClock](context::MasterClock), the fixed-rate tick shared by
//!    every channel,
//!  - a bank of [Channel]s, each counting ticks and toggling its pin every
//!    `ticks_per_half_period` ticks,
//!  - [MultiTone], the owned context that holds the bank and exposes the
//!    control API (`set_frequency`, `enable`, `disable`) plus
//!    [MultiTone::tick], the step run once per interrupt,
//!  - [SharedMultiTone], a wrapper that can live in a `static` and be touched
//!    from both the main loop and the interrupt handler.
//!
//! The hosting platform supplies the pins (anything implementing
//! [embedded_hal::digital::v2::OutputPin]) and the periodic interrupt (see
//! [TickTimer]).
//!
//! Invalid input is never an error here: out-of-range channel indices are
//! ignored, out-of-range frequencies silence the channel, and requesting more
//! channels than [MAX_TONES] drops the extras.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod context;
mod error;
mod ticks;

pub mod channel;
mod engine;
mod platform;
mod shared;

pub use channel::Channel;
pub use context::MasterClock;
pub use engine::MultiTone;
pub use error::Error;
pub use platform::TickTimer;
pub use shared::SharedMultiTone;
pub use ticks::ticks_for;

/// The maximum number of tone channels.  Historically bounded by the width of
/// the enable bitmask; kept so the bank fits a fixed, statically sized array.
pub const MAX_TONES: usize = 7;

/// Frequencies below this (in Hz) silence a channel when passed to
/// [MultiTone::set_frequency]
pub const MIN_TONE_HZ: u32 = 60;

/// The master clock rate used when nothing else is configured, in Hz
pub const DEFAULT_MASTER_HZ: u32 = 8000;

/// A frequency in Hz, as an unsigned 32 bit fixed point number with 16
/// fractional bits.  Used to report the tone a channel actually produces.
pub type FrequencyFxP = fixed::types::U16F16;
