//! Frequency to tick-count conversion

/// Returns the number of master clock ticks in one half period of a tone at
/// `desired_hz`, given a master clock running at `master_hz`.
///
/// This is the smallest `k` such that `k * desired_hz >= master_hz`, i.e.
/// `ceil(master_hz / desired_hz)`, and is never less than 1.
///
/// `desired_hz` must be nonzero; range checking belongs to the caller (see
/// [MultiTone::set_frequency](crate::MultiTone::set_frequency)).  A zero
/// frequency is treated as 1 Hz rather than dividing by zero.
pub const fn ticks_for(desired_hz: u32, master_hz: u32) -> u32 {
    let desired_hz = if desired_hz == 0 { 1 } else { desired_hz };
    let ticks = master_hz.div_ceil(desired_hz);
    if ticks == 0 {
        1
    } else {
        ticks
    }
}
