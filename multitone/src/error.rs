use core::fmt;

/// Configuration errors.
///
/// The control API itself never fails (see the crate docs); these only come
/// out of setting up the master clock or starting a [SharedMultiTone](crate::SharedMultiTone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested master clock rate, in Hz, is zero or too fast for a
    /// whole-microsecond timer period.
    ClockOutOfRange(u32),
    /// The tone engine has already been started.  It may only be started once.
    AlreadyStarted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockOutOfRange(hz) => write!(f, "Unsupported master clock rate: {} Hz", hz),
            Self::AlreadyStarted => f.write_str("Tone engine already started"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::ClockOutOfRange(0).to_string(),
            "Unsupported master clock rate: 0 Hz"
        );
        assert_eq!(Error::AlreadyStarted.to_string(), "Tone engine already started");
    }
}
