use std::time::Duration;

/// Host timestamp in whole microseconds since the clock origin.
///
/// Browser clocks report fractional milliseconds; converting once at the
/// boundary keeps timer arithmetic exact and ordering total.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub fn from_millis(ms: u64) -> Self {
        Time(ms.saturating_mul(1_000))
    }

    /// Negative and non-finite inputs clamp to [`Time::ZERO`].
    pub fn from_millis_f64(ms: f64) -> Self {
        if !ms.is_finite() || ms <= 0.0 {
            return Time::ZERO;
        }
        Time((ms * 1_000.0).round() as u64)
    }

    pub fn from_secs_f64(s: f64) -> Self {
        Self::from_millis_f64(s * 1_000.0)
    }

    pub fn as_micros(self) -> u64 {
        self.0
    }

    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Time) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        let us = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        Time(self.0.saturating_add(us))
    }
}

impl std::ops::AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

/// Splits `total` into `parts` equal intervals, truncated to the microsecond.
///
/// Returns `None` when the split is degenerate (no parts, or an interval
/// that rounds to zero).
pub fn split_duration(total: Duration, parts: u32) -> Option<Duration> {
    if parts == 0 {
        return None;
    }
    let us = total.as_micros() / u128::from(parts);
    if us == 0 {
        return None;
    }
    Some(Duration::from_micros(u64::try_from(us).unwrap_or(u64::MAX)))
}

#[cfg(test)]
mod tests {
    use super::{Time, split_duration};
    use std::time::Duration;

    #[test]
    fn millis_conversion_rounds_and_clamps() {
        assert_eq!(Time::from_millis_f64(1.0004), Time(1_000));
        assert_eq!(Time::from_millis_f64(1666.6667), Time(1_666_667));
        assert_eq!(Time::from_millis_f64(-5.0), Time::ZERO);
        assert_eq!(Time::from_millis_f64(f64::NAN), Time::ZERO);
        assert_eq!(Time::from_millis(42).as_millis_f64(), 42.0);
    }

    #[test]
    fn since_saturates() {
        let a = Time::from_millis(10);
        let b = Time::from_millis(4);
        assert_eq!(a.since(b), Duration::from_millis(6));
        assert_eq!(b.since(a), Duration::ZERO);
    }

    #[test]
    fn add_duration() {
        let t = Time::from_millis(800) + Duration::from_millis(2_000);
        assert_eq!(t, Time::from_millis(2_800));
    }

    #[test]
    fn split_duration_guards_degenerate_inputs() {
        assert_eq!(
            split_duration(Duration::from_millis(2_500), 50),
            Some(Duration::from_millis(50))
        );
        assert_eq!(
            split_duration(Duration::from_millis(2_500), 3),
            Some(Duration::from_micros(833_333))
        );
        assert_eq!(split_duration(Duration::from_millis(2_500), 0), None);
        assert_eq!(split_duration(Duration::ZERO, 3), None);
    }
}
