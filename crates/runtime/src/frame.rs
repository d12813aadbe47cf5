use std::time::Duration;

use foundation::time::Time;

/// Metadata for one animation-frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Time since the previous frame; zero for the first frame.
    pub dt: Duration,
    /// Host time at the start of the frame.
    pub time: Time,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt: Duration::ZERO,
            time,
        }
    }

    pub fn dt_s(&self) -> f64 {
        self.dt.as_secs_f64()
    }
}

/// Turns raw host frame timestamps into a monotonic [`Frame`] sequence.
///
/// A timestamp earlier than the previous one yields a zero `dt` and keeps
/// the previous time: frame time never runs backwards.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Frame>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a `requestAnimationFrame` timestamp in milliseconds.
    pub fn tick_ms(&mut self, host_ms: f64) -> Frame {
        self.tick(Time::from_millis_f64(host_ms))
    }

    pub fn tick(&mut self, now: Time) -> Frame {
        let frame = match self.last {
            None => Frame::first(now),
            Some(prev) => {
                let time = now.max(prev.time);
                Frame {
                    index: prev.index + 1,
                    dt: time.since(prev.time),
                    time,
                }
            }
        };
        self.last = Some(frame);
        frame
    }

    pub fn last(&self) -> Option<Frame> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;
    use foundation::time::Time;
    use std::time::Duration;

    #[test]
    fn first_frame_has_zero_dt() {
        let mut fc = FrameClock::new();
        let f0 = fc.tick_ms(1000.0);
        assert_eq!(f0.index, 0);
        assert_eq!(f0.dt, Duration::ZERO);
        assert_eq!(f0.time, Time::from_millis(1000));
    }

    #[test]
    fn next_advances_index_and_dt() {
        let mut fc = FrameClock::new();
        fc.tick_ms(0.0);
        let f1 = fc.tick_ms(16.0);
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt, Duration::from_millis(16));
    }

    #[test]
    fn backwards_timestamps_do_not_rewind() {
        let mut fc = FrameClock::new();
        fc.tick_ms(100.0);
        let f = fc.tick_ms(50.0);
        assert_eq!(f.time, Time::from_millis(100));
        assert_eq!(f.dt, Duration::ZERO);
    }

    #[test]
    fn reset_restarts_indexing() {
        let mut fc = FrameClock::new();
        fc.tick_ms(1.0);
        fc.tick_ms(2.0);
        fc.reset();
        assert_eq!(fc.tick_ms(3.0).index, 0);
    }
}
