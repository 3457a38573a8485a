use crate::{Error, Result};

/// Maps frame indices to elapsed seconds for a fixed frame rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Tick conversion is undefined without a positive, finite frame rate
    pub fn new(fps: f64) -> Result<Self> {
        if fps.is_finite() && fps > 0.0 {
            Ok(Self { fps })
        } else {
            Err(Error::InvalidFrameRate(fps))
        }
    }

    /// Frames per second
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Duration of one frame in seconds
    pub fn frame_time(&self) -> f64 {
        1.0 / self.fps
    }

    /// Time at which frame `index` starts.
    /// Derived from the index rather than summed per frame, so long runs don't drift.
    pub fn timestamp(&self, index: usize) -> f64 {
        index as f64 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_rates() {
        for fps in [0.0, -1.0, -29.97, f64::NAN, f64::INFINITY] {
            assert!(matches!(FrameClock::new(fps), Err(Error::InvalidFrameRate(_))));
        }
    }

    #[test]
    fn timestamps_follow_frame_index() {
        let clock = FrameClock::new(30.0).unwrap();
        assert_eq!(clock.timestamp(0), 0.0);
        assert_eq!(clock.timestamp(60), 2.0);
        assert_eq!(clock.timestamp(150), 5.0);
        assert!((clock.frame_time() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn no_drift_over_long_runs() {
        let clock = FrameClock::new(29.97).unwrap();
        let hour = clock.timestamp(107_892);
        assert!((hour - 3600.0).abs() < 1e-6);
    }
}
