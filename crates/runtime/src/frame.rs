use foundation::time::Time;

/// Delta assumed for the first frame, before two timestamps exist.
pub const NOMINAL_DT_S: f64 = 1.0 / 60.0;

/// Upper bound on a single frame delta. Tabs that were hidden resume with a
/// huge gap between timestamps; clamping keeps animation continuous.
pub const MAX_DT_S: f64 = 0.1;

/// Per-frame metadata handed to the frame callback.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Clamped delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Presentation timestamp reported by the platform.
    pub time: Time,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: NOMINAL_DT_S,
            time,
        }
    }

    pub fn next(self, time: Time) -> Self {
        let dt_s = time.seconds_since(self.time).clamp(0.0, MAX_DT_S);
        Self {
            index: self.index + 1,
            dt_s,
            time,
        }
    }
}
