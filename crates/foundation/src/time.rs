/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn seconds_since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }
}
