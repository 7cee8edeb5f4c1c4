use core::fmt;

/// A value paired with the time at which it becomes active.
///
/// # Example
/// ```rust
/// # use opsm::prelude::*;
/// let change = TimedValue::new(4.0, Tempo::new(140.));
///
/// assert_eq!(change.time(), 4.0);
/// assert_eq!(change.value().beats_per_minute(), 140.);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedValue<T> {
    time: f64,
    value: T,
}

impl<T> TimedValue<T> {
    /// Pair a value with a time
    pub const fn new(time: f64, value: T) -> Self {
        Self { time, value }
    }

    /// The time the value becomes active
    #[inline]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// The value itself
    #[inline]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Split into `(time, value)`
    pub fn into_parts(self) -> (f64, T) {
        (self.time, self.value)
    }
}

impl<T> From<(f64, T)> for TimedValue<T> {
    fn from((time, value): (f64, T)) -> Self {
        Self::new(time, value)
    }
}

impl<T: fmt::Display> fmt::Display for TimedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.time, self.value)
    }
}

#[test]
fn tuple_conversions() {
    let change: TimedValue<&str> = (2.5, "fermata").into();
    assert_eq!(change, TimedValue::new(2.5, "fermata"));
    assert_eq!(change.to_string(), "{2.5, fermata}");
    assert_eq!(change.into_parts(), (2.5, "fermata"));
}
