use core::fmt;

#[doc = r#"
The speed of a song, in beats per minute.

# Example
```rust
# use opsm::prelude::*;
let tempo = Tempo::new(120.);

assert_eq!(tempo.minutes_per_beat(), 0.5);
assert_eq!(tempo.to_string(), "120 BPM");
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo {
    beats_per_minute: f64,
}

impl Tempo {
    /// Create a tempo from beats per minute
    pub const fn new(beats_per_minute: f64) -> Self {
        Self { beats_per_minute }
    }

    /// Create a tempo from the length of a beat in minutes
    pub const fn from_minutes_per_beat(minutes_per_beat: f64) -> Self {
        Self::new(60. / minutes_per_beat)
    }

    /// Beats per minute
    #[inline]
    pub const fn beats_per_minute(&self) -> f64 {
        self.beats_per_minute
    }

    /// Length of one beat in minutes. Note this is `60 / bpm`.
    #[inline]
    pub const fn minutes_per_beat(&self) -> f64 {
        60. / self.beats_per_minute
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.beats_per_minute)
    }
}

#[test]
fn tempo_from_minutes_per_beat() {
    let tempo = Tempo::from_minutes_per_beat(0.25);
    assert_eq!(tempo.beats_per_minute(), 240.);
    assert_eq!(tempo.minutes_per_beat(), 0.25);
}
