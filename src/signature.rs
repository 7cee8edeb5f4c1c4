use core::fmt;

/// A time signature: beats per bar over the note value of one beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    numerator: i16,
    denominator: i16,
}

impl TimeSignature {
    /// 4/4
    pub const COMMON: Self = Self::new(4, 4);
    /// 2/2
    pub const CUT: Self = Self::new(2, 2);

    /// Create a new time signature
    pub const fn new(numerator: i16, denominator: i16) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Beats per bar
    pub const fn numerator(&self) -> i16 {
        self.numerator
    }

    /// The note value that gets one beat
    pub const fn denominator(&self) -> i16 {
        self.denominator
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[test]
fn display_time_signature() {
    assert_eq!(TimeSignature::new(7, 8).to_string(), "7/8");
    assert_eq!(TimeSignature::COMMON.to_string(), "4/4");
}
