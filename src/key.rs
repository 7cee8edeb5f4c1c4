use num_enum::{FromPrimitive, IntoPrimitive};

#[doc = r#"
A key signature: a root [`PitchClass`] and a [`Mode`].

# Example
```rust
# use opsm::prelude::*;
let key = KeySignature::new(PitchClass::FSharp, Mode::MINOR);

assert_eq!(key.root(), PitchClass::FSharp);
assert_eq!(key.mode(), Mode::Aeolian);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    root: PitchClass,
    mode: Mode,
}

impl KeySignature {
    /// Create a new key signature
    pub const fn new(root: PitchClass, mode: Mode) -> Self {
        Self { root, mode }
    }

    /// Shorthand for a major (ionian) key
    pub const fn major(root: PitchClass) -> Self {
        Self::new(root, Mode::MAJOR)
    }

    /// Shorthand for a minor (aeolian) key
    pub const fn minor(root: PitchClass) -> Self {
        Self::new(root, Mode::MINOR)
    }

    /// The tonic
    pub const fn root(&self) -> PitchClass {
        self.root
    }

    /// The mode
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// True if either the root or the mode is unknown
    pub const fn is_unknown(&self) -> bool {
        matches!(self.root, PitchClass::Unknown) || matches!(self.mode, Mode::Unknown)
    }
}

#[doc = r#"
One of the twelve pitch classes, or [`PitchClass::Unknown`].

On the wire a pitch class is one byte: `0` is C, `11` is B and `255` is
unknown. Any other byte reads as [`PitchClass::Unknown`].
"#]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PitchClass {
    C = 0,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
    #[num_enum(default)]
    Unknown = 255,
}

impl PitchClass {
    /// Returns an array beginning with [`PitchClass::C`] to [`PitchClass::B`]
    pub fn all() -> [PitchClass; 12] {
        use PitchClass::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// The major key root with `fifths` sharps (positive) or flats (negative).
    ///
    /// # Example
    /// ```rust
    /// # use opsm::prelude::*;
    /// assert_eq!(PitchClass::from_circle_of_fifths(0), PitchClass::C);
    /// assert_eq!(PitchClass::from_circle_of_fifths(2), PitchClass::D);
    /// assert_eq!(PitchClass::from_circle_of_fifths(-1), PitchClass::F);
    /// assert_eq!(PitchClass::from_circle_of_fifths(-3), PitchClass::DSharp);
    /// ```
    pub fn from_circle_of_fifths(fifths: i32) -> Self {
        use PitchClass::*;
        const CIRCLE: [PitchClass; 12] = [C, G, D, A, E, B, FSharp, CSharp, GSharp, DSharp, ASharp, F];
        CIRCLE[fifths.rem_euclid(12) as usize]
    }
}

#[doc = r#"
The seven diatonic modes, or [`Mode::Unknown`].

[`Mode::MAJOR`] and [`Mode::MINOR`] are aliases for [`Mode::Ionian`] and
[`Mode::Aeolian`].

On the wire a mode is one byte, `0` being unknown and `1..=7` the modes in
declaration order. Any other byte reads as [`Mode::Unknown`].
"#]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Mode {
    #[num_enum(default)]
    Unknown = 0,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// Same as [`Mode::Ionian`]
    pub const MAJOR: Self = Self::Ionian;
    /// Same as [`Mode::Aeolian`]
    pub const MINOR: Self = Self::Aeolian;

    /// Parse a mode name, ignoring case. Accepts the seven modal names as
    /// well as `major` and `minor`; anything else is [`Mode::Unknown`].
    pub fn from_name(name: &str) -> Self {
        use Mode::*;
        match name.to_ascii_lowercase().as_str() {
            "ionian" | "major" => Ionian,
            "dorian" => Dorian,
            "phrygian" => Phrygian,
            "lydian" => Lydian,
            "mixolydian" => Mixolydian,
            "aeolian" | "minor" => Aeolian,
            "locrian" => Locrian,
            _ => Unknown,
        }
    }
}

#[test]
fn pitch_class_bytes() {
    for (i, pitch) in PitchClass::all().into_iter().enumerate() {
        assert_eq!(u8::from(pitch), i as u8);
        assert_eq!(PitchClass::from(i as u8), pitch);
    }
    assert_eq!(u8::from(PitchClass::Unknown), 255);
    assert_eq!(PitchClass::from(12), PitchClass::Unknown);
}

#[test]
fn mode_bytes() {
    assert_eq!(u8::from(Mode::MAJOR), 1);
    assert_eq!(u8::from(Mode::MINOR), 6);
    assert_eq!(Mode::from(7), Mode::Locrian);
    assert_eq!(Mode::from(8), Mode::Unknown);
}

#[test]
fn mode_names() {
    assert_eq!(Mode::from_name("Major"), Mode::Ionian);
    assert_eq!(Mode::from_name("MINOR"), Mode::Aeolian);
    assert_eq!(Mode::from_name("mixolydian"), Mode::Mixolydian);
    assert_eq!(Mode::from_name("blues"), Mode::Unknown);
}

#[test]
fn circle_of_fifths_wraps() {
    assert_eq!(PitchClass::from_circle_of_fifths(12), PitchClass::C);
    assert_eq!(PitchClass::from_circle_of_fifths(-6), PitchClass::FSharp);
    assert_eq!(PitchClass::from_circle_of_fifths(7), PitchClass::CSharp);
}
