use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the 12 pitch classes of the equal-tempered octave.
///
/// The variant order is chromatic from C, so `Note::ALL` walks an octave
/// bottom to top. Sharps use an `s` suffix (`Cs` is C#).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Note {
    /// All 12 pitch classes in chromatic order, C first.
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Signed semitone distance from A in the same octave (C = -9 ... B = +2).
    ///
    /// A is the tuning anchor, so distances are measured from it rather than
    /// from C.
    pub fn semitones_from_a(self) -> i32 {
        match self {
            Note::C => -9,
            Note::Cs => -8,
            Note::D => -7,
            Note::Ds => -6,
            Note::E => -5,
            Note::F => -4,
            Note::Fs => -3,
            Note::G => -2,
            Note::Gs => -1,
            Note::A => 0,
            Note::As => 1,
            Note::B => 2,
        }
    }

    /// True for the five black keys.
    pub fn is_sharp(self) -> bool {
        matches!(self, Note::Cs | Note::Ds | Note::Fs | Note::Gs | Note::As)
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized note name: {0:?}")]
pub struct ParseNoteError(pub String);

impl FromStr for Note {
    type Err = ParseNoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::ALL
            .iter()
            .copied()
            .find(|n| n.name() == s)
            .ok_or_else(|| ParseNoteError(s.to_string()))
    }
}
