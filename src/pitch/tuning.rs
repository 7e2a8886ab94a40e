use super::note::Note;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Equal-Tempered Tuning
=====================

Twelve-tone equal temperament divides the octave into 12 equal frequency
ratios of 2^(1/12). Given a reference frequency for A4, any pitch is:

    frequency = a4_hz * 2^(semitones / 12)

where `semitones` is the signed distance from A4:

    semitones = note.semitones_from_a() + (octave - 4) * 12

The reference here is A4 = 442 Hz, a common orchestral tuning slightly above
the A440 standard. Results are rounded to 4 decimal places so the mapping is
a pure function of its inputs: the same (note, octave) always yields the
same bit pattern, independent of call order or platform.

Note the rounding interacts with the octave-doubling identity: on the raw
values frequency(n, o+1) is exactly 2 * frequency(n, o), but rounding each
octave independently can leave the pair off by up to 1.5e-4.
*/

/// Equal-tempered tuning referenced to a fixed A4 frequency.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Reference frequency for A4 in Hz.
    pub a4_hz: f64,
}

impl Tuning {
    /// A4 = 442 Hz, the tuning this instrument ships with.
    pub const CONCERT_442: Tuning = Tuning { a4_hz: 442.0 };

    /// A4 = 440 Hz, the ISO standard pitch.
    pub const CONCERT_440: Tuning = Tuning { a4_hz: 440.0 };

    /// Frequency in Hz for a pitch class at the given octave, rounded to
    /// 4 decimal places.
    pub fn frequency(&self, note: Note, octave: i32) -> f64 {
        let semitones = note.semitones_from_a() + (octave - 4) * 12;
        let raw = self.a4_hz * 2f64.powf(semitones as f64 / 12.0);
        (raw * 10_000.0).round() / 10_000.0
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning::CONCERT_442
    }
}
