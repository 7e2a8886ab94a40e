use crate::pitch::Note;

/*
Key Dispatch Table
==================

One flat table from physical key identity to (pitch class, octave band),
replacing per-key listener wiring: the pitch engine never learns which
device produced an event, it just receives (note, octave).

The layout mirrors a piano across the QWERTY home row, two octaves plus one
top C:

    octave band 0:   A W S E D F T G Y H U J     (C C# D D# E F F# G G# A A# B)
    octave band 1:   K O L P ; ' ] Enter \       (C C# D D# E F F# G G#)
    top C (band 2):  Space

Enter is carried as '\r' so the whole table stays plain chars; the terminal
front end maps its Enter key code to '\r' before the lookup.

The band offset is added to the user's base octave, which stays inside
OCTAVE_MIN..=OCTAVE_MAX, so sounding octaves span 1 through 7.
*/

pub const OCTAVE_MIN: i32 = 1;
pub const OCTAVE_MAX: i32 = 5;
pub const DEFAULT_OCTAVE: i32 = 4;

/// A physical key bound to a pitch class and an octave band offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub note: Note,
    /// 0, 1, or 2: which visible octave band the key sits in.
    pub octave_offset: i32,
}

const BINDINGS: &[(char, Note, i32)] = &[
    // First octave
    ('a', Note::C, 0),
    ('w', Note::Cs, 0),
    ('s', Note::D, 0),
    ('e', Note::Ds, 0),
    ('d', Note::E, 0),
    ('f', Note::F, 0),
    ('t', Note::Fs, 0),
    ('g', Note::G, 0),
    ('y', Note::Gs, 0),
    ('h', Note::A, 0),
    ('u', Note::As, 0),
    ('j', Note::B, 0),
    // Second octave
    ('k', Note::C, 1),
    ('o', Note::Cs, 1),
    ('l', Note::D, 1),
    ('p', Note::Ds, 1),
    (';', Note::E, 1),
    ('\'', Note::F, 1),
    (']', Note::Fs, 1),
    ('\r', Note::G, 1),
    ('\\', Note::Gs, 1),
    // Top C
    (' ', Note::C, 2),
];

/// Resolve a pressed key to its binding. Unmapped keys return None and are
/// ignored by the caller.
pub fn lookup(key: char) -> Option<KeyBinding> {
    BINDINGS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|&(_, note, octave_offset)| KeyBinding {
            note,
            octave_offset,
        })
}

/// Keep a base octave inside the playable range.
pub fn clamp_octave(octave: i32) -> i32 {
    octave.clamp(OCTAVE_MIN, OCTAVE_MAX)
}
