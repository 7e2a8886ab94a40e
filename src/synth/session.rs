use std::collections::HashMap;

use crate::metronome::ClickSpec;
use crate::pitch::{Note, Tuning};
use crate::synth::tone::Tone;

/*
Session
=======

The session is the explicit owner of what the original kept as ambient
globals: the live-tone registry and the tuning. It lives on the audio thread
and is the single writer of all tone state.

Tones move through two containers:

  held    One tone per (note, octave) key currently down. At most one held
          tone per pitch; the key-repeat guard upstream keeps play_note from
          being called twice for the same held key.

  tail    Tones that no longer have an owner: released keys fading out and
          one-shot metronome clicks. They render until their envelope
          finishes and are then dropped.

stop_note removes the pitch from `held` immediately, not when the fade
completes. A rapid re-trigger of the same pitch during its release therefore
creates a second overlapping tone instead of being blocked - observed
behavior of the original, kept deliberately.
*/

pub struct Session {
    sample_rate: f32,
    tuning: Tuning,
    held: HashMap<(Note, i32), Tone>,
    tail: Vec<Tone>,
}

impl Session {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_tuning(sample_rate, Tuning::default())
    }

    pub fn with_tuning(sample_rate: f32, tuning: Tuning) -> Self {
        Self {
            sample_rate,
            tuning,
            held: HashMap::new(),
            tail: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    /// Start a tone for the pitch and register it under (note, octave).
    ///
    /// Callers must not invoke this twice for the same held key without an
    /// intervening `stop_note`; if they do, the new tone replaces the old
    /// one, which stops immediately.
    pub fn play_note(&mut self, note: Note, octave: i32) {
        let frequency = self.tuning.frequency(note, octave) as f32;
        let tone = Tone::key(self.sample_rate, frequency);
        self.held.insert((note, octave), tone);
    }

    /// Release the held tone for the pitch, if any.
    ///
    /// The pitch leaves the registry immediately; the 100ms fade renders
    /// from the tail list. Unknown pitches are a no-op.
    pub fn stop_note(&mut self, note: Note, octave: i32) {
        if let Some(mut tone) = self.held.remove(&(note, octave)) {
            tone.release();
            self.tail.push(tone);
        }
    }

    /// Release every held tone.
    pub fn all_notes_off(&mut self) {
        for (_, mut tone) in self.held.drain() {
            tone.release();
            self.tail.push(tone);
        }
    }

    /// Start a one-shot metronome click.
    pub fn spawn_click(&mut self, spec: ClickSpec) {
        self.tail.push(Tone::click(self.sample_rate, spec));
    }

    /// Mix all live tones into the buffer. The caller zeroes the buffer;
    /// this only accumulates.
    pub fn mix_block(&mut self, out: &mut [f32]) {
        for tone in self.held.values_mut() {
            tone.mix_into(out);
        }
        for tone in &mut self.tail {
            tone.mix_into(out);
        }
        self.tail.retain(|tone| !tone.is_finished());
    }

    /// Pitches currently held (not fading).
    pub fn active_pitches(&self) -> impl Iterator<Item = (Note, i32)> + '_ {
        self.held.keys().copied()
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    pub fn tail_count(&self) -> usize {
        self.tail.len()
    }
}
