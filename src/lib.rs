pub mod dsp;
pub mod engine; // Audio-thread owner of session + metronome
pub mod io;
pub mod keymap; // Physical key to (note, octave offset) dispatch
pub mod metronome;
pub mod pitch; // Note names and equal-tempered tuning
pub mod synth; // Live tones and the session registry

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
/// Floor for exponential gain ramps. Ramps that head for silence target this
/// value instead of zero, since a geometric ramp never reaches it.
pub(crate) const MIN_GAIN: f32 = 0.001;
