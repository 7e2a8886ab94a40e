//! Low-level DSP primitives behind the piano voice and metronome click.
//!
//! These components are allocation-free and realtime-safe, so they can live
//! directly inside tone structs rendered from the audio callback. They stay
//! focused on the signal math; tone lifecycle and mixing live in `synth`.

/// Linear-attack / exponential-decay gain envelope.
pub mod envelope;
/// Phase-accumulator oscillator with the classic waveforms.
pub mod oscillator;

pub use envelope::{EnvelopeStage, GainEnvelope};
pub use oscillator::{Oscillator, Waveform};
