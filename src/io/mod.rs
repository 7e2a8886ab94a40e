//! Platform audio output.

pub mod output;

pub use output::AudioOutput;
