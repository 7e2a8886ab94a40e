//! Musical pitch: note names and the tuning that maps them to frequencies.

pub mod note;
pub mod tuning;

pub use note::{Note, ParseNoteError};
pub use tuning::Tuning;
