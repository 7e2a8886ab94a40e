//! Live tone management: the session registry and the tones it renders.

pub mod message;
pub mod session;
pub mod tone;

pub use message::ControlMessage;
pub use session::Session;
pub use tone::Tone;
