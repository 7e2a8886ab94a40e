use rtrb::Consumer;

use crate::pitch::Note;

/// Control messages from the UI thread to the audio-thread engine.
///
/// Everything the interface can do travels through this one enum over a
/// lock-free SPSC queue; the engine owns all mutable audio state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    NoteOn { note: Note, octave: i32 },
    NoteOff { note: Note, octave: i32 },
    AllNotesOff,
    MetronomeToggle,
    /// Tempo in BPM. Applied via stop + restart when running.
    SetTempo { bpm: u16 },
    /// Click volume, 0.0 to 1.0. Applies immediately.
    SetClickVolume { volume: f32 },
    /// Beats per bar. Applies immediately and resets the beat counter.
    SetTimeSignature { beats: u8 },
    SetAccent { enabled: bool },
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}
