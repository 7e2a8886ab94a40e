//! The audio-thread engine: owns the session and the metronome, consumes
//! control messages, and renders blocks for the output stream.

use rtrb::Consumer;

use crate::metronome::Metronome;
use crate::synth::message::ControlMessage;
use crate::synth::session::Session;

/// Single owner of all mutable audio state. Lives inside the output
/// stream's callback; the UI thread only ever talks to it through the
/// message queue.
pub struct Engine {
    session: Session,
    metronome: Metronome,
    rx: Consumer<ControlMessage>,
}

impl Engine {
    pub fn new(sample_rate: f32, rx: Consumer<ControlMessage>) -> Self {
        Self {
            session: Session::new(sample_rate),
            metronome: Metronome::new(sample_rate),
            rx,
        }
    }

    /// Drain pending control messages, then render one block of mono audio.
    ///
    /// The block renders in chunks bounded by the metronome's next tick, so
    /// clicks land on their exact sample instead of at block granularity.
    pub fn process_block(&mut self, out: &mut [f32]) {
        while let Ok(msg) = self.rx.pop() {
            self.apply(msg);
        }

        out.fill(0.0);
        let mut cursor = 0;
        while cursor < out.len() {
            let remaining = out.len() - cursor;
            let chunk = match self.metronome.frames_until_tick() {
                Some(0) => {
                    if let Some(spec) = self.metronome.tick() {
                        self.session.spawn_click(spec);
                    }
                    continue;
                }
                Some(n) => remaining.min(n),
                None => remaining,
            };

            self.session.mix_block(&mut out[cursor..cursor + chunk]);
            self.metronome.consume(chunk);
            cursor += chunk;
        }
    }

    fn apply(&mut self, msg: ControlMessage) {
        match msg {
            ControlMessage::NoteOn { note, octave } => self.session.play_note(note, octave),
            ControlMessage::NoteOff { note, octave } => self.session.stop_note(note, octave),
            ControlMessage::AllNotesOff => self.session.all_notes_off(),
            ControlMessage::MetronomeToggle => {
                if let Some(spec) = self.metronome.toggle() {
                    self.session.spawn_click(spec);
                }
            }
            ControlMessage::SetTempo { bpm } => {
                // Restart policy: the returned click is the new beat 1.
                if let Some(spec) = self.metronome.set_tempo(bpm) {
                    self.session.spawn_click(spec);
                }
            }
            ControlMessage::SetClickVolume { volume } => self.metronome.set_volume(volume),
            ControlMessage::SetTimeSignature { beats } => {
                self.metronome.set_time_signature(beats)
            }
            ControlMessage::SetAccent { enabled } => self.metronome.set_accent(enabled),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }
}
