//! End-to-end engine tests: messages in, rendered audio and state out.
//!
//! Runs at a 1kHz sample rate so timing math stays readable: at the default
//! 120 BPM one metronome tick lands every 500 samples, a note release tail
//! is 100 samples.

use rtrb::{Producer, RingBuffer};

use clavier::engine::Engine;
use clavier::pitch::Note;
use clavier::synth::ControlMessage;

const SAMPLE_RATE: f32 = 1_000.0;

fn engine() -> (Producer<ControlMessage>, Engine) {
    let (tx, rx) = RingBuffer::new(64);
    (tx, Engine::new(SAMPLE_RATE, rx))
}

fn render(engine: &mut Engine, frames: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; frames];
    engine.process_block(&mut out);
    out
}

fn has_sound(buffer: &[f32]) -> bool {
    buffer.iter().any(|s| s.abs() > 1e-4)
}

#[test]
fn note_on_renders_bounded_audio() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::NoteOn {
        note: Note::A,
        octave: 4,
    })
    .unwrap();

    let out = render(&mut engine, 512);
    assert!(has_sound(&out));
    assert!(out.iter().all(|s| s.abs() <= 1.0));
    assert_eq!(engine.session().held_count(), 1);
}

#[test]
fn note_off_fades_then_goes_silent() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::NoteOn {
        note: Note::C,
        octave: 4,
    })
    .unwrap();
    render(&mut engine, 256);

    tx.push(ControlMessage::NoteOff {
        note: Note::C,
        octave: 4,
    })
    .unwrap();
    // The 100-sample release tail still sounds...
    let tail = render(&mut engine, 50);
    assert!(has_sound(&tail));
    assert_eq!(engine.session().held_count(), 0);

    // ...and is gone after it finishes.
    render(&mut engine, 100);
    let after = render(&mut engine, 128);
    assert!(!has_sound(&after));
    assert_eq!(engine.session().tail_count(), 0);
}

#[test]
fn note_off_without_note_on_is_silent_noop() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::NoteOff {
        note: Note::Fs,
        octave: 3,
    })
    .unwrap();

    let out = render(&mut engine, 256);
    assert!(!has_sound(&out));
    assert_eq!(engine.session().held_count(), 0);
    assert_eq!(engine.session().tail_count(), 0);
}

#[test]
fn all_notes_off_releases_every_held_tone() {
    let (mut tx, mut engine) = engine();
    for note in [Note::C, Note::E, Note::G] {
        tx.push(ControlMessage::NoteOn { note, octave: 4 }).unwrap();
    }
    render(&mut engine, 128);
    assert_eq!(engine.session().held_count(), 3);

    tx.push(ControlMessage::AllNotesOff).unwrap();
    render(&mut engine, 1);
    assert_eq!(engine.session().held_count(), 0);
}

#[test]
fn metronome_ticks_inside_a_block() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::MetronomeToggle).unwrap();

    // Start emits beat 1 immediately; ticks inside the block land at
    // samples 500, 1000, and 1500.
    let out = render(&mut engine, 2000);
    assert!(has_sound(&out));
    assert_eq!(engine.metronome().beat(), 4);
    assert!(engine.metronome().is_running());
}

#[test]
fn metronome_toggle_off_stops_and_resets() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::MetronomeToggle).unwrap();
    render(&mut engine, 700);

    tx.push(ControlMessage::MetronomeToggle).unwrap();
    // The accented click lasts 150 samples; let any tail die out.
    render(&mut engine, 200);

    assert!(!engine.metronome().is_running());
    assert_eq!(engine.metronome().beat(), 0);
    let after = render(&mut engine, 256);
    assert!(!has_sound(&after));
}

#[test]
fn tempo_change_restarts_from_beat_one() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::MetronomeToggle).unwrap();
    render(&mut engine, 700); // past the first tick, beat 2

    tx.push(ControlMessage::SetTempo { bpm: 240 }).unwrap();
    render(&mut engine, 0); // drain messages only
    assert_eq!(engine.metronome().beat(), 1);
    assert_eq!(engine.metronome().bpm(), 240);

    // 240 BPM at 1kHz: a tick every 250 samples.
    render(&mut engine, 500);
    assert_eq!(engine.metronome().beat(), 2);
    render(&mut engine, 250);
    assert_eq!(engine.metronome().beat(), 3);
}

#[test]
fn time_signature_change_applies_without_restart() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::MetronomeToggle).unwrap();
    render(&mut engine, 1600); // beat 4 of 4

    tx.push(ControlMessage::SetTimeSignature { beats: 6 }).unwrap();
    render(&mut engine, 0);
    assert!(engine.metronome().is_running(), "no restart needed");
    assert_eq!(engine.metronome().beat(), 0);
    assert_eq!(engine.metronome().beats_per_bar(), 6);
}

#[test]
fn muted_click_builds_no_tone() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::SetClickVolume { volume: 0.0 }).unwrap();
    tx.push(ControlMessage::MetronomeToggle).unwrap();

    let out = render(&mut engine, 1200);
    assert!(!has_sound(&out));
    assert_eq!(engine.session().tail_count(), 0);
    // The timer still counts beats silently.
    assert!(engine.metronome().beat() >= 1);
}

#[test]
fn clicks_mix_with_held_notes() {
    let (mut tx, mut engine) = engine();
    tx.push(ControlMessage::NoteOn {
        note: Note::D,
        octave: 4,
    })
    .unwrap();
    tx.push(ControlMessage::MetronomeToggle).unwrap();

    let out = render(&mut engine, 1024);
    assert!(has_sound(&out));
    // Held note plus click tails; all bounded.
    assert!(out.iter().all(|s| s.abs() <= 1.0));
    assert_eq!(engine.session().held_count(), 1);
}
