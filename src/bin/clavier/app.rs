//! Application state and the event loop.
//!
//! The app owns the UI side of everything: the base octave, the metronome
//! settings mirror, and the list of sounding keys. The audio thread owns
//! the actual engine; this side only pushes control messages.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, Producer, RingBuffer};

use clavier::io::AudioOutput;
use clavier::keymap::{self, DEFAULT_OCTAVE};
use clavier::metronome::{DEFAULT_BEATS_PER_BAR, DEFAULT_BPM, MAX_BPM, MIN_BPM};
use clavier::pitch::Note;
use clavier::synth::ControlMessage;

use crate::ui;

const MESSAGE_QUEUE_SIZE: usize = 256;

/// How long a struck key sounds before auto-release. Terminals deliver no
/// key-up events, so key repeat stands in for holding: every repeat pushes
/// the release deadline out again without re-triggering the tone.
const KEY_HOLD: Duration = Duration::from_millis(500);

const BPM_STEP: u16 = 5;
const VOLUME_STEP_PCT: i16 = 5;
const METER_CYCLE: [u8; 4] = [2, 3, 4, 6];

/// One sounding key. The octave is pinned at press time, so octave shifts
/// while a key rings release the pitch that actually sounded.
struct HeldKey {
    note: Note,
    octave: i32,
    release_at: Instant,
}

pub struct App {
    tx: Producer<ControlMessage>,
    /// Consumer half of the queue, handed to the engine when the audio
    /// device is lazily created on the first sound-producing action.
    pending_rx: Option<Consumer<ControlMessage>>,
    audio: Option<AudioOutput>,

    pub base_octave: i32,
    pub bpm: u16,
    pub click_volume_pct: u8,
    pub beats_per_bar: u8,
    pub accent: bool,
    pub metronome_on: bool,

    held: Vec<HeldKey>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let (tx, rx) = RingBuffer::<ControlMessage>::new(MESSAGE_QUEUE_SIZE);

        Self {
            tx,
            pending_rx: Some(rx),
            audio: None,
            base_octave: DEFAULT_OCTAVE,
            bpm: DEFAULT_BPM,
            click_volume_pct: 50,
            beats_per_bar: DEFAULT_BEATS_PER_BAR,
            accent: true,
            metronome_on: false,
            held: Vec::new(),
            should_quit: false,
        }
    }

    /// Run the event loop until quit.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.release_expired();

            terminal.draw(|frame| ui::render(frame, self))?;

            // Non-blocking input poll, ~60fps.
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        self.handle_key(key)?;
                    }
                }
            }
        }

        self.send(ControlMessage::AllNotesOff);
        Ok(())
    }

    /// Pitches currently sounding, for the keyboard highlight.
    pub fn held_pitches(&self) -> Vec<(Note, i32)> {
        self.held.iter().map(|k| (k.note, k.octave)).collect()
    }

    fn handle_key(&mut self, key: KeyEvent) -> EyreResult<()> {
        // Piano keys go through the dispatch table first; Enter is carried
        // as '\r' so the table stays plain chars.
        let piano_char = match key.code {
            KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
            KeyCode::Enter => Some('\r'),
            _ => None,
        };
        if let Some(binding) = piano_char.and_then(keymap::lookup) {
            let octave = self.base_octave + binding.octave_offset;
            return self.press_note(binding.note, octave);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('z') => self.shift_octave(-1),
            KeyCode::Char('x') => self.shift_octave(1),
            KeyCode::Char('m') => return self.toggle_metronome(),
            KeyCode::Up => self.adjust_bpm(BPM_STEP as i32),
            KeyCode::Down => self.adjust_bpm(-(BPM_STEP as i32)),
            KeyCode::Char(',') => self.adjust_click_volume(-VOLUME_STEP_PCT),
            KeyCode::Char('.') => self.adjust_click_volume(VOLUME_STEP_PCT),
            KeyCode::Char('b') => self.cycle_meter(),
            KeyCode::Char('n') => self.toggle_accent(),
            _ => {} // unmapped input is ignored
        }
        Ok(())
    }

    fn press_note(&mut self, note: Note, octave: i32) -> EyreResult<()> {
        self.ensure_audio()?;
        let release_at = Instant::now() + KEY_HOLD;

        // Key-repeat guard: a pitch that is already sounding just gets its
        // hold extended, never re-triggered.
        if let Some(held) = self
            .held
            .iter_mut()
            .find(|k| k.note == note && k.octave == octave)
        {
            held.release_at = release_at;
            return Ok(());
        }

        self.send(ControlMessage::NoteOn { note, octave });
        self.held.push(HeldKey {
            note,
            octave,
            release_at,
        });
        Ok(())
    }

    fn release_expired(&mut self) {
        let now = Instant::now();
        let mut expired = Vec::new();
        self.held.retain(|k| {
            if k.release_at <= now {
                expired.push((k.note, k.octave));
                false
            } else {
                true
            }
        });
        for (note, octave) in expired {
            self.send(ControlMessage::NoteOff { note, octave });
        }
    }

    fn shift_octave(&mut self, delta: i32) {
        self.base_octave = keymap::clamp_octave(self.base_octave + delta);
        // Keys already sounding keep the octave they were struck at.
    }

    fn toggle_metronome(&mut self) -> EyreResult<()> {
        self.ensure_audio()?;
        self.send(ControlMessage::MetronomeToggle);
        self.metronome_on = !self.metronome_on;
        Ok(())
    }

    fn adjust_bpm(&mut self, delta: i32) {
        let bpm = (self.bpm as i32 + delta).clamp(MIN_BPM as i32, MAX_BPM as i32);
        self.bpm = bpm as u16;
        self.send(ControlMessage::SetTempo { bpm: self.bpm });
    }

    fn adjust_click_volume(&mut self, delta_pct: i16) {
        let pct = (self.click_volume_pct as i16 + delta_pct).clamp(0, 100);
        self.click_volume_pct = pct as u8;
        self.send(ControlMessage::SetClickVolume {
            volume: self.click_volume_pct as f32 / 100.0,
        });
    }

    fn cycle_meter(&mut self) {
        let at = METER_CYCLE
            .iter()
            .position(|&b| b == self.beats_per_bar)
            .unwrap_or(0);
        self.beats_per_bar = METER_CYCLE[(at + 1) % METER_CYCLE.len()];
        self.send(ControlMessage::SetTimeSignature {
            beats: self.beats_per_bar,
        });
    }

    fn toggle_accent(&mut self) {
        self.accent = !self.accent;
        self.send(ControlMessage::SetAccent {
            enabled: self.accent,
        });
    }

    /// Create the audio device on first use and sync it with any settings
    /// changed before it existed.
    fn ensure_audio(&mut self) -> EyreResult<()> {
        if self.audio.is_some() {
            return Ok(());
        }

        let rx = self
            .pending_rx
            .take()
            .ok_or_else(|| eyre!("control queue already consumed"))?;
        self.audio = Some(AudioOutput::start(rx)?);

        self.send(ControlMessage::SetTempo { bpm: self.bpm });
        self.send(ControlMessage::SetClickVolume {
            volume: self.click_volume_pct as f32 / 100.0,
        });
        self.send(ControlMessage::SetTimeSignature {
            beats: self.beats_per_bar,
        });
        self.send(ControlMessage::SetAccent {
            enabled: self.accent,
        });
        Ok(())
    }

    /// Best-effort push; before the device exists, or with a full queue,
    /// messages are dropped (ensure_audio re-syncs settings at creation).
    fn send(&mut self, msg: ControlMessage) {
        if self.audio.is_some() {
            let _ = self.tx.push(msg);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
