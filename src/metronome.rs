#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Metronome
=========

A sample-counting beat timer plus the click-voicing rules. The timer runs in
the audio clock: the engine renders the block in chunks bounded by the next
tick, so clicks land sample-accurately instead of at block granularity.

    interval_samples = (60 / bpm) * sample_rate        (60000/bpm in ms)

State machine: Stopped <-> Running.

  start   beat := 1, emits one click immediately, arms the timer.
  stop    cancels the timer, beat := 0. Idempotent.
  tick    beat += 1, wrapping past the bar numerator back to 1, then emits
          a click for the new beat.

Voicing: with accent enabled, beat 1 is emphasized (1200 Hz, volume * 0.4,
150ms) against plain beats (700 Hz, volume * 0.25, 100ms). With accent
disabled every beat renders identically at 800 Hz, volume * 0.3, 100ms; the
emphasis is still computed, its result just gets discarded - mirrored from
the original. Zero volume emits no click at all.

Reconfiguration while running: volume and accent apply on the next click; a
time-signature change applies immediately and zeroes the beat counter so the
next tick is beat 1 again; a tempo change goes through stop + restart, the
simple policy the behavior contract allows.
*/

pub const DEFAULT_BPM: u16 = 120;
pub const MIN_BPM: u16 = 20;
pub const MAX_BPM: u16 = 300;
pub const DEFAULT_VOLUME: f32 = 0.5;
pub const DEFAULT_BEATS_PER_BAR: u8 = 4;

const ACCENT_FREQ_HZ: f32 = 1_200.0;
const ACCENT_GAIN: f32 = 0.4;
const ACCENT_DURATION: f32 = 0.15;
const PLAIN_FREQ_HZ: f32 = 700.0;
const PLAIN_GAIN: f32 = 0.25;
const PLAIN_DURATION: f32 = 0.1;
const FLAT_FREQ_HZ: f32 = 800.0;
const FLAT_GAIN: f32 = 0.3;
const FLAT_DURATION: f32 = 0.1;

/// Everything the synth needs to voice one click.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSpec {
    pub frequency: f32,
    pub gain: f32,
    /// Seconds from onset to silence.
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetronomeState {
    Stopped,
    Running,
}

pub struct Metronome {
    sample_rate: f32,
    state: MetronomeState,
    /// 1..=beats_per_bar while running, 0 while stopped.
    beat: u8,
    bpm: u16,
    volume: f32,
    beats_per_bar: u8,
    accent: bool,
    interval_samples: f64,
    /// Samples left before the next tick fires. May go fractional since the
    /// interval rarely divides the sample rate.
    samples_until_tick: f64,
}

impl Metronome {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            state: MetronomeState::Stopped,
            beat: 0,
            bpm: DEFAULT_BPM,
            volume: DEFAULT_VOLUME,
            beats_per_bar: DEFAULT_BEATS_PER_BAR,
            accent: true,
            interval_samples: 0.0,
            samples_until_tick: 0.0,
        }
    }

    pub fn state(&self) -> MetronomeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MetronomeState::Running
    }

    pub fn beat(&self) -> u8 {
        self.beat
    }

    pub fn bpm(&self) -> u16 {
        self.bpm
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn beats_per_bar(&self) -> u8 {
        self.beats_per_bar
    }

    pub fn accent(&self) -> bool {
        self.accent
    }

    /// Start from beat 1. Returns the click to emit right now.
    pub fn start(&mut self) -> Option<ClickSpec> {
        self.state = MetronomeState::Running;
        self.beat = 1;
        self.interval_samples = 60.0 / self.bpm as f64 * self.sample_rate as f64;
        self.samples_until_tick = self.interval_samples;
        self.click_spec()
    }

    /// Cancel the timer and reset the beat counter. Safe to call when
    /// already stopped.
    pub fn stop(&mut self) {
        self.state = MetronomeState::Stopped;
        self.beat = 0;
        self.samples_until_tick = 0.0;
    }

    /// Flip between stopped and running. Returns the immediate click when
    /// this started the metronome.
    pub fn toggle(&mut self) -> Option<ClickSpec> {
        if self.is_running() {
            self.stop();
            None
        } else {
            self.start()
        }
    }

    /// Set the tempo, clamped to MIN_BPM..=MAX_BPM. When running the timer
    /// restarts to apply the new interval; the restart click is returned.
    pub fn set_tempo(&mut self, bpm: u16) -> Option<ClickSpec> {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        if self.is_running() {
            self.stop();
            self.start()
        } else {
            None
        }
    }

    /// Click volume 0.0..=1.0, applied on the next click.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Change the bar length. Resets the beat counter so the beat index can
    /// never sit out of range; the next tick is beat 1.
    pub fn set_time_signature(&mut self, beats: u8) {
        self.beats_per_bar = beats.max(1);
        self.beat = 0;
    }

    pub fn set_accent(&mut self, enabled: bool) {
        self.accent = enabled;
    }

    /// Samples the engine may render before the next tick is due.
    /// `Some(0)` means a tick is due now; `None` means no timer is armed.
    pub fn frames_until_tick(&self) -> Option<usize> {
        if !self.is_running() {
            return None;
        }
        Some(self.samples_until_tick.max(0.0).ceil() as usize)
    }

    /// Account for rendered samples.
    pub fn consume(&mut self, frames: usize) {
        if self.is_running() {
            self.samples_until_tick -= frames as f64;
        }
    }

    /// Fire the due tick: advance the beat and produce its click. Returns
    /// None when no tick is due or the click is muted.
    pub fn tick(&mut self) -> Option<ClickSpec> {
        if !self.is_running() || self.samples_until_tick > 0.0 {
            return None;
        }
        self.samples_until_tick += self.interval_samples;
        self.beat += 1;
        if self.beat > self.beats_per_bar {
            self.beat = 1;
        }
        self.click_spec()
    }

    /// Voice the click for the current beat. None when volume is zero: no
    /// tone gets built at all.
    fn click_spec(&self) -> Option<ClickSpec> {
        if self.volume == 0.0 {
            return None;
        }

        let strong = self.beat == 1 && self.accent;
        let emphasized = ClickSpec {
            frequency: if strong { ACCENT_FREQ_HZ } else { PLAIN_FREQ_HZ },
            gain: self.volume * if strong { ACCENT_GAIN } else { PLAIN_GAIN },
            duration: if strong {
                ACCENT_DURATION
            } else {
                PLAIN_DURATION
            },
        };

        // Accent off: every beat voices the same, the emphasis above is
        // discarded.
        if self.accent {
            Some(emphasized)
        } else {
            Some(ClickSpec {
                frequency: FLAT_FREQ_HZ,
                gain: self.volume * FLAT_GAIN,
                duration: FLAT_DURATION,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    /// Advance `frames` samples, collecting (beat, spec) for every tick.
    /// A tick due exactly at the end of the window fires within it.
    fn run(metronome: &mut Metronome, frames: usize) -> Vec<(u8, Option<ClickSpec>)> {
        let mut events = Vec::new();
        let mut remaining = frames;
        loop {
            match metronome.frames_until_tick() {
                Some(0) => {
                    let spec = metronome.tick();
                    events.push((metronome.beat(), spec));
                }
                Some(n) => {
                    if remaining == 0 {
                        break;
                    }
                    let chunk = remaining.min(n);
                    metronome.consume(chunk);
                    remaining -= chunk;
                }
                None => break,
            }
        }
        events
    }

    #[test]
    fn beat_sequence_wraps_at_bar() {
        let mut m = Metronome::new(SAMPLE_RATE);
        // 120 BPM at 1kHz: one tick every 500 samples.
        let first = m.start();
        assert!(first.is_some());
        assert_eq!(m.beat(), 1);

        let beats: Vec<u8> = run(&mut m, 3500).iter().map(|(b, _)| *b).collect();
        assert_eq!(beats, vec![2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn accent_voices_beat_one_in_three_four() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.set_time_signature(3);
        let first = m.start().unwrap();
        assert_eq!(first.frequency, 1_200.0);
        assert_eq!(first.duration, 0.15);
        assert!((first.gain - 0.5 * 0.4).abs() < 1e-6);

        let events = run(&mut m, 3000);
        for (beat, spec) in events {
            let spec = spec.unwrap();
            if beat == 1 {
                assert_eq!(spec.frequency, 1_200.0);
                assert_eq!(spec.duration, 0.15);
                assert!((spec.gain - 0.5 * 0.4).abs() < 1e-6);
            } else {
                assert_eq!(spec.frequency, 700.0);
                assert_eq!(spec.duration, 0.1);
                assert!((spec.gain - 0.5 * 0.25).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn accent_off_flattens_every_beat() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.set_accent(false);
        m.set_volume(0.8);
        let first = m.start().unwrap();
        assert_eq!(first.frequency, 800.0);

        for (_, spec) in run(&mut m, 4000) {
            let spec = spec.unwrap();
            assert_eq!(spec.frequency, 800.0);
            assert_eq!(spec.duration, 0.1);
            assert!((spec.gain - 0.8 * 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn stop_then_start_resets_to_beat_one() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.start();
        run(&mut m, 1100); // partway into the bar
        assert!(m.beat() > 1);

        m.stop();
        assert_eq!(m.beat(), 0);
        assert!(!m.is_running());

        m.start();
        assert_eq!(m.beat(), 1);
        let beats: Vec<u8> = run(&mut m, 1000).iter().map(|(b, _)| *b).collect();
        assert_eq!(beats, vec![2, 3]);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.stop();
        m.stop();
        assert_eq!(m.beat(), 0);
        assert_eq!(m.frames_until_tick(), None);
    }

    #[test]
    fn time_signature_change_resets_beat_counter() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.start();
        run(&mut m, 1600);
        assert!(m.beat() > 1);

        m.set_time_signature(6);
        assert_eq!(m.beat(), 0);

        // Next tick lands on beat 1 again.
        let beats: Vec<u8> = run(&mut m, 500).iter().map(|(b, _)| *b).collect();
        assert_eq!(beats, vec![1]);
    }

    #[test]
    fn zero_volume_emits_nothing() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.set_volume(0.0);
        assert!(m.start().is_none());
        for (_, spec) in run(&mut m, 2000) {
            assert!(spec.is_none());
        }
        // Timer still runs; beats keep counting silently.
        assert!(m.beat() >= 1);
    }

    #[test]
    fn tempo_change_restarts_with_new_interval() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.start();
        run(&mut m, 1100);

        let restart = m.set_tempo(240); // 250 samples per tick now
        assert!(restart.is_some());
        assert_eq!(m.beat(), 1);

        let beats: Vec<u8> = run(&mut m, 1000).iter().map(|(b, _)| *b).collect();
        assert_eq!(beats, vec![2, 3, 4, 1]);
    }

    #[test]
    fn tempo_clamps_to_supported_range() {
        let mut m = Metronome::new(SAMPLE_RATE);
        m.set_tempo(1);
        assert_eq!(m.bpm(), MIN_BPM);
        m.set_tempo(10_000);
        assert_eq!(m.bpm(), MAX_BPM);
        // Stopped: no restart click.
        assert!(m.set_tempo(90).is_none());
        assert_eq!(m.bpm(), 90);
    }
}
