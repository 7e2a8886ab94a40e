use crate::dsp::{GainEnvelope, Oscillator, Waveform};
use crate::metronome::ClickSpec;

// Gain automation for a held key: ramp to 0.3 over 10ms, decay toward the
// 0.1 floor across the remainder of a 300ms curve, release over 100ms.
const KEY_ATTACK_TIME: f32 = 0.01;
const KEY_PEAK_GAIN: f32 = 0.3;
const KEY_DECAY_TIME: f32 = 0.29;
const KEY_FLOOR_GAIN: f32 = 0.1;
const KEY_RELEASE_TIME: f32 = 0.1;

// Clicks share the 10ms attack; their decay runs to the click's duration.
const CLICK_ATTACK_TIME: f32 = 0.01;

/// A live oscillator + envelope pair: one sounding key or one metronome
/// click. Self-terminating; the session drops it once the envelope lands.
pub struct Tone {
    osc: Oscillator,
    env: GainEnvelope,
    frequency: f32,
    sample_rate: f32,
}

impl Tone {
    /// Piano key voice: triangle wave with the held key envelope.
    pub fn key(sample_rate: f32, frequency: f32) -> Self {
        Self {
            osc: Oscillator::new(Waveform::Triangle),
            env: GainEnvelope::held(
                sample_rate,
                KEY_ATTACK_TIME,
                KEY_PEAK_GAIN,
                KEY_DECAY_TIME,
                KEY_FLOOR_GAIN,
                KEY_RELEASE_TIME,
            ),
            frequency,
            sample_rate,
        }
    }

    /// Metronome click: square-wave burst with a one-shot envelope.
    pub fn click(sample_rate: f32, spec: ClickSpec) -> Self {
        Self {
            osc: Oscillator::new(Waveform::Square),
            env: GainEnvelope::one_shot(sample_rate, CLICK_ATTACK_TIME, spec.gain, spec.duration),
            frequency: spec.frequency,
            sample_rate,
        }
    }

    /// Begin the release fade. The tone keeps sounding for the release time
    /// and then reports finished.
    pub fn release(&mut self) {
        self.env.release();
    }

    pub fn is_finished(&self) -> bool {
        self.env.is_finished()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Add this tone's next samples into the buffer.
    pub fn mix_into(&mut self, out: &mut [f32]) {
        if self.env.is_finished() {
            return;
        }
        for sample in out.iter_mut() {
            let gain = self.env.next_sample();
            *sample += self.osc.next_sample(self.frequency, self.sample_rate) * gain;
        }
    }
}
