use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Waveform shapes the oscillator can produce.
///
/// Triangle is the piano voice (soft, weak odd harmonics); Square is the
/// metronome click (hollow and cutting, reads well over other sound).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

/// Phase-accumulator oscillator.
///
/// Phase lives in [0, 1) and advances by frequency / sample_rate each
/// sample, so frequency may change between samples without a discontinuity.
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample in [-1, 1] and advance the phase.
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Triangle => {
                // Saw folded around zero: rises 0..0.5, falls 0.5..1.
                let saw = 2.0 * self.phase - 1.0;
                2.0 * saw.abs() - 1.0
            }
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Saw => 2.0 * self.phase - 1.0,
        };

        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        value
    }

    /// Fill a buffer at a fixed frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
