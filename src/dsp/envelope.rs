use crate::{MIN_GAIN, MIN_TIME};

/*
Gain Envelope
=============

This envelope reproduces browser-audio style gain automation as per-sample
arithmetic. Two ramp kinds appear:

  linear ramp        level moves by a fixed increment per sample.
                     Used for the attack so a tone never clicks on.

  exponential ramp   level is multiplied by a fixed ratio per sample:

                         ratio = (target / start)^(1 / samples)

                     After `samples` multiplications the level lands on
                     `target`. This is how acoustic sounds decay, and it is
                     the discrete form of exponentialRampToValueAtTime.
                     A geometric ramp can never reach zero, so ramps toward
                     silence target MIN_GAIN instead.

Two shapes are built from those ramps:

  Held (piano key)        0 --linear--> peak --exp--> floor --hold...
                          The decay curve is the whole "sustain": there is
                          no separate sustain stage, the tone just parks on
                          the decay floor until released. `release()` then
                          ramps exponentially from the current level to
                          MIN_GAIN over the release time.

  One-shot (click)        0 --linear--> peak --exp--> MIN_GAIN --finished
                          No sustain, no release. The envelope self-
                          terminates when the decay lands.

    Level
    peak ┤   /\
         │  /  ``--..__
   floor │ /            `------------
         │/                          \
     0.0 └───────────────────────────────→ Time
          attack   decay      hold    release
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
    /// Holding on the decay floor until `release()`. Held shapes only.
    Sustain,
    Release,
    Finished,
}

pub struct GainEnvelope {
    // Shape (fixed at construction)
    peak: f32,
    attack_samples: u32,
    decay_samples: u32,
    decay_ratio: f32,
    /// Decay floor to hold at. `None` makes the envelope one-shot: it
    /// finishes when the decay ramp lands.
    sustain: Option<f32>,
    release_samples: u32,

    // Runtime state
    stage: EnvelopeStage,
    level: f32,
    elapsed: u32,
    release_ratio: f32,
}

impl GainEnvelope {
    /// Envelope for a held tone: linear attack to `peak`, exponential decay
    /// to `floor` over `decay_time`, hold, then an exponential release over
    /// `release_time` once `release()` is called.
    pub fn held(
        sample_rate: f32,
        attack_time: f32,
        peak: f32,
        decay_time: f32,
        floor: f32,
        release_time: f32,
    ) -> Self {
        Self::build(
            sample_rate,
            attack_time,
            peak,
            decay_time,
            Some(floor.max(MIN_GAIN)),
            release_time,
        )
    }

    /// One-shot envelope: linear attack to `peak`, exponential decay to
    /// MIN_GAIN landing at `duration` from onset, then finished.
    pub fn one_shot(sample_rate: f32, attack_time: f32, peak: f32, duration: f32) -> Self {
        let decay_time = (duration - attack_time).max(MIN_TIME);
        Self::build(sample_rate, attack_time, peak, decay_time, None, MIN_TIME)
    }

    fn build(
        sample_rate: f32,
        attack_time: f32,
        peak: f32,
        decay_time: f32,
        sustain: Option<f32>,
        release_time: f32,
    ) -> Self {
        let attack_samples = to_samples(attack_time, sample_rate);
        let decay_samples = to_samples(decay_time, sample_rate);
        let decay_target = sustain.unwrap_or(MIN_GAIN);
        let decay_ratio = (decay_target / peak.max(MIN_GAIN)).powf(1.0 / decay_samples as f32);

        Self {
            peak,
            attack_samples,
            decay_samples,
            decay_ratio,
            sustain,
            release_samples: to_samples(release_time, sample_rate),
            stage: EnvelopeStage::Attack,
            level: 0.0,
            elapsed: 0,
            release_ratio: 1.0,
        }
    }

    /// Begin the release ramp from wherever the level currently is.
    ///
    /// Starting from the current level rather than the floor keeps a key
    /// released mid-attack from clicking. No-op once finished.
    pub fn release(&mut self) {
        if matches!(self.stage, EnvelopeStage::Release | EnvelopeStage::Finished) {
            return;
        }

        let start = self.level.max(MIN_GAIN);
        self.release_ratio = (MIN_GAIN / start).powf(1.0 / self.release_samples as f32);
        self.elapsed = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Attack => {
                self.level += self.peak / self.attack_samples as f32;
                self.elapsed += 1;
                if self.elapsed >= self.attack_samples {
                    self.level = self.peak;
                    self.elapsed = 0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level *= self.decay_ratio;
                self.elapsed += 1;
                if self.elapsed >= self.decay_samples {
                    self.elapsed = 0;
                    match self.sustain {
                        Some(floor) => {
                            self.level = floor;
                            self.stage = EnvelopeStage::Sustain;
                        }
                        None => {
                            self.level = 0.0;
                            self.stage = EnvelopeStage::Finished;
                        }
                    }
                }
            }

            EnvelopeStage::Sustain => {
                // Parked on the decay floor until release().
            }

            EnvelopeStage::Release => {
                self.level *= self.release_ratio;
                self.elapsed += 1;
                if self.elapsed >= self.release_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Finished;
                }
            }

            EnvelopeStage::Finished => {
                self.level = 0.0;
            }
        }

        debug_assert!(self.level.is_finite());
        self.level
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, EnvelopeStage::Finished)
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

/// Seconds to a sample count, at least 1 so ramp math never divides by zero.
fn to_samples(seconds: f32, sample_rate: f32) -> u32 {
    (seconds.max(MIN_TIME) * sample_rate).round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn run(env: &mut GainEnvelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    fn piano_shape() -> GainEnvelope {
        // The instrument's key envelope at test rate: 10ms attack to 0.3,
        // 290ms decay to 0.1, 100ms release.
        GainEnvelope::held(SAMPLE_RATE, 0.01, 0.3, 0.29, 0.1, 0.1)
    }

    #[test]
    fn attack_hits_peak_on_time() {
        let mut env = piano_shape();
        run(&mut env, 10);
        assert!((env.level() - 0.3).abs() < 1e-6);
        assert_eq!(env.stage(), EnvelopeStage::Decay);
    }

    #[test]
    fn decay_lands_on_floor_and_holds() {
        let mut env = piano_shape();
        run(&mut env, 10 + 290);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((env.level() - 0.1).abs() < 1e-3);

        run(&mut env, 500);
        assert!((env.level() - 0.1).abs() < 1e-3, "hold should not drift");
    }

    #[test]
    fn decay_curve_is_monotonic() {
        let mut env = piano_shape();
        run(&mut env, 10);
        let mut prev = env.level();
        for _ in 0..290 {
            let level = env.next_sample();
            assert!(level <= prev);
            prev = level;
        }
    }

    #[test]
    fn release_reaches_silence_on_time() {
        let mut env = piano_shape();
        run(&mut env, 400);
        env.release();
        run(&mut env, 100);
        assert!(env.is_finished());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn release_mid_attack_starts_from_current_level() {
        let mut env = piano_shape();
        run(&mut env, 4); // partway up the attack
        let at_release = env.level();
        env.release();
        let next = env.next_sample();
        assert!(next <= at_release, "release must not jump upward");
        run(&mut env, 99);
        assert!(env.is_finished());
    }

    #[test]
    fn one_shot_self_terminates() {
        // 100ms click at unit volume.
        let mut env = GainEnvelope::one_shot(SAMPLE_RATE, 0.01, 0.3, 0.1);
        run(&mut env, 99);
        assert!(!env.is_finished());
        run(&mut env, 1);
        assert!(env.is_finished());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn release_is_idempotent() {
        let mut env = piano_shape();
        run(&mut env, 50);
        env.release();
        run(&mut env, 50);
        let mid = env.level();
        env.release(); // second call must not restart the ramp
        assert_eq!(env.level(), mid);
        run(&mut env, 50);
        assert!(env.is_finished());
    }
}
