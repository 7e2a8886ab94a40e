use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Consumer;

use crate::engine::Engine;
use crate::synth::message::ControlMessage;
use crate::MAX_BLOCK_SIZE;

/// The process-wide audio device: a cpal output stream with the engine
/// living inside its callback.
///
/// Created once, lazily, on the first sound-producing interaction, and held
/// for the rest of the session. Mono audio is rendered in blocks of at most
/// MAX_BLOCK_SIZE and duplicated to every device channel. Dropping this
/// stops the stream; release tails that have not finished are cut off with
/// it, which only happens at process exit.
pub struct AudioOutput {
    _stream: cpal::Stream,
    sample_rate: f32,
    channels: usize,
}

impl AudioOutput {
    /// Open the default output device and start rendering.
    ///
    /// The engine takes the consumer half of the control queue; once this
    /// returns, every message pushed to the producer half is applied on the
    /// audio thread.
    pub fn start(rx: Consumer<ControlMessage>) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let mut engine = Engine::new(sample_rate, rx);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames];
                        engine.process_block(block);

                        // Mono to all channels.
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        frames_written += frames;
                    }
                },
                |err| eprintln!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        Ok(Self {
            _stream: stream,
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}
