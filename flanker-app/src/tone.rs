use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use flanker_experiment::ErrorCue;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Fixed-frequency sine burst on the default output device. The stream runs
/// continuously and emits silence until a burst is triggered; the callback
/// only reads the shared sample counter.
pub struct ErrorTone {
    _stream: cpal::Stream,
    remaining: Arc<AtomicU32>,
    burst_samples: u32,
}

impl ErrorTone {
    pub fn new(freq_hz: f32, duration_ms: u64) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no audio output device")?;
        let supported = device
            .default_output_config()
            .context("no default audio output config")?;
        if supported.sample_format() != SampleFormat::F32 {
            bail!(
                "unsupported sample format {:?} for error tone",
                supported.sample_format()
            );
        }
        let config = supported.config();
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let remaining = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&remaining);
        let step = TAU * freq_hz / sample_rate;
        let mut phase = 0.0f32;

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = if counter.load(Ordering::Relaxed) > 0 {
                            counter.fetch_sub(1, Ordering::Relaxed);
                            phase = (phase + step) % TAU;
                            phase.sin() * 0.4
                        } else {
                            phase = 0.0;
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                |err| eprintln!("audio stream error: {err}"),
                None,
            )
            .context("cannot build audio output stream")?;
        stream.play().context("cannot start audio output stream")?;

        Ok(Self {
            _stream: stream,
            remaining,
            burst_samples: (sample_rate * duration_ms as f32 / 1000.0) as u32,
        })
    }
}

impl ErrorCue for ErrorTone {
    fn error_tone(&mut self) {
        self.remaining.store(self.burst_samples, Ordering::SeqCst);
    }
}

/// Tone if the device came up, silence otherwise. A missing audio device
/// downgrades the cue rather than blocking the session.
pub enum Cue {
    Tone(ErrorTone),
    Silent,
}

impl Cue {
    pub fn init(freq_hz: f32, duration_ms: u64) -> Self {
        match ErrorTone::new(freq_hz, duration_ms) {
            Ok(tone) => Cue::Tone(tone),
            Err(err) => {
                eprintln!("audio unavailable ({err}); error tone disabled");
                Cue::Silent
            }
        }
    }
}

impl ErrorCue for Cue {
    fn error_tone(&mut self) {
        match self {
            Cue::Tone(tone) => tone.error_tone(),
            Cue::Silent => {}
        }
    }
}
