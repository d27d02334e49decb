/// Audio output using cpal
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::audio::ToneOutput;
use crate::config::ToneConfig;
use crate::tone::{Mixer, ToneSpec};

/// Frames rendered per pass inside the callback
const RENDER_CHUNK: usize = 1024;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoOutputDevice,
    #[error("failed to read default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format {0}")]
    UnsupportedSampleFormat(SampleFormat),
}

/// Open output stream plus the queue feeding its mixer
pub struct AudioOutput {
    _stream: cpal::Stream,
    triggers: HeapProd<ToneSpec>,
}

impl AudioOutput {
    pub fn new(config: &ToneConfig) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device.default_output_config()?;

        let sample_format = supported.sample_format();
        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        info!(
            "audio device {} ({sample_format}, {sample_rate} Hz, {channels} ch)",
            device.name().unwrap_or_else(|_| "unknown".into())
        );

        let (triggers, queue) = HeapRb::<ToneSpec>::new(config.trigger_capacity).split();
        let mixer = Mixer::new(sample_rate, config.max_voices);
        let stream_config: StreamConfig = supported.into();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer, queue)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer, queue)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer, queue)?,
            other => return Err(AudioError::UnsupportedSampleFormat(other)),
        };
        stream.play()?;

        Ok(Self {
            _stream: stream,
            triggers,
        })
    }
}

impl ToneOutput for AudioOutput {
    fn start_tone(&mut self, spec: ToneSpec) {
        if self.triggers.try_push(spec).is_err() {
            debug!("tone queue full, dropped {} Hz", spec.frequency_hz);
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut mixer: Mixer,
    mut queue: HeapCons<ToneSpec>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = (config.channels as usize).max(1);
    let mut mono = vec![0.0f32; RENDER_CHUNK];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Some(spec) = queue.try_pop() {
                mixer.start(&spec);
            }

            for chunk in data.chunks_mut(channels * RENDER_CHUNK) {
                let frames = chunk.len() / channels;
                let block = &mut mono[..frames];
                mixer.render(block);

                for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                    frame.fill(T::from_sample(sample.clamp(-1.0, 1.0)));
                }
            }
        },
        |err| error!("audio stream error: {err}"),
        None,
    )?;

    Ok(stream)
}
