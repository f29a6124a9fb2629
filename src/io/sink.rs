use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info};

use crate::{synth::PolySynth, Error, Result};

/// Where rendered chunks go.
///
/// A sink takes ownership of the synth on `start` and pulls chunks from it
/// at its own pace. `is_active` turns false once it stops delivering, for
/// whatever reason, so the control loop can wind down.
pub trait AudioSink {
    fn start(&mut self, synth: PolySynth) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn is_active(&self) -> bool;
}

/// Plays through the default output device, mono duplicated to every
/// device channel.
pub struct CpalSink {
    sample_rate: u32,
    stream: Option<cpal::Stream>,
    failed: Arc<AtomicBool>,
}

impl CpalSink {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            stream: None,
            failed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl AudioSink for CpalSink {
    fn start(&mut self, mut synth: PolySynth) -> Result<()> {
        if self.stream.is_some() {
            return Err(Error::Audio("output stream already started".into()));
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no default output device available".into()))?;
        let supported = device.default_output_config()?;

        let channels = supported.channels() as usize;
        let config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate = self.sample_rate,
            channels,
            "opening output stream"
        );

        // The device asks for arbitrary frame counts; the synth renders
        // whole chunks. `cursor == frames` means the chunk is used up.
        let frames = synth.frames_per_chunk();
        let mut chunk = vec![0.0f32; frames];
        let mut cursor = frames;

        let failed = Arc::clone(&self.failed);
        failed.store(false, Ordering::Release);

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    if cursor == frames {
                        synth.render_block(&mut chunk);
                        cursor = 0;
                    }
                    frame.fill(chunk[cursor]);
                    cursor += 1;
                }
            },
            move |err| {
                error!(%err, "audio stream error");
                failed.store(true, Ordering::Release);
            },
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.pause()?;
            debug!("output stream stopped");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.stream.is_some() && !self.failed.load(Ordering::Acquire)
    }
}

/// Renders a fixed number of chunks on its own thread into memory.
///
/// With pacing, each chunk is followed by a sleep so a control loop has
/// time to interleave commands, like a device would.
pub struct OfflineSink {
    chunks: usize,
    pacing: Option<Duration>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<Vec<f32>>>,
    output: Vec<f32>,
}

impl OfflineSink {
    pub fn new(chunks: usize) -> Self {
        Self {
            chunks,
            pacing: None,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            output: Vec::new(),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Everything rendered so far; filled in by `stop`.
    pub fn output(&self) -> &[f32] {
        &self.output
    }

    pub fn into_output(self) -> Vec<f32> {
        self.output
    }
}

impl AudioSink for OfflineSink {
    fn start(&mut self, mut synth: PolySynth) -> Result<()> {
        if self.handle.is_some() {
            return Err(Error::Audio("offline render already started".into()));
        }

        let chunks = self.chunks;
        let pacing = self.pacing;
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Release);

        let handle = thread::Builder::new()
            .name("offline-render".into())
            .spawn(move || {
                let frames = synth.frames_per_chunk();
                let mut output = Vec::with_capacity(chunks * frames);
                let mut chunk = vec![0.0f32; frames];

                for _ in 0..chunks {
                    if !running.load(Ordering::Acquire) {
                        break;
                    }
                    synth.render_block(&mut chunk);
                    output.extend_from_slice(&chunk);
                    if let Some(pacing) = pacing {
                        thread::sleep(pacing);
                    }
                }

                running.store(false, Ordering::Release);
                output
            })
            .map_err(|err| Error::Audio(format!("failed to spawn render thread: {err}")))?;

        self.handle = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            self.output = handle
                .join()
                .map_err(|_| Error::Audio("offline render thread panicked".into()))?;
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
