//! Audio output using cpal
//!
//! Opens the output device and drives a block-based render callback on the
//! audio thread. The callback fills a block of stereo frames; this module
//! converts them to the device sample format and channel layout.

use crate::audio::AudioFrame;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Preferred device rate when the device supports it
const PREFERRED_SAMPLE_RATE: u32 = 44100;

/// Audio output manager using cpal.
pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
    /// Set by the stream error callback
    error_flag: Arc<AtomicBool>,
    /// Count of consecutive errors for fallback logic
    error_count: Arc<AtomicU32>,
    /// Device name requested (None = default)
    requested_device: Option<String>,
}

impl AudioOutput {
    /// List available audio output devices.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();

        let devices: Vec<String> = host
            .output_devices()
            .map_err(|e| Error::AudioOutput(format!("Failed to enumerate devices: {}", e)))?
            .filter_map(|device| device.name().ok())
            .collect();

        debug!("Found {} output devices", devices.len());
        Ok(devices)
    }

    /// Open audio device for output.
    ///
    /// A named device that cannot be found falls back to the default device.
    ///
    /// # Errors
    /// - Device not found and default device unavailable
    /// - Failed to get device configuration
    pub fn new(device_name: Option<String>) -> Result<Self> {
        let host = cpal::default_host();

        let device = match device_name.as_ref() {
            Some(name) => {
                let mut devices = host.output_devices().map_err(|e| {
                    Error::AudioOutput(format!("Failed to enumerate devices: {}", e))
                })?;

                match devices.find(|d| d.name().ok().as_ref() == Some(name)) {
                    Some(dev) => {
                        info!("Found requested audio device: {}", name);
                        dev
                    }
                    None => {
                        warn!(
                            "Requested device '{}' not found, falling back to default device",
                            name
                        );
                        host.default_output_device().ok_or_else(|| {
                            Error::AudioOutput(format!(
                                "Device '{}' not found and no default device available",
                                name
                            ))
                        })?
                    }
                }
            }
            None => host
                .default_output_device()
                .ok_or_else(|| Error::AudioOutput("No default output device found".to_string()))?,
        };

        info!(
            "Using audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let (config, sample_format) = Self::get_best_config(&device)?;

        debug!(
            "Audio config: sample_rate={}, channels={}, format={:?}",
            config.sample_rate.0, config.channels, sample_format
        );

        Ok(Self {
            device,
            config,
            sample_format,
            stream: None,
            error_flag: Arc::new(AtomicBool::new(false)),
            error_count: Arc::new(AtomicU32::new(0)),
            requested_device: device_name,
        })
    }

    /// Prefer stereo f32 at 44.1kHz; otherwise take the device default.
    fn get_best_config(device: &Device) -> Result<(StreamConfig, SampleFormat)> {
        let mut supported_configs = device
            .supported_output_configs()
            .map_err(|e| Error::AudioOutput(format!("Failed to get device configs: {}", e)))?;

        let preferred = supported_configs.find(|config| {
            config.channels() == 2
                && config.min_sample_rate().0 <= PREFERRED_SAMPLE_RATE
                && config.max_sample_rate().0 >= PREFERRED_SAMPLE_RATE
                && config.sample_format() == SampleFormat::F32
        });

        if let Some(supported_config) = preferred {
            let sample_format = supported_config.sample_format();
            let config = supported_config
                .with_sample_rate(cpal::SampleRate(PREFERRED_SAMPLE_RATE))
                .config();
            return Ok((config, sample_format));
        }

        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get default config: {}", e)))?;

        Ok((supported_config.config(), supported_config.sample_format()))
    }

    /// Start the stream.
    ///
    /// `render` runs on the real-time audio thread. It receives a block of
    /// silent frames and mixes into it; it must not block.
    pub fn start<R>(&mut self, render: R) -> Result<()>
    where
        R: FnMut(&mut [AudioFrame]) + Send + 'static,
    {
        info!("Starting audio stream");

        let stream = match self.sample_format {
            SampleFormat::F32 => self.build_stream::<f32, R>(render)?,
            SampleFormat::I16 => self.build_stream::<i16, R>(render)?,
            SampleFormat::U16 => self.build_stream::<u16, R>(render)?,
            sample_format => {
                return Err(Error::AudioOutput(format!(
                    "Unsupported sample format: {:?}",
                    sample_format
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {}", e)))?;

        self.stream = Some(stream);
        info!("Audio stream started successfully");
        Ok(())
    }

    fn build_stream<T, R>(&self, mut render: R) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32>,
        R: FnMut(&mut [AudioFrame]) + Send + 'static,
    {
        let channels = self.config.channels as usize;
        let error_flag = Arc::clone(&self.error_flag);
        let error_count = Arc::clone(&self.error_count);
        let mut block: Vec<AudioFrame> = Vec::new();

        self.device
            .build_output_stream(
                &self.config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels.max(1);
                    if block.len() < frames {
                        block.resize(frames, AudioFrame::zero());
                    }
                    let block = &mut block[..frames];
                    block.fill(AudioFrame::zero());
                    render(block);

                    for (out, frame) in data.chunks_mut(channels.max(1)).zip(block.iter()) {
                        let frame = frame.clamped();
                        out[0] = T::from_sample(frame.left);
                        if out.len() > 1 {
                            out[1] = T::from_sample(frame.right);
                        }
                        for extra in out.iter_mut().skip(2) {
                            *extra = T::EQUILIBRIUM;
                        }
                    }
                },
                move |err| {
                    error!("Audio stream error: {} - marking for recovery", err);
                    error_flag.store(true, Ordering::SeqCst);
                    error_count.fetch_add(1, Ordering::SeqCst);
                },
                None,
            )
            .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {}", e)))
    }

    /// Stop audio playback and drop the stream.
    pub fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            info!("Stopping audio stream");
            stream
                .pause()
                .map_err(|e| Error::AudioOutput(format!("Failed to pause stream: {}", e)))?;
        }
        Ok(())
    }

    /// Get sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Get device name.
    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "Unknown".to_string())
    }

    /// Check if an audio stream error has occurred.
    pub fn has_error(&self) -> bool {
        self.error_flag.load(Ordering::SeqCst)
    }

    /// Clear error flag and reset error counter.
    pub fn clear_error(&self) {
        self.error_flag.store(false, Ordering::SeqCst);
        self.error_count.store(0, Ordering::SeqCst);
    }

    /// Number of consecutive stream errors
    pub fn error_count(&self) -> u32 {
        self.error_count.load(Ordering::SeqCst)
    }

    /// Rebuild the stream after an error.
    ///
    /// After more than three consecutive errors on a named device, switches to
    /// the default device.
    pub fn try_recover<R>(&mut self, render: R) -> Result<()>
    where
        R: FnMut(&mut [AudioFrame]) + Send + 'static,
    {
        let error_count = self.error_count();
        warn!("Attempting audio stream recovery (error count: {})", error_count);

        if let Err(e) = self.stop() {
            warn!("Failed to stop stream during recovery: {}", e);
        }

        if error_count > 3 && self.requested_device.is_some() {
            warn!("Multiple errors detected, attempting fallback to default device");
            let fallback = Self::new(None)?;
            self.device = fallback.device.clone();
            self.config = fallback.config.clone();
            self.sample_format = fallback.sample_format;
            self.requested_device = None;
        }

        self.start(render)?;
        info!("Audio stream recovery successful");
        self.clear_error();
        Ok(())
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
