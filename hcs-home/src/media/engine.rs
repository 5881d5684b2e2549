//! cpal-backed media engine
//!
//! The output stream lives on its own thread (cpal streams are not `Send`).
//! The engine and that thread share the voice mixer; the audio callback
//! locks it once per block.
//!
//! Every cue file is decoded into a [`CueBank`] while the engine starts, so
//! the preload issued by the interaction grant only attaches a ready buffer.

use crate::audio::{AudioFrame, AudioOutput, CueBuffer, CueDecoder, Resampler, Voice, VoiceMixer};
use crate::error::{Error, Result};
use crate::media::{CueCatalog, CueHandle, CueId, MediaEngine};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How often the output thread checks for shutdown and stream errors
const SUPERVISE_INTERVAL: Duration = Duration::from_millis(250);

/// Decode a cue file and convert it to the device rate
pub fn load_cue_buffer(path: &Path, device_rate: u32) -> Result<CueBuffer> {
    let decoded = CueDecoder::decode_file(path)?;
    let samples = Resampler::resample(&decoded.samples, decoded.sample_rate, device_rate, 2)?;
    let buffer = CueBuffer::new(samples, device_rate);
    debug!(
        "Loaded cue {} ({}ms at {}Hz)",
        path.display(),
        buffer.duration_ms(),
        device_rate
    );
    Ok(buffer)
}

/// Cue audio decoded at the device rate, keyed by source file
#[derive(Debug, Clone, Default)]
pub struct CueBank {
    buffers: HashMap<PathBuf, Arc<CueBuffer>>,
}

impl CueBank {
    /// Decode every cue in the catalogue. Files shared by several cues are
    /// decoded once. Failures are logged; those cues stay out of the bank.
    pub fn decode(cues: &CueCatalog, device_rate: u32) -> Self {
        let mut buffers = HashMap::new();
        for spec in cues.specs() {
            if buffers.contains_key(&spec.file) {
                continue;
            }
            match load_cue_buffer(&spec.file, device_rate) {
                Ok(buffer) => {
                    buffers.insert(spec.file.clone(), Arc::new(buffer));
                }
                Err(e) => warn!("Cue {} unavailable: {}", spec.file.display(), e),
            }
        }
        info!("Decoded {} cue files at {}Hz", buffers.len(), device_rate);
        Self { buffers }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn contains(&self, source: &Path) -> bool {
        self.buffers.contains_key(source)
    }

    /// A stopped voice over the cue's decoded buffer
    pub fn voice_for(&self, cue: &CueHandle) -> Result<Voice> {
        let buffer = self.buffers.get(&cue.source).ok_or_else(|| {
            Error::Decode(format!("{} was not decoded at startup", cue.source.display()))
        })?;
        Ok(Voice::new(Arc::clone(buffer), cue.volume))
    }
}

fn lock_mixer(mixer: &Mutex<VoiceMixer>) -> MutexGuard<'_, VoiceMixer> {
    match mixer.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn render_into(mixer: Arc<Mutex<VoiceMixer>>) -> impl FnMut(&mut [AudioFrame]) + Send + 'static {
    move |block: &mut [AudioFrame]| lock_mixer(&mixer).render(block)
}

/// Media engine playing decoded cues through the default (or named) device
pub struct CpalMediaEngine {
    mixer: Arc<Mutex<VoiceMixer>>,
    sample_rate: Arc<AtomicU32>,
    running: Arc<AtomicBool>,
    healthy: Arc<AtomicBool>,
    device_name: String,
    bank: CueBank,
    output_thread: Option<JoinHandle<()>>,
}

impl CpalMediaEngine {
    /// Open the output device, start the stream and decode `cues` at the
    /// device rate. Blocks until decoding finishes; async callers run it
    /// under `spawn_blocking`.
    ///
    /// # Errors
    /// Fails when no device can be opened or the stream cannot start; the
    /// caller falls back to the null engine.
    pub fn start(device: Option<String>, cues: &CueCatalog) -> Result<Self> {
        let mixer = Arc::new(Mutex::new(VoiceMixer::new()));
        let sample_rate = Arc::new(AtomicU32::new(0));
        let running = Arc::new(AtomicBool::new(true));
        let healthy = Arc::new(AtomicBool::new(true));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<String>>();

        let thread_mixer = Arc::clone(&mixer);
        let thread_rate = Arc::clone(&sample_rate);
        let thread_running = Arc::clone(&running);
        let thread_healthy = Arc::clone(&healthy);

        let output_thread = std::thread::Builder::new()
            .name("hcs-audio-output".to_string())
            .spawn(move || {
                let mut output = match AudioOutput::new(device) {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = output.start(render_into(Arc::clone(&thread_mixer))) {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
                thread_rate.store(output.sample_rate(), Ordering::SeqCst);
                let _ = ready_tx.send(Ok(output.device_name()));

                while thread_running.load(Ordering::SeqCst) {
                    std::thread::sleep(SUPERVISE_INTERVAL);
                    if !output.has_error() {
                        continue;
                    }
                    let previous_rate = output.sample_rate();
                    match output.try_recover(render_into(Arc::clone(&thread_mixer))) {
                        Ok(()) => {
                            thread_healthy.store(true, Ordering::SeqCst);
                            if output.sample_rate() != previous_rate {
                                warn!(
                                    "Output rate changed {}Hz -> {}Hz after recovery; cues will play at the wrong pitch",
                                    previous_rate,
                                    output.sample_rate()
                                );
                            }
                        }
                        Err(e) => {
                            error!("Audio stream recovery failed: {}", e);
                            thread_healthy.store(false, Ordering::SeqCst);
                        }
                    }
                }

                if let Err(e) = output.stop() {
                    warn!("Failed to stop audio output: {}", e);
                }
                info!("Audio output thread exiting");
            })?;

        let device_name = match ready_rx.recv() {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                let _ = output_thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = output_thread.join();
                return Err(Error::AudioOutput(
                    "Audio output thread exited during startup".to_string(),
                ));
            }
        };

        let rate = sample_rate.load(Ordering::SeqCst);
        let bank = CueBank::decode(cues, rate);
        info!("Media engine ready on '{}' at {}Hz", device_name, rate);

        Ok(Self {
            mixer,
            sample_rate,
            running,
            healthy,
            device_name,
            bank,
            output_thread: Some(output_thread),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::SeqCst)
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    fn reject(cue: CueId, reason: impl Into<String>) -> Error {
        Error::PlaybackRejected {
            cue: cue.to_string(),
            reason: reason.into(),
        }
    }
}

impl MediaEngine for CpalMediaEngine {
    fn preload(&mut self, cue: &CueHandle) -> Result<()> {
        let voice = self.bank.voice_for(cue)?;
        lock_mixer(&self.mixer).insert(cue.id, voice);
        Ok(())
    }

    fn play_from_start(&mut self, cue: CueId) -> Result<()> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(Self::reject(cue, "output device unavailable"));
        }
        let mut mixer = lock_mixer(&self.mixer);
        let voice = mixer
            .voice_mut(cue)
            .ok_or_else(|| Self::reject(cue, "cue not loaded"))?;
        voice.restart();
        Ok(())
    }

    fn stop(&mut self, cue: CueId) -> Result<()> {
        if let Some(voice) = lock_mixer(&self.mixer).voice_mut(cue) {
            voice.halt();
        }
        Ok(())
    }

    fn set_volume(&mut self, cue: CueId, volume: f32) -> Result<()> {
        let mut mixer = lock_mixer(&self.mixer);
        let voice = mixer
            .voice_mut(cue)
            .ok_or_else(|| Self::reject(cue, "cue not loaded"))?;
        voice.set_volume(volume);
        Ok(())
    }
}

impl Drop for CpalMediaEngine {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.output_thread.take() {
            if handle.join().is_err() {
                warn!("Audio output thread panicked");
            }
        }
    }
}
