use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::audio_capture::AudioCapture;
use crate::config::AppConfig;
use crate::error::{Result, VisualizerError};
use crate::frequency_analyzer::{FrequencyAnalyzer, FrequencyFrame};

const RELEASE_POLL_MS: u64 = 50;

/// A live capture handle exposing successive frequency-domain frames,
/// polled once per tick by the render loop.
pub trait FrequencyFrameSource: Send {
    /// The newest frequency frame
    fn next_frequency_frame(&mut self) -> FrequencyFrame;
    /// Releases the capture device; subsequent frames are silent
    fn release(&mut self);
}

/// Grants access to a capture device. Refusal (missing device, permission
/// denied) surfaces as `CaptureDenied`.
pub trait CaptureAccess: Send + Sync {
    fn request(&self) -> Result<Box<dyn FrequencyFrameSource>>;
}

/// Production frame source: PortAudio capture feeding the FFT analyzer.
///
/// The PortAudio stream is tied to the thread that opened it, so a
/// dedicated capture thread owns the device for the lifetime of the
/// source; sample blocks cross over on a bounded channel.
pub struct MicrophoneFrameSource {
    analyzer: FrequencyAnalyzer,
    rx: mpsc::Receiver<Vec<f32>>,
    running: Arc<AtomicBool>,
    capture_thread: Option<std::thread::JoinHandle<()>>,
    released: bool,
}

impl MicrophoneFrameSource {
    /// Opens the default microphone and starts streaming into the analyzer
    pub fn open(config: &AppConfig) -> Result<Self> {
        // Bounded channel; stale blocks are dropped by the callback rather
        // than queued behind a slow consumer
        let (tx, rx) = mpsc::channel(10);
        let running = Arc::new(AtomicBool::new(true));

        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let thread_config = config.clone();
        let thread_running = running.clone();

        let capture_thread = std::thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                let mut capture = AudioCapture::new();
                match capture.start(&thread_config, tx, thread_running.clone()) {
                    Ok(()) => {
                        let _ = ready_tx.send(Ok(()));
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                }

                // The PortAudio callback does the streaming; this thread
                // only keeps the device alive until release
                while thread_running.load(Ordering::Relaxed) {
                    std::thread::sleep(Duration::from_millis(RELEASE_POLL_MS));
                }
                capture.stop();
            })
            .map_err(|e| VisualizerError::CaptureDenied {
                message: format!("failed to spawn capture thread: {}", e),
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(VisualizerError::CaptureDenied {
                    message: "capture thread exited before opening the device".to_string(),
                })
            }
        }

        Ok(Self {
            analyzer: FrequencyAnalyzer::new(config.fft_size),
            rx,
            running,
            capture_thread: Some(capture_thread),
            released: false,
        })
    }
}

impl FrequencyFrameSource for MicrophoneFrameSource {
    fn next_frequency_frame(&mut self) -> FrequencyFrame {
        if self.released {
            return FrequencyFrame::silent(self.analyzer.bin_count());
        }

        // Drain everything queued since the last tick so the frame
        // reflects the newest audio
        while let Ok(samples) = self.rx.try_recv() {
            self.analyzer.push_samples(&samples);
        }
        self.analyzer.frame()
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.capture_thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for MicrophoneFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Requests the default microphone with the configured capture parameters
pub struct MicrophoneAccess {
    config: AppConfig,
}

impl MicrophoneAccess {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

impl CaptureAccess for MicrophoneAccess {
    fn request(&self) -> Result<Box<dyn FrequencyFrameSource>> {
        Ok(Box::new(MicrophoneFrameSource::open(&self.config)?))
    }
}
