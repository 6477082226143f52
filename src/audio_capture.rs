use portaudio as pa;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::error::VisualizerError;

/// Manages microphone capture using PortAudio
pub struct AudioCapture {
    pa_stream: Option<pa::Stream<pa::NonBlocking, pa::Input<f32>>>,
}

impl AudioCapture {
    pub fn new() -> Self {
        Self { pa_stream: None }
    }

    /// Opens the default input device and starts streaming sample blocks.
    ///
    /// # Arguments
    /// * `config` - Capture parameters (sample rate, block size)
    /// * `tx` - Channel sender for captured sample blocks
    /// * `running` - Flag gating the callback; cleared on release
    ///
    /// Any PortAudio failure here means the microphone is unavailable or
    /// access was refused, so everything maps to `CaptureDenied`.
    pub fn start(
        &mut self,
        config: &AppConfig,
        tx: mpsc::Sender<Vec<f32>>,
        running: Arc<AtomicBool>,
    ) -> Result<(), VisualizerError> {
        let pa = pa::PortAudio::new().map_err(|e| VisualizerError::CaptureDenied {
            message: format!("failed to initialize PortAudio: {}", e),
        })?;

        let input_params =
            pa.default_input_stream_params::<f32>(1)
                .map_err(|e| VisualizerError::CaptureDenied {
                    message: format!("no default input device: {}", e),
                })?;
        let input_settings = pa::InputStreamSettings::new(
            input_params,
            config.sample_rate as f64,
            config.buffer_size as u32,
        );

        let callback = move |pa::InputStreamCallbackArgs { buffer, .. }| {
            if !running.load(Ordering::Relaxed) {
                return pa::Complete;
            }
            if let Err(e) = tx.try_send(buffer.to_vec()) {
                eprintln!("Failed to send samples: {}", e);
            }
            pa::Continue
        };

        let mut stream = pa.open_non_blocking_stream(input_settings, callback).map_err(|e| {
            VisualizerError::CaptureDenied {
                message: format!("failed to open input stream: {}", e),
            }
        })?;

        stream.start().map_err(|e| VisualizerError::CaptureDenied {
            message: format!("failed to start input stream: {}", e),
        })?;

        self.pa_stream = Some(stream);
        Ok(())
    }

    /// Stops the stream and releases the capture device
    pub fn stop(&mut self) {
        if let Some(stream) = &mut self.pa_stream {
            if let Err(e) = stream.stop() {
                eprintln!("Failed to stop stream: {}", e);
            }
            if let Err(e) = stream.close() {
                eprintln!("Failed to close stream: {}", e);
            }
        }
        self.pa_stream = None;
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
