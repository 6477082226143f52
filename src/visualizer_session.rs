use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::draw_surface::DrawSurface;
use crate::error::{Result, VisualizerError};
use crate::frame_source::{CaptureAccess, FrequencyFrameSource};
use crate::recognition::{
    RecognitionConfig, RecognitionEngine, RecognitionEvent, RecognitionSession,
};
use crate::recognition_stats::RecognitionStats;
use crate::scheduler::FrameScheduler;
use crate::spectrum_renderer::SpectrumRenderer;
use crate::transcript::TranscriptAccumulator;

/// Session lifecycle. Active means both the capture source and the
/// recognition session are live; Stopping exists only inside `stop()` and
/// is never observable from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Lifecycle {
    Idle = 0,
    Active = 1,
    Stopping = 2,
}

struct LifecycleCell(AtomicU8);

impl LifecycleCell {
    fn new(state: Lifecycle) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    fn load(&self) -> Lifecycle {
        match self.0.load(Ordering::Acquire) {
            1 => Lifecycle::Active,
            2 => Lifecycle::Stopping,
            _ => Lifecycle::Idle,
        }
    }

    fn store(&self, state: Lifecycle) {
        self.0.store(state as u8, Ordering::Release);
    }
}

/// Outcome of a successful `start()`. Capture is live; the recognition
/// engine may still have refused, in which case visualization runs
/// without a transcript.
#[derive(Debug)]
pub struct SessionStart {
    pub recognition_error: Option<VisualizerError>,
}

impl SessionStart {
    pub fn recognition_active(&self) -> bool {
        self.recognition_error.is_none()
    }
}

/// The shared drawing surface handle mutated by the render task and read
/// by whoever displays it
pub type SharedSurface = Arc<Mutex<Box<dyn DrawSurface>>>;

/// Coordinates the whole live session: the per-tick render cycle, the
/// recognition event pump with transparent session restart, and the
/// lifecycle both obey.
pub struct VisualizerSession {
    config: AppConfig,
    lifecycle: Arc<LifecycleCell>,
    renderer: Arc<SpectrumRenderer>,
    surface: SharedSurface,
    accumulator: Arc<RwLock<TranscriptAccumulator>>,
    loudness: Arc<AtomicU8>,
    stats: Arc<Mutex<RecognitionStats>>,
    capture_access: Arc<dyn CaptureAccess>,
    engine: Arc<dyn RecognitionEngine>,
    scheduler: Arc<dyn FrameScheduler>,
    stop_signal: Arc<Notify>,
    render_task: Option<JoinHandle<()>>,
    recognition_task: Option<JoinHandle<()>>,
}

impl VisualizerSession {
    pub fn new(
        config: AppConfig,
        capture_access: Arc<dyn CaptureAccess>,
        engine: Arc<dyn RecognitionEngine>,
        scheduler: Arc<dyn FrameScheduler>,
        surface: SharedSurface,
    ) -> Self {
        let renderer = Arc::new(SpectrumRenderer::new(&config.renderer));
        Self {
            config,
            lifecycle: Arc::new(LifecycleCell::new(Lifecycle::Idle)),
            renderer,
            surface,
            accumulator: Arc::new(RwLock::new(TranscriptAccumulator::new())),
            loudness: Arc::new(AtomicU8::new(0)),
            stats: Arc::new(Mutex::new(RecognitionStats::new())),
            capture_access,
            engine,
            scheduler,
            stop_signal: Arc::new(Notify::new()),
            render_task: None,
            recognition_task: None,
        }
    }

    /// Requests microphone access and brings the session live: spawns the
    /// per-tick render cycle and starts a recognition session.
    ///
    /// Capture refusal fails the whole start and the session stays idle.
    /// A refusing recognition engine is reported in the returned
    /// [`SessionStart`] while visualization proceeds without it.
    pub fn start(&mut self) -> Result<SessionStart> {
        if self.lifecycle.load() != Lifecycle::Idle {
            return Ok(SessionStart {
                recognition_error: None,
            });
        }

        let source = self.capture_access.request()?;
        self.lifecycle.store(Lifecycle::Active);
        // Fresh signal per run; a leftover permit from an earlier stop
        // must not kill the new recognition pump
        self.stop_signal = Arc::new(Notify::new());

        self.spawn_render_cycle(source);

        let recognition_config = RecognitionConfig::for_language(&self.config.language);
        let recognition_error = match self.engine.start_session(&recognition_config) {
            Ok(session) => {
                self.stats.lock().record_session_start();
                self.spawn_recognition_pump(session, recognition_config);
                None
            }
            Err(e) => {
                eprintln!("Transcription disabled: {}", e);
                Some(e)
            }
        };

        Ok(SessionStart { recognition_error })
    }

    fn spawn_render_cycle(&mut self, mut source: Box<dyn FrequencyFrameSource>) {
        let lifecycle = self.lifecycle.clone();
        let renderer = self.renderer.clone();
        let surface = self.surface.clone();
        let loudness = self.loudness.clone();
        let scheduler = self.scheduler.clone();

        self.render_task = Some(tokio::spawn(async move {
            loop {
                scheduler.next_frame().await;
                // A tick already in flight when the session stops must not
                // touch anything
                if lifecycle.load() != Lifecycle::Active {
                    break;
                }

                let frame = source.next_frequency_frame();
                let rendered = {
                    let mut surface = surface.lock();
                    renderer.render(&frame, true, surface.as_mut())
                };
                match rendered {
                    Ok(level) => loudness.store(level.round() as u8, Ordering::Release),
                    // Fatal for this tick only; keep ticking
                    Err(e) => eprintln!("Frame skipped: {}", e),
                }
            }
            source.release();
        }));
    }

    fn spawn_recognition_pump(
        &mut self,
        mut session: Box<dyn RecognitionSession>,
        recognition_config: RecognitionConfig,
    ) {
        let lifecycle = self.lifecycle.clone();
        let accumulator = self.accumulator.clone();
        let stats = self.stats.clone();
        let engine = self.engine.clone();
        let stop_signal = self.stop_signal.clone();
        let restart_delay = Duration::from_millis(self.config.restart_delay_ms);

        self.recognition_task = Some(tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    _ = stop_signal.notified() => {
                        session.stop();
                        break;
                    }
                    event = session.next_event() => event,
                };
                // A callback already in flight when the session stops must
                // not touch anything
                if lifecycle.load() != Lifecycle::Active {
                    session.stop();
                    break;
                }

                match event {
                    Some(RecognitionEvent::Interim(text)) => {
                        accumulator.write().set_interim(&text);
                        stats.lock().record_interim();
                    }
                    Some(RecognitionEvent::Final(text)) => {
                        accumulator.write().commit(&text);
                        stats.lock().record_final(&text);
                    }
                    Some(RecognitionEvent::Error(kind)) => {
                        eprintln!("Speech recognition error: {}", kind);
                        stats.lock().record_error();
                    }
                    Some(RecognitionEvent::End) => {
                        // The engine times sessions out on its own; a quick
                        // restart masks that from the transcript
                        tokio::select! {
                            _ = stop_signal.notified() => break,
                            _ = tokio::time::sleep(restart_delay) => {}
                        }
                        if lifecycle.load() != Lifecycle::Active {
                            break;
                        }
                        match engine.start_session(&recognition_config) {
                            Ok(next) => {
                                session = next;
                                let mut stats = stats.lock();
                                stats.record_session_start();
                                stats.record_restart();
                            }
                            Err(e) => {
                                eprintln!("Failed to restart recognition: {}", e);
                                break;
                            }
                        }
                    }
                    None => break,
                }
            }
        }));
    }

    /// Tears the session down: cancels the tick cycle, signals the
    /// recognition session to cease, releases the capture device, resets
    /// loudness and renders the static idle frame once. Idempotent; by the
    /// time this returns no further tick or recognition callback runs.
    pub async fn stop(&mut self) {
        if self.lifecycle.load() != Lifecycle::Active {
            return;
        }
        self.lifecycle.store(Lifecycle::Stopping);
        self.stop_signal.notify_one();

        if let Some(task) = self.render_task.take() {
            task.abort();
            let _ = task.await;
        }
        if let Some(task) = self.recognition_task.take() {
            task.abort();
            let _ = task.await;
        }

        self.loudness.store(0, Ordering::Release);
        self.lifecycle.store(Lifecycle::Idle);

        if let Err(e) = self.render_idle() {
            eprintln!("Failed to render idle frame: {}", e);
        }
    }

    /// Draws the static resting frame
    pub fn render_idle(&self) -> Result<()> {
        let mut surface = self.surface.lock();
        self.renderer.render_idle(surface.as_mut())
    }

    /// Empties the transcript; independent of the recognition session
    pub fn clear(&self) {
        self.accumulator.write().clear();
    }

    /// The externally visible transcript (committed text plus the pending
    /// hypothesis)
    pub fn transcript(&self) -> String {
        self.accumulator.read().transcript()
    }

    /// Transcript split into display sentences
    pub fn display_segments(&self) -> Vec<String> {
        self.accumulator.read().display_segments()
    }

    pub fn word_count(&self) -> usize {
        self.accumulator.read().word_count()
    }

    /// Latest loudness as a percentage readout
    pub fn loudness_percent(&self) -> u8 {
        (self.loudness.load(Ordering::Acquire) as f32 / 255.0 * 100.0).round() as u8
    }

    pub fn is_listening(&self) -> bool {
        self.lifecycle.load() == Lifecycle::Active
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.load()
    }

    /// Snapshot of the recognition counters
    pub fn stats(&self) -> RecognitionStats {
        self.stats.lock().clone()
    }

    /// Shared handles for the periodic reporter
    pub fn get_stats(&self) -> Arc<Mutex<RecognitionStats>> {
        self.stats.clone()
    }

    pub fn get_loudness(&self) -> Arc<AtomicU8> {
        self.loudness.clone()
    }

    pub fn get_transcript_handle(&self) -> Arc<RwLock<TranscriptAccumulator>> {
        self.accumulator.clone()
    }
}

impl Drop for VisualizerSession {
    fn drop(&mut self) {
        self.lifecycle.store(Lifecycle::Idle);
        self.stop_signal.notify_one();
        if let Some(task) = &self.render_task {
            task.abort();
        }
        if let Some(task) = &self.recognition_task {
            task.abort();
        }
    }
}
