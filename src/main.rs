use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod audio_capture;
mod config;
mod draw_surface;
mod error;
mod frame_source;
mod frequency_analyzer;
mod recognition;
mod recognition_stats;
mod scheduler;
mod spectrum_renderer;
mod stats_reporter;
mod transcript;
mod visualizer_session;

use config::read_app_config;
use draw_surface::CommandLog;
use frame_source::MicrophoneAccess;
use recognition::UnavailableEngine;
use scheduler::IntervalScheduler;
use stats_reporter::StatsReporter;
use visualizer_session::{SharedSurface, VisualizerSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Loading configuration...");
    let app_config = read_app_config();

    let surface: SharedSurface = Arc::new(Mutex::new(Box::new(CommandLog::new())));
    let capture_access = Arc::new(MicrophoneAccess::new(app_config.clone()));
    // No recognition engine ships with this binary; hosts embed one through
    // the RecognitionEngine trait. Visualization runs either way.
    let engine = Arc::new(UnavailableEngine);
    let scheduler = Arc::new(IntervalScheduler::from_refresh_rate(
        app_config.refresh_rate_hz,
    ));

    let mut session = VisualizerSession::new(
        app_config.clone(),
        capture_access,
        engine,
        scheduler,
        surface,
    );

    // Resting frame until the microphone goes live
    session.render_idle()?;

    println!("Requesting microphone access...");
    let started = session.start()?;
    if let Some(e) = &started.recognition_error {
        eprintln!("Transcript unavailable: {}", e);
    }
    println!("Listening. Press Ctrl+C to stop.");

    let running = Arc::new(AtomicBool::new(true));
    let reporter = StatsReporter::new(
        session.get_stats(),
        session.get_loudness(),
        session.get_transcript_handle(),
        running.clone(),
    );
    reporter.start_periodic_reporting();

    tokio::signal::ctrl_c().await?;
    println!("\nShutting down...");
    running.store(false, Ordering::Relaxed);
    session.stop().await;

    let transcript = session.transcript();
    if transcript.is_empty() {
        println!("No speech was transcribed.");
    } else {
        println!("Transcript ({} words):", session.word_count());
        for segment in session.display_segments() {
            println!("  {}", segment);
        }
    }
    session.stats().log_to_file(true);

    Ok(())
}
