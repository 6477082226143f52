use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::read_app_config;
use crate::recognition_stats::RecognitionStats;
use crate::transcript::TranscriptAccumulator;

const STATS_INTERVAL_SECS: u64 = 10;

/// Handles periodic reporting of session statistics
pub struct StatsReporter {
    stats: Arc<Mutex<RecognitionStats>>,
    loudness: Arc<AtomicU8>,
    transcript: Arc<RwLock<TranscriptAccumulator>>,
    running: Arc<AtomicBool>,
}

impl StatsReporter {
    pub fn new(
        stats: Arc<Mutex<RecognitionStats>>,
        loudness: Arc<AtomicU8>,
        transcript: Arc<RwLock<TranscriptAccumulator>>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            stats,
            loudness,
            transcript,
            running,
        }
    }

    /// Start periodic reporting with the fixed interval
    pub fn start_periodic_reporting(&self) {
        let app_config = read_app_config();
        if !app_config.log_stats_enabled {
            println!("Stats reporting disabled - no statistics will be logged");
            return;
        }

        println!(
            "Stats reporting enabled - will report every {} seconds",
            STATS_INTERVAL_SECS
        );

        let stats = self.stats.clone();
        let loudness = self.loudness.clone();
        let transcript = self.transcript.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(STATS_INTERVAL_SECS));
            while running.load(Ordering::Relaxed) {
                interval.tick().await;
                let percent =
                    (loudness.load(Ordering::Acquire) as f32 / 255.0 * 100.0).round() as u8;
                let words = transcript
                    .try_read()
                    .map(|t| t.word_count())
                    .unwrap_or_default();

                if let Some(stats) = stats.try_lock() {
                    println!("\n--- Periodic Session Statistics ---");
                    println!("Loudness: {}%", percent);
                    println!("Words: {}", words);
                    println!("{}", stats.report());
                    println!("-----------------------------------\n");
                    stats.log_to_file(false);
                }
            }
            println!("Stats reporting stopped");
        });
    }

    /// Print current statistics on demand
    pub fn print_stats(&self) {
        let app_config = read_app_config();
        if !app_config.log_stats_enabled {
            println!("Stats reporting disabled - no statistics will be logged on demand");
            return;
        }

        if let Some(stats) = self.stats.try_lock() {
            println!("\n--- Current Session Statistics ---");
            println!("{}", stats.report());
            println!("----------------------------------\n");
            stats.log_to_file(false);
        } else {
            println!("Could not access session statistics (locked).");
        }
    }
}
