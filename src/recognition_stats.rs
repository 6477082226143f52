use std::fs::OpenOptions;
use std::io::Write;

/// Stores counters over the recognition event stream
#[derive(Debug, Default, Clone)]
pub struct RecognitionStats {
    pub sessions_started: usize,
    pub restarts_scheduled: usize,
    pub interim_events: usize,
    pub final_events: usize,
    pub error_events: usize,
    pub words_committed: usize,
}

impl RecognitionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_session_start(&mut self) {
        self.sessions_started += 1;
    }

    pub fn record_restart(&mut self) {
        self.restarts_scheduled += 1;
    }

    pub fn record_interim(&mut self) {
        self.interim_events += 1;
    }

    pub fn record_final(&mut self, text: &str) {
        self.final_events += 1;
        self.words_committed += text.split_whitespace().count();
    }

    pub fn record_error(&mut self) {
        self.error_events += 1;
    }

    pub fn report(&self) -> String {
        format!(
            "Recognition Statistics:\n\
             - Sessions started: {}\n\
             - Restarts scheduled: {}\n\
             - Interim results: {}\n\
             - Final results: {}\n\
             - Errors: {}\n\
             - Words committed: {}",
            self.sessions_started,
            self.restarts_scheduled,
            self.interim_events,
            self.final_events,
            self.error_events,
            self.words_committed
        )
    }

    /// Logs the statistics to a file
    pub fn log_to_file(&self, is_final: bool) {
        if self.sessions_started == 0 {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let report_type = if is_final {
            "Final Report"
        } else {
            "Periodic Report"
        };
        let file_content = format!("\n--- {} ({}) ---\n{}\n", timestamp, report_type, self.report());

        match OpenOptions::new()
            .append(true)
            .create(true)
            .open("session_stats.log")
        {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", file_content) {
                    eprintln!("Failed to write to stats file: {}", e);
                }
            }
            Err(e) => eprintln!("Failed to open stats file: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_per_event_kind() {
        let mut stats = RecognitionStats::new();
        stats.record_session_start();
        stats.record_interim();
        stats.record_interim();
        stats.record_final("hello world");
        stats.record_final("again");
        stats.record_error();
        stats.record_restart();

        assert_eq!(stats.sessions_started, 1);
        assert_eq!(stats.interim_events, 2);
        assert_eq!(stats.final_events, 2);
        assert_eq!(stats.error_events, 1);
        assert_eq!(stats.restarts_scheduled, 1);
        assert_eq!(stats.words_committed, 3);
    }

    #[test]
    fn report_mentions_every_counter() {
        let mut stats = RecognitionStats::new();
        stats.record_session_start();
        stats.record_final("one two three");

        let report = stats.report();
        assert!(report.contains("Sessions started: 1"));
        assert!(report.contains("Final results: 1"));
        assert!(report.contains("Words committed: 3"));
        assert!(report.contains("Restarts scheduled: 0"));
    }
}
