pub mod audio_capture;
pub mod config;
pub mod draw_surface;
pub mod error;
pub mod frame_source;
pub mod frequency_analyzer;
pub mod prelude;
pub mod recognition;
pub mod recognition_stats;
pub mod scheduler;
pub mod spectrum_renderer;
pub mod stats_reporter;
pub mod transcript;
pub mod visualizer_session;

// Re-export key components for easier access
pub use config::read_app_config;
pub use draw_surface::{CommandLog, DrawCommand, DrawSurface};
pub use error::{RecognitionErrorKind, VisualizerError};
pub use frame_source::{CaptureAccess, FrequencyFrameSource, MicrophoneAccess};
pub use frequency_analyzer::{FrequencyAnalyzer, FrequencyFrame};
pub use recognition::{RecognitionEngine, RecognitionEvent, RecognitionSession};
pub use spectrum_renderer::SpectrumRenderer;
pub use stats_reporter::StatsReporter;
pub use transcript::TranscriptAccumulator;
pub use visualizer_session::{Lifecycle, SessionStart, VisualizerSession};
