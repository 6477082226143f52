// Re-export common types and functions for easier imports
pub use crate::config::{read_app_config, AppConfig, RendererConfig};
pub use crate::draw_surface::{CommandLog, DrawCommand, DrawSurface, Hsla, Point, Rgba};
pub use crate::error::{RecognitionErrorKind, Result, VisualizerError};
pub use crate::frame_source::{CaptureAccess, FrequencyFrameSource, MicrophoneAccess};
pub use crate::frequency_analyzer::{FrequencyAnalyzer, FrequencyFrame};
pub use crate::recognition::{
    channel_session, RecognitionConfig, RecognitionEngine, RecognitionEvent, RecognitionSession,
    SessionFeed, UnavailableEngine,
};
pub use crate::scheduler::{FrameScheduler, IntervalScheduler, ManualScheduler};
pub use crate::spectrum_renderer::{SpectrumRenderer, VisualGeometry};
pub use crate::transcript::TranscriptAccumulator;
pub use crate::visualizer_session::{Lifecycle, SessionStart, SharedSurface, VisualizerSession};

// Re-export common external dependencies
pub use anyhow::{anyhow, Context};
pub use std::sync::Arc;
pub use std::time::Duration;
