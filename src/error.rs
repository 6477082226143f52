use thiserror::Error;

/// Error categories reported by a recognition engine while a session is
/// live. These are non-fatal: the session keeps running (or is restarted
/// through the end-of-session path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorKind {
    /// No speech was detected before the engine's internal timeout
    NoSpeech,
    /// The session was aborted by the engine
    Aborted,
    /// The engine lost access to the audio input
    AudioCapture,
    /// A network hiccup between the engine and its backend
    Network,
    /// The engine refused to run (host policy, missing permission)
    NotAllowed,
    /// Anything the engine reports that has no dedicated category
    Other(String),
}

impl std::fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionErrorKind::NoSpeech => write!(f, "no-speech"),
            RecognitionErrorKind::Aborted => write!(f, "aborted"),
            RecognitionErrorKind::AudioCapture => write!(f, "audio-capture"),
            RecognitionErrorKind::Network => write!(f, "network"),
            RecognitionErrorKind::NotAllowed => write!(f, "not-allowed"),
            RecognitionErrorKind::Other(detail) => write!(f, "{}", detail),
        }
    }
}

#[derive(Error, Debug)]
pub enum VisualizerError {
    /// Microphone access was refused or the capture device is unavailable.
    /// Fatal to `start()`; the session stays idle.
    #[error("Microphone access denied: {message}")]
    CaptureDenied { message: String },

    /// No recognition engine is available on this host. Visualization can
    /// still run without a transcript.
    #[error("Speech recognition engine unavailable on this host")]
    UnsupportedEngine,

    /// An in-session recognition failure, surfaced asynchronously.
    #[error("Speech recognition error: {0}")]
    Recognition(RecognitionErrorKind),

    /// The drawing surface rejected a command batch. Fatal only for the
    /// current tick; the render loop keeps going.
    #[error("Drawing surface fault: {message}")]
    RenderFault { message: String },
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
