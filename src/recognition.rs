use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::error::{RecognitionErrorKind, Result, VisualizerError};

/// One event from a streaming recognition source. Events arrive discretely
/// and never overlap; each is consumed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// A tentative hypothesis that later events may revise
    Interim(String),
    /// Text the engine will not revise further
    Final(String),
    /// A non-fatal in-session failure; the session keeps running
    Error(RecognitionErrorKind),
    /// The engine ended the session on its own
    End,
}

/// Parameters handed to the engine when a session starts
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// Language tag (BCP 47)
    pub language: String,
    /// Keep recognizing across pauses instead of stopping at the first result
    pub continuous: bool,
    /// Deliver tentative hypotheses while speech is still in flight
    pub interim_results: bool,
    /// How many alternatives the engine should consider per result
    pub max_alternatives: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

impl RecognitionConfig {
    pub fn for_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Default::default()
        }
    }
}

/// A live recognition session delivering its event stream
#[async_trait]
pub trait RecognitionSession: Send {
    /// The next event, or `None` once the session has fully shut down.
    /// A source that dies without a clean `End` must still deliver one
    /// before returning `None`.
    async fn next_event(&mut self) -> Option<RecognitionEvent>;

    /// Signals the engine to cease delivering events
    fn stop(&self);
}

/// Factory for recognition sessions; restarting after a spontaneous end
/// mints a fresh session from the same engine.
pub trait RecognitionEngine: Send + Sync {
    fn start_session(&self, config: &RecognitionConfig) -> Result<Box<dyn RecognitionSession>>;
}

/// Engine for hosts without a recognition source; every start fails with
/// `UnsupportedEngine` and visualization runs without a transcript.
pub struct UnavailableEngine;

impl RecognitionEngine for UnavailableEngine {
    fn start_session(&self, _config: &RecognitionConfig) -> Result<Box<dyn RecognitionSession>> {
        Err(VisualizerError::UnsupportedEngine)
    }
}

/// Feed half of a channel-backed session, held by the host's engine.
/// Events pushed here come out of the paired [`ChannelSession`].
pub struct SessionFeed {
    tx: mpsc::Sender<RecognitionEvent>,
    stopped: watch::Receiver<bool>,
}

impl SessionFeed {
    /// Pushes an event into the session. Returns false once the session
    /// half is gone.
    pub async fn send(&self, event: RecognitionEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Whether the session asked the engine to stop
    pub fn is_stopped(&self) -> bool {
        *self.stopped.borrow()
    }

    /// Completes when the session asks the engine to stop
    pub async fn stopped(&mut self) {
        while !*self.stopped.borrow() {
            if self.stopped.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Session half of the channel adapter
pub struct ChannelSession {
    rx: mpsc::Receiver<RecognitionEvent>,
    stop_tx: watch::Sender<bool>,
    ended: bool,
}

/// Creates a connected feed/session pair
pub fn channel_session(capacity: usize) -> (SessionFeed, ChannelSession) {
    let (tx, rx) = mpsc::channel(capacity);
    let (stop_tx, stopped) = watch::channel(false);
    (
        SessionFeed { tx, stopped },
        ChannelSession {
            rx,
            stop_tx,
            ended: false,
        },
    )
}

#[async_trait]
impl RecognitionSession for ChannelSession {
    async fn next_event(&mut self) -> Option<RecognitionEvent> {
        if self.ended {
            return None;
        }
        match self.rx.recv().await {
            Some(RecognitionEvent::End) => {
                self.ended = true;
                Some(RecognitionEvent::End)
            }
            Some(event) => Some(event),
            // Feed dropped without a clean End: normalize the spontaneous
            // termination to a single synthetic End
            None => {
                self.ended = true;
                Some(RecognitionEvent::End)
            }
        }
    }

    fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_flow_through_in_order() {
        let (feed, mut session) = channel_session(8);

        assert!(feed.send(RecognitionEvent::Interim("hel".into())).await);
        assert!(feed.send(RecognitionEvent::Final("hello".into())).await);

        assert_eq!(
            session.next_event().await,
            Some(RecognitionEvent::Interim("hel".into()))
        );
        assert_eq!(
            session.next_event().await,
            Some(RecognitionEvent::Final("hello".into()))
        );
    }

    #[tokio::test]
    async fn dropped_feed_yields_one_synthetic_end() {
        let (feed, mut session) = channel_session(8);
        drop(feed);

        assert_eq!(session.next_event().await, Some(RecognitionEvent::End));
        assert_eq!(session.next_event().await, None);
    }

    #[tokio::test]
    async fn explicit_end_terminates_the_stream() {
        let (feed, mut session) = channel_session(8);
        feed.send(RecognitionEvent::End).await;
        feed.send(RecognitionEvent::Final("too late".into())).await;

        assert_eq!(session.next_event().await, Some(RecognitionEvent::End));
        assert_eq!(session.next_event().await, None);
    }

    #[tokio::test]
    async fn stop_reaches_the_feed() {
        let (mut feed, session) = channel_session(8);
        assert!(!feed.is_stopped());

        session.stop();
        feed.stopped().await;
        assert!(feed.is_stopped());
    }

    #[test]
    fn unavailable_engine_refuses_to_start() {
        let engine = UnavailableEngine;
        let result = engine.start_session(&RecognitionConfig::default());
        assert!(matches!(result, Err(VisualizerError::UnsupportedEngine)));
    }

    #[test]
    fn config_for_language_keeps_streaming_defaults() {
        let config = RecognitionConfig::for_language("sv-SE");
        assert_eq!(config.language, "sv-SE");
        assert!(config.continuous);
        assert!(config.interim_results);
        assert_eq!(config.max_alternatives, 1);
    }
}
