use crate::recognition::RecognitionEvent;

/// Merges overlapping interim and final recognition results into one
/// monotonically-growing transcript.
///
/// `committed` holds finalized text and only ever grows (an explicit
/// [`clear`](Self::clear) is the sole exception); `pending_interim` holds
/// the latest not-yet-final hypothesis and is replaced wholesale by each
/// interim result.
#[derive(Debug, Default, Clone)]
pub struct TranscriptAccumulator {
    committed: String,
    pending_interim: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one recognition event. `Error` and `End` carry no text and
    /// leave the state untouched; their policy lives with the session.
    pub fn apply(&mut self, event: &RecognitionEvent) {
        match event {
            RecognitionEvent::Interim(text) => self.set_interim(text),
            RecognitionEvent::Final(text) => self.commit(text),
            RecognitionEvent::Error(_) | RecognitionEvent::End => {}
        }
    }

    /// The latest hypothesis wholly replaces the previous one
    pub fn set_interim(&mut self, text: &str) {
        self.pending_interim = clean_whitespace(text);
    }

    /// Appends finalized text and consumes the pending hypothesis
    pub fn commit(&mut self, text: &str) {
        let text = clean_whitespace(text);
        if !text.is_empty() {
            if !self.committed.is_empty() {
                self.committed.push(' ');
            }
            self.committed.push_str(&text);
        }
        self.pending_interim.clear();
    }

    /// Resets both the committed text and the pending hypothesis
    pub fn clear(&mut self) {
        self.committed.clear();
        self.pending_interim.clear();
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn pending_interim(&self) -> &str {
        &self.pending_interim
    }

    /// The externally visible transcript: committed text with the pending
    /// hypothesis appended
    pub fn transcript(&self) -> String {
        if self.pending_interim.is_empty() {
            self.committed.clone()
        } else if self.committed.is_empty() {
            self.pending_interim.clone()
        } else {
            format!("{} {}", self.committed, self.pending_interim)
        }
    }

    /// Splits the visible transcript on sentence-terminal punctuation into
    /// trimmed non-empty segments, each given a trailing period. Display
    /// only; the underlying text is untouched.
    pub fn display_segments(&self) -> Vec<String> {
        self.transcript()
            .split(['.', '?', '!'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| format!("{}.", segment))
            .collect()
    }

    /// Whitespace-delimited token count of the visible transcript,
    /// recomputed on every call
    pub fn word_count(&self) -> usize {
        self.transcript().split_whitespace().count()
    }
}

/// Collapses consecutive whitespace into single spaces and trims the ends
fn clean_whitespace(text: &str) -> String {
    let text = text.trim();

    let mut result = String::with_capacity(text.len());
    let mut last_was_whitespace = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_whitespace {
                result.push(' ');
                last_was_whitespace = true;
            }
        } else {
            result.push(c);
            last_was_whitespace = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecognitionErrorKind;

    #[test]
    fn finals_append_space_joined() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("a");
        transcript.commit("b");
        assert_eq!(transcript.committed(), "a b");
    }

    #[test]
    fn interim_never_reaches_committed() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.set_interim("one");
        transcript.set_interim("two");
        transcript.set_interim("three");
        assert_eq!(transcript.committed(), "");
        assert_eq!(transcript.pending_interim(), "three");

        transcript.commit("four");
        assert_eq!(transcript.committed(), "four");
        assert_eq!(transcript.pending_interim(), "");
    }

    #[test]
    fn interim_is_replaced_wholesale() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.apply(&RecognitionEvent::Interim("hel".into()));
        transcript.apply(&RecognitionEvent::Interim("hello".into()));
        assert_eq!(transcript.transcript(), "hello");

        transcript.apply(&RecognitionEvent::Final("hello world".into()));
        assert_eq!(transcript.transcript(), "hello world");
        assert_eq!(transcript.pending_interim(), "");
    }

    #[test]
    fn transcript_appends_pending_to_committed() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("so far");
        transcript.set_interim("and now");
        assert_eq!(transcript.transcript(), "so far and now");
    }

    #[test]
    fn clear_resets_everything() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("hello");
        transcript.set_interim("there");
        transcript.clear();
        assert_eq!(transcript.committed(), "");
        assert_eq!(transcript.pending_interim(), "");
        assert_eq!(transcript.word_count(), 0);
    }

    #[test]
    fn error_and_end_do_not_mutate_state() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("kept");
        transcript.set_interim("pending");

        transcript.apply(&RecognitionEvent::Error(RecognitionErrorKind::Network));
        transcript.apply(&RecognitionEvent::End);

        assert_eq!(transcript.committed(), "kept");
        assert_eq!(transcript.pending_interim(), "pending");
    }

    #[test]
    fn whitespace_is_normalized_on_the_way_in() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("  a   b ");
        transcript.commit("c");
        assert_eq!(transcript.committed(), "a b c");

        transcript.set_interim("\t d \n e ");
        assert_eq!(transcript.pending_interim(), "d e");
    }

    #[test]
    fn empty_final_still_consumes_the_interim() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("before");
        transcript.set_interim("floating");
        transcript.commit("   ");
        assert_eq!(transcript.committed(), "before");
        assert_eq!(transcript.pending_interim(), "");
    }

    #[test]
    fn display_segments_split_on_terminal_punctuation() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("one. two? three");
        assert_eq!(
            transcript.display_segments(),
            vec!["one.", "two.", "three."]
        );
    }

    #[test]
    fn display_segments_skip_empty_fragments() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("wait... what?!");
        assert_eq!(transcript.display_segments(), vec!["wait.", "what."]);

        let empty = TranscriptAccumulator::new();
        assert!(empty.display_segments().is_empty());
    }

    #[test]
    fn word_count_spans_committed_and_pending() {
        let mut transcript = TranscriptAccumulator::new();
        transcript.commit("one two");
        transcript.set_interim("three");
        assert_eq!(transcript.word_count(), 3);
    }
}
