//! Smart reply suggestions
//!
//! A [`SmartReplyProvider`] produces short reply suggestions for a message.
//! Fetching is fail-open: any provider error becomes an empty list. Because
//! a fetch can outlive the selection that triggered it, every trigger is
//! tagged with a generation by [`SmartReplyTracker`] and late responses for
//! an older generation are dropped.

mod gemini;

pub use gemini::GeminiClient;

use anyhow::Result;
use log::{debug, warn};

use crate::models::{Message, ThreadKey};

/// Maximum number of suggestions shown
pub const MAX_SMART_REPLIES: usize = 3;

/// Source of reply suggestions
pub trait SmartReplyProvider: Send + Sync {
    /// Suggest replies to `message`
    fn generate(&self, message: &Message) -> Result<Vec<String>>;
}

/// Fetch at most [`MAX_SMART_REPLIES`] suggestions, empty on any error
pub fn generate_smart_replies(provider: &dyn SmartReplyProvider, message: &Message) -> Vec<String> {
    match provider.generate(message) {
        Ok(mut replies) => {
            replies.truncate(MAX_SMART_REPLIES);
            replies
        }
        Err(e) => {
            warn!("Error generating smart replies for {}: {:#}", message.id.as_str(), e);
            Vec::new()
        }
    }
}

/// Split model output into suggestions
///
/// One suggestion per non-empty line, with leading list markers
/// (`-`, `*`, `•`, digits, `.`) and the whitespace after them removed.
pub fn clean_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '.') || c.is_ascii_digit())
                .trim_start()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A pending smart-reply fetch
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub generation: u64,
    pub thread_key: ThreadKey,
    /// The message to reply to, the thread's latest
    pub message: Message,
}

/// Tracks the suggestions for the currently open thread
#[derive(Debug, Default)]
pub struct SmartReplyTracker {
    generation: u64,
    loading: bool,
    suggestions: Vec<String>,
}

impl SmartReplyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `message`, superseding any in flight
    pub fn begin(&mut self, thread_key: ThreadKey, message: Message) -> ReplyRequest {
        self.generation += 1;
        self.loading = true;
        self.suggestions.clear();
        debug!("Smart reply request {} for thread {}", self.generation, thread_key);
        ReplyRequest {
            generation: self.generation,
            thread_key,
            message,
        }
    }

    /// Drop the current suggestions and any fetch in flight
    pub fn reset(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.suggestions.clear();
    }

    /// Store `replies` if `request` is still the latest
    ///
    /// Returns false, leaving state unchanged, for a stale request.
    pub fn complete(&mut self, request: &ReplyRequest, mut replies: Vec<String>) -> bool {
        if request.generation != self.generation {
            warn!(
                "Discarding stale smart replies for thread {} (request {}, current {})",
                request.thread_key, request.generation, self.generation
            );
            return false;
        }
        replies.truncate(MAX_SMART_REPLIES);
        self.suggestions = replies;
        self.loading = false;
        true
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Fixed(Vec<&'static str>);

    impl SmartReplyProvider for Fixed {
        fn generate(&self, _message: &Message) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Failing;

    impl SmartReplyProvider for Failing {
        fn generate(&self, _message: &Message) -> Result<Vec<String>> {
            bail!("service unavailable")
        }
    }

    fn message(id: &str) -> Message {
        Message::builder(id, "acc").subject("Hi").build()
    }

    #[test]
    fn test_generate_caps_and_fails_open() {
        let many = Fixed(vec!["a", "b", "c", "d"]);
        assert_eq!(generate_smart_replies(&many, &message("m1")), vec!["a", "b", "c"]);
        assert!(generate_smart_replies(&Failing, &message("m1")).is_empty());
    }

    #[test]
    fn test_clean_suggestions() {
        let text = "1. Sounds good!\n- See you then\n\n* Thanks\n• Will do\n   Plain one  ";
        assert_eq!(
            clean_suggestions(text),
            vec!["Sounds good!", "See you then", "Thanks", "Will do", "Plain one"]
        );
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut tracker = SmartReplyTracker::new();
        let first = tracker.begin(ThreadKey::new("t1"), message("m1"));
        let second = tracker.begin(ThreadKey::new("t2"), message("m2"));

        assert!(!tracker.complete(&first, vec!["for t1".to_string()]));
        assert!(tracker.suggestions().is_empty());
        assert!(tracker.is_loading());

        assert!(tracker.complete(&second, vec!["for t2".to_string()]));
        assert_eq!(tracker.suggestions(), ["for t2".to_string()]);
        assert!(!tracker.is_loading());
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        let mut tracker = SmartReplyTracker::new();
        let request = tracker.begin(ThreadKey::new("t1"), message("m1"));
        assert_eq!(request.generation, tracker.generation());
        tracker.reset();
        assert_eq!(tracker.generation(), request.generation + 1);
        assert!(!tracker.complete(&request, vec!["late".to_string()]));
        assert!(!tracker.is_loading());
    }
}
