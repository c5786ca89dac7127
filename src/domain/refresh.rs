//! Loading and success-message state of a metadata refresh request.

use std::time::{Duration, Instant};

/// How long a refresh success message stays visible.
pub const SUCCESS_MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Default)]
pub struct MetadataRefresh {
    loading: bool,
    success: Option<(String, Instant)>,
}

impl MetadataRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The success message, if one is currently shown.
    pub fn success_message(&self) -> Option<&str> {
        self.success.as_ref().map(|(msg, _)| msg.as_str())
    }

    /// Mark a request as started. Returns false if one is already running.
    pub fn start(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Record a successful refresh at `now`.
    pub fn succeed(&mut self, message: String, now: Instant) {
        self.loading = false;
        self.success = if message.is_empty() {
            None
        } else {
            Some((message, now))
        };
    }

    /// Record a failed refresh. The previous message, if any, is left to expire.
    pub fn fail(&mut self) {
        self.loading = false;
    }

    /// Clear the success message once it has been shown long enough.
    pub fn expire(&mut self, now: Instant) {
        if let Some((_, set_at)) = &self.success
            && now.saturating_duration_since(*set_at) >= SUCCESS_MESSAGE_TTL
        {
            self.success = None;
        }
    }

    pub fn reset(&mut self) {
        self.loading = false;
        self.success = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_lifecycle() {
        let mut refresh = MetadataRefresh::new();
        assert!(refresh.start());
        assert!(refresh.is_loading());
        // A second start while loading is refused
        assert!(!refresh.start());

        let t0 = Instant::now();
        refresh.succeed("Metadata refresh queued".to_string(), t0);
        assert!(!refresh.is_loading());
        assert_eq!(refresh.success_message(), Some("Metadata refresh queued"));

        refresh.expire(t0 + Duration::from_millis(2999));
        assert!(refresh.success_message().is_some());

        refresh.expire(t0 + SUCCESS_MESSAGE_TTL);
        assert_eq!(refresh.success_message(), None);
    }

    #[test]
    fn test_refresh_failure_sets_no_message() {
        let mut refresh = MetadataRefresh::new();
        refresh.start();
        refresh.fail();
        assert!(!refresh.is_loading());
        assert_eq!(refresh.success_message(), None);
    }
}
