//! Notification sink trait
//!
//! The streaming core announces biome transitions as short text messages. The UI
//! layer decides how to show them; the core only needs somewhere to send them.

/// Receiver for player-facing notifications
pub trait NotificationSink {
    fn show_notification(&mut self, text: &str);
}

/// A no-op implementation for when nobody is listening
#[derive(Debug, Default)]
pub struct NoopNotifications;

impl NotificationSink for NoopNotifications {
    fn show_notification(&mut self, _text: &str) {}
}

/// Collects notifications until the UI drains them
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    messages: Vec<String>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Take every pending message, oldest first
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

impl NotificationSink for NotificationLog {
    fn show_notification(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_notifications() {
        let mut sink = NoopNotifications;
        sink.show_notification("Approaching Farmland");
    }

    #[test]
    fn test_log_collects_and_drains() {
        let mut log = NotificationLog::new();
        log.show_notification("Approaching Farmland");
        log.show_notification("Entering Farmland");

        assert_eq!(log.messages().len(), 2);
        let drained = log.drain();
        assert_eq!(drained, vec!["Approaching Farmland", "Entering Farmland"]);
        assert!(log.messages().is_empty());
    }
}
