//! Flash bar notifications.
//!
//! Holds the most recent user-facing notification and clears it once the
//! configured timeout has elapsed. A newer notification always replaces the
//! current one.

use std::time::{Duration, Instant};

use rview_types::FlashLevel;

/// A single notification and the moment it was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: FlashLevel,
    pub message: String,
    pub at: Instant,
}

#[derive(Debug)]
pub struct Flash {
    current: Option<Notification>,
    timeout: Duration,
}

impl Flash {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            current: None,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.set(FlashLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.set(FlashLevel::Error, message.into());
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drops the notification when it is older than the timeout.
    /// Returns true when something was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|notification| now.saturating_duration_since(notification.at) >= self.timeout);
        if expired {
            self.current = None;
        }
        expired
    }

    fn set(&mut self, level: FlashLevel, message: String) {
        self.current = Some(Notification {
            level,
            message,
            at: Instant::now(),
        });
    }
}
