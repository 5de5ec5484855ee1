//! Dismissable banner notices
//!
//! Load failures and bad deep links are reported here instead of aborting
//! the viewer. Notices expire on their own after the configured timeout.

use std::time::{Duration, Instant};

use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    posted_at: Instant,
}

impl Notice {
    fn expired(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.posted_at) >= timeout
    }
}

/// Banner queue with automatic dismissal
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    timeout: Duration,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            notices: Vec::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.post(message, NoticeKind::Info, now);
    }

    pub fn error(&mut self, error: &ViewerError, now: Instant) {
        log::warn!("{error}");
        self.post(error.to_string(), NoticeKind::Error, now);
    }

    pub fn post(&mut self, message: impl Into<String>, kind: NoticeKind, now: Instant) {
        self.notices.push(Notice {
            message: message.into(),
            kind,
            posted_at: now,
        });
    }

    /// Notices still up at `now`
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(move |n| !n.expired(now, self.timeout))
    }

    /// Drop expired notices, returning how many went
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.notices.len();
        let timeout = self.timeout;
        self.notices.retain(|n| !n.expired(now, timeout));
        before - self.notices.len()
    }

    /// Dismiss everything by hand
    pub fn dismiss_all(&mut self) {
        self.notices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
