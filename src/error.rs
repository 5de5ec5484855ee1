//! Error types for story loading and playback
//!
//! `ViewerError` covers everything a host shows as a banner (load failures,
//! bad deep links, empty stories). `PlaybackError` covers refused player
//! operations. Boundary moves are not errors; see `Transition::Noop`.

use thiserror::Error;

/// Errors surfaced to the viewer as a dismissable banner
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to load {what}: {message}")]
    DataLoad { what: String, message: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("story '{story}' has no script lines")]
    EmptyStory { story: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl ViewerError {
    pub fn data_load(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataLoad {
            what: what.into(),
            message: message.into(),
        }
    }

    pub fn event_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "event",
            id: id.into(),
        }
    }

    pub fn story_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "story",
            id: id.into(),
        }
    }

    pub fn empty_story(story: impl Into<String>) -> Self {
        Self::EmptyStory {
            story: story.into(),
        }
    }

    /// Whether the current view has to be abandoned
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DataLoad { .. })
    }
}

/// Refused player operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no story is open")]
    NotStarted,

    #[error("line {index} is waiting for a choice")]
    AwaitingChoice { index: usize },

    #[error("line {index} has no option '{flag}'")]
    UnknownOption { index: usize, flag: String },
}
