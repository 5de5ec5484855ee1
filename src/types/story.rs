//! Playable story units

use serde::{Deserialize, Serialize};

use super::script::ScriptLine;

/// A named, playable script array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub scripts: Vec<ScriptLine>,
    /// Background shown before the first background directive
    pub default_background: Option<String>,
}

impl Story {
    pub fn new(id: impl Into<String>, title: impl Into<String>, scripts: Vec<ScriptLine>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            scripts,
            default_background: None,
        }
    }

    pub fn with_default_background(mut self, url: impl Into<String>) -> Self {
        self.default_background = Some(url.into());
        self
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&ScriptLine> {
        self.scripts.get(index)
    }
}
