//! Displayable frame emitted to the render surface

use serde::{Deserialize, Serialize};

use super::script::{Effect, ScriptOption};

/// Resolved speaker identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Roster id, `Some(0)` for the commander, `None` for narration
    pub id: Option<u32>,
    pub name: String,
    pub icon: Option<String>,
}

/// Effective background at a line
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Background {
    pub url: Option<String>,
    pub is_black: bool,
}

impl Background {
    pub fn black() -> Self {
        Self {
            url: None,
            is_black: true,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            is_black: false,
        }
    }

    pub fn from_default(url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
            is_black: false,
        }
    }
}

/// Text carried by a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayText {
    /// Spoken or narrated dialogue, markup intact
    Dialogue(String),
    /// Intertitle lines
    TitleCard {
        lines: Vec<String>,
        sign_date: Option<String>,
    },
}

/// Pure projection of the player state at one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: usize,
    pub text: Option<DisplayText>,
    pub speaker: Option<Speaker>,
    pub background: Background,
    /// Track in effect at this line
    pub bgm_track: Option<String>,
    pub active_options: Vec<ScriptOption>,
    pub effects: Vec<Effect>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_advance_to_next_story: bool,
}

impl Frame {
    pub fn has_choices(&self) -> bool {
        !self.active_options.is_empty()
    }
}
