//! Normalized script line representation
//!
//! Raw catalog records are loosely typed; `catalog::raw` turns them into
//! these types once at load time so playback never has to guess whether an
//! actor is an id or a name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token linking a choice to its continuation line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionFlag(String);

impl OptionFlag {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OptionFlag {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Canonical speaker reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorRef {
    /// The player character
    Commander,
    /// A roster entry
    Character(u32),
    /// A name that is not in the roster
    Unlisted(String),
}

/// A single branch option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptOption {
    pub flag: OptionFlag,
    pub content: String,
}

/// Transient presentation effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Shake,
    Flash,
    Fadeout,
    Fadein,
    Se,
}

/// A transient presentation effect attached to a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    /// Seconds
    pub duration: f32,
    /// Sound effect name, for `Se`
    pub audio: Option<String>,
}

/// One step of a story script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub say: Option<String>,
    pub actor: Option<ActorRef>,
    pub actor_name: Option<String>,
    pub options: Option<Vec<ScriptOption>>,
    pub option_flag: Option<OptionFlag>,
    pub bg_name: Option<String>,
    pub black_bg: bool,
    pub bgm: Option<String>,
    pub stop_bgm: bool,
    pub effects: Vec<Effect>,
    /// Title-card text lines
    pub sequence: Vec<String>,
    pub sign_date: Option<String>,
}

impl ScriptLine {
    /// Dialogue text, if present and non-empty
    pub fn dialogue(&self) -> Option<&str> {
        self.say.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Options presented by this line, if it is a branch point
    pub fn choices(&self) -> Option<&[ScriptOption]> {
        self.options.as_deref().filter(|o| !o.is_empty())
    }

    pub fn has_choices(&self) -> bool {
        self.choices().is_some()
    }

    pub fn is_title_card(&self) -> bool {
        !self.sequence.is_empty() || self.sign_date.is_some()
    }

    /// Whether the line produces something to show
    pub fn is_displayable(&self) -> bool {
        self.dialogue().is_some() || self.has_choices() || self.is_title_card()
    }

    pub fn offers(&self, flag: &OptionFlag) -> bool {
        self.choices()
            .is_some_and(|options| options.iter().any(|o| &o.flag == flag))
    }
}
