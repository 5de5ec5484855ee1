//! Playback state owned by the script player

use serde::{Deserialize, Serialize};

use super::script::OptionFlag;

/// An option picked at a branch point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Index of the line that offered the options
    pub at: usize,
    pub flag: OptionFlag,
}

/// Mutable per-story playback state
///
/// Only `ScriptPlayer` mutates this; hosts read it through
/// `ScriptPlayer::state`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub story_id: String,
    /// Play head
    pub index: usize,
    pub last_speaker_id: Option<u32>,
    /// Track the audio output is playing
    pub current_bgm: Option<String>,
    /// Choices on the way to the play head, in script order
    pub choices: Vec<Choice>,
}

impl PlaybackState {
    pub fn new(story_id: impl Into<String>, index: usize) -> Self {
        Self {
            story_id: story_id.into(),
            index,
            ..Default::default()
        }
    }

    /// Flag picked at the branch point `at`, if it was answered
    pub fn chosen_at(&self, at: usize) -> Option<&OptionFlag> {
        self.choices
            .iter()
            .rev()
            .find(|c| c.at == at)
            .map(|c| &c.flag)
    }

    /// Record an answer at `at`, replacing it and anything after it
    pub fn record_choice(&mut self, at: usize, flag: OptionFlag) {
        self.forget_from(at);
        self.choices.push(Choice { at, flag });
    }

    /// Drop answers given at or after line `index`
    pub fn forget_from(&mut self, index: usize) {
        while self.choices.last().is_some_and(|c| c.at >= index) {
            self.choices.pop();
        }
    }
}
