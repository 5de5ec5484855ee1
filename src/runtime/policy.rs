//! Viewer flavours and their playback knobs
//!
//! The main, world and chat viewers share one engine and differ only in the
//! settings collected here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{NameConfig, ViewerConfig};

/// Which viewer the player is driving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavour {
    /// Main story: directive-only lines are passed through automatically
    #[default]
    Main,
    /// World story: every line is a stop
    World,
    /// Chat-style: auto-advancing, no narrator name plate
    Chat,
}

impl Flavour {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Some(Self::Main),
            "world" => Some(Self::World),
            "chat" | "ins" => Some(Self::Chat),
            _ => None,
        }
    }
}

/// How lines without a resolvable speaker are labelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarratorRule {
    /// Shown under a fixed name
    Named(String),
    /// Shown without a name plate
    Silent,
}

/// Behavioural knobs of the script player
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerPolicy {
    /// Pass over lines with nothing to show instead of stopping on them
    pub skip_non_displayable: bool,
    pub narrator: NarratorRule,
    pub commander_name: String,
    /// Pace of scheduled auto-advance, if the viewer uses it
    pub auto_advance_delay: Option<Duration>,
}

impl Default for ViewerPolicy {
    /// Literal traversal: every line is a stop
    fn default() -> Self {
        Self::for_flavour(Flavour::World, &NameConfig::default())
    }
}

impl ViewerPolicy {
    pub fn for_flavour(flavour: Flavour, names: &NameConfig) -> Self {
        match flavour {
            Flavour::Main => Self {
                skip_non_displayable: true,
                narrator: NarratorRule::Named(names.narrator.clone()),
                commander_name: names.commander.clone(),
                auto_advance_delay: None,
            },
            Flavour::World => Self {
                skip_non_displayable: false,
                narrator: NarratorRule::Named(names.narrator.clone()),
                commander_name: names.commander.clone(),
                auto_advance_delay: None,
            },
            Flavour::Chat => Self {
                skip_non_displayable: true,
                narrator: NarratorRule::Silent,
                commander_name: names.commander.clone(),
                auto_advance_delay: Some(Duration::from_millis(800)),
            },
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        let mut policy = Self::for_flavour(config.flavour, &config.names);
        if let Some(delay) = config.auto_advance_delay() {
            policy.auto_advance_delay = Some(delay);
        }
        policy
    }
}
