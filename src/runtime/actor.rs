//! Speaker resolution
//!
//! Maps a line's actor fields to a display identity. Never mutates the
//! line or the roster.

use super::policy::{NarratorRule, ViewerPolicy};
use crate::resolve::AssetResolver;
use crate::types::{ActorRef, Character, Roster, ScriptLine, Speaker};

/// Roster id reserved for the commander
pub const COMMANDER_ID: u32 = 0;

/// `actorName` values that stand for the player
pub const SYSTEM_MARKERS: &[&str] = &["{playername}", "{commander}"];

/// Names that never get a portrait
pub const NARRATOR_NAMES: &[&str] = &[
    "narrator",
    "system",
    "???",
    "？？？",
    "旁白",
    "系统",
    "ナレーション",
];

pub fn is_narrator_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty()
        || NARRATOR_NAMES
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone)]
pub struct ActorResolver {
    commander_name: String,
    narrator: NarratorRule,
}

impl ActorResolver {
    pub fn new(commander_name: impl Into<String>, narrator: NarratorRule) -> Self {
        Self {
            commander_name: commander_name.into(),
            narrator,
        }
    }

    pub fn from_policy(policy: &ViewerPolicy) -> Self {
        Self::new(policy.commander_name.clone(), policy.narrator.clone())
    }

    /// Resolve the speaker of `line`; `None` only under `NarratorRule::Silent`
    pub fn resolve(
        &self,
        line: &ScriptLine,
        roster: &Roster,
        assets: &dyn AssetResolver,
    ) -> Option<Speaker> {
        if is_commander(line) {
            return Some(Speaker {
                id: Some(COMMANDER_ID),
                name: self.commander_name.clone(),
                icon: None,
            });
        }

        let mut speaker = match &line.actor {
            Some(ActorRef::Character(id)) => roster.get(*id).map(|c| identity(c, assets)),
            Some(ActorRef::Unlisted(name)) => Some(Speaker {
                id: None,
                name: name.clone(),
                icon: None,
            }),
            Some(ActorRef::Commander) | None => None,
        };

        if let Some(actor_name) = line
            .actor_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            let listed = actor_name.parse::<u32>().ok().and_then(|id| roster.get(id));
            speaker = Some(match listed {
                Some(character) => identity(character, assets),
                None => Speaker {
                    id: speaker.as_ref().and_then(|s| s.id),
                    name: actor_name.to_string(),
                    icon: speaker.and_then(|s| s.icon),
                },
            });
        }

        let mut speaker = match speaker {
            Some(speaker) => speaker,
            None => match &self.narrator {
                NarratorRule::Named(name) => Speaker {
                    id: None,
                    name: name.clone(),
                    icon: None,
                },
                NarratorRule::Silent => return None,
            },
        };

        if is_narrator_name(&speaker.name) {
            speaker.icon = None;
        }
        log::trace!("speaker resolved to {:?}", speaker);
        Some(speaker)
    }
}

fn is_commander(line: &ScriptLine) -> bool {
    matches!(line.actor, Some(ActorRef::Commander))
        || line
            .actor_name
            .as_deref()
            .is_some_and(|name| SYSTEM_MARKERS.contains(&name.trim()))
}

fn identity(character: &Character, assets: &dyn AssetResolver) -> Speaker {
    Speaker {
        id: Some(character.id),
        name: character.name.clone(),
        icon: character
            .icon
            .as_deref()
            .and_then(|icon| assets.portrait_url(icon)),
    }
}
