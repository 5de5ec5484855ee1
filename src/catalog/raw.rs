//! Raw JSON shapes and their normalization
//!
//! Field types in the published data drift between files: ids and flags
//! show up as numbers or strings, `actor` is an id or a name, title cards
//! are strings or nested arrays. Everything is folded into the typed model
//! here, once, at load time.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::types::{
    ActorRef, Character, Effect, EffectKind, OptionFlag, Roster, ScriptLine, ScriptOption,
};

/// Number-or-string token
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawToken {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawToken {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) if f.fract() == 0.0 => (f as i64).to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawActor {
    Id(i64),
    Name(String),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawOption {
    pub flag: RawToken,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawEffect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default, alias = "dur")]
    pub duration: f32,
    #[serde(default)]
    pub audio: Option<String>,
}

/// Flat timed effect object (`{"dur": 0.5, ...}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawTimed {
    #[serde(default, alias = "duration")]
    pub dur: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawScriptLine {
    pub say: Option<String>,
    pub actor: Option<RawActor>,
    pub actor_name: Option<RawToken>,
    pub options: Option<Vec<RawOption>>,
    pub option_flag: Option<RawToken>,
    pub bg_name: Option<String>,
    #[serde(default)]
    pub black_bg: bool,
    pub bgm: Option<String>,
    #[serde(default, rename = "stopbgm")]
    pub stop_bgm: bool,
    #[serde(default)]
    pub effects: Vec<RawEffect>,
    pub flash: Option<RawTimed>,
    pub flashout: Option<RawTimed>,
    pub flashin: Option<RawTimed>,
    pub shake: Option<RawTimed>,
    pub soundeffect: Option<String>,
    pub sequence: Option<serde_json::Value>,
    pub sign_date: Option<serde_json::Value>,
}

const DEFAULT_EFFECT_SECONDS: f32 = 0.5;

impl RawScriptLine {
    pub(crate) fn normalize(self, roster: &Roster) -> ScriptLine {
        let mut effects: Vec<Effect> = self
            .effects
            .into_iter()
            .map(|e| Effect {
                kind: e.kind,
                duration: e.duration,
                audio: e.audio,
            })
            .collect();

        let flat = [
            (EffectKind::Flash, self.flash),
            (EffectKind::Fadeout, self.flashout),
            (EffectKind::Fadein, self.flashin),
            (EffectKind::Shake, self.shake),
        ];
        effects.extend(flat.into_iter().filter_map(|(kind, timed)| {
            timed.map(|timed| Effect {
                kind,
                duration: timed.dur.unwrap_or(DEFAULT_EFFECT_SECONDS),
                audio: None,
            })
        }));
        if let Some(audio) = self.soundeffect.filter(|s| !s.trim().is_empty()) {
            effects.push(Effect {
                kind: EffectKind::Se,
                duration: 0.0,
                audio: Some(audio),
            });
        }

        ScriptLine {
            say: self.say,
            actor: self.actor.and_then(|a| normalize_actor(a, roster)),
            actor_name: self
                .actor_name
                .map(RawToken::into_string)
                .filter(|s| !s.is_empty()),
            options: self.options.map(|options| {
                options
                    .into_iter()
                    .map(|o| ScriptOption {
                        flag: OptionFlag::new(o.flag.into_string()),
                        content: o.content,
                    })
                    .collect()
            }),
            option_flag: self
                .option_flag
                .map(|f| OptionFlag::new(f.into_string())),
            bg_name: self.bg_name.filter(|s| !s.trim().is_empty()),
            black_bg: self.black_bg,
            bgm: self.bgm.filter(|s| !s.trim().is_empty()),
            stop_bgm: self.stop_bgm,
            effects,
            sequence: self.sequence.map(text_lines).unwrap_or_default(),
            sign_date: self
                .sign_date
                .and_then(|v| text_lines(v).into_iter().next()),
        }
    }
}

fn normalize_actor(actor: RawActor, roster: &Roster) -> Option<ActorRef> {
    match actor {
        RawActor::Id(0) => Some(ActorRef::Commander),
        RawActor::Id(id) => u32::try_from(id).ok().map(ActorRef::Character),
        RawActor::Name(name) => {
            let name = name.trim();
            if name.is_empty() {
                None
            } else if name.eq_ignore_ascii_case("commander") || name == "指挥官" {
                Some(ActorRef::Commander)
            } else if let Ok(id) = name.parse::<i64>() {
                normalize_actor(RawActor::Id(id), roster)
            } else if let Some(id) = roster.id_by_name(name) {
                Some(ActorRef::Character(id))
            } else {
                log::trace!("actor '{name}' not in roster");
                Some(ActorRef::Unlisted(name.to_string()))
            }
        }
    }
}

/// Collect the text parts of a title-card value
///
/// Accepts `"text"`, `["a", "b"]` and `[["a", 1.0], ["b", 2.0]]`.
fn text_lines(value: serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    match value {
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Array(parts) => parts.into_iter().find_map(|p| match p {
                    Value::String(s) => Some(s),
                    _ => None,
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStory {
    #[serde(default)]
    pub scripts: Option<Vec<RawScriptLine>>,
    pub default_bg: Option<String>,
    #[serde(rename = "default_bg")]
    pub default_bg_snake: Option<String>,
    pub default_background: Option<String>,
}

impl RawStory {
    /// `defaultBg`, then `default_bg`, then `defaultBackground`
    pub(crate) fn default_background(&mut self) -> Option<String> {
        self.default_bg
            .take()
            .or_else(|| self.default_bg_snake.take())
            .or_else(|| self.default_background.take())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMemory {
    pub id: RawToken,
    pub title: Option<String>,
    pub name: Option<String>,
    pub condition: Option<serde_json::Value>,
    pub icon: Option<String>,
    pub mask: Option<String>,
    #[serde(default)]
    pub story: Option<RawStory>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawEvent {
    #[serde(default)]
    pub name: Option<String>,
    pub icon: Option<String>,
    pub memory_id: Option<Vec<RawMemory>>,
    pub child: Option<Vec<RawMemory>>,
}

impl RawEvent {
    /// Memories under either key; `memory_id` wins when both are present
    pub(crate) fn memories(&mut self) -> Vec<RawMemory> {
        self.memory_id
            .take()
            .or_else(|| self.child.take())
            .unwrap_or_default()
    }
}

pub(crate) type RawCatalog = BTreeMap<String, RawEvent>;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCharacter {
    pub name: String,
    pub icon: Option<String>,
}

/// Build a roster from `{ "<id>": { name, icon } }`; non-numeric keys are skipped
pub(crate) fn roster_from(raw: BTreeMap<String, RawCharacter>) -> Roster {
    Roster::new(raw.into_iter().filter_map(|(key, character)| {
        match key.trim().parse::<u32>() {
            Ok(id) => Some(Character {
                id,
                name: character.name,
                icon: character.icon.filter(|i| !i.trim().is_empty()),
            }),
            Err(_) => {
                log::warn!("roster key '{key}' is not a numeric id, skipped");
                None
            }
        }
    }))
}

/// Render a condition value for display
pub(crate) fn condition_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
