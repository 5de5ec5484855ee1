//! Story catalog
//!
//! The catalog groups memories (playable stories) under events. It is
//! owned by the data files; the viewer only reads it.

pub mod link;
mod raw;
pub mod source;


use serde::Serialize;

use crate::error::ViewerError;
use crate::types::{Roster, ScriptLine, Story};

pub use link::{DeepLink, LinkTarget};
pub use source::{FileSystemSource, InMemorySource, Library, StorySource, load_library};

/// A playable memory as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Memory {
    pub id: String,
    pub title: String,
    /// Unlock condition text, if the catalog gives one
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub mask: Option<String>,
    pub scripts: Vec<ScriptLine>,
    pub default_background: Option<String>,
}

impl Memory {
    /// Build a playable story; fails when there is nothing to play
    pub fn to_story(&self) -> Result<Story, ViewerError> {
        if self.scripts.is_empty() {
            return Err(ViewerError::empty_story(&self.id));
        }
        Ok(Story {
            id: self.id.clone(),
            title: self.title.clone(),
            scripts: self.scripts.clone(),
            default_background: self.default_background.clone(),
        })
    }
}

/// A group of memories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryEvent {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub memories: Vec<Memory>,
}

impl StoryEvent {
    pub fn memory(&self, id: &str) -> Result<&Memory, ViewerError> {
        self.memories
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ViewerError::story_not_found(id))
    }

    /// The memory listed after `id`
    pub fn next_memory(&self, id: &str) -> Option<&Memory> {
        let pos = self.memories.iter().position(|m| m.id == id)?;
        self.memories.get(pos + 1)
    }
}

/// All events, in id order (numeric ids compare numerically)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    events: Vec<StoryEvent>,
}

impl Catalog {
    pub fn new(mut events: Vec<StoryEvent>) -> Self {
        events.sort_by(|a, b| id_order(&a.id).cmp(&id_order(&b.id)));
        Self { events }
    }

    /// Parse catalog JSON, normalizing every script line against `roster`
    pub fn from_json(json: &str, roster: &Roster) -> Result<Self, ViewerError> {
        let raw: raw::RawCatalog = serde_json::from_str(json)
            .map_err(|e| ViewerError::data_load("catalog", e.to_string()))?;

        let events = raw
            .into_iter()
            .map(|(id, mut event)| {
                let memories = event
                    .memories()
                    .into_iter()
                    .map(|memory| normalize_memory(memory, roster))
                    .collect();
                StoryEvent {
                    name: event.name.unwrap_or_else(|| id.clone()),
                    id,
                    icon: event.icon,
                    memories,
                }
            })
            .collect();

        let catalog = Self::new(events);
        log::info!(
            "catalog loaded: {} events, {} memories",
            catalog.events.len(),
            catalog.events.iter().map(|e| e.memories.len()).sum::<usize>()
        );
        Ok(catalog)
    }

    pub fn events(&self) -> &[StoryEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event(&self, id: &str) -> Result<&StoryEvent, ViewerError> {
        let id = id.trim();
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| ViewerError::event_not_found(id))
    }

    pub fn memory(&self, event_id: &str, memory_id: &str) -> Result<&Memory, ViewerError> {
        self.event(event_id)?.memory(memory_id.trim())
    }

    /// Resolve a deep link to what the viewer should open
    pub fn open_link(&self, link: &DeepLink) -> Result<LinkTarget<'_>, ViewerError> {
        let Some(event_id) = link.event_id.as_deref() else {
            return Ok(LinkTarget::Index);
        };
        let event = self.event(event_id)?;
        match link.story_id.as_deref() {
            None => Ok(LinkTarget::Event(event)),
            Some(story_id) => Ok(LinkTarget::Memory(event, event.memory(story_id)?)),
        }
    }
}

fn normalize_memory(memory: raw::RawMemory, roster: &Roster) -> Memory {
    let id = memory.id.into_string();
    let mut story = memory.story.unwrap_or_default();
    let default_background = story.default_background();
    let scripts: Vec<ScriptLine> = story
        .scripts
        .unwrap_or_default()
        .into_iter()
        .map(|line| line.normalize(roster))
        .collect();

    if scripts.is_empty() {
        log::debug!("memory {id} has no script lines");
    }

    Memory {
        title: memory.title.or(memory.name).unwrap_or_else(|| id.clone()),
        condition: memory.condition.and_then(raw::condition_text),
        icon: memory.icon,
        mask: memory.mask,
        scripts,
        default_background,
        id,
    }
}

/// Numeric ids first in numeric order, then the rest lexically
fn id_order(id: &str) -> (u8, u64, &str) {
    match id.parse::<u64>() {
        Ok(n) => (0, n, id),
        Err(_) => (1, 0, id),
    }
}

/// Parse roster JSON (`{ "<id>": { name, icon } }`)
pub fn roster_from_json(json: &str) -> Result<Roster, ViewerError> {
    let raw = serde_json::from_str(json).map_err(|e| ViewerError::data_load("roster", e.to_string()))?;
    let roster = raw::roster_from(raw);
    log::info!("roster loaded: {} characters", roster.len());
    Ok(roster)
}
