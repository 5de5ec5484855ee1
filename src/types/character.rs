//! Character roster

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A known character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub icon: Option<String>,
}

/// Read-only character lookup keyed by id, mirrored by a name index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    characters: BTreeMap<u32, Character>,
    by_name: HashMap<String, u32>,
}

impl Roster {
    pub fn new(characters: impl IntoIterator<Item = Character>) -> Self {
        let characters: BTreeMap<u32, Character> =
            characters.into_iter().map(|c| (c.id, c)).collect();

        // Lowest id wins when two entries share a name.
        let mut by_name = HashMap::new();
        for character in characters.values() {
            by_name
                .entry(name_key(&character.name))
                .or_insert(character.id);
        }

        Self {
            characters,
            by_name,
        }
    }

    pub fn get(&self, id: u32) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn id_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(&name_key(name)).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Character> {
        self.id_by_name(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
