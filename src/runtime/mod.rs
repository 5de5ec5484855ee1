//! Presentation logic behind the script player
//!
//! Each submodule derives one presentation fact for a line: who speaks,
//! what background shows, what music plays. `player::ScriptPlayer` wires
//! them to the play head.

pub mod actor;
pub mod audio;
pub mod background;
pub mod markup;
pub mod policy;
pub mod sticky;

pub use actor::ActorResolver;
pub use audio::{AudioCue, AudioDirector, AudioOutput, Silence};
pub use policy::{Flavour, NarratorRule, ViewerPolicy};
