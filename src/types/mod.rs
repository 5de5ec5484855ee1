//! Core types for the story viewer
//!
//! - Script: normalized script lines, options, effects
//! - Story: a playable memory
//! - Character: roster entries and the name index
//! - State: playback state owned by the player
//! - Frame: what the render surface receives
//! - Event: user input routed to the player

pub mod character;
pub mod event;
pub mod frame;
pub mod script;
pub mod state;
pub mod story;

pub use character::{Character, Roster};
pub use event::Event;
pub use frame::{Background, DisplayText, Frame, Speaker};
pub use script::{ActorRef, Effect, EffectKind, OptionFlag, ScriptLine, ScriptOption};
pub use state::PlaybackState;
pub use story::Story;
