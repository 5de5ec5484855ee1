//! # story_viewer
//!
//! Playback engine for story scripts: a list of lines carrying dialogue,
//! speaker references, background and music directives, screen effects
//! and branching options. The engine walks a play head over the lines and
//! projects each position into a [`Frame`] that a front end can render.
//!
//! Presentation facts that persist across lines (background, music) are
//! derived from the line history at the play head, so going back and
//! forward again always shows the same thing.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use story_viewer::{Catalog, ScriptPlayer, ViewerPolicy, catalog::roster_from_json};
//! use story_viewer::resolve::BareNames;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let roster = roster_from_json(r#"{"101": {"name": "Enterprise"}}"#)?;
//! let catalog = Catalog::from_json(
//!     r#"{"1": {"name": "Prologue", "memory_id": [
//!         {"id": 1, "title": "Arrival", "story": {"scripts": [
//!             {"bgName": "port", "bgm": "theme", "say": "Welcome aboard.", "actor": 101},
//!             {"say": "The sea was calm."}
//!         ]}}
//!     ]}}"#,
//!     &roster,
//! )?;
//!
//! let story = catalog.memory("1", "1")?.to_story()?;
//! let mut player = ScriptPlayer::new(Arc::new(roster), Arc::new(BareNames), ViewerPolicy::default());
//!
//! let frame = player.start(story)?;
//! assert_eq!(frame.speaker.map(|s| s.name), Some("Enterprise".to_string()));
//!
//! player.advance()?;
//! let frame = player.current_frame()?;
//! assert_eq!(frame.background.url.as_deref(), Some("port"));
//! assert!(frame.can_advance_to_next_story);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod notice;
pub mod player;
pub mod resolve;
pub mod runtime;
pub mod types;

pub use catalog::{Catalog, DeepLink, LinkTarget, Memory, StoryEvent, load_library};
pub use config::ViewerConfig;
pub use error::{PlaybackError, ViewerError};
pub use notice::NoticeBoard;
pub use player::{AdvanceTicket, ScriptPlayer, Transition};
pub use resolve::{AssetResolver, TemplateResolver};
pub use runtime::{AudioDirector, AudioOutput, Flavour, ViewerPolicy};
pub use types::{Event, Frame, OptionFlag, ScriptLine, Story};
