//! Terminal front end

pub mod play;
pub mod view_state;

pub use play::{PlayOptions, TerminalAudio, run_list, run_play};
