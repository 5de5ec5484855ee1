//! User input events routed to the player

use serde::{Deserialize, Serialize};

use super::script::OptionFlag;

/// Input that moves the play head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Next line (click, Enter, right arrow)
    Advance,
    /// Previous line
    Back,
    /// Pick a branch option
    Choose { flag: OptionFlag },
}
