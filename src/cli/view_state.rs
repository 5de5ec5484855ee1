//! View state management for the terminal viewer
//!
//! Tracks what is currently on screen and works out rendering deltas so
//! only what changed between frames is printed again.

use crate::types::{Background, EffectKind, Frame, Speaker};

/// Clear the terminal screen (cross-platform)
pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");

    // Fallback: print newlines
    if std::io::Write::flush(&mut std::io::stdout()).is_err() {
        for _ in 0..50 {
            println!();
        }
    }
}

/// Current visual state of the terminal viewer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub background: Option<Background>,
    /// Music track shown in the status line
    pub bgm: Option<String>,
    /// Speaker whose portrait is up; `None` for narration
    pub speaker_id: Option<u32>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a frame to this view state and return the rendering delta
    pub fn apply_frame(&mut self, frame: &Frame) -> RenderDelta {
        let mut delta = RenderDelta::new();

        if self.background.as_ref() != Some(&frame.background) {
            delta.background_changed = true;
            delta.effects_added.push(describe_background(&frame.background));
            self.background = Some(frame.background.clone());
        }

        if frame.bgm_track != self.bgm {
            match &frame.bgm_track {
                Some(track) => delta.effects_added.push(format!("PlayBGM: {track}")),
                None => delta.effects_added.push("StopBGM".to_string()),
            }
            self.bgm = frame.bgm_track.clone();
        }

        // Portrait only redraws when the speaker actually changes
        let speaker_id = frame.speaker.as_ref().and_then(|s| s.id);
        if speaker_id != self.speaker_id {
            delta.portrait = frame.speaker.clone().filter(|s| s.id.is_some());
            delta.portrait_changed = true;
            self.speaker_id = speaker_id;
        }

        // Line effects fire every time the line is shown
        for effect in &frame.effects {
            let label = match effect.kind {
                EffectKind::Shake => "Shake",
                EffectKind::Flash => "Flash",
                EffectKind::Fadeout => "FadeOut",
                EffectKind::Fadein => "FadeIn",
                EffectKind::Se => "PlaySE",
            };
            let line = match &effect.audio {
                Some(audio) => format!("{label}: {audio}"),
                None => format!("{label} ({:.1}s)", effect.duration),
            };
            delta.effects_added.push(line);
        }

        delta
    }
}

/// What needs to be rendered (the delta from the previous state)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderDelta {
    pub background_changed: bool,
    pub portrait_changed: bool,
    /// Portrait to draw when `portrait_changed`; `None` clears it
    pub portrait: Option<Speaker>,
    /// Human-readable effect lines
    pub effects_added: Vec<String>,
}

impl RenderDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.background_changed && !self.portrait_changed && self.effects_added.is_empty()
    }
}

fn describe_background(background: &Background) -> String {
    match (&background.url, background.is_black) {
        (_, true) => "Background: (black)".to_string(),
        (Some(url), false) => format!("Background: {url}"),
        (None, false) => "Background: (none)".to_string(),
    }
}

/// Render a delta to the console
pub fn render_delta(delta: &RenderDelta) {
    if delta.portrait_changed {
        match &delta.portrait {
            Some(speaker) => match &speaker.icon {
                Some(icon) => println!("[Portrait: {} <{icon}>]", speaker.name),
                None => println!("[Portrait: {}]", speaker.name),
            },
            None => println!("[Portrait cleared]"),
        }
    }

    if !delta.effects_added.is_empty() {
        println!("[Effects]");
        for effect in &delta.effects_added {
            println!("  {effect}");
        }
        println!();
    }
}
