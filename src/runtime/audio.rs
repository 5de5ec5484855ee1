//! Background music direction
//!
//! Unlike backgrounds, playback is an effect, so the director keeps the
//! playing track as state and only touches the output when it must.

use super::sticky;
use crate::resolve::AssetResolver;
use crate::types::{EffectKind, ScriptLine};

/// Sink for audio playback
pub trait AudioOutput {
    /// Start streaming `url`, replacing whatever is playing
    fn play(&mut self, url: &str);

    fn stop(&mut self);

    /// Fire-and-forget sound effect
    fn play_effect(&mut self, url: &str) {
        let _ = url;
    }
}

/// Output that plays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl AudioOutput for Silence {
    fn play(&mut self, _url: &str) {}

    fn stop(&mut self) {}
}

/// What `AudioDirector::on_line` did to the music
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCue {
    Unchanged,
    Switched { track: String },
    Stopped,
}

pub struct AudioDirector {
    output: Box<dyn AudioOutput>,
    current: Option<String>,
}

impl AudioDirector {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            current: None,
        }
    }

    /// Track name currently playing
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Apply the music directive and sound effects of an arrived-at line
    pub fn on_line(&mut self, line: &ScriptLine, assets: &dyn AssetResolver) -> AudioCue {
        for effect in &line.effects {
            if effect.kind == EffectKind::Se
                && let Some(url) = effect.audio.as_deref().and_then(|a| assets.se_url(a))
            {
                self.output.play_effect(&url);
            }
        }

        if line.stop_bgm {
            if self.current.take().is_some() {
                self.output.stop();
                log::debug!("bgm stopped");
                return AudioCue::Stopped;
            }
            return AudioCue::Unchanged;
        }

        match line.bgm.as_deref() {
            Some(track) if self.current.as_deref() != Some(track) => {
                match assets.bgm_url(track) {
                    Some(url) => self.output.play(&url),
                    None => log::warn!("bgm '{track}' has no url"),
                }
                log::debug!("bgm switched to {track}");
                self.current = Some(track.to_string());
                AudioCue::Switched {
                    track: track.to_string(),
                }
            }
            _ => AudioCue::Unchanged,
        }
    }

    /// Stop playback and forget the current track
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            self.output.stop();
        }
    }
}

impl std::fmt::Debug for AudioDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioDirector")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Track in effect at `index`, by backward scan
///
/// A `stop_bgm` line ends the scan with silence.
pub fn track_at(scripts: &[ScriptLine], index: usize) -> Option<&str> {
    sticky::scan(scripts, index, |line| {
        if line.stop_bgm {
            Some(None)
        } else {
            line.bgm.as_deref().map(Some)
        }
    })
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::BareNames;
    use crate::types::Effect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl AudioOutput for Recorder {
        fn play(&mut self, url: &str) {
            self.calls.borrow_mut().push(format!("play {url}"));
        }

        fn stop(&mut self) {
            self.calls.borrow_mut().push("stop".to_string());
        }

        fn play_effect(&mut self, url: &str) {
            self.calls.borrow_mut().push(format!("se {url}"));
        }
    }

    fn director() -> (AudioDirector, Rc<RefCell<Vec<String>>>) {
        let recorder = Recorder::default();
        let calls = recorder.calls.clone();
        (AudioDirector::new(Box::new(recorder)), calls)
    }

    fn bgm(track: &str) -> ScriptLine {
        ScriptLine {
            bgm: Some(track.to_string()),
            ..Default::default()
        }
    }

    fn stop() -> ScriptLine {
        ScriptLine {
            stop_bgm: true,
            ..Default::default()
        }
    }

    #[test]
    fn repeated_track_does_not_restart() {
        let (mut director, calls) = director();
        assert_eq!(
            director.on_line(&bgm("theme"), &BareNames),
            AudioCue::Switched {
                track: "theme".to_string()
            }
        );
        assert_eq!(director.on_line(&bgm("theme"), &BareNames), AudioCue::Unchanged);
        assert_eq!(director.on_line(&ScriptLine::default(), &BareNames), AudioCue::Unchanged);
        assert_eq!(*calls.borrow(), vec!["play theme".to_string()]);
    }

    #[test]
    fn stop_clears_and_only_stops_once() {
        let (mut director, calls) = director();
        director.on_line(&bgm("theme"), &BareNames);
        assert_eq!(director.on_line(&stop(), &BareNames), AudioCue::Stopped);
        assert_eq!(director.on_line(&stop(), &BareNames), AudioCue::Unchanged);
        assert_eq!(director.current(), None);
        assert_eq!(*calls.borrow(), vec!["play theme".to_string(), "stop".to_string()]);
    }

    #[test]
    fn sound_effects_fire_on_every_visit() {
        let (mut director, calls) = director();
        let line = ScriptLine {
            effects: vec![Effect {
                kind: EffectKind::Se,
                duration: 0.0,
                audio: Some("gun".to_string()),
            }],
            ..Default::default()
        };
        director.on_line(&line, &BareNames);
        director.on_line(&line, &BareNames);
        assert_eq!(*calls.borrow(), vec!["se gun".to_string(), "se gun".to_string()]);
    }

    #[test]
    fn track_at_honours_stop_lines() {
        let scripts = vec![bgm("a"), ScriptLine::default(), stop(), ScriptLine::default(), bgm("b")];
        assert_eq!(track_at(&scripts, 1), Some("a"));
        assert_eq!(track_at(&scripts, 3), None);
        assert_eq!(track_at(&scripts, 4), Some("b"));
    }
}
