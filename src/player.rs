//! Script player
//!
//! Owns one open story and its playback state, and turns navigation input
//! into play-head moves. Presentation facts are recomputed from the play
//! head on every frame, so any sequence of moves that lands on the same
//! line produces the same frame.

use std::sync::Arc;

use crate::{
    error::{PlaybackError, ViewerError},
    resolve::AssetResolver,
    runtime::{
        actor::ActorResolver,
        audio::{self, AudioDirector, AudioOutput, Silence},
        background, markup,
        policy::ViewerPolicy,
    },
    types::{
        DisplayText, Event, Frame, OptionFlag, PlaybackState, Roster, ScriptLine, Speaker, Story,
    },
};

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The play head moved
    Moved {
        from: usize,
        to: usize,
        /// The new line's speaker differs from the last one shown
        speaker_changed: bool,
    },
    /// Already at a boundary; nothing changed
    Noop,
    /// A scheduled advance from a story that is no longer open
    Stale,
}

impl Transition {
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Generation token captured when an advance is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    epoch: u64,
}

/// Plays one story at a time
pub struct ScriptPlayer {
    roster: Arc<Roster>,
    assets: Arc<dyn AssetResolver>,
    policy: ViewerPolicy,
    actors: ActorResolver,
    audio: AudioDirector,
    fallback_background: Option<String>,
    story: Option<Story>,
    state: PlaybackState,
    epoch: u64,
}

impl ScriptPlayer {
    pub fn new(roster: Arc<Roster>, assets: Arc<dyn AssetResolver>, policy: ViewerPolicy) -> Self {
        Self {
            roster,
            assets,
            actors: ActorResolver::from_policy(&policy),
            policy,
            audio: AudioDirector::new(Box::new(Silence)),
            fallback_background: None,
            story: None,
            state: PlaybackState::default(),
            epoch: 0,
        }
    }

    pub fn with_audio(mut self, output: Box<dyn AudioOutput>) -> Self {
        self.audio = AudioDirector::new(output);
        self
    }

    /// Background for stories that carry no default of their own
    pub fn with_fallback_background(mut self, url: Option<String>) -> Self {
        self.fallback_background = url;
        self
    }

    pub fn policy(&self) -> &ViewerPolicy {
        &self.policy
    }

    pub fn story(&self) -> Option<&Story> {
        self.story.as_ref()
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.story.as_ref().map(|_| &self.state)
    }

    pub fn is_open(&self) -> bool {
        self.story.is_some()
    }

    /// Open `story` at its first line
    ///
    /// Any pending scheduled advance is invalidated, music is stopped and
    /// the speaker memo is cleared.
    pub fn start(&mut self, story: Story) -> Result<Frame, ViewerError> {
        if story.is_empty() {
            self.close();
            return Err(ViewerError::empty_story(&story.id));
        }

        self.epoch += 1;
        self.audio.reset();
        self.state = PlaybackState::new(&story.id, 0);
        self.story = Some(story);

        let Some(first) = self.next_stop_from(None) else {
            let id = self.state.story_id.clone();
            self.close();
            return Err(ViewerError::empty_story(id));
        };

        log::debug!("[Player] start story={} at {}", self.state.story_id, first);
        self.arrive_forward(None, first);
        self.current_frame()
            .map_err(|_| ViewerError::empty_story(&self.state.story_id))
    }

    /// Leave the story and return to the selection screen
    pub fn close(&mut self) {
        if let Some(story) = self.story.take() {
            log::debug!("[Player] close story={}", story.id);
        }
        self.epoch += 1;
        self.audio.reset();
        self.state = PlaybackState::default();
    }

    pub fn handle(&mut self, event: Event) -> Result<Transition, PlaybackError> {
        match event {
            Event::Advance => self.advance(),
            Event::Back => self.go_back(),
            Event::Choose { flag } => self.choose(&flag),
        }
    }

    /// Move to the next stop
    ///
    /// Refused while the current line waits for a choice.
    pub fn advance(&mut self) -> Result<Transition, PlaybackError> {
        let line = self.current_line()?;
        if line.has_choices() {
            return Err(PlaybackError::AwaitingChoice {
                index: self.state.index,
            });
        }

        let from = self.state.index;
        match self.next_stop_from(Some(from)) {
            Some(to) => Ok(self.arrive_forward(Some(from), to)),
            None => {
                log::trace!("[Player] advance at last stop {from}");
                Ok(Transition::Noop)
            }
        }
    }

    /// Move to the previous stop
    pub fn go_back(&mut self) -> Result<Transition, PlaybackError> {
        self.current_line()?;

        let from = self.state.index;
        match self.prev_stop(from) {
            Some(to) => Ok(self.arrive_backward(from, to)),
            None => {
                log::trace!("[Player] back at first stop {from}");
                Ok(Transition::Noop)
            }
        }
    }

    /// Pick `flag` from the current line's options
    ///
    /// Jumps to the first line of this branch point tagged with `flag`.
    /// When no such line exists the play head falls through to the next
    /// stop, passing over lines tagged for other options.
    pub fn choose(&mut self, flag: &OptionFlag) -> Result<Transition, PlaybackError> {
        let from = self.state.index;
        if !self.current_line()?.offers(flag) {
            return Err(PlaybackError::UnknownOption {
                index: from,
                flag: flag.to_string(),
            });
        }

        self.state.record_choice(from, flag.clone());
        let scripts = self.scripts();
        let tagged = (from + 1..scripts.len()).find(|&i| {
            scripts[i].option_flag.as_ref() == Some(flag) && self.branch_point(i) == Some(from)
        });

        let landing = match tagged {
            Some(i) if self.is_stop(i) => Some(i),
            Some(i) => self.next_stop_from(Some(i)),
            None => {
                log::warn!(
                    "[Player] option '{flag}' at {from} has no tagged line, falling through"
                );
                self.next_stop_from(Some(from))
            }
        };

        log::debug!("[Player] choose '{flag}' at {from} -> {landing:?}");
        match landing {
            Some(to) => Ok(self.arrive_forward(Some(from), to)),
            None => Ok(Transition::Noop),
        }
    }

    /// Token for a delayed advance; see `advance_scheduled`
    pub fn ticket(&self) -> AdvanceTicket {
        AdvanceTicket { epoch: self.epoch }
    }

    /// Advance on behalf of a timer scheduled with `ticket`
    ///
    /// Returns `Transition::Stale` without touching state when the story
    /// was reopened or closed since the ticket was taken.
    pub fn advance_scheduled(&mut self, ticket: AdvanceTicket) -> Result<Transition, PlaybackError> {
        if ticket.epoch != self.epoch {
            log::debug!("[Player] dropping stale advance (epoch {})", ticket.epoch);
            return Ok(Transition::Stale);
        }
        self.advance()
    }

    /// Project the current state into a frame; free of side effects
    pub fn current_frame(&self) -> Result<Frame, PlaybackError> {
        let line = self.current_line()?;
        let story = self.story.as_ref().ok_or(PlaybackError::NotStarted)?;
        let index = self.state.index;
        let next = self.next_stop_from(Some(index));

        let default = story
            .default_background
            .as_deref()
            .or(self.fallback_background.as_deref());

        Ok(Frame {
            index,
            text: self.display_text(line),
            speaker: self.speaker_of(line),
            background: background::resolve(&story.scripts, index, default, self.assets.as_ref()),
            bgm_track: audio::track_at(&story.scripts, index)
                .and_then(|track| self.assets.bgm_url(track)),
            active_options: line.choices().map(<[_]>::to_vec).unwrap_or_default(),
            effects: line.effects.clone(),
            can_go_back: self.prev_stop(index).is_some(),
            can_go_forward: next.is_some() && !line.has_choices(),
            can_advance_to_next_story: next.is_none() && !line.has_choices(),
        })
    }

    fn scripts(&self) -> &[ScriptLine] {
        self.story.as_ref().map(|s| s.scripts.as_slice()).unwrap_or(&[])
    }

    fn current_line(&self) -> Result<&ScriptLine, PlaybackError> {
        self.story
            .as_ref()
            .and_then(|story| story.line(self.state.index))
            .ok_or(PlaybackError::NotStarted)
    }

    /// Whether the play head may rest on line `i`
    fn is_stop(&self, i: usize) -> bool {
        self.scripts().get(i).is_some_and(|line| {
            self.follows(i) && (!self.policy.skip_non_displayable || line.is_displayable())
        })
    }

    /// Nearest options line before `i`
    fn branch_point(&self, i: usize) -> Option<usize> {
        let scripts = self.scripts();
        (0..i.min(scripts.len())).rev().find(|&j| scripts[j].has_choices())
    }

    /// Whether line `i` is on the branch taken at its branch point
    ///
    /// Untagged lines are always followed. Flag tokens are reused between
    /// branch points, so a tag only counts against its own branch point.
    fn follows(&self, i: usize) -> bool {
        let Some(flag) = self.scripts().get(i).and_then(|l| l.option_flag.as_ref()) else {
            return true;
        };
        self.branch_point(i)
            .and_then(|at| self.state.chosen_at(at))
            .is_some_and(|chosen| chosen == flag)
    }

    /// First stop after `from`, or from the top when `from` is `None`
    fn next_stop_from(&self, from: Option<usize>) -> Option<usize> {
        let start = from.map_or(0, |i| i + 1);
        (start..self.scripts().len()).find(|&i| self.is_stop(i))
    }

    fn prev_stop(&self, from: usize) -> Option<usize> {
        (0..from).rev().find(|&i| self.is_stop(i))
    }

    /// Forward move: every followed line passed over still applies its
    /// music and sound directives
    fn arrive_forward(&mut self, from: Option<usize>, to: usize) -> Transition {
        let start = from.map_or(0, |i| i + 1);
        let followed: Vec<usize> = (start..=to).filter(|&i| self.follows(i)).collect();
        if let Some(story) = &self.story {
            for i in followed {
                self.audio.on_line(&story.scripts[i], self.assets.as_ref());
            }
        }
        self.land(from.unwrap_or(to), to)
    }

    /// Backward move: only the arrived-at line is re-evaluated, and
    /// answers given at or after it are forgotten
    fn arrive_backward(&mut self, from: usize, to: usize) -> Transition {
        self.state.forget_from(to);
        if let Some(line) = self.story.as_ref().and_then(|s| s.line(to)) {
            self.audio.on_line(line, self.assets.as_ref());
        }
        self.land(from, to)
    }

    fn land(&mut self, from: usize, to: usize) -> Transition {
        self.state.index = to;
        self.state.current_bgm = self.audio.current().map(str::to_string);

        let speaker_id = self
            .current_line()
            .ok()
            .and_then(|line| self.speaker_of(line))
            .and_then(|speaker| speaker.id);
        let speaker_changed = speaker_id != self.state.last_speaker_id;
        self.state.last_speaker_id = speaker_id;

        log::debug!("[Player] {from} -> {to}");
        Transition::Moved {
            from,
            to,
            speaker_changed,
        }
    }

    fn display_text(&self, line: &ScriptLine) -> Option<DisplayText> {
        if line.is_title_card() {
            return Some(DisplayText::TitleCard {
                lines: line.sequence.iter().map(|s| self.substitute(s)).collect(),
                sign_date: line.sign_date.clone(),
            });
        }
        line.dialogue()
            .map(|text| DisplayText::Dialogue(self.substitute(text)))
    }

    fn speaker_of(&self, line: &ScriptLine) -> Option<Speaker> {
        if line.dialogue().is_none() || line.is_title_card() {
            return None;
        }
        self.actors
            .resolve(line, &self.roster, self.assets.as_ref())
    }

    fn substitute(&self, text: &str) -> String {
        markup::substitute(text, &self.roster, &self.policy.commander_name)
    }
}

impl std::fmt::Debug for ScriptPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPlayer")
            .field("policy", &self.policy)
            .field("story", &self.story.as_ref().map(|s| &s.id))
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
