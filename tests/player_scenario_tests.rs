//! Playback scenarios driven through the public API
//!
//! Stories are built from catalog JSON the same way the viewer loads them.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use story_viewer::{
    AudioOutput, Catalog, Flavour, OptionFlag, PlaybackError, ScriptPlayer, Story, Transition,
    ViewerPolicy,
    catalog::roster_from_json,
    config::NameConfig,
    resolve::BareNames,
    types::{DisplayText, Roster},
};

const ROSTER: &str = r#"{
    "1": {"name": "Enterprise", "icon": "qiye"},
    "2": {"name": "Belfast", "icon": "beierfasite"}
}"#;

fn roster() -> Roster {
    roster_from_json(ROSTER).unwrap()
}

fn story(scripts: &str) -> Story {
    let json = format!(
        r#"{{"1": {{"name": "Test", "memory_id": [{{"id": 1, "title": "Test", "story": {{"scripts": {scripts}}}}}]}}}}"#
    );
    Catalog::from_json(&json, &roster())
        .unwrap()
        .memory("1", "1")
        .unwrap()
        .to_story()
        .unwrap()
}

fn player(policy: ViewerPolicy) -> ScriptPlayer {
    ScriptPlayer::new(Arc::new(roster()), Arc::new(BareNames), policy)
}

const BRANCHING: &str = r#"[
    {"bgName": "a"},
    {"say": "hi", "actor": 1},
    {"options": [{"flag": "x", "content": "Go"}]},
    {"optionFlag": "x", "say": "branch"},
    {"say": "end"}
]"#;

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl AudioOutput for Recorder {
    fn play(&mut self, url: &str) {
        self.0.borrow_mut().push(format!("play {url}"));
    }

    fn stop(&mut self) {
        self.0.borrow_mut().push("stop".to_string());
    }

    fn play_effect(&mut self, url: &str) {
        self.0.borrow_mut().push(format!("se {url}"));
    }
}

#[test]
fn choose_jumps_to_the_tagged_line() {
    let mut player = player(ViewerPolicy::default());
    let frame = player.start(story(BRANCHING)).unwrap();
    assert_eq!(frame.index, 0);
    assert_eq!(frame.background.url.as_deref(), Some("a"));

    player.advance().unwrap();
    player.advance().unwrap();
    let frame = player.current_frame().unwrap();
    assert_eq!(frame.index, 2);
    assert!(frame.has_choices());
    assert!(!frame.can_go_forward);

    assert_eq!(
        player.advance(),
        Err(PlaybackError::AwaitingChoice { index: 2 })
    );

    let transition = player.choose(&OptionFlag::new("x")).unwrap();
    assert!(matches!(transition, Transition::Moved { from: 2, to: 3, .. }));
    let frame = player.current_frame().unwrap();
    assert_eq!(frame.text, Some(DisplayText::Dialogue("branch".to_string())));

    player.advance().unwrap();
    assert_eq!(player.current_frame().unwrap().index, 4);
}

#[test]
fn options_not_offered_are_refused() {
    let mut player = player(ViewerPolicy::default());
    player.start(story(BRANCHING)).unwrap();
    player.advance().unwrap();
    player.advance().unwrap();

    let err = player.choose(&OptionFlag::new("nope")).unwrap_err();
    assert!(matches!(err, PlaybackError::UnknownOption { index: 2, .. }));
    assert_eq!(player.current_frame().unwrap().index, 2);
}

#[test]
fn dangling_flag_falls_through_past_other_branches() {
    let scripts = r#"[
        {"say": "pick", "options": [{"flag": 1, "content": "A"}, {"flag": 2, "content": "B"}]},
        {"optionFlag": 1, "say": "only A"},
        {"say": "trunk"}
    ]"#;
    let mut player = player(ViewerPolicy::default());
    player.start(story(scripts)).unwrap();

    player.choose(&OptionFlag::new("2")).unwrap();
    let frame = player.current_frame().unwrap();
    assert_eq!(frame.index, 2);
    assert_eq!(frame.text, Some(DisplayText::Dialogue("trunk".to_string())));
}

#[test]
fn reused_flag_tokens_stay_with_their_branch_point() {
    let scripts = r#"[
        {"say": "first?", "options": [{"flag": 1, "content": "A"}, {"flag": 2, "content": "B"}]},
        {"optionFlag": 1, "say": "first-1"},
        {"optionFlag": 2, "say": "first-2"},
        {"say": "second?", "options": [{"flag": 1, "content": "C"}, {"flag": 2, "content": "D"}]},
        {"optionFlag": 1, "say": "second-1"},
        {"optionFlag": 2, "say": "second-2"},
        {"say": "end"}
    ]"#;
    let mut player = player(ViewerPolicy::default());
    player.start(story(scripts)).unwrap();

    player.choose(&OptionFlag::new("1")).unwrap();
    player.advance().unwrap();
    player.choose(&OptionFlag::new("2")).unwrap();
    assert_eq!(
        player.current_frame().unwrap().text,
        Some(DisplayText::Dialogue("second-2".to_string()))
    );

    player.go_back().unwrap();
    player.go_back().unwrap();
    assert_eq!(
        player.current_frame().unwrap().text,
        Some(DisplayText::Dialogue("first-1".to_string()))
    );
}

#[test]
fn advancing_visits_increasing_indices_and_terminates() {
    let scripts = r#"[
        {"bgName": "port", "bgm": "theme"},
        {"say": "one", "actor": 1},
        {"say": ""},
        {"say": "two", "actor": "Belfast"},
        {"blackBg": true},
        {"say": "three"}
    ]"#;

    for flavour in [Flavour::Main, Flavour::World, Flavour::Chat] {
        let mut player = player(ViewerPolicy::for_flavour(flavour, &NameConfig::default()));
        let mut frame = player.start(story(scripts)).unwrap();
        let mut visited = vec![frame.index];

        while !frame.can_advance_to_next_story {
            assert!(player.advance().unwrap().moved());
            frame = player.current_frame().unwrap();
            assert!(frame.index > *visited.last().unwrap());
            visited.push(frame.index);
        }

        assert_eq!(player.advance().unwrap(), Transition::Noop);
        match flavour {
            Flavour::World => assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]),
            _ => assert_eq!(visited, vec![1, 3, 5]),
        }
    }
}

#[test]
fn back_after_advance_restores_the_frame() {
    let scripts = r#"[
        {"bgName": "port", "bgm": "theme", "say": "one", "actor": 1},
        {"say": "two", "actor": 2, "bgName": "office"},
        {"stopbgm": true, "say": "three"},
        {"blackBg": true, "bgm": "night", "say": "four", "actorName": "1"}
    ]"#;
    let mut player = player(ViewerPolicy::default());
    player.start(story(scripts)).unwrap();

    for _ in 0..3 {
        let before = player.current_frame().unwrap();
        player.advance().unwrap();
        player.go_back().unwrap();
        assert_eq!(player.current_frame().unwrap(), before);
        player.advance().unwrap();
    }
}

#[test]
fn boundary_moves_leave_the_frame_unchanged() {
    let mut player = player(ViewerPolicy::default());
    let first = player.start(story(r#"[{"say": "a"}, {"say": "b"}]"#)).unwrap();
    assert!(!first.can_go_back);

    assert_eq!(player.go_back().unwrap(), Transition::Noop);
    assert_eq!(player.current_frame().unwrap(), first);

    player.advance().unwrap();
    let last = player.current_frame().unwrap();
    assert!(last.can_advance_to_next_story);
    assert_eq!(player.advance().unwrap(), Transition::Noop);
    assert_eq!(player.current_frame().unwrap(), last);
}

#[test]
fn black_screen_outlasts_later_backgrounds() {
    let scripts = r#"[
        {"say": "0"}, {"say": "1"},
        {"blackBg": true, "say": "2"},
        {"say": "3"}, {"say": "4"},
        {"bgName": "forest", "say": "5"},
        {"say": "6"}
    ]"#;
    let mut player = player(ViewerPolicy::default());
    player.start(story(scripts)).unwrap();
    for _ in 0..6 {
        player.advance().unwrap();
    }

    let frame = player.current_frame().unwrap();
    assert_eq!(frame.index, 6);
    assert!(frame.background.is_black);
    assert_eq!(player.current_frame().unwrap().background, frame.background);
}

#[test]
fn repeated_track_is_not_restarted() {
    let scripts = r#"[
        {"bgm": "theme", "say": "a"},
        {"bgm": "theme", "say": "b"},
        {"bgm": "battle", "say": "c"},
        {"stopbgm": true, "say": "d"},
        {"say": "e"}
    ]"#;
    let recorder = Recorder::default();
    let mut player = player(ViewerPolicy::default()).with_audio(Box::new(recorder.clone()));
    player.start(story(scripts)).unwrap();
    while player.advance().unwrap().moved() {}

    assert_eq!(recorder.calls(), vec!["play theme", "play battle", "stop"]);
    assert_eq!(player.state().unwrap().current_bgm, None);
}

#[test]
fn going_back_does_not_resume_stopped_music() {
    let scripts = r#"[
        {"bgm": "theme", "say": "a"},
        {"say": "b"},
        {"stopbgm": true, "say": "c"},
        {"say": "d"}
    ]"#;
    let recorder = Recorder::default();
    let mut player = player(ViewerPolicy::default()).with_audio(Box::new(recorder.clone()));
    player.start(story(scripts)).unwrap();
    while player.advance().unwrap().moved() {}

    player.go_back().unwrap();
    player.go_back().unwrap();
    assert_eq!(player.current_frame().unwrap().index, 1);
    assert_eq!(recorder.calls(), vec!["play theme", "stop"]);
    assert_eq!(player.state().unwrap().current_bgm, None);
}

#[test]
fn passed_over_lines_still_fire_sound_effects() {
    let scripts = r#"[
        {"say": "a"},
        {"effects": [{"type": "se", "audio": "door"}]},
        {"say": "b"}
    ]"#;
    let recorder = Recorder::default();
    let mut player = player(ViewerPolicy::for_flavour(Flavour::Main, &NameConfig::default()))
        .with_audio(Box::new(recorder.clone()));
    player.start(story(scripts)).unwrap();
    player.advance().unwrap();

    assert_eq!(player.current_frame().unwrap().index, 2);
    assert_eq!(recorder.calls(), vec!["se door"]);
}

#[test]
fn scheduled_advance_is_dropped_after_restart() {
    let scripts = r#"[{"say": "a"}, {"say": "b"}, {"say": "c"}]"#;
    let mut player = player(ViewerPolicy::for_flavour(Flavour::Chat, &NameConfig::default()));
    player.start(story(scripts)).unwrap();

    let ticket = player.ticket();
    assert!(player.advance_scheduled(ticket).unwrap().moved());

    let stale = player.ticket();
    player.start(story(scripts)).unwrap();
    assert_eq!(player.advance_scheduled(stale).unwrap(), Transition::Stale);
    assert_eq!(player.current_frame().unwrap().index, 0);

    let stale = player.ticket();
    player.close();
    assert_eq!(player.advance_scheduled(stale).unwrap(), Transition::Stale);
    assert_eq!(player.current_frame(), Err(PlaybackError::NotStarted));
}

#[test]
fn speaker_changes_are_reported() {
    let scripts = r#"[
        {"say": "a", "actor": 1},
        {"say": "b", "actor": 1},
        {"say": "c", "actor": 2},
        {"say": "d"}
    ]"#;
    let mut player = player(ViewerPolicy::default());
    player.start(story(scripts)).unwrap();

    let changes: Vec<bool> = std::iter::from_fn(|| match player.advance().unwrap() {
        Transition::Moved {
            speaker_changed, ..
        } => Some(speaker_changed),
        _ => None,
    })
    .collect();
    assert_eq!(changes, vec![false, true, true]);
}

#[test]
fn stories_without_stops_cannot_be_started() {
    let mut player = player(ViewerPolicy::for_flavour(Flavour::Main, &NameConfig::default()));
    let err = player.start(story(r#"[{"bgName": "a"}, {"bgm": "b"}]"#)).unwrap_err();
    assert!(err.to_string().contains("no script lines"));
    assert!(!player.is_open());
}
