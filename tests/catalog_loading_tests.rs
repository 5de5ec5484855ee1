//! Loading the catalog from disk and opening stories by deep link

use std::sync::Arc;

use story_viewer::{
    DeepLink, LinkTarget, ScriptPlayer, TemplateResolver, ViewerConfig, ViewerError,
    ViewerPolicy,
    catalog::{FileSystemSource, load_library},
    notice::NoticeBoard,
    types::DisplayText,
};

const CATALOG: &str = r#"{
    "10": {
        "name": "Operation Siren",
        "memory_id": [
            {"id": 1042, "title": "Encounter", "story": {"scripts": [
                {"bgName": "bg_story_1", "bgm": "story-1", "say": "{playername}, over here!", "actor": "Enterprise"},
                {"sequence": [["Three days later", 1.0]], "signDate": ["Pacific", 2.0]},
                {"say": "Tea is ready.", "actor": 202, "soundeffect": "cup"}
            ]}},
            {"id": 1043, "title": "Empty"}
        ]
    }
}"#;

const ROSTER: &str = r#"{
    "101": {"name": "Enterprise", "icon": "qiye"},
    "202": {"name": "Belfast", "icon": "beierfasite"}
}"#;

fn write_fixtures(dir: &std::path::Path) -> FileSystemSource {
    let catalog = dir.join("memories.json");
    let roster = dir.join("shipgirl_data.json");
    std::fs::write(&catalog, CATALOG).unwrap();
    std::fs::write(&roster, ROSTER).unwrap();
    FileSystemSource::new(catalog, roster)
}

#[tokio::test]
async fn deep_link_opens_a_playable_story() {
    let dir = tempfile::tempdir().unwrap();
    let library = load_library(&write_fixtures(dir.path())).await.unwrap();

    let link = DeepLink::parse("https://wiki.test/memories?eventid=10&story=1042");
    let LinkTarget::Memory(_, memory) = library.catalog.open_link(&link).unwrap() else {
        panic!("Expected memory target");
    };

    let config = ViewerConfig::from_json(
        r#"{"flavour": "world", "assets": {"base_url": "https://cdn.test"}, "names": {"commander": "Shikikan"}}"#,
    )
    .unwrap();
    let mut player = ScriptPlayer::new(
        Arc::clone(&library.roster),
        Arc::new(TemplateResolver::new(config.assets.clone())),
        ViewerPolicy::from_config(&config),
    );

    let frame = player.start(memory.to_story().unwrap()).unwrap();
    assert_eq!(
        frame.text,
        Some(DisplayText::Dialogue("Shikikan, over here!".to_string()))
    );
    let speaker = frame.speaker.unwrap();
    assert_eq!(speaker.name, "Enterprise");
    assert_eq!(speaker.icon.as_deref(), Some("https://cdn.test/squareicon/qiye.png"));
    assert_eq!(
        frame.background.url.as_deref(),
        Some("https://cdn.test/bg/bg_story_1.png")
    );
    assert_eq!(frame.bgm_track.as_deref(), Some("https://cdn.test/bgm/story-1.ogg"));

    player.advance().unwrap();
    let frame = player.current_frame().unwrap();
    assert_eq!(
        frame.text,
        Some(DisplayText::TitleCard {
            lines: vec!["Three days later".to_string()],
            sign_date: Some("Pacific".to_string()),
        })
    );
    assert_eq!(frame.speaker, None);
}

#[tokio::test]
async fn bad_links_become_notices() {
    let dir = tempfile::tempdir().unwrap();
    let library = load_library(&write_fixtures(dir.path())).await.unwrap();
    let now = std::time::Instant::now();
    let mut notices = NoticeBoard::new(ViewerConfig::default().banner_timeout());

    for query in ["eventid=99", "eventid=10&story=7"] {
        match library.catalog.open_link(&DeepLink::parse(query)) {
            Err(err) => {
                assert!(!err.is_fatal());
                notices.error(&err, now);
            }
            Ok(target) => panic!("Expected not found, got {target:?}"),
        }
    }
    assert_eq!(notices.active(now).count(), 2);

    let empty = library.catalog.memory("10", "1043").unwrap();
    assert!(matches!(empty.to_story(), Err(ViewerError::EmptyStory { .. })));
}

#[tokio::test]
async fn unreadable_roster_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("memories.json");
    let roster = dir.path().join("shipgirl_data.json");
    std::fs::write(&catalog, CATALOG).unwrap();
    std::fs::write(&roster, "not json").unwrap();

    let err = load_library(&FileSystemSource::new(catalog, roster))
        .await
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("roster"));
}
