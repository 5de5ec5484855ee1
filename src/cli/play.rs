//! Terminal viewer
//!
//! Loads the catalog, resolves a deep link (or lets the user pick) and
//! plays memories interactively.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    catalog::{Catalog, DeepLink, FileSystemSource, Library, LinkTarget, StoryEvent, load_library},
    cli::view_state::{ViewState, clear_screen, render_delta},
    config::ViewerConfig,
    notice::{NoticeBoard, NoticeKind},
    player::{ScriptPlayer, Transition},
    resolve::TemplateResolver,
    runtime::{AudioOutput, ViewerPolicy, markup},
    types::{DisplayText, Frame},
};

/// Audio output that reports playback to the log
#[derive(Debug, Default)]
pub struct TerminalAudio;

impl AudioOutput for TerminalAudio {
    fn play(&mut self, url: &str) {
        log::info!("[Audio] play {url}");
    }

    fn stop(&mut self) {
        log::info!("[Audio] stop");
    }

    fn play_effect(&mut self, url: &str) {
        log::info!("[Audio] se {url}");
    }
}

/// Options for `play`
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub catalog: PathBuf,
    pub roster: PathBuf,
    pub link: DeepLink,
    pub config: ViewerConfig,
}

/// How a memory's playback ended
enum Ending {
    Quit,
    /// Reached the end; offer what comes next
    Finished,
    /// Could not be played
    Skipped,
}

fn load(catalog: PathBuf, roster: PathBuf) -> anyhow::Result<(tokio::runtime::Runtime, Library)> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let source = FileSystemSource::new(catalog, roster);
    let library = runtime.block_on(load_library(&source))?;
    Ok((runtime, library))
}

/// Print the event index
pub fn run_list(catalog: PathBuf, roster: PathBuf) -> anyhow::Result<()> {
    let (_runtime, library) = load(catalog, roster)?;
    print_index(&library.catalog);
    for event in library.catalog.events() {
        print_event(event);
    }
    Ok(())
}

/// Run the interactive viewer
pub fn run_play(options: PlayOptions) -> anyhow::Result<()> {
    let PlayOptions {
        catalog,
        roster,
        link,
        config,
    } = options;
    let (runtime, library) = load(catalog, roster)?;
    let mut notices = NoticeBoard::new(config.banner_timeout());

    let assets = Arc::new(TemplateResolver::new(config.assets.clone()));
    let mut player = ScriptPlayer::new(
        Arc::clone(&library.roster),
        assets,
        ViewerPolicy::from_config(&config),
    )
    .with_audio(Box::new(TerminalAudio))
    .with_fallback_background(config.default_background.clone());

    println!("=== Story Viewer ===");
    println!();
    println!("Controls:");
    println!("  Enter: next");
    println!("  1-9:   select choice");
    println!("  b:     back");
    println!("  q:     quit");
    println!();

    let target = match library.catalog.open_link(&link) {
        Ok(target) => target,
        Err(err) => {
            notices.error(&err, Instant::now());
            LinkTarget::Index
        }
    };

    let (mut event, mut memory_id) = match target {
        LinkTarget::Memory(event, memory) => (event, memory.id.clone()),
        LinkTarget::Event(event) => {
            show_notices(&mut notices);
            match pick_memory(event)? {
                Some(id) => (event, id),
                None => return Ok(()),
            }
        }
        LinkTarget::Index => {
            show_notices(&mut notices);
            let Some(event) = pick_event(&library.catalog, &mut notices)? else {
                return Ok(());
            };
            match pick_memory(event)? {
                Some(id) => (event, id),
                None => return Ok(()),
            }
        }
    };

    loop {
        let ending = match event.memory(&memory_id).and_then(|m| m.to_story()) {
            Ok(story) => {
                println!("--- {} ---", story.title);
                match player.start(story) {
                    Ok(frame) => play_story(&mut player, frame, &runtime, &mut notices)?,
                    Err(err) => {
                        notices.error(&err, Instant::now());
                        Ending::Skipped
                    }
                }
            }
            Err(err) => {
                notices.error(&err, Instant::now());
                Ending::Skipped
            }
        };
        player.close();

        match ending {
            Ending::Quit => break,
            Ending::Finished | Ending::Skipped => {
                show_notices(&mut notices);
                if let Some(next) = event.next_memory(&memory_id) {
                    let answer = get_input(&format!("Next: {}? (y/n)", next.title))?;
                    if answer.eq_ignore_ascii_case("y") || answer.is_empty() {
                        memory_id = next.id.clone();
                        continue;
                    }
                }
                let Some(picked) = pick_event(&library.catalog, &mut notices)? else {
                    break;
                };
                event = picked;
                match pick_memory(event)? {
                    Some(id) => memory_id = id,
                    None => break,
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn play_story(
    player: &mut ScriptPlayer,
    first: Frame,
    runtime: &tokio::runtime::Runtime,
    notices: &mut NoticeBoard,
) -> anyhow::Result<Ending> {
    let mut view_state = ViewState::new();
    let mut frame = first;
    let delay = player.policy().auto_advance_delay;

    loop {
        let delta = view_state.apply_frame(&frame);
        render_delta(&delta);
        show_frame(&frame);
        show_notices(notices);

        if let Some(delay) = delay
            && frame.can_go_forward
        {
            let ticket = player.ticket();
            runtime.block_on(tokio::time::sleep(delay));
            if player.advance_scheduled(ticket)?.moved() {
                frame = player.current_frame()?;
            }
            continue;
        }

        let prompt = if frame.has_choices() { "Select (1-9):" } else { "" };
        let input = get_input(prompt)?;

        let transition = match input.as_str() {
            "q" => return Ok(Ending::Quit),
            "b" => player.go_back(),
            "" if frame.can_advance_to_next_story => {
                println!();
                println!("== THE END ==");
                return Ok(Ending::Finished);
            }
            "" => player.advance(),
            other => match other.parse::<usize>() {
                Ok(n) if (1..=frame.active_options.len()).contains(&n) => {
                    let option = &frame.active_options[n - 1];
                    player.choose(&option.flag)
                }
                _ => {
                    println!("Press Enter to continue, a choice number, 'b' to go back, or 'q' to quit.");
                    continue;
                }
            },
        };

        match transition {
            Ok(Transition::Moved { .. }) => {
                if frame.has_choices() {
                    clear_screen();
                }
                frame = player.current_frame()?;
            }
            Ok(Transition::Noop) if input == "b" => println!("[Cannot go back]"),
            Ok(Transition::Noop) if frame.has_choices() => {
                println!();
                println!("== THE END ==");
                return Ok(Ending::Finished);
            }
            Ok(_) => {}
            Err(err) => println!("[{err}]"),
        }
    }
}

/// Display the text and choices of a frame
fn show_frame(frame: &Frame) {
    match &frame.text {
        Some(DisplayText::Dialogue(text)) => {
            if let Some(speaker) = &frame.speaker {
                println!("{}:", speaker.name);
            }
            println!("{}", markup::plain_text(text));
            println!();
        }
        Some(DisplayText::TitleCard { lines, sign_date }) => {
            for line in lines {
                println!("    {}", markup::plain_text(line));
            }
            if let Some(date) = sign_date {
                println!("    {date}");
            }
            println!();
        }
        None => {}
    }

    if frame.has_choices() {
        println!("--- Choice ---");
        for (i, option) in frame.active_options.iter().enumerate() {
            println!("{}. {}", i + 1, markup::plain_text(&option.content));
        }
        println!();
    }
}

fn show_notices(notices: &mut NoticeBoard) {
    let now = Instant::now();
    notices.prune(now);
    for notice in notices.active(now) {
        match notice.kind {
            NoticeKind::Info => println!("(i) {}", notice.message),
            NoticeKind::Error => println!("(!) {}", notice.message),
        }
    }
}

fn print_index(catalog: &Catalog) {
    println!("--- Events ---");
    for (i, event) in catalog.events().iter().enumerate() {
        println!("{}. [{}] {} ({} stories)", i + 1, event.id, event.name, event.memories.len());
    }
    println!();
}

fn print_event(event: &StoryEvent) {
    println!("--- {} ---", event.name);
    for (i, memory) in event.memories.iter().enumerate() {
        match &memory.condition {
            Some(condition) => println!("{}. {} ({condition})", i + 1, memory.title),
            None => println!("{}. {}", i + 1, memory.title),
        }
    }
    println!();
}

fn pick_event<'a>(
    catalog: &'a Catalog,
    notices: &mut NoticeBoard,
) -> anyhow::Result<Option<&'a StoryEvent>> {
    if catalog.is_empty() {
        notices.info("the catalog has no events", Instant::now());
        show_notices(notices);
        return Ok(None);
    }

    print_index(catalog);
    loop {
        let input = get_input("Event:")?;
        if input == "q" {
            return Ok(None);
        }
        if let Ok(n) = input.parse::<usize>()
            && let Some(event) = n.checked_sub(1).and_then(|i| catalog.events().get(i))
        {
            return Ok(Some(event));
        }
        println!("Enter an event number, or 'q' to quit.");
    }
}

fn pick_memory(event: &StoryEvent) -> anyhow::Result<Option<String>> {
    print_event(event);
    loop {
        let input = get_input("Story:")?;
        if input == "q" {
            return Ok(None);
        }
        if let Ok(n) = input.parse::<usize>()
            && let Some(memory) = n.checked_sub(1).and_then(|i| event.memories.get(i))
        {
            return Ok(Some(memory.id.clone()));
        }
        println!("Enter a story number, or 'q' to quit.");
    }
}

/// Get user input with an optional prompt
fn get_input(prompt: &str) -> io::Result<String> {
    if !prompt.is_empty() {
        print!("{} ", prompt);
        io::stdout().flush()?;
    }

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
