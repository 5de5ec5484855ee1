//! CLI entry point for story-viewer
//!
//! Lists the story catalog or plays memories in the terminal.

use std::path::PathBuf;
use std::process;

use env_logger::{Builder, Env};
use story_viewer::{
    DeepLink, Flavour, ViewerConfig,
    cli::{PlayOptions, run_list, run_play},
};

const DEFAULT_CONFIG: &str = "story-viewer.json";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "list" => {
            let Some(catalog) = args.get(2) else {
                fail_usage("Missing catalog file path");
            };
            let roster = args.get(3).map(String::as_str).unwrap_or("shipgirl_data.json");
            init_logging("warn");
            if let Err(err) = run_list(PathBuf::from(catalog), PathBuf::from(roster)) {
                fail("Listing failed", &err);
            }
        }
        "play" => {
            if args.len() < 4 {
                fail_usage("Missing catalog or roster file path");
            }
            let options = parse_play_options(&args[2], &args[3], &args[4..]);
            if let Err(err) = run_play(options) {
                fail("Player mode failed", &err);
            }
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => fail_usage(&format!("Unknown command '{}'", command)),
    }
}

fn parse_play_options(catalog: &str, roster: &str, rest: &[String]) -> PlayOptions {
    let mut link = DeepLink::default();
    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    let mut flavour = None;

    let mut iter = rest.iter();
    while let Some(flag) = iter.next() {
        let Some(value) = iter.next() else {
            fail_usage(&format!("Missing value for '{}'", flag));
        };
        match flag.as_str() {
            "--link" => link = DeepLink::parse(value),
            "--config" => config_path = PathBuf::from(value),
            "--flavour" => match Flavour::parse(value) {
                Some(f) => flavour = Some(f),
                None => fail_usage(&format!("Unknown flavour '{}'", value)),
            },
            _ => fail_usage(&format!("Unknown option '{}'", flag)),
        }
    }

    let mut config = match ViewerConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            init_logging("warn");
            fail("Invalid configuration", &err);
        }
    };
    if let Some(flavour) = flavour {
        config.flavour = flavour;
    }
    init_logging(&config.log_level);

    PlayOptions {
        catalog: PathBuf::from(catalog),
        roster: PathBuf::from(roster),
        link,
        config,
    }
}

/// `RUST_LOG` wins over the configured level
fn init_logging(default_level: &str) {
    Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

fn print_usage() {
    println!("story-viewer - Story Script Viewer");
    println!();
    println!("USAGE:");
    println!("    story-viewer list <catalog.json> [roster.json]");
    println!("    story-viewer play <catalog.json> <roster.json> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list     Show events and their stories");
    println!("    play     Play stories in the terminal");
    println!("    --help, -h               Show this help message");
    println!();
    println!("OPTIONS:");
    println!("    --link <query>       Open a deep link, e.g. \"eventid=10&story=1042\"");
    println!("    --config <file>      Viewer configuration (default: {DEFAULT_CONFIG})");
    println!("    --flavour <name>     main, world or chat");
    println!();
    println!("EXAMPLES:");
    println!("    story-viewer list data/memories.json data/shipgirl_data.json");
    println!("    story-viewer play data/memories.json data/shipgirl_data.json --link \"eventid=10&story=1042\"");
}

fn fail_usage(message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!();
    print_usage();
    process::exit(1);
}

fn fail(context: &str, err: &dyn std::fmt::Display) -> ! {
    eprintln!("Error: {}", context);
    eprintln!("Reason: {}", err);
    process::exit(1);
}
