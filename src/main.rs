//! Mini Arcade headless runner
//!
//! Plays the registered games on autopilot at a fixed frame rate and reports
//! every finished session.
//!
//! Usage:
//!   mini-arcade --list
//!   mini-arcade --game tap-tiles --seconds 120 --seed 7
//!   RUST_LOG=debug mini-arcade --json

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use mini_arcade::arcade::SessionRecord;
use mini_arcade::consts::FRAME_MS;
use mini_arcade::sim::{Phase, RestartPolicy};
use mini_arcade::{Arcade, GameRegistry, InputEvent, Settings};

#[derive(Parser)]
#[command(name = "mini-arcade")]
#[command(about = "Run the arcade mini-games headless on autopilot")]
struct Args {
    /// Game to run (all games when omitted)
    #[arg(long)]
    game: Option<String>,

    /// List registered games and exit
    #[arg(long)]
    list: bool,

    /// Arcade seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds per game
    #[arg(long, default_value_t = 60)]
    seconds: u64,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunSummary {
    game: &'static str,
    simulated_ms: u64,
    restarts: u32,
    sessions: Vec<SessionRecord>,
    /// Score of the session still running at the end
    live_score: u32,
}

fn run_game(arcade: &mut Arcade, id: &str, seconds: u64) -> Result<RunSummary> {
    arcade
        .start(id)
        .with_context(|| format!("Failed to start '{id}'"))?;
    let already = arcade.completed().len();
    let tap_restart = arcade.settings().restart == RestartPolicy::OnTap;
    let center = Vec2::new(
        arcade.settings().play_area.width / 2.0,
        arcade.settings().play_area.height / 2.0,
    );

    let frames = seconds * 1000 / FRAME_MS;
    let restarts_before = arcade.restarts();
    for _ in 0..frames {
        let input = arcade.game().and_then(|game| match game.session().phase() {
            Phase::Active => game.demo_input(),
            Phase::Ending if tap_restart => Some(InputEvent::PointerDown(center)),
            _ => None,
        });
        if let Some(input) = input {
            arcade.input(input);
        }
        arcade.tick(FRAME_MS);
    }

    let game = arcade
        .game()
        .with_context(|| format!("'{id}' is no longer running"))?;
    let summary = RunSummary {
        game: game.id(),
        simulated_ms: frames * FRAME_MS,
        restarts: arcade.restarts() - restarts_before,
        sessions: arcade.completed()[already..].to_vec(),
        live_score: game.session().score(),
    };
    arcade.stop();
    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let registry = GameRegistry::with_builtin_games();
    if args.list {
        for id in registry.ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    settings.validate().context("Invalid settings")?;

    let ids: Vec<String> = match args.game {
        Some(id) if !registry.contains(&id) => bail!("Unknown game '{id}', try --list"),
        Some(id) => vec![id],
        None => registry.ids().map(str::to_string).collect(),
    };

    let mut arcade = Arcade::new(registry, settings, args.seed);
    log::info!("Mini Arcade starting with seed {}", args.seed);

    let mut summaries = Vec::with_capacity(ids.len());
    for id in &ids {
        summaries.push(run_game(&mut arcade, id, args.seconds)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in &summaries {
        println!("=== {} ({:.0}s) ===", summary.game, summary.simulated_ms as f64 / 1000.0);
        for (i, record) in summary.sessions.iter().enumerate() {
            println!(
                "  #{:<3} score {:>5}  {:?} at {:.1}s",
                i + 1,
                record.score,
                record.reason,
                record.ended_at_ms as f64 / 1000.0
            );
        }
        println!(
            "  restarts: {}, live score: {}",
            summary.restarts, summary.live_score
        );
    }
    Ok(())
}
