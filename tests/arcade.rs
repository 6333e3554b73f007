//! Arcade lifecycle: start, end, restart by re-creation

use mini_arcade::consts::*;
use mini_arcade::sim::{EndReason, Phase};
use mini_arcade::{Arcade, GameRegistry, InputEvent, Settings};

fn arcade(settings: Settings) -> Arcade {
    Arcade::new(GameRegistry::with_builtin_games(), settings, 2024)
}

fn run(arcade: &mut Arcade, ms: u64, autoplay: bool) {
    for _ in 0..ms / FRAME_MS {
        if autoplay {
            let input = arcade
                .game()
                .filter(|g| g.session().is_active())
                .and_then(|g| g.demo_input());
            if let Some(input) = input {
                arcade.input(input);
            }
        }
        arcade.tick(FRAME_MS);
    }
}

#[test]
fn unattended_catcher_loses_and_restarts() {
    let mut arcade = arcade(Settings::default());
    arcade.start("ball-catcher").unwrap();
    run(&mut arcade, 60_000, false);

    let completed = arcade.completed();
    assert!(!completed.is_empty());
    for record in completed {
        assert_eq!(record.game, "ball-catcher");
        assert_eq!(record.reason, EndReason::OutOfLives);
    }
    assert!(arcade.restarts() >= 1);
    // Seeds differ between instances
    if completed.len() >= 2 {
        assert_ne!(completed[0].seed, completed[1].seed);
    }
}

#[test]
fn every_game_survives_autoplay() {
    let ids: Vec<&'static str> = GameRegistry::with_builtin_games().ids().collect();
    let mut arcade = arcade(Settings::default());
    for id in ids {
        arcade.start(id).unwrap();
        run(&mut arcade, 30_000, true);
        let game = arcade.game().unwrap();
        assert_eq!(game.id(), id);
        assert!(!game.hud().is_empty());
        assert!(game.hud()[0].starts_with("Score: "));
    }
}

#[test]
fn tile_memory_wrong_tap_ends_with_round_score() {
    let mut arcade = arcade(Settings::default());
    arcade.start("tap-tiles").unwrap();

    // Clear two rounds on autopilot
    let mut frames = 0;
    while arcade.game().unwrap().session().score() < 2 && frames < 2000 {
        run(&mut arcade, FRAME_MS, true);
        frames += 1;
    }
    assert_eq!(arcade.game().unwrap().session().score(), 2);

    // Wait for input to reopen on round three, then tap the wrong tile
    let expected = loop {
        run(&mut arcade, FRAME_MS, false);
        if let Some(InputEvent::Button(tile)) = arcade.game().unwrap().demo_input() {
            break tile;
        }
    };
    arcade.input(InputEvent::Button((expected + 1) % TILE_COUNT));

    let game = arcade.game().unwrap();
    assert_eq!(game.session().phase(), Phase::Ending);
    assert_eq!(game.overlay().unwrap(), "GAME OVER\n\nScore: 2");
    assert_eq!(arcade.completed().len(), 1);
    assert_eq!(arcade.completed()[0].score, 2);
}

#[test]
fn restart_delay_from_settings() {
    let settings = Settings::from_json(
        r#"{ "restart": { "mode": "after_delay", "delay_ms": 500 } }"#,
    )
    .unwrap();
    let mut arcade = arcade(settings);
    arcade.start("number-clicker").unwrap();
    arcade.input(InputEvent::Button(3));
    assert_eq!(arcade.completed().len(), 1);

    arcade.tick(499);
    assert_eq!(arcade.restarts(), 0);
    arcade.tick(1);
    assert_eq!(arcade.restarts(), 1);
    assert!(arcade.game().unwrap().session().is_active());
}

#[test]
fn countdown_game_times_out_then_restarts() {
    let mut arcade = arcade(Settings::default());
    arcade.start("quick-tap").unwrap();
    run(&mut arcade, u64::from(QUICK_TAP_SECONDS) * SECOND_MS + FRAME_MS, true);

    assert_eq!(arcade.completed().len(), 1);
    let record = &arcade.completed()[0];
    assert_eq!(record.reason, EndReason::TimeUp);
    assert!(record.score > 0);

    run(&mut arcade, RESTART_DELAY_MS + FRAME_MS, false);
    assert_eq!(arcade.restarts(), 1);
    let session = arcade.game().unwrap().session();
    assert_eq!(session.score(), 0);
    assert_eq!(session.counter(), QUICK_TAP_SECONDS);
}
