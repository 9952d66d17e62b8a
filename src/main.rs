//! Box Arcade entry point
//!
//! Runs a short scripted, headless demo of each of the three games. The
//! simulation is backend-agnostic; wiring in a real window/renderer means
//! implementing `RenderSurface`, `VisualStore` and `InputSource` for it and
//! reusing this loop shape.

use std::thread::sleep;
use std::time::Duration;

use box_arcade::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use box_arcade::platform::{
    HeadlessSurface, HeadlessVisuals, InputEvent, Key, ScriptedInput,
};
use box_arcade::sim::halfpong::HalfPong;
use box_arcade::sim::maze::Maze;
use box_arcade::sim::platformer::Platformer;
use box_arcade::sim::{Dimension, LevelCatalog};
use box_arcade::{ArcadeError, HighScoreFile};

const DEMO_FRAMES: u32 = 120;
const FRAME_MS: u64 = 8;

fn key_tap(key: Key) -> [InputEvent; 2] {
    [
        InputEvent::KeyDown { key, repeat: false },
        InputEvent::KeyUp { key, repeat: false },
    ]
}

fn demo_halfpong(window: Dimension) {
    let mut visuals = HeadlessVisuals::new();
    let mut surface = HeadlessSurface::new(window.w, window.h);
    let mut input = ScriptedInput::new();
    let store = HighScoreFile::new(std::env::temp_dir().join("box_arcade_highscore.dat"));
    let mut game = HalfPong::new(window, &mut visuals, store);

    // Chase the ball upward for a while, then drift back down
    input.push(InputEvent::KeyDown {
        key: Key::Up,
        repeat: false,
    });
    for frame in 0..DEMO_FRAMES {
        if frame == 40 {
            input.extend(key_tap(Key::Down));
            input.push(InputEvent::KeyUp {
                key: Key::Up,
                repeat: false,
            });
        }
        game.poll_input(&mut input);
        game.advance();
        game.render(&mut surface);
        if game.quit {
            break;
        }
        sleep(Duration::from_millis(FRAME_MS));
    }
    log::info!(
        "half-pong demo done: score {}, lives {}, high score {}",
        game.score,
        game.lives,
        game.high_score
    );
}

fn demo_maze(window: Dimension) -> Result<(), ArcadeError> {
    let mut visuals = HeadlessVisuals::new();
    let mut surface = HeadlessSurface::new(window.w, window.h);
    let mut input = ScriptedInput::new();
    let mut game = Maze::new(window, LevelCatalog::maze_levels(), &mut visuals)?;

    // A few nudges toward the level center
    input.extend(key_tap(Key::Left));
    input.extend(key_tap(Key::Up));
    for frame in 0..DEMO_FRAMES {
        if frame == 30 {
            input.extend(key_tap(Key::Left));
        }
        game.poll_input(&mut input);
        game.advance(&mut visuals)?;
        game.render(&mut surface);
        if game.quit {
            break;
        }
        sleep(Duration::from_millis(FRAME_MS));
    }
    log::info!(
        "maze demo done: level {}, ball at ({}, {})",
        game.level.number,
        game.ball.ent.pixel.x,
        game.ball.ent.pixel.y
    );
    Ok(())
}

fn demo_platformer(window: Dimension) -> Result<(), ArcadeError> {
    let mut visuals = HeadlessVisuals::new();
    let mut surface = HeadlessSurface::new(window.w, window.h);
    let mut input = ScriptedInput::new();
    let mut game = Platformer::new(window, LevelCatalog::platformer_levels(), &mut visuals)?;

    // Run left off the spawn, jump once grounded
    input.push(InputEvent::KeyDown {
        key: Key::Left,
        repeat: false,
    });
    for frame in 0..DEMO_FRAMES {
        if frame == 60 && game.player.on_surface {
            input.extend(key_tap(Key::Up));
        }
        game.poll_input(&mut input);
        game.advance(&mut visuals)?;
        game.render(&mut surface);
        if game.quit {
            break;
        }
        sleep(Duration::from_millis(FRAME_MS));
    }
    log::info!(
        "platformer demo done: level {}, exited: {}",
        game.level.number,
        game.player.exited
    );
    Ok(())
}

fn run() -> Result<(), ArcadeError> {
    let window = Dimension::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    demo_halfpong(window);
    demo_maze(window)?;
    demo_platformer(window)?;
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("box-arcade: {err}");
        std::process::exit(1);
    }
}
