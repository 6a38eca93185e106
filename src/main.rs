mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use alien_invaders::config::Config;
use alien_invaders::driver::Driver;
use alien_invaders::input::KeyState;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Frames a key stays down after its last press or repeat event.  Terminals
/// without release events rely on auto-repeat to keep a key alive, and
/// repeats arrive well inside four frames.
const HOLD_WINDOW: u64 = 4;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    })
}

/// Snapshot the keys the game cares about, plus how many keys are live in
/// total (the driver's start edge needs a frame with nothing held).
fn key_state(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> KeyState {
    let key_count = key_frame
        .values()
        .filter(|&&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .count();
    KeyState {
        left: is_held(
            key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        ),
        right: is_held(
            key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        ),
        fire: is_held(key_frame, &[KeyCode::Char(' '), KeyCode::Up], frame),
        start: is_held(key_frame, &[KeyCode::Char('s'), KeyCode::Char('S')], frame),
        key_count,
    }
}

fn invalid_input(err: impl std::error::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Key events only refresh `key_frame`; the driver sees one `KeyState` per
/// frame built from whatever is still inside the hold window.
fn game_loop<W: Write>(
    out: &mut W,
    driver: &mut Driver,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();

    // key → frame of its last press or repeat
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // Drain input without blocking.
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }
        key_frame.retain(|_, &mut last| frame.saturating_sub(last) <= HOLD_WINDOW);

        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        let keys = key_state(&key_frame, frame);
        driver.update(&keys, dt, &mut rng).map_err(invalid_input)?;

        let (width, height) = terminal::size()?;
        display::render(out, driver, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    // Logs go to stderr; redirect it (2>invaders.log) to keep the screen clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).map_err(invalid_input)?,
        None => Config::default(),
    };
    log::info!(
        "arena {}x{}, {}x{} aliens",
        config.arena_width,
        config.arena_height,
        config.alien_rows,
        config.aliens_in_row
    );

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal supports them; the hold window
    // covers the rest.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(err) => {
                log::error!("input thread stopped: {err}");
                break;
            }
        }
    });

    let mut driver = Driver::new(config);
    let result = game_loop(&mut out, &mut driver, &rx);
    log::info!("session over, best score {}", driver.best_score());

    // Restore the terminal even when the loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
