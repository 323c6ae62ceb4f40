use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use star_invaders::ai::backend::HttpBackend;
use star_invaders::ai::client::AiClient;
use star_invaders::ai::AiStatus;
use star_invaders::config::Config;
use star_invaders::display;
use star_invaders::engine::Engine;
use star_invaders::entities::{Direction, GameStatus};
use star_invaders::leaderboard::{self, Leaderboard, ScoreEntry};

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Start screen ──────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
    ai_status: impl Fn() -> AiStatus,
) -> std::io::Result<MenuResult> {
    // Redrawn on a short timeout so the AI status line updates while the
    // backend probe is still in flight.
    loop {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let cy = height / 2;

        let title = "★  STAR  INVADERS  ★";
        out.queue(cursor::MoveTo(
            cx.saturating_sub(title.chars().count() as u16 / 2),
            cy.saturating_sub(8),
        ))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(title))?;

        if high_score > 0 {
            let hs_str = format!("Best Score: {}", high_score);
            out.queue(cursor::MoveTo(
                cx.saturating_sub(hs_str.chars().count() as u16 / 2),
                cy.saturating_sub(6),
            ))?;
            out.queue(style::SetForegroundColor(Color::Yellow))?;
            out.queue(Print(&hs_str))?;
        }

        let (ai_line, ai_color) = match ai_status() {
            AiStatus::Loading => ("AI commander: contacting...", Color::Yellow),
            AiStatus::Online => ("AI commander: online", Color::Green),
            AiStatus::Offline => ("AI commander: offline (canned lines)", Color::DarkGrey),
        };
        out.queue(cursor::MoveTo(
            cx.saturating_sub(ai_line.chars().count() as u16 / 2),
            cy.saturating_sub(5),
        ))?;
        out.queue(style::SetForegroundColor(ai_color))?;
        out.queue(Print(ai_line))?;

        // Power-up legend
        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("Power-ups (catch falling items):"))?;

        let legend: &[(&str, Color, &str)] = &[
            ("≡", Color::Cyan, " Spread    — three lanes of fire"),
            ("‡", Color::Red, " Laser     — fast, wide, deadly"),
            ("!", Color::Yellow, " Rapid     — short cooldown"),
            ("↯", Color::DarkCyan, " Missiles  — homing shots"),
            ("◈", Color::Blue, " Shield    — +1 life"),
            ("♥", Color::Magenta, " ExtraLife — +2 lives"),
            ("✹", Color::DarkRed, " Bomb      — clears the wave"),
            ("$", Color::Green, " Bonus     — instant points"),
        ];
        for (i, (sym, color, desc)) in legend.iter().enumerate() {
            let row = cy.saturating_sub(2) + i as u16;
            out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
            out.queue(style::SetForegroundColor(*color))?;
            out.queue(Print(sym))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(*desc))?;
        }

        out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 8))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print("ENTER / SPACE : Launch    Q : Quit"))?;

        out.queue(style::ResetColor)?;
        out.flush()?;

        match rx.recv_timeout(Duration::from_millis(250)) {
            Ok(Event::Key(KeyEvent { code, kind, .. })) if kind != KeyEventKind::Release => {
                match code {
                    KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key; each frame the keys still "fresh"
/// (within `HOLD_WINDOW`) drive the engine's intents, so move and fire can
/// be held at the same time with no interference. Works both on terminals
/// with keyboard-enhancement events and on classic press-repeat terminals.
fn game_loop<W: Write>(
    out: &mut W,
    engine: &mut Engine<StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let frame_time = Duration::from_millis(engine.cfg.frame_ms);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    engine.start();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            return Ok(true);
                        }
                        KeyCode::Esc => {
                            return Ok(false); // back to the menu
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => engine.request_pause(),
                        KeyCode::Char('n') | KeyCode::Char('N') => engine.next_level(),
                        KeyCode::Char('r') | KeyCode::Char('R') => engine.restart(),
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

        // ── Map held keys onto engine intents ─────────────────────────────────
        let left = is_held(&key_frame, &KeyCode::Left, frame)
            || is_held(&key_frame, &KeyCode::Char('a'), frame)
            || is_held(&key_frame, &KeyCode::Char('A'), frame);
        let right = is_held(&key_frame, &KeyCode::Right, frame)
            || is_held(&key_frame, &KeyCode::Char('d'), frame)
            || is_held(&key_frame, &KeyCode::Char('D'), frame);
        engine.set_intent(Direction::Left, left);
        engine.set_intent(Direction::Right, right);
        if is_held(&key_frame, &KeyCode::Char(' '), frame) {
            engine.request_fire(); // the weapon cooldown throttles the rate
        }

        engine.frame();
        display::render(out, &engine.state, &engine.cfg, engine.ai.status())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    // Diagnostics go to stderr and stay silent unless RUST_LOG asks;
    // stdout belongs to the game.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cfg = Config::load_from_env();

    let board_path = if cfg.leaderboard_path.is_empty() {
        leaderboard::default_path()
    } else {
        PathBuf::from(&cfg.leaderboard_path)
    };
    let mut board = Leaderboard::load(board_path);

    let ai = if cfg.ai_addr.is_empty() {
        AiClient::disabled()
    } else {
        let backend = HttpBackend::new(
            cfg.ai_addr.clone(),
            Duration::from_millis(cfg.ai_health_timeout_ms),
            Duration::from_millis(cfg.ai_request_timeout_ms),
        );
        AiClient::connect(
            Box::new(backend),
            cfg.ai_cache_capacity,
            Duration::from_millis(cfg.ai_cache_ttl_ms),
        )
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, cfg, ai, &mut board);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cfg: Config,
    ai: AiClient,
    board: &mut Leaderboard,
) -> std::io::Result<()> {
    let mut engine = Engine::new(cfg, ai, StdRng::from_entropy(), board.high_score());
    let pilot = std::env::var("USER").unwrap_or_else(|_| "pilot".to_string());

    loop {
        match show_menu(out, rx, board.high_score(), || engine.ai.status())? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let quit = game_loop(out, &mut engine, rx)?;

                // A finished run goes on the board; an escaped-out run can
                // be resumed from the menu instead.
                if engine.state.status == GameStatus::GameOver {
                    if engine.state.score > 0 {
                        board.record(ScoreEntry {
                            name: pilot.clone(),
                            score: engine.state.score,
                            level: engine.state.level,
                        });
                    }
                    engine.restart();
                }

                if quit {
                    break;
                }
            }
        }
    }
    Ok(())
}
