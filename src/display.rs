/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state. No game logic is performed; this module only scales world
/// coordinates onto the terminal cell grid and translates state into
/// terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::ai::AiStatus;
use crate::config::Config;
use crate::entities::{
    GameStatus, MessageKind, Owner, PowerUpKind, ProjectileKind,
};
use crate::state::GameState;

/// Rows reserved under the playfield for the console and the hint line.
const CONSOLE_ROWS: u16 = 5;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY_ROWS: [Color; 4] = [Color::Magenta, Color::Red, Color::Yellow, Color::Green];
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_PARTICLE: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Maps world coordinates onto the terminal play area.
struct Viewport {
    term_w: u16,
    term_h: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(cfg: &Config, term_w: u16, term_h: u16) -> Self {
        let play_h = term_h.saturating_sub(CONSOLE_ROWS + 3).max(4);
        Viewport {
            term_w,
            term_h,
            sx: (term_w.saturating_sub(2)) as f32 / cfg.world_w,
            sy: play_h as f32 / cfg.world_h,
        }
    }

    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let cx = 1 + (x * self.sx) as i32;
        let cy = 2 + (y * self.sy) as i32;
        (
            cx.clamp(1, self.term_w.saturating_sub(2) as i32) as u16,
            cy.clamp(2, (self.term_h.saturating_sub(CONSOLE_ROWS + 2)) as i32) as u16,
        )
    }

    fn play_bottom(&self) -> u16 {
        self.term_h.saturating_sub(CONSOLE_ROWS + 1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    cfg: &Config,
    ai_status: AiStatus,
) -> std::io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    let view = Viewport::new(cfg, term_w, term_h);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, state, ai_status, term_w)?;

    for enemy in state.enemies.iter().filter(|e| e.alive) {
        let (cx, cy) = view.cell(enemy.x + enemy.w / 2.0, enemy.y + enemy.h / 2.0);
        let glyph = enemy_glyph(enemy.row, enemy.phase);
        out.queue(style::SetForegroundColor(
            C_ENEMY_ROWS[enemy.row % C_ENEMY_ROWS.len()],
        ))?;
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print(glyph))?;
    }

    for proj in state.projectiles.iter().filter(|p| p.active) {
        let (cx, cy) = view.cell(proj.x + proj.w / 2.0, proj.y + proj.h / 2.0);
        let (glyph, color) = match (proj.owner, proj.kind) {
            (Owner::Enemy, _) => ("↓", C_BULLET_ENEMY),
            (Owner::Player, ProjectileKind::Laser) => ("┃", C_BULLET_PLAYER),
            (Owner::Player, ProjectileKind::Missile) => ("↟", Color::DarkCyan),
            (Owner::Player, ProjectileKind::Normal) => ("║", C_BULLET_PLAYER),
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print(glyph))?;
    }

    for pu in state.powerups.iter().filter(|p| p.active) {
        let (cx, cy) = view.cell(pu.x + pu.size / 2.0, pu.y + pu.size / 2.0);
        let (glyph, color) = powerup_glyph(pu.kind);
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print(glyph))?;
    }

    for particle in &state.particles {
        if particle.life <= 0.3 {
            continue; // too faint to draw
        }
        let (cx, cy) = view.cell(particle.x, particle.y);
        out.queue(style::SetForegroundColor(C_PARTICLE))?;
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print("·"))?;
    }

    draw_player(out, state, &view)?;
    draw_console(out, state, &view)?;
    draw_controls_hint(out, state, &view)?;

    match state.status {
        GameStatus::Paused => draw_overlay(
            out,
            &view,
            &[("║  PAUSED  ║", Color::Yellow), ("P - Resume", Color::White)],
        )?,
        GameStatus::LevelComplete => draw_overlay(
            out,
            &view,
            &[
                ("★ WAVE CLEARED ★", Color::Green),
                ("N - Next Wave", Color::White),
            ],
        )?,
        GameStatus::GameOver => {
            let score_line = format!("Final Score: {}", state.score);
            draw_overlay(
                out,
                &view,
                &[
                    ("╔══════════════════╗", Color::Red),
                    ("║    GAME  OVER    ║", Color::Red),
                    ("╚══════════════════╝", Color::Red),
                    (&score_line, Color::Yellow),
                    ("R - Play Again  Q - Quit", Color::White),
                ],
            )?;
        }
        _ => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.term_h.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn enemy_glyph(row: usize, phase: u8) -> &'static str {
    // Two-frame animation per row variant; row 0 is the top of the grid.
    match (row, phase % 2) {
        (0, 0) => "◆",
        (0, _) => "◇",
        (1, 0) => "▼",
        (1, _) => "▽",
        (2, 0) => "●",
        (2, _) => "○",
        (_, 0) => "■",
        (_, _) => "□",
    }
}

fn powerup_glyph(kind: PowerUpKind) -> (&'static str, Color) {
    match kind {
        PowerUpKind::Spread => ("≡", Color::Cyan),
        PowerUpKind::Laser => ("‡", Color::Red),
        PowerUpKind::Rapid => ("!", Color::Yellow),
        PowerUpKind::Missile => ("↯", Color::DarkCyan),
        PowerUpKind::Shield => ("◈", Color::Blue),
        PowerUpKind::ExtraLife => ("♥", Color::Magenta),
        PowerUpKind::Bomb => ("✹", Color::DarkRed),
        PowerUpKind::Bonus => ("$", Color::Green),
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.term_w as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    let bottom = view.play_bottom();
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.term_w.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    state: &GameState,
    ai_status: AiStatus,
    term_w: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score: {:>7}  Best: {:>7}",
        state.score, state.high_score
    )))?;

    let mid = format!("Wave {}  [{}]", state.level, state.player.weapon.label());
    let mx = (term_w / 2).saturating_sub(mid.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(mx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&mid))?;

    let (ai_glyph, ai_color) = match ai_status {
        AiStatus::Online => ("AI ●", Color::Green),
        AiStatus::Loading => ("AI ◌", Color::Yellow),
        AiStatus::Offline => ("AI ○", Color::DarkGrey),
    };
    let hearts: String = "♥".repeat(state.lives as usize);
    let right = format!("{}  Lives: {}", ai_glyph, hearts);
    let rx = term_w.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(ai_color))?;
    out.queue(Print(ai_glyph))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("  Lives: {}", hearts)))?;
    Ok(())
}

// ── Player ────────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let p = &state.player;
    let (cx, cy) = view.cell(p.x + p.w / 2.0, p.y);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(Print("▲"))?;
    if cx >= 2 {
        out.queue(cursor::MoveTo(cx - 1, cy + 1))?;
        out.queue(Print("/▀\\"))?;
    }
    Ok(())
}

// ── Console ───────────────────────────────────────────────────────────────────

fn message_style(kind: MessageKind) -> (&'static str, Color) {
    match kind {
        MessageKind::System => ("SYS", Color::DarkGrey),
        MessageKind::Commander => ("CMD", Color::Cyan),
        MessageKind::Hint => ("TIP", Color::Yellow),
        MessageKind::Briefing => ("BRF", Color::Green),
        MessageKind::Taunt => ("ENM", Color::Red),
    }
}

/// The last few console lines, newest at the bottom.
fn draw_console<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let first_row = view.play_bottom() + 1;
    let shown = (CONSOLE_ROWS - 1) as usize;
    let start = state.messages.len().saturating_sub(shown);
    for (i, msg) in state.messages.iter().skip(start).enumerate() {
        let (tag, color) = message_style(msg.kind);
        // Char-wise truncation: generated text may be multi-byte.
        let line: String = format!("[{tag}] {}", msg.text)
            .chars()
            .take(view.term_w.saturating_sub(2) as usize)
            .collect();
        out.queue(cursor::MoveTo(1, first_row + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    let hint = match state.status {
        GameStatus::LevelComplete => "N : Next Wave   Q : Quit",
        GameStatus::GameOver => "R : Restart   Q : Quit",
        _ => "← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, view.term_h.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Centered overlays ─────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    view: &Viewport,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = view.term_w / 2;
    let start_row = (view.play_bottom() / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
