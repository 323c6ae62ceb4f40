//! The single explicit state struct every component operates on.
//!
//! Nothing in the crate keeps ambient globals: the engine owns one
//! [`GameState`] and passes it (with an injected RNG) into each logic
//! call, so any scenario can be set up directly in a test.

use std::collections::VecDeque;

use crate::config::Config;
use crate::entities::{
    DisplayMessage, Enemy, GameStatus, MessageKind, Particle, Player, PowerUp, Projectile, Weapon,
};

#[derive(Clone, Debug)]
pub struct GameState {
    pub status: GameStatus,
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub level: u32,

    /// Frame at which the collected weapon reverts to the blaster.
    /// Re-arming simply overwrites this — only one expiry is ever pending.
    pub weapon_expires_at: Option<u64>,

    // Telemetry for the commander's performance commentary.
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub enemies_defeated: u32,

    pub last_taunt_frame: u64,
    pub last_comment_frame: u64,

    pub frame: u64,

    // Raw input intents; key-to-intent mapping is the host's business.
    pub intent_left: bool,
    pub intent_right: bool,

    /// Formation march direction: +1 right, -1 left.
    pub formation_dir: f32,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,

    /// Bounded scrolling console, newest at the back.
    pub messages: VecDeque<DisplayMessage>,
}

impl GameState {
    /// Build the initial state for a fresh run. The enemy grid is spawned
    /// immediately so a `Start → Running` transition has a level waiting.
    pub fn new(cfg: &Config, high_score: u32) -> Self {
        let mut state = GameState {
            status: GameStatus::Start,
            score: 0,
            high_score,
            lives: cfg.starting_lives,
            level: 1,
            weapon_expires_at: None,
            shots_fired: 0,
            shots_hit: 0,
            enemies_defeated: 0,
            last_taunt_frame: 0,
            last_comment_frame: 0,
            frame: 0,
            intent_left: false,
            intent_right: false,
            formation_dir: 1.0,
            player: Player {
                x: (cfg.world_w - cfg.player_w) / 2.0,
                y: cfg.world_h - cfg.player_h * 3.0,
                w: cfg.player_w,
                h: cfg.player_h,
                speed: cfg.player_speed,
                weapon: Weapon::Basic,
                can_fire: true,
                cooldown_until: 0,
            },
            enemies: Vec::new(),
            projectiles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            messages: VecDeque::new(),
        };
        state.spawn_grid(cfg);
        state
    }

    /// Populate the full rows × cols enemy grid for the current level.
    pub fn spawn_grid(&mut self, cfg: &Config) {
        self.enemies.clear();
        self.enemies.reserve(cfg.grid_rows * cfg.grid_cols);
        for row in 0..cfg.grid_rows {
            for col in 0..cfg.grid_cols {
                self.enemies.push(Enemy {
                    x: cfg.grid_origin_x + col as f32 * cfg.grid_spacing_x,
                    y: cfg.grid_origin_y + row as f32 * cfg.grid_spacing_y,
                    w: cfg.enemy_w,
                    h: cfg.enemy_h,
                    row,
                    alive: true,
                    phase: 0,
                });
            }
        }
        self.formation_dir = 1.0;
    }

    /// Clear the transient populations and rebuild the grid — the
    /// level-complete → next-level transition.
    pub fn begin_level(&mut self, cfg: &Config) {
        self.projectiles.clear();
        self.powerups.clear();
        self.particles.clear();
        self.spawn_grid(cfg);
        self.player.x = (cfg.world_w - cfg.player_w) / 2.0;
    }

    /// Full restart: everything back to a fresh run except the resident
    /// high score.
    pub fn reset(&mut self, cfg: &Config) {
        let high = self.high_score;
        *self = GameState::new(cfg, high);
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// Shot accuracy in [0, 1]; 0 before the first shot.
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            0.0
        } else {
            self.shots_hit as f32 / self.shots_fired as f32
        }
    }

    /// Append a console line, dropping the oldest once the cap is hit.
    pub fn push_message(&mut self, cfg: &Config, kind: MessageKind, text: impl Into<String>) {
        if self.messages.len() >= cfg.message_cap {
            self.messages.pop_front();
        }
        self.messages.push_back(DisplayMessage {
            frame: self.frame,
            kind,
            text: text.into(),
        });
    }
}
