//! Runtime-tunable game configuration.
//!
//! [`Config::default`] holds the authoritative compiled values; an optional
//! TOML file (path from `STAR_INVADERS_CONFIG`, else `star_invaders.toml`
//! in the working directory) overrides any subset of them. Missing keys
//! fall back to the defaults, so a minimal file can tune just the values
//! you care about. A malformed file is logged and ignored wholesale.
//!
//! All simulation speeds are distances per frame in world units; every
//! duration is kept in milliseconds and converted to whole frames with
//! [`Config::frames`] so expiry checks stay deterministic under test.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // ── Playfield ────────────────────────────────────────────────────────────
    pub world_w: f32,
    pub world_h: f32,
    /// Host frame cadence; also the ms→frame conversion base.
    pub frame_ms: u64,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_w: f32,
    pub player_h: f32,
    pub player_speed: f32,
    pub starting_lives: u32,
    pub max_lives: u32,

    // ── Enemy formation ──────────────────────────────────────────────────────
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub enemy_w: f32,
    pub enemy_h: f32,
    pub grid_origin_x: f32,
    pub grid_origin_y: f32,
    pub grid_spacing_x: f32,
    pub grid_spacing_y: f32,
    pub enemy_speed_x: f32,
    pub enemy_drop: f32,
    /// Per-level fraction added to the formation's horizontal speed.
    pub speed_increase: f32,
    /// Per-enemy per-frame fire probability at level 1.
    pub enemy_fire_chance: f64,
    pub enemy_fire_chance_cap: f64,
    pub enemy_shot_speed: f32,
    /// An alive enemy descending within this margin of the player row
    /// loses the game.
    pub loss_margin: f32,
    pub enemy_kill_score: u32,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub shot_speed: f32,
    pub rapid_shot_speed: f32,
    pub laser_shot_speed: f32,
    pub missile_shot_speed: f32,
    /// Horizontal drift of the two side shots of a spread volley.
    pub spread_drift: f32,
    /// Max horizontal correction a homing missile applies per frame.
    pub missile_homing_step: f32,

    // ── Weapon cooldowns & expiry (ms) ───────────────────────────────────────
    pub cooldown_basic_ms: u64,
    pub cooldown_spread_ms: u64,
    pub cooldown_laser_ms: u64,
    pub cooldown_rapid_ms: u64,
    pub cooldown_missile_ms: u64,
    /// How long a collected weapon lasts before reverting to the blaster.
    pub weapon_duration_ms: u64,

    // ── Power-ups ────────────────────────────────────────────────────────────
    pub powerup_drop_chance: f64,
    pub powerup_fall_speed: f32,
    pub powerup_size: f32,
    pub pickup_bonus: u32,
    pub bonus_min: u32,
    pub bonus_max: u32,

    // ── Particles ────────────────────────────────────────────────────────────
    pub kill_burst: usize,
    pub hit_burst: usize,

    // ── Console ──────────────────────────────────────────────────────────────
    pub message_cap: usize,

    // ── AI commander ─────────────────────────────────────────────────────────
    /// Backend address; empty string disables the commander entirely.
    pub ai_addr: String,
    pub ai_health_timeout_ms: u64,
    pub ai_request_timeout_ms: u64,
    pub ai_cache_capacity: usize,
    pub ai_cache_ttl_ms: u64,
    pub taunt_interval_ms: u64,
    pub comment_interval_ms: u64,

    // ── Persistence ──────────────────────────────────────────────────────────
    /// Leaderboard file; empty string means the default under `$HOME`.
    pub leaderboard_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            world_w: 800.0,
            world_h: 600.0,
            frame_ms: 33,

            player_w: 40.0,
            player_h: 20.0,
            player_speed: 5.0,
            starting_lives: 5,
            max_lives: 9,

            grid_rows: 4,
            grid_cols: 8,
            enemy_w: 30.0,
            enemy_h: 20.0,
            grid_origin_x: 60.0,
            grid_origin_y: 60.0,
            grid_spacing_x: 50.0,
            grid_spacing_y: 40.0,
            enemy_speed_x: 1.0,
            enemy_drop: 20.0,
            speed_increase: 0.2,
            enemy_fire_chance: 0.0008,
            enemy_fire_chance_cap: 0.006,
            enemy_shot_speed: 4.0,
            loss_margin: 40.0,
            enemy_kill_score: 10,

            shot_speed: 7.0,
            rapid_shot_speed: 9.0,
            laser_shot_speed: 12.0,
            missile_shot_speed: 3.0,
            spread_drift: 2.0,
            missile_homing_step: 2.0,

            cooldown_basic_ms: 250,
            cooldown_spread_ms: 400,
            cooldown_laser_ms: 350,
            cooldown_rapid_ms: 100,
            cooldown_missile_ms: 500,
            weapon_duration_ms: 8000,

            powerup_drop_chance: 0.15,
            powerup_fall_speed: 2.0,
            powerup_size: 24.0,
            pickup_bonus: 50,
            bonus_min: 250,
            bonus_max: 750,

            kill_burst: 12,
            hit_burst: 8,

            message_cap: 50,

            ai_addr: "127.0.0.1:3000".to_string(),
            ai_health_timeout_ms: 2000,
            ai_request_timeout_ms: 10_000,
            ai_cache_capacity: 50,
            ai_cache_ttl_ms: 300_000,
            taunt_interval_ms: 20_000,
            comment_interval_ms: 45_000,

            leaderboard_path: String::new(),
        }
    }
}

impl Config {
    /// Convert a millisecond duration to a whole number of frames,
    /// rounding up so short cooldowns never collapse to zero.
    pub fn frames(&self, ms: u64) -> u64 {
        ms.div_ceil(self.frame_ms.max(1))
    }

    /// Load a TOML override file on top of the defaults. Returns the
    /// defaults when the file is absent or unreadable.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(_) => return Config::default(),
        };
        match toml::from_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                Config::default()
            }
        }
    }

    /// Resolve the config path from the environment and load it.
    pub fn load_from_env() -> Self {
        let path = std::env::var("STAR_INVADERS_CONFIG")
            .unwrap_or_else(|_| "star_invaders.toml".to_string());
        Self::load(Path::new(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_rounds_up() {
        let cfg = Config::default(); // 33 ms frames
        assert_eq!(cfg.frames(33), 1);
        assert_eq!(cfg.frames(34), 2);
        assert_eq!(cfg.frames(250), 8);
        assert_eq!(cfg.frames(0), 0);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = Config::load(Path::new("/definitely/not/here.toml"));
        assert_eq!(cfg.grid_rows, Config::default().grid_rows);
    }
}
