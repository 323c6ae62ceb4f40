//! Power-up selection and pickup effects.
//!
//! Selection is a weighted draw over the eight kinds. The table order
//! matches the `PowerUpKind` enumeration order and is the tie-break
//! order for the first-match subtraction walk.

use rand::Rng;

use crate::combat;
use crate::config::Config;
use crate::entities::{MessageKind, PowerUp, PowerUpKind, Weapon};
use crate::state::GameState;

/// Relative spawn weights, summing to 100. Weapons and the score cache
/// are common; lives and the bomb are rare.
pub const WEIGHTS: [(PowerUpKind, u32); 8] = [
    (PowerUpKind::Spread, 20),
    (PowerUpKind::Laser, 15),
    (PowerUpKind::Rapid, 20),
    (PowerUpKind::Missile, 15),
    (PowerUpKind::Shield, 10),
    (PowerUpKind::ExtraLife, 5),
    (PowerUpKind::Bomb, 5),
    (PowerUpKind::Bonus, 10),
];

/// Weighted draw: uniform roll in [0, total), then walk the table
/// subtracting weights until the roll goes negative.
pub fn choose_kind(rng: &mut impl Rng) -> PowerUpKind {
    let total: u32 = WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total) as i64;
    for (kind, weight) in WEIGHTS {
        roll -= weight as i64;
        if roll < 0 {
            return kind;
        }
    }
    // Unreachable while the weights sum to `total`; the last kind is the
    // correct first-match answer if they ever drift.
    WEIGHTS[WEIGHTS.len() - 1].0
}

/// Drop a freshly drawn power-up at a kill site. Returns the kind so the
/// orchestrator can fire a hint request for it.
pub fn spawn(state: &mut GameState, cfg: &Config, rng: &mut impl Rng, x: f32, y: f32) -> PowerUpKind {
    let kind = choose_kind(rng);
    state.powerups.push(PowerUp {
        x: x - cfg.powerup_size / 2.0,
        y,
        vy: cfg.powerup_fall_speed,
        size: cfg.powerup_size,
        kind,
        active: true,
        rotation: 0.0,
    });
    kind
}

fn equip(state: &mut GameState, cfg: &Config, weapon: Weapon) {
    state.player.weapon = weapon;
    // One expiry outstanding at most: re-arming overwrites the old frame.
    state.weapon_expires_at = Some(state.frame + cfg.frames(cfg.weapon_duration_ms));
}

/// Apply a collected power-up.
///
/// Every pickup also awards the flat pickup bonus and refreshes the high
/// score. Bomb kills award full kill score but never roll chained
/// power-up drops.
pub fn apply(state: &mut GameState, cfg: &Config, rng: &mut impl Rng, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Spread => equip(state, cfg, Weapon::Spread),
        PowerUpKind::Laser => equip(state, cfg, Weapon::Laser),
        PowerUpKind::Rapid => equip(state, cfg, Weapon::Rapid),
        PowerUpKind::Missile => equip(state, cfg, Weapon::Missile),
        PowerUpKind::Shield => {
            state.lives = (state.lives + 1).min(cfg.max_lives);
        }
        PowerUpKind::ExtraLife => {
            state.lives = (state.lives + 2).min(cfg.max_lives);
        }
        PowerUpKind::Bomb => detonate(state, cfg, rng),
        PowerUpKind::Bonus => {
            state.score += rng.gen_range(cfg.bonus_min..cfg.bonus_max);
        }
    }

    state.score += cfg.pickup_bonus;
    state.high_score = state.high_score.max(state.score);
    state.push_message(
        cfg,
        MessageKind::System,
        format!("Collected: {}", kind.label()),
    );
}

/// The bomb: every alive enemy dies this tick, with kill score for each.
fn detonate(state: &mut GameState, cfg: &Config, rng: &mut impl Rng) {
    let mut sites = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.alive = false;
        sites.push((enemy.x + enemy.w / 2.0, enemy.y + enemy.h / 2.0));
    }
    state.score += sites.len() as u32 * cfg.enemy_kill_score * state.level;
    state.enemies_defeated += sites.len() as u32;
    for (x, y) in sites {
        combat::spawn_burst(state, rng, x, y, cfg.kill_burst);
    }
}
