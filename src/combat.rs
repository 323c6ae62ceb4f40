//! Cross-population collision resolution, scoring and the cleanup pass.
//!
//! All pairs are examined once per tick against the pre-cleanup view of
//! every population; inactive entities are only dropped afterwards in
//! [`cleanup`], so collisions and drawing see a consistent snapshot.

use rand::Rng;

use crate::config::Config;
use crate::entities::{MessageKind, Owner, Particle, PowerUpKind};
use crate::geometry::overlaps;
use crate::powerup;
use crate::state::GameState;

/// What the resolver observed this tick, for the orchestrator to react to.
#[derive(Clone, Debug, Default)]
pub struct CombatEvents {
    /// Kinds of power-ups dropped by kills this tick.
    pub powerups_spawned: Vec<PowerUpKind>,
    /// Kinds of power-ups the player collected this tick.
    pub powerups_collected: Vec<PowerUpKind>,
    pub player_hit: bool,
}

/// Resolve every projectile/enemy, projectile/player and player/power-up
/// overlap for this tick.
pub fn resolve(state: &mut GameState, cfg: &Config, rng: &mut impl Rng) -> CombatEvents {
    let mut events = CombatEvents::default();

    // ── Player projectiles ↔ enemies ─────────────────────────────────────────
    // Pair up hits first so each projectile spends itself on at most one
    // enemy and each enemy dies to at most one projectile this tick.
    let mut kills: Vec<(usize, usize)> = Vec::new();
    for (pi, proj) in state.projectiles.iter().enumerate() {
        if !proj.active || proj.owner != Owner::Player {
            continue;
        }
        for (ei, enemy) in state.enemies.iter().enumerate() {
            if !enemy.alive || kills.iter().any(|&(_, k)| k == ei) {
                continue;
            }
            if overlaps(&proj.rect(), &enemy.rect()) {
                kills.push((pi, ei));
                break;
            }
        }
    }

    for (pi, ei) in kills {
        state.projectiles[pi].active = false;
        state.enemies[ei].alive = false;
        state.score += cfg.enemy_kill_score * state.level;
        state.shots_hit += 1;
        state.enemies_defeated += 1;

        let (cx, cy) = {
            let e = &state.enemies[ei];
            (e.x + e.w / 2.0, e.y + e.h / 2.0)
        };
        spawn_burst(state, rng, cx, cy, cfg.kill_burst);
        if rng.gen_bool(cfg.powerup_drop_chance) {
            let kind = powerup::spawn(state, cfg, rng, cx, cy);
            events.powerups_spawned.push(kind);
        }
    }

    // ── Enemy projectiles ↔ player ───────────────────────────────────────────
    let player_rect = state.player.rect();
    let mut hits = 0u32;
    for proj in &mut state.projectiles {
        if proj.active && proj.owner == Owner::Enemy && overlaps(&proj.rect(), &player_rect) {
            proj.active = false;
            hits += 1;
        }
    }
    if hits > 0 {
        events.player_hit = true;
        state.lives = state.lives.saturating_sub(hits);
        let (cx, cy) = (player_rect.center_x(), player_rect.center_y());
        spawn_burst(state, rng, cx, cy, cfg.hit_burst);
        if state.lives > 0 {
            let text = format!("Hull breached! {} lives remaining", state.lives);
            state.push_message(cfg, MessageKind::System, text);
        }
    }

    // ── Player ↔ power-ups ───────────────────────────────────────────────────
    let mut collected = Vec::new();
    for pu in &mut state.powerups {
        if pu.active && overlaps(&pu.rect(), &player_rect) {
            pu.active = false;
            collected.push(pu.kind);
        }
    }
    for kind in collected {
        powerup::apply(state, cfg, rng, kind);
        events.powerups_collected.push(kind);
    }

    state.high_score = state.high_score.max(state.score);
    events
}

/// Drop inactive entities from each population. Enemies are exempt: dead
/// grid slots stay in place for the rest of the level.
pub fn cleanup(state: &mut GameState) {
    state.projectiles.retain(|p| p.active);
    state.powerups.retain(|p| p.active);
    state.particles.retain(|p| p.life > 0.0);
}

/// Scatter a burst of cosmetic debris from an explosion site.
pub fn spawn_burst(state: &mut GameState, rng: &mut impl Rng, x: f32, y: f32, count: usize) {
    for _ in 0..count {
        state.particles.push(Particle {
            x,
            y,
            vx: rng.gen_range(-3.0..3.0),
            vy: rng.gen_range(-3.0..3.0),
            life: 1.0,
            decay: rng.gen_range(0.02..0.06),
            size: rng.gen_range(2.0..5.0),
        });
    }
}
