//! Enemy formation controller: lockstep march, wall bounce, per-level
//! scaling, return fire and the two end-of-level signals.

use rand::Rng;

use crate::config::Config;
use crate::entities::{Owner, Projectile, ProjectileKind};
use crate::state::GameState;

/// Outcome of one formation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationSignal {
    Advancing,
    /// No alive enemies remain.
    LevelComplete,
    /// An alive enemy descended into the loss margin above the player row.
    GameOver,
}

/// Advance the whole formation by one tick.
///
/// Movement, wall drop and direction flip happen in the same tick wall
/// contact is detected; fire rolls happen after movement, also in the
/// same tick. Dead enemies are carried through every positional update
/// so the grid stays rigid for the whole level.
pub fn advance(state: &mut GameState, cfg: &Config, rng: &mut impl Rng) -> FormationSignal {
    if state.alive_enemies() == 0 {
        return FormationSignal::LevelComplete;
    }

    let speed = cfg.enemy_speed_x * (1.0 + (state.level - 1) as f32 * cfg.speed_increase);
    let dx = speed * state.formation_dir;

    // Would any alive enemy's leading edge cross a playfield bound this tick?
    let hit_wall = state.enemies.iter().filter(|e| e.alive).any(|e| {
        if state.formation_dir > 0.0 {
            e.x + e.w + dx >= cfg.world_w
        } else {
            e.x + dx <= 0.0
        }
    });

    for enemy in &mut state.enemies {
        enemy.x += dx;
        if hit_wall {
            enemy.y += cfg.enemy_drop;
        }
    }
    if hit_wall {
        state.formation_dir = -state.formation_dir;
    }

    // Sprite animation keyed to the march cadence.
    if state.frame % 12 == 0 {
        for enemy in &mut state.enemies {
            enemy.phase ^= 1;
        }
    }

    // Return fire: each alive enemy rolls independently, scaled by level.
    let chance = (cfg.enemy_fire_chance * state.level as f64).min(cfg.enemy_fire_chance_cap);
    let mut shots = Vec::new();
    for enemy in state.enemies.iter().filter(|e| e.alive) {
        if rng.gen_bool(chance) {
            shots.push(Projectile {
                x: enemy.x + enemy.w / 2.0 - 2.0,
                y: enemy.y + enemy.h,
                vx: 0.0,
                vy: cfg.enemy_shot_speed,
                w: 4.0,
                h: 10.0,
                owner: Owner::Enemy,
                kind: ProjectileKind::Normal,
                active: true,
            });
        }
    }
    state.projectiles.extend(shots);

    // Loss condition: formation reached the player's row.
    let threshold = state.player.y - cfg.loss_margin;
    if state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .any(|e| e.y + e.h >= threshold)
    {
        return FormationSignal::GameOver;
    }

    FormationSignal::Advancing
}
