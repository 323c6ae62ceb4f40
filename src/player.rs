//! Player movement and weapon fire.

use crate::config::Config;
use crate::entities::{Owner, Projectile, ProjectileKind, Weapon};
use crate::state::GameState;

/// Apply the held movement intents and service the fire cooldown.
/// Movement is horizontal only, clamped to the playfield.
pub fn update(state: &mut GameState, cfg: &Config) {
    let p = &mut state.player;
    if state.intent_left {
        p.x -= p.speed;
    }
    if state.intent_right {
        p.x += p.speed;
    }
    p.x = p.x.clamp(0.0, cfg.world_w - p.w);

    if !p.can_fire && state.frame >= p.cooldown_until {
        p.can_fire = true;
    }
}

fn cooldown_ms(cfg: &Config, weapon: Weapon) -> u64 {
    match weapon {
        Weapon::Basic => cfg.cooldown_basic_ms,
        Weapon::Spread => cfg.cooldown_spread_ms,
        Weapon::Laser => cfg.cooldown_laser_ms,
        Weapon::Rapid => cfg.cooldown_rapid_ms,
        Weapon::Missile => cfg.cooldown_missile_ms,
    }
}

/// Fire the equipped weapon. No-op while the cooldown is running.
///
/// Each weapon has its own volley shape and cooldown; every successful
/// volley counts once toward `shots_fired` regardless of projectile count.
pub fn fire(state: &mut GameState, cfg: &Config) {
    if !state.player.can_fire {
        return;
    }

    let cx = state.player.x + state.player.w / 2.0;
    let top = state.player.y;
    let weapon = state.player.weapon;

    let shot = |x: f32, vx: f32, vy: f32, w: f32, h: f32, kind: ProjectileKind| Projectile {
        x: x - w / 2.0,
        y: top - h,
        vx,
        vy,
        w,
        h,
        owner: Owner::Player,
        kind,
        active: true,
    };

    match weapon {
        Weapon::Basic => {
            state
                .projectiles
                .push(shot(cx, 0.0, -cfg.shot_speed, 4.0, 10.0, ProjectileKind::Normal));
        }
        Weapon::Spread => {
            for vx in [-cfg.spread_drift, 0.0, cfg.spread_drift] {
                state
                    .projectiles
                    .push(shot(cx, vx, -cfg.shot_speed, 4.0, 10.0, ProjectileKind::Normal));
            }
        }
        Weapon::Laser => {
            state
                .projectiles
                .push(shot(cx, 0.0, -cfg.laser_shot_speed, 6.0, 18.0, ProjectileKind::Laser));
        }
        Weapon::Rapid => {
            state
                .projectiles
                .push(shot(cx, 0.0, -cfg.rapid_shot_speed, 4.0, 10.0, ProjectileKind::Normal));
        }
        Weapon::Missile => {
            state
                .projectiles
                .push(shot(cx, 0.0, -cfg.missile_shot_speed, 6.0, 12.0, ProjectileKind::Missile));
        }
    }

    state.shots_fired += 1;
    state.player.can_fire = false;
    state.player.cooldown_until = state.frame + cfg.frames(cooldown_ms(cfg, weapon));
}
