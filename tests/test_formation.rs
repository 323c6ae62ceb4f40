use rand::rngs::StdRng;
use rand::SeedableRng;

use star_invaders::config::Config;
use star_invaders::entities::{GameStatus, Owner};
use star_invaders::formation::{self, FormationSignal};
use star_invaders::state::GameState;

fn make_state(cfg: &Config) -> GameState {
    let mut s = GameState::new(cfg, 0);
    s.status = GameStatus::Running;
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Marching ──────────────────────────────────────────────────────────────────

#[test]
fn formation_marches_right_at_base_speed() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    let x0 = s.enemies[0].x;

    let signal = formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(signal, FormationSignal::Advancing);
    assert_eq!(s.enemies[0].x, x0 + cfg.enemy_speed_x);
}

#[test]
fn formation_speed_scales_with_level() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.level = 3; // 1 + 2 × speed_increase
    let x0 = s.enemies[0].x;

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    let expected = cfg.enemy_speed_x * (1.0 + 2.0 * cfg.speed_increase);
    assert!((s.enemies[0].x - (x0 + expected)).abs() < 1e-4);
}

#[test]
fn dead_enemies_keep_moving_with_the_grid() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.enemies[3].alive = false;
    let x0 = s.enemies[3].x;

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(s.enemies[3].x, x0 + cfg.enemy_speed_x);
}

// ── Wall bounce ───────────────────────────────────────────────────────────────

#[test]
fn wall_contact_drops_and_flips_in_the_same_tick() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    // Park the rightmost enemy against the wall.
    let idx = cfg.grid_cols - 1;
    s.enemies[idx].x = cfg.world_w - cfg.enemy_w - 0.5;
    let y0 = s.enemies[0].y;

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(s.enemies[0].y, y0 + cfg.enemy_drop);
    assert_eq!(s.formation_dir, -1.0);

    // Next tick marches left, no second drop.
    let x_after_bounce = s.enemies[0].x;
    formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert!(s.enemies[0].x < x_after_bounce);
    assert_eq!(s.enemies[0].y, y0 + cfg.enemy_drop);
}

#[test]
fn drop_applies_to_dead_enemies_too() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.enemies[0].alive = false;
    let dead_y0 = s.enemies[0].y;
    let idx = cfg.grid_cols - 1;
    s.enemies[idx].x = cfg.world_w - cfg.enemy_w - 0.5;

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(s.enemies[0].y, dead_y0 + cfg.enemy_drop);
}

#[test]
fn dead_enemy_at_the_wall_does_not_trigger_a_drop() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    let idx = cfg.grid_cols - 1;
    s.enemies[idx].x = cfg.world_w - cfg.enemy_w - 0.5;
    s.enemies[idx].alive = false;
    let y0 = s.enemies[0].y;

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(s.enemies[0].y, y0);
    assert_eq!(s.formation_dir, 1.0);
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[test]
fn empty_alive_set_signals_level_complete() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    for e in &mut s.enemies {
        e.alive = false;
    }
    let signal = formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(signal, FormationSignal::LevelComplete);
}

#[test]
fn enemy_reaching_the_player_row_signals_game_over() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    // Advance one enemy to just inside the loss margin above the player.
    let threshold = s.player.y - cfg.loss_margin;
    s.enemies[0].y = threshold - cfg.enemy_h + 1.0;

    let signal = formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(signal, FormationSignal::GameOver);
}

#[test]
fn dead_enemy_below_the_threshold_is_harmless() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.enemies[0].y = s.player.y;
    s.enemies[0].alive = false;

    let signal = formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert_eq!(signal, FormationSignal::Advancing);
}

// ── Return fire ───────────────────────────────────────────────────────────────

#[test]
fn every_alive_enemy_fires_at_certain_chance() {
    let mut cfg = Config::default();
    cfg.enemy_fire_chance = 1.0;
    cfg.enemy_fire_chance_cap = 1.0;
    let mut s = make_state(&cfg);
    s.enemies[0].alive = false;
    let alive = s.alive_enemies();

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    let enemy_shots = s
        .projectiles
        .iter()
        .filter(|p| p.owner == Owner::Enemy)
        .count();
    assert_eq!(enemy_shots, alive);
}

#[test]
fn no_return_fire_at_zero_chance() {
    let mut cfg = Config::default();
    cfg.enemy_fire_chance = 0.0;
    let mut s = make_state(&cfg);

    formation::advance(&mut s, &cfg, &mut seeded_rng());
    assert!(s.projectiles.is_empty());
}
