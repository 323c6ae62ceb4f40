use rand::rngs::StdRng;
use rand::SeedableRng;

use star_invaders::config::Config;
use star_invaders::entities::{GameStatus, PowerUpKind, Weapon};
use star_invaders::powerup::{self, WEIGHTS};
use star_invaders::state::GameState;

fn make_state(cfg: &Config) -> GameState {
    let mut s = GameState::new(cfg, 0);
    s.status = GameStatus::Running;
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Weighted selection ────────────────────────────────────────────────────────

#[test]
fn weights_sum_to_one_hundred() {
    let total: u32 = WEIGHTS.iter().map(|(_, w)| w).sum();
    assert_eq!(total, 100);
}

#[test]
fn draw_frequencies_converge_to_the_weight_table() {
    let mut rng = seeded_rng();
    let draws = 20_000usize;
    let mut counts = [0usize; 8];

    for _ in 0..draws {
        let kind = powerup::choose_kind(&mut rng);
        let idx = WEIGHTS.iter().position(|(k, _)| *k == kind).unwrap();
        counts[idx] += 1;
    }

    // 20k draws put every observed frequency well within ±2% absolute of
    // weight/total.
    for (i, (kind, weight)) in WEIGHTS.iter().enumerate() {
        let expected = *weight as f64 / 100.0;
        let observed = counts[i] as f64 / draws as f64;
        assert!(
            (observed - expected).abs() < 0.02,
            "{kind:?}: observed {observed:.3}, expected {expected:.3}"
        );
    }
}

#[test]
fn every_kind_is_reachable() {
    let mut rng = seeded_rng();
    let mut seen = [false; 8];
    for _ in 0..5_000 {
        let kind = powerup::choose_kind(&mut rng);
        let idx = WEIGHTS.iter().position(|(k, _)| *k == kind).unwrap();
        seen[idx] = true;
    }
    assert!(seen.iter().all(|&s| s), "some kinds never drawn: {seen:?}");
}

// ── Weapon pickups & the expiry timer ─────────────────────────────────────────

#[test]
fn weapon_pickup_equips_and_arms_the_expiry() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.frame = 100;

    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Spread);
    assert_eq!(s.player.weapon, Weapon::Spread);
    assert_eq!(
        s.weapon_expires_at,
        Some(100 + cfg.frames(cfg.weapon_duration_ms))
    );
}

#[test]
fn second_weapon_pickup_replaces_the_pending_expiry() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);

    s.frame = 100;
    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Rapid);
    s.frame = 200;
    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Laser);

    // One outstanding timer, keyed to the later pickup.
    assert_eq!(s.player.weapon, Weapon::Laser);
    assert_eq!(
        s.weapon_expires_at,
        Some(200 + cfg.frames(cfg.weapon_duration_ms))
    );
}

// ── Life pickups ──────────────────────────────────────────────────────────────

#[test]
fn shield_grants_one_life() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Shield);
    assert_eq!(s.lives, cfg.starting_lives + 1);
}

#[test]
fn extra_life_grants_two_lives() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::ExtraLife);
    assert_eq!(s.lives, cfg.starting_lives + 2);
}

#[test]
fn lives_cap_at_nine() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.lives = cfg.max_lives - 1;
    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::ExtraLife);
    assert_eq!(s.lives, cfg.max_lives);
}

// ── Bomb ──────────────────────────────────────────────────────────────────────

#[test]
fn bomb_clears_twelve_enemies_with_full_kill_score_and_no_chained_drops() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.level = 1;
    s.enemies.truncate(12);
    assert_eq!(s.alive_enemies(), 12);

    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Bomb);

    assert_eq!(s.alive_enemies(), 0);
    assert!(s.enemies.iter().all(|e| !e.alive));
    assert_eq!(s.score, 12 * cfg.enemy_kill_score + cfg.pickup_bonus);
    assert_eq!(s.enemies_defeated, 12);
    // Bomb kills never roll chained power-up drops.
    assert!(s.powerups.is_empty());
}

#[test]
fn bomb_kill_score_scales_with_level() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    s.level = 3;
    s.enemies.truncate(5);

    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Bomb);
    assert_eq!(s.score, 5 * cfg.enemy_kill_score * 3 + cfg.pickup_bonus);
}

// ── Bonus & the flat pickup award ─────────────────────────────────────────────

#[test]
fn bonus_awards_a_value_in_range() {
    let cfg = Config::default();
    for seed in 0..20 {
        let mut s = make_state(&cfg);
        let mut rng = StdRng::seed_from_u64(seed);
        powerup::apply(&mut s, &cfg, &mut rng, PowerUpKind::Bonus);
        let gained = s.score - cfg.pickup_bonus;
        assert!(
            (cfg.bonus_min..cfg.bonus_max).contains(&gained),
            "bonus {gained} out of range"
        );
    }
}

#[test]
fn every_pickup_updates_the_high_score() {
    let cfg = Config::default();
    let mut s = make_state(&cfg);
    powerup::apply(&mut s, &cfg, &mut seeded_rng(), PowerUpKind::Shield);
    assert_eq!(s.score, cfg.pickup_bonus);
    assert_eq!(s.high_score, cfg.pickup_bonus);
}
