use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use star_invaders::ai::backend::{HttpBackend, TextBackend};
use star_invaders::ai::client::AiClient;
use star_invaders::ai::{fallback, AiStatus, ChatRequest, PerformanceTier, RequestKind};
use star_invaders::entities::{MessageKind, PowerUpKind};

const CACHE_CAPACITY: usize = 50;
const CACHE_TTL: Duration = Duration::from_secs(300);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Scripted stand-in for the backend process: health is fixed, chat
/// replies come from a queue (an empty queue means failure).
struct ScriptedBackend {
    healthy: bool,
    replies: Vec<String>,
}

impl ScriptedBackend {
    fn online(replies: &[&str]) -> Self {
        ScriptedBackend {
            healthy: true,
            replies: replies.iter().rev().map(|s| s.to_string()).collect(),
        }
    }

    fn unreachable() -> Self {
        ScriptedBackend {
            healthy: false,
            replies: Vec::new(),
        }
    }
}

impl TextBackend for ScriptedBackend {
    fn health(&mut self) -> Result<()> {
        if self.healthy {
            Ok(())
        } else {
            bail!("connection refused")
        }
    }

    fn chat(&mut self, _request: &ChatRequest) -> Result<String> {
        match self.replies.pop() {
            Some(reply) => Ok(reply),
            None => bail!("request timed out"),
        }
    }
}

/// Poll until the probe has settled; the worker answers within a few ms.
fn wait_for_status(client: &mut AiClient, want: AiStatus) {
    for _ in 0..200 {
        client.poll();
        if client.status() == want {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("backend never reached {want:?}");
}

fn wait_for_completion(client: &mut AiClient) -> (RequestKind, String) {
    for _ in 0..200 {
        if let Some(c) = client.poll().into_iter().next() {
            return (c.kind, c.text);
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("no completion arrived");
}

// ── Offline behavior ──────────────────────────────────────────────────────────

#[test]
fn failed_probe_goes_offline_and_taunts_from_the_fallback_pool() {
    let backend = ScriptedBackend::unreachable();
    let mut client = AiClient::connect(Box::new(backend), CACHE_CAPACITY, CACHE_TTL);
    wait_for_status(&mut client, AiStatus::Offline);

    let taunt = client
        .request_taunt(&mut seeded_rng(), 1, 0)
        .expect("offline requests answer immediately");
    assert!(!taunt.is_empty());
    assert!(fallback::TAUNTS.contains(&taunt.as_str()));
    // Offline requests bypass the cache entirely.
    assert_eq!(client.cache_len(), 0);
}

#[test]
fn refused_tcp_connection_also_goes_offline() {
    // Port 1 on loopback: nothing listens there.
    let backend = HttpBackend::new(
        "127.0.0.1:1",
        Duration::from_millis(200),
        Duration::from_millis(200),
    );
    let mut client = AiClient::connect(Box::new(backend), CACHE_CAPACITY, CACHE_TTL);
    wait_for_status(&mut client, AiStatus::Offline);

    let line = client
        .request_briefing(&mut seeded_rng(), 1)
        .expect("offline requests answer immediately");
    assert!(fallback::BRIEFINGS.contains(&line.as_str()));
    assert_eq!(client.cache_len(), 0);
}

#[test]
fn disabled_client_serves_every_kind_from_fallbacks() {
    let mut client = AiClient::disabled();
    let mut rng = seeded_rng();

    assert!(client.request_taunt(&mut rng, 2, 500).is_some());
    assert!(client.request_briefing(&mut rng, 1).is_some());
    assert!(client.request_level_description(&mut rng, 3).is_some());
    assert!(client.request_performance_comment(&mut rng, PerformanceTier::Poor).is_some());
    assert!(client.request_game_over_comment(&mut rng, 100, PerformanceTier::Good).is_some());

    let hint = client.request_powerup_hint(PowerUpKind::Bomb).unwrap();
    assert_eq!(hint, fallback::powerup_hint(PowerUpKind::Bomb));
}

// ── Online flow ───────────────────────────────────────────────────────────────

#[test]
fn online_request_completes_asynchronously_and_caches() {
    let backend = ScriptedBackend::online(&["The armada trembles before wave 1."]);
    let mut client = AiClient::connect(Box::new(backend), CACHE_CAPACITY, CACHE_TTL);
    wait_for_status(&mut client, AiStatus::Online);

    // Cache miss: the job is queued, nothing synchronous comes back.
    let immediate = client.request_briefing(&mut seeded_rng(), 1);
    assert_eq!(immediate, None);

    let (kind, text) = wait_for_completion(&mut client);
    assert_eq!(kind, RequestKind::Briefing);
    assert_eq!(text, "The armada trembles before wave 1.");
    assert_eq!(client.cache_len(), 1);

    // Same kind+context now answers synchronously from the cache.
    let cached = client.request_briefing(&mut seeded_rng(), 1);
    assert_eq!(cached.as_deref(), Some("The armada trembles before wave 1."));
}

#[test]
fn different_context_is_a_distinct_cache_key() {
    let backend = ScriptedBackend::online(&["wave one", "wave two"]);
    let mut client = AiClient::connect(Box::new(backend), CACHE_CAPACITY, CACHE_TTL);
    wait_for_status(&mut client, AiStatus::Online);

    assert_eq!(client.request_briefing(&mut seeded_rng(), 1), None);
    wait_for_completion(&mut client);
    // Level 2 misses the cache and queues its own job.
    assert_eq!(client.request_briefing(&mut seeded_rng(), 2), None);
    wait_for_completion(&mut client);
    assert_eq!(client.cache_len(), 2);
}

#[test]
fn failed_request_falls_back_and_caches_nothing() {
    // Healthy probe, but the reply queue is empty: every chat call fails
    // (the same path a timeout or a non-2xx status takes).
    let backend = ScriptedBackend::online(&[]);
    let mut client = AiClient::connect(Box::new(backend), CACHE_CAPACITY, CACHE_TTL);
    wait_for_status(&mut client, AiStatus::Online);

    assert_eq!(client.request_taunt(&mut seeded_rng(), 1, 0), None);
    let (kind, text) = wait_for_completion(&mut client);
    assert_eq!(kind, RequestKind::Taunt);
    assert!(fallback::TAUNTS.contains(&text.as_str()));
    assert_eq!(client.cache_len(), 0);
}

// ── Tiers & message routing ───────────────────────────────────────────────────

#[test]
fn accuracy_thresholds_bucket_into_tiers() {
    assert_eq!(PerformanceTier::from_accuracy(0.9), PerformanceTier::Excellent);
    assert_eq!(PerformanceTier::from_accuracy(0.7), PerformanceTier::Excellent);
    assert_eq!(PerformanceTier::from_accuracy(0.6), PerformanceTier::Good);
    assert_eq!(PerformanceTier::from_accuracy(0.4), PerformanceTier::Average);
    assert_eq!(PerformanceTier::from_accuracy(0.1), PerformanceTier::Poor);
    assert_eq!(PerformanceTier::from_accuracy(0.0), PerformanceTier::Poor);
}

#[test]
fn request_kinds_land_in_their_console_lanes() {
    assert_eq!(RequestKind::Taunt.message_kind(), MessageKind::Taunt);
    assert_eq!(RequestKind::Briefing.message_kind(), MessageKind::Briefing);
    assert_eq!(
        RequestKind::LevelDescription.message_kind(),
        MessageKind::Briefing
    );
    assert_eq!(RequestKind::PowerUpHint.message_kind(), MessageKind::Hint);
    assert_eq!(
        RequestKind::PerformanceComment.message_kind(),
        MessageKind::Commander
    );
    assert_eq!(
        RequestKind::GameOverComment.message_kind(),
        MessageKind::Commander
    );
}

#[test]
fn tier_indexed_fallback_pools_differ() {
    let mut rng = seeded_rng();
    let poor = fallback::game_over_comment(&mut rng, PerformanceTier::Poor);
    // A poor-tier line never praises a legendary run.
    assert!(!poor.contains("legendary"));
}
