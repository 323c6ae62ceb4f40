//! Non-blocking client for the text-generation backend.
//!
//! All latency lives on a dedicated worker thread (the same pattern the
//! host uses for blocking keyboard reads): the frame pipeline enqueues a
//! job and moves on, and the finished text comes back through [`poll`] on
//! some later frame. A request therefore answers in one of three ways —
//! immediately from the fallback pools (offline), immediately from the
//! cache (hit), or not at all yet (job queued, result arrives via poll).
//!
//! [`poll`]: AiClient::poll

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use rand::Rng;
use serde_json::json;
use tracing::{debug, warn};

use super::backend::TextBackend;
use super::cache::PromptCache;
use super::{fallback, AiStatus, ChatRequest, PerformanceTier, RequestKind};
use crate::entities::PowerUpKind;

const INVADER_PERSONA: &str = "You are Zyx-9, melodramatic warlord of an alien invasion armada \
     in a retro arcade shooter. Reply with one short line of dialogue, no quotes.";
const COMMAND_PERSONA: &str = "You are the terse, encouraging mission commander guiding a lone \
     pilot in a retro arcade shooter. Reply with one short line, no quotes.";

struct Job {
    kind: RequestKind,
    context: String,
    request: ChatRequest,
    /// Canned line to show if the backend call fails.
    fallback: String,
}

enum WorkerEvent {
    Status(AiStatus),
    Done {
        kind: RequestKind,
        context: String,
        result: Option<String>,
        fallback: String,
    },
}

/// A finished request, ready to append to the console.
#[derive(Clone, Debug)]
pub struct Completion {
    pub kind: RequestKind,
    pub text: String,
}

pub struct AiClient {
    status: AiStatus,
    cache: PromptCache,
    jobs: Option<Sender<Job>>,
    events: Option<Receiver<WorkerEvent>>,
}

impl AiClient {
    /// Spawn the worker thread: it probes the backend once, reports
    /// Online/Offline, then serves chat jobs until the client is dropped.
    /// A failed probe means offline for the rest of the session.
    pub fn connect(backend: Box<dyn TextBackend>, cache_capacity: usize, ttl: Duration) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (event_tx, event_rx) = mpsc::channel::<WorkerEvent>();
        thread::spawn(move || worker(backend, job_rx, event_tx));
        AiClient {
            status: AiStatus::Loading,
            cache: PromptCache::new(cache_capacity, ttl),
            jobs: Some(job_tx),
            events: Some(event_rx),
        }
    }

    /// A client with no backend at all — every request answers from the
    /// fallback pools.
    pub fn disabled() -> Self {
        AiClient {
            status: AiStatus::Offline,
            cache: PromptCache::new(0, Duration::ZERO),
            jobs: None,
            events: None,
        }
    }

    pub fn status(&self) -> AiStatus {
        self.status
    }

    /// Number of cached responses (exposed for the HUD's debug view and
    /// for tests).
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drain worker events. Successes are cached; failures come back as
    /// their canned fallback line. Never blocks.
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut out = Vec::new();
        let Some(events) = &self.events else {
            return out;
        };
        while let Ok(event) = events.try_recv() {
            match event {
                WorkerEvent::Status(status) => {
                    debug!(?status, "ai backend status");
                    self.status = status;
                }
                WorkerEvent::Done {
                    kind,
                    context,
                    result,
                    fallback,
                } => match result {
                    Some(text) => {
                        self.cache.insert(kind, context, text.clone());
                        out.push(Completion { kind, text });
                    }
                    None => {
                        warn!(?kind, "ai request failed, using fallback");
                        out.push(Completion {
                            kind,
                            text: fallback,
                        });
                    }
                },
            }
        }
        out
    }

    // ── The six request kinds ────────────────────────────────────────────────

    pub fn request_taunt(&mut self, rng: &mut impl Rng, level: u32, score: u32) -> Option<String> {
        let context = json!({ "level": level, "score": round_score(score) }).to_string();
        let user = format!(
            "The pilot is on wave {level} with roughly {} points. Taunt them.",
            round_score(score)
        );
        self.request(
            RequestKind::Taunt,
            context,
            INVADER_PERSONA,
            user,
            fallback::taunt(rng),
        )
    }

    pub fn request_briefing(&mut self, rng: &mut impl Rng, level: u32) -> Option<String> {
        let context = json!({ "level": level }).to_string();
        let user = format!("Brief the pilot before wave {level} begins.");
        self.request(
            RequestKind::Briefing,
            context,
            COMMAND_PERSONA,
            user,
            fallback::briefing(rng),
        )
    }

    pub fn request_level_description(
        &mut self,
        rng: &mut impl Rng,
        level: u32,
    ) -> Option<String> {
        let context = json!({ "level": level }).to_string();
        let user = format!("Describe the incoming wave {level} formation in one ominous line.");
        self.request(
            RequestKind::LevelDescription,
            context,
            COMMAND_PERSONA,
            user,
            fallback::level_description(rng),
        )
    }

    pub fn request_powerup_hint(&mut self, kind: PowerUpKind) -> Option<String> {
        let context = json!({ "powerUp": kind.label() }).to_string();
        let user = format!(
            "A \"{}\" power-up just dropped. Tell the pilot what it does in one line.",
            kind.label()
        );
        self.request(
            RequestKind::PowerUpHint,
            context,
            COMMAND_PERSONA,
            user,
            fallback::powerup_hint(kind),
        )
    }

    pub fn request_performance_comment(
        &mut self,
        rng: &mut impl Rng,
        tier: PerformanceTier,
    ) -> Option<String> {
        let context = json!({ "tier": tier.label() }).to_string();
        let user = format!(
            "The pilot's accuracy so far is {}. Comment on their flying.",
            tier.label()
        );
        self.request(
            RequestKind::PerformanceComment,
            context,
            COMMAND_PERSONA,
            user,
            fallback::performance_comment(rng, tier),
        )
    }

    pub fn request_game_over_comment(
        &mut self,
        rng: &mut impl Rng,
        score: u32,
        tier: PerformanceTier,
    ) -> Option<String> {
        let context = json!({ "tier": tier.label(), "score": round_score(score) }).to_string();
        let user = format!(
            "The run is over at {} points with {} accuracy. Give the pilot a send-off.",
            round_score(score),
            tier.label()
        );
        self.request(
            RequestKind::GameOverComment,
            context,
            COMMAND_PERSONA,
            user,
            fallback::game_over_comment(rng, tier),
        )
    }

    /// Shared request path: offline → fallback now (cache bypassed);
    /// cache hit → cached line now; otherwise queue the job and answer on
    /// a later poll.
    fn request(
        &mut self,
        kind: RequestKind,
        context: String,
        system: &str,
        user: String,
        fallback: String,
    ) -> Option<String> {
        if self.status != AiStatus::Online {
            return Some(fallback);
        }
        if let Some(hit) = self.cache.get(kind, &context) {
            return Some(hit);
        }
        let job = Job {
            kind,
            context,
            request: ChatRequest {
                system_prompt: system.to_string(),
                user_prompt: user,
                max_tokens: Some(80),
                temperature: Some(0.9),
            },
            fallback: fallback.clone(),
        };
        let Some(tx) = self.jobs.as_ref() else {
            self.status = AiStatus::Offline;
            return Some(fallback);
        };
        if tx.send(job).is_ok() {
            None
        } else {
            // Worker is gone; degrade to offline for the session.
            self.status = AiStatus::Offline;
            Some(fallback)
        }
    }
}

/// Round the score to the nearest hundred so near-identical prompts share
/// a cache key.
fn round_score(score: u32) -> u32 {
    (score / 100) * 100
}

fn worker(mut backend: Box<dyn TextBackend>, jobs: Receiver<Job>, events: Sender<WorkerEvent>) {
    let status = match backend.health() {
        Ok(()) => AiStatus::Online,
        Err(e) => {
            debug!(error = %e, "ai backend unreachable");
            AiStatus::Offline
        }
    };
    let online = status == AiStatus::Online;
    if events.send(WorkerEvent::Status(status)).is_err() || !online {
        return;
    }

    while let Ok(job) = jobs.recv() {
        let result = match backend.chat(&job.request) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(error = %e, kind = ?job.kind, "ai chat failed");
                None
            }
        };
        let done = WorkerEvent::Done {
            kind: job.kind,
            context: job.context,
            result,
            fallback: job.fallback,
        };
        if events.send(done).is_err() {
            break;
        }
    }
}
