//! The AI commander: flavor-text generation behind a non-blocking client.
//!
//! The backend process is an external collaborator reached through the
//! [`backend::TextBackend`] trait. [`client::AiClient`] owns a worker
//! thread for all latency-bearing calls, so the frame pipeline only ever
//! enqueues requests and drains completed ones — it never waits.

pub mod backend;
pub mod cache;
pub mod client;
pub mod fallback;

use serde::{Deserialize, Serialize};

use crate::entities::MessageKind;

/// The six purpose-built request kinds, part of every cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Taunt,
    Briefing,
    LevelDescription,
    PowerUpHint,
    PerformanceComment,
    GameOverComment,
}

impl RequestKind {
    /// Which console lane a completed response lands in.
    pub fn message_kind(&self) -> MessageKind {
        match self {
            RequestKind::Taunt => MessageKind::Taunt,
            RequestKind::Briefing | RequestKind::LevelDescription => MessageKind::Briefing,
            RequestKind::PowerUpHint => MessageKind::Hint,
            RequestKind::PerformanceComment | RequestKind::GameOverComment => {
                MessageKind::Commander
            }
        }
    }
}

/// Backend availability as shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiStatus {
    Loading,
    Online,
    Offline,
}

/// Session accuracy bucketed for commentary prompts and fallback pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    Good,
    Average,
    Poor,
}

impl PerformanceTier {
    pub fn from_accuracy(accuracy: f32) -> Self {
        if accuracy >= 0.7 {
            PerformanceTier::Excellent
        } else if accuracy >= 0.5 {
            PerformanceTier::Good
        } else if accuracy >= 0.3 {
            PerformanceTier::Average
        } else {
            PerformanceTier::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "excellent",
            PerformanceTier::Good => "good",
            PerformanceTier::Average => "average",
            PerformanceTier::Poor => "poor",
        }
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

/// Body of `POST /chat`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Success body of `POST /chat`.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}
