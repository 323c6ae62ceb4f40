//! The game loop orchestrator: owns the state machine, runs the
//! per-frame pipeline in fixed order, and fires the commander's
//! fire-and-forget text requests without ever waiting on them.

use rand::Rng;
use tracing::debug;

use crate::ai::client::AiClient;
use crate::ai::{AiStatus, PerformanceTier, RequestKind};
use crate::combat;
use crate::config::Config;
use crate::entities::{Direction, GameStatus, MessageKind, Owner, ProjectileKind, Weapon};
use crate::formation::{self, FormationSignal};
use crate::player;
use crate::state::GameState;

pub struct Engine<R: Rng> {
    pub cfg: Config,
    pub state: GameState,
    pub ai: AiClient,
    rng: R,
    last_ai_status: AiStatus,
}

impl<R: Rng> Engine<R> {
    pub fn new(cfg: Config, ai: AiClient, rng: R, high_score: u32) -> Self {
        let state = GameState::new(&cfg, high_score);
        let last_ai_status = ai.status();
        Engine {
            cfg,
            state,
            ai,
            rng,
            last_ai_status,
        }
    }

    // ── Input entry points (key mapping is the host's job) ───────────────────

    pub fn set_intent(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Left => self.state.intent_left = pressed,
            Direction::Right => self.state.intent_right = pressed,
        }
    }

    /// Attempt to fire this frame; the weapon cooldown decides whether
    /// anything happens.
    pub fn request_fire(&mut self) {
        if self.state.status == GameStatus::Running {
            player::fire(&mut self.state, &self.cfg);
        }
    }

    pub fn request_pause(&mut self) {
        match self.state.status {
            GameStatus::Running => {
                self.state.status = GameStatus::Paused;
                debug!("paused");
            }
            GameStatus::Paused => {
                self.state.status = GameStatus::Running;
                debug!("resumed");
            }
            _ => {}
        }
    }

    /// Start → Running.
    pub fn start(&mut self) {
        if self.state.status != GameStatus::Start {
            return;
        }
        self.state.status = GameStatus::Running;
        self.state
            .push_message(&self.cfg, MessageKind::System, "Wave 1 — engage!");
        let level = self.state.level;
        let line = self.ai.request_briefing(&mut self.rng, level);
        self.push_ai(RequestKind::Briefing, line);
    }

    /// LevelComplete → Running with the next wave.
    pub fn next_level(&mut self) {
        if self.state.status != GameStatus::LevelComplete {
            return;
        }
        self.state.level += 1;
        self.state.begin_level(&self.cfg);
        self.state.status = GameStatus::Running;
        let text = format!("Wave {} — engage!", self.state.level);
        self.state.push_message(&self.cfg, MessageKind::System, text);
        let level = self.state.level;
        let line = self.ai.request_level_description(&mut self.rng, level);
        self.push_ai(RequestKind::LevelDescription, line);
    }

    /// GameOver → Running with a fully reset run (high score kept).
    pub fn restart(&mut self) {
        if self.state.status != GameStatus::GameOver {
            return;
        }
        self.state.reset(&self.cfg);
        self.state.status = GameStatus::Running;
        self.state
            .push_message(&self.cfg, MessageKind::System, "Wave 1 — engage!");
        let line = self.ai.request_briefing(&mut self.rng, 1);
        self.push_ai(RequestKind::Briefing, line);
    }

    // ── Per-frame pipeline ───────────────────────────────────────────────────

    /// One host frame. Async completions are appended in every state;
    /// the simulation itself steps only while Running.
    pub fn frame(&mut self) {
        self.drain_ai();

        if self.state.status != GameStatus::Running {
            return;
        }
        self.state.frame += 1;

        player::update(&mut self.state, &self.cfg);

        match formation::advance(&mut self.state, &self.cfg, &mut self.rng) {
            FormationSignal::LevelComplete => {
                self.state.status = GameStatus::LevelComplete;
                let text = format!("Wave {} cleared!", self.state.level);
                self.state.push_message(&self.cfg, MessageKind::System, text);
                return;
            }
            FormationSignal::GameOver => {
                self.game_over("The formation has landed.");
                return;
            }
            FormationSignal::Advancing => {}
        }

        self.advance_projectiles();
        self.advance_powerups();
        self.advance_particles();

        let events = combat::resolve(&mut self.state, &self.cfg, &mut self.rng);
        for kind in events.powerups_spawned {
            let line = self.ai.request_powerup_hint(kind);
            self.push_ai(RequestKind::PowerUpHint, line);
        }
        if self.state.lives == 0 {
            combat::cleanup(&mut self.state);
            self.game_over("Ship destroyed.");
            return;
        }

        self.expire_weapon();
        combat::cleanup(&mut self.state);
        self.timed_chatter();

        self.state.high_score = self.state.high_score.max(self.state.score);
    }

    // ── Entity motion ────────────────────────────────────────────────────────

    fn advance_projectiles(&mut self) {
        let cfg = &self.cfg;
        // Homing targets are sampled before the mutable sweep.
        let targets: Vec<(f32, f32)> = self
            .state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| (e.x + e.w / 2.0, e.y + e.h / 2.0))
            .collect();

        for proj in &mut self.state.projectiles {
            if !proj.active {
                continue;
            }
            if proj.kind == ProjectileKind::Missile && proj.owner == Owner::Player {
                let cx = proj.x + proj.w / 2.0;
                let cy = proj.y + proj.h / 2.0;
                let nearest = targets.iter().min_by(|a, b| {
                    let da = (a.0 - cx).powi(2) + (a.1 - cy).powi(2);
                    let db = (b.0 - cx).powi(2) + (b.1 - cy).powi(2);
                    da.total_cmp(&db)
                });
                if let Some(&(tx, _)) = nearest {
                    let step = (tx - cx).clamp(-cfg.missile_homing_step, cfg.missile_homing_step);
                    proj.x += step;
                }
            }
            proj.x += proj.vx;
            proj.y += proj.vy;
            if proj.y + proj.h < 0.0
                || proj.y > cfg.world_h
                || proj.x + proj.w < 0.0
                || proj.x > cfg.world_w
            {
                proj.active = false;
            }
        }
    }

    fn advance_powerups(&mut self) {
        let cfg = &self.cfg;
        for pu in &mut self.state.powerups {
            if !pu.active {
                continue;
            }
            pu.y += pu.vy;
            pu.rotation += 0.1;
            if pu.y > cfg.world_h {
                pu.active = false;
            }
        }
    }

    fn advance_particles(&mut self) {
        for particle in &mut self.state.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.life -= particle.decay;
            particle.size *= 0.96;
        }
    }

    // ── Timers & async chatter ───────────────────────────────────────────────

    /// Expiry is an explicit frame stamp checked here, not a timer
    /// primitive; re-arming overwrote the stamp at pickup time.
    fn expire_weapon(&mut self) {
        if let Some(expires_at) = self.state.weapon_expires_at {
            if self.state.frame >= expires_at {
                self.state.weapon_expires_at = None;
                self.state.player.weapon = Weapon::Basic;
                self.state
                    .push_message(&self.cfg, MessageKind::System, "Weapon power depleted");
            }
        }
    }

    /// Time-gated taunts and performance commentary. Only triggered while
    /// the backend is online — the event-driven requests already cover
    /// offline flavor.
    fn timed_chatter(&mut self) {
        if self.ai.status() != AiStatus::Online {
            return;
        }
        let frame = self.state.frame;

        let taunt_gate = self.cfg.frames(self.cfg.taunt_interval_ms);
        if frame.saturating_sub(self.state.last_taunt_frame) >= taunt_gate {
            self.state.last_taunt_frame = frame;
            let (level, score) = (self.state.level, self.state.score);
            let line = self.ai.request_taunt(&mut self.rng, level, score);
            self.push_ai(RequestKind::Taunt, line);
        }

        let comment_gate = self.cfg.frames(self.cfg.comment_interval_ms);
        if self.state.shots_fired >= 10
            && frame.saturating_sub(self.state.last_comment_frame) >= comment_gate
        {
            self.state.last_comment_frame = frame;
            let tier = PerformanceTier::from_accuracy(self.state.accuracy());
            let line = self.ai.request_performance_comment(&mut self.rng, tier);
            self.push_ai(RequestKind::PerformanceComment, line);
        }
    }

    fn game_over(&mut self, reason: &str) {
        self.state.status = GameStatus::GameOver;
        self.state.high_score = self.state.high_score.max(self.state.score);
        debug!(score = self.state.score, level = self.state.level, "game over");
        self.state
            .push_message(&self.cfg, MessageKind::System, reason.to_string());
        let tier = PerformanceTier::from_accuracy(self.state.accuracy());
        let score = self.state.score;
        let line = self.ai.request_game_over_comment(&mut self.rng, score, tier);
        self.push_ai(RequestKind::GameOverComment, line);
    }

    /// Append completed async requests to the console. Stale completions
    /// (from before a restart or level change) display like any other —
    /// there is deliberately no cancellation.
    fn drain_ai(&mut self) {
        for completion in self.ai.poll() {
            self.state.push_message(
                &self.cfg,
                completion.kind.message_kind(),
                completion.text,
            );
        }
        let status = self.ai.status();
        if status != self.last_ai_status {
            self.last_ai_status = status;
            let text = match status {
                AiStatus::Online => "AI commander online",
                AiStatus::Offline => "AI commander offline — canned transmissions only",
                AiStatus::Loading => "Contacting AI commander...",
            };
            self.state.push_message(&self.cfg, MessageKind::System, text);
        }
    }

    /// An immediate answer (fallback or cache hit) is shown right away;
    /// `None` means the job is in flight and will arrive via `drain_ai`.
    fn push_ai(&mut self, kind: RequestKind, line: Option<String>) {
        if let Some(text) = line {
            self.state.push_message(&self.cfg, kind.message_kind(), text);
        }
    }
}
