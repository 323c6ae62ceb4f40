//! Core library for the star_invaders arcade shooter.
//!
//! Everything that simulates runs headless: the modules here mutate an
//! explicit [`state::GameState`] through per-frame calls with an injected
//! RNG, so the whole game can be driven from tests without a terminal.
//! Terminal I/O lives in [`display`]; the flavor-text commander lives in
//! [`ai`] and never blocks the frame pipeline.

pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod entities;
pub mod formation;
pub mod geometry;
pub mod leaderboard;
pub mod player;
pub mod powerup;
pub mod state;

pub mod display;
