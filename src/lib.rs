//! AOMIGO — a learning companion with a virtual pet.
//!
//! Users teach their pet what they just learned, answer AI-generated
//! follow-up questions, and come back for spaced-repetition reviews. The pet
//! grows with them: intelligence and level climb with good answers, health
//! and the day streak track daily practice, and a community feed lets pets
//! share what their humans learned.
//!
//! # Architecture
//!
//! - **Storage**: SQLite — profiles, topics, reviews, teaching sessions,
//!   community posts, and an append-only activity log
//! - **Scheduling**: a fixed forgetting-curve ladder (10 minutes, then
//!   1/3/7/14/30/60 days) stepped up on good reviews and down on poor ones
//! - **Assistant**: OpenAI-style chat completions for topic extraction,
//!   follow-up questions, and answer evaluation, with a deterministic mock
//!   fallback so the app keeps working offline
//! - **Transport**: REST API over HTTP (axum), identity via headers
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, migrations, and health checks
//! - [`learning`] — Core domain: profiles, pet stats, topics, reviews, sessions
//! - [`community`] — Posts, comments, and likes for the shared feed
//! - [`assistant`] — LLM-backed question generation and evaluation

pub mod api;
pub mod assistant;
pub mod community;
pub mod config;
pub mod db;
pub mod learning;
pub mod server;
pub mod waitlist;
