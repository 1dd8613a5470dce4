//! Telegram chat bot backed by NVIDIA NIM hosted models.
//!
//! The bot relays text messages to an OpenAI-compatible chat completion
//! endpoint with a bounded slice of per-user conversation history and
//! sends the reply back, split to fit Telegram's message size limit. A
//! fixed-response HTTP endpoint keeps hosting-platform health checks
//! happy.
pub mod bot;
pub mod cli;
pub mod core;
pub mod health;
pub mod nim;
pub mod telegram;
