//! Micro-tutor API Library Crate
//!
//! HTTP surface for the tutoring core: login, emotion updates and the
//! learning endpoints. The `api` binary is a thin wrapper around this library.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
