//! Shared Application State
//!
//! Everything a handler needs, created once at startup.

use crate::auth::Credentials;
use microtutor_core::LearningFlow;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<LearningFlow>,
    pub credentials: Arc<Credentials>,
}
