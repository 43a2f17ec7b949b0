//! Micro-tutoring core: session state, the learning flow state machine and
//! the structured operations built on top of a text-generation model.

pub mod curriculum;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod llm_client;
pub mod policy;
pub mod prompts;
pub mod quiz;
pub mod session;
pub mod store;

pub use error::{Result, TutorError};
pub use flow::{AnswerOutcome, LearningFlow, StartOutcome};
pub use gateway::GenerationGateway;
pub use store::SessionStore;
