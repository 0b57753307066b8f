//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: application config and bot-definition loading
//! - Adapters: chat surfaces (console)
//! - Identity: member directory for mimic/random identities
//! - LLM: chat backend for natural-language detection

pub mod adapters;
pub mod config;
pub mod identity;
pub mod llm;
