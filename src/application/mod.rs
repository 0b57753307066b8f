//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Rules: condition evaluation and trigger selection
//! - Messaging: admission filter and reply dispatch
//! - Services: bot registry and guarded detection
//! - Errors: Domain-specific errors

pub mod errors;
pub mod messaging;
pub mod rules;
pub mod services;
