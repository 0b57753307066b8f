//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Messages, condition trees, bot definitions, decisions
//! - Traits: Capabilities the engine consumes (identity, dispatch, detection, clock)

pub mod entities;
pub mod traits;
