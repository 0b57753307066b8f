//! Reply-bot engine: declarative condition-tree bots, a centralized message
//! filter, and stateful reply plugins.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
