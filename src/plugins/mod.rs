//! Plugin system for stateful reply bots
//! 
//! Plugins run after the declarative bots and may keep conversational memory.

pub mod blue_bot;
pub mod manager;
pub mod trait_def;

pub use blue_bot::{BlueBot, BlueBotConfig};
pub use manager::PluginManager;
pub use trait_def::ReplyPlugin;
