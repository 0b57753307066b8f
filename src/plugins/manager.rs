//! Plugin manager - holds reply plugins in registration order

use crate::plugins::trait_def::ReplyPlugin;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Manages all reply plugins for the bot
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn ReplyPlugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin
    pub fn register<P: ReplyPlugin + 'static>(&mut self, plugin: P) -> Result<(), String> {
        self.register_shared(Arc::new(plugin))
    }

    /// Register a plugin the caller keeps a handle to
    pub fn register_shared(&mut self, plugin: Arc<dyn ReplyPlugin>) -> Result<(), String> {
        let name = plugin.name().to_string();

        if self.has_plugin(&name) {
            return Err(format!("Plugin '{}' already registered", name));
        }

        info!("Registering plugin: {}", name);
        self.plugins.push(plugin);
        Ok(())
    }

    /// Unregister a plugin, resetting its state
    pub fn unregister(&mut self, name: &str) -> Result<(), String> {
        let Some(index) = self.plugins.iter().position(|p| p.name() == name) else {
            return Err(format!("Plugin '{}' not found", name));
        };
        let plugin = self.plugins.remove(index);
        plugin.reset();
        info!("Unregistered plugin: {}", name);
        Ok(())
    }

    /// Plugins in registration order
    pub fn plugins(&self) -> &[Arc<dyn ReplyPlugin>] {
        &self.plugins
    }

    /// List all registered plugins
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins.iter().map(|plugin| {
            PluginInfo {
                name: plugin.name().to_string(),
                description: plugin.description().to_string(),
                metadata: plugin.metadata(),
            }
        }).collect()
    }

    /// Check if a plugin exists
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MessageContext, TriggerResult};
    use async_trait::async_trait;

    struct Silent(&'static str);

    #[async_trait]
    impl ReplyPlugin for Silent {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "never replies"
        }

        async fn evaluate(&self, _ctx: &MessageContext) -> Option<TriggerResult> {
            None
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut manager = PluginManager::new();
        manager.register(Silent("a")).unwrap();
        assert!(manager.register(Silent("a")).is_err());
        manager.register(Silent("b")).unwrap();

        let names: Vec<_> = manager.list_plugins().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn unregister_removes_plugin() {
        let mut manager = PluginManager::new();
        manager.register(Silent("a")).unwrap();

        manager.unregister("a").unwrap();
        assert!(!manager.has_plugin("a"));
        assert!(manager.unregister("a").is_err());
    }
}
