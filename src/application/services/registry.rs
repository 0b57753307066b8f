//! Bot registry - holds the active set of bot definitions

use std::sync::{Arc, RwLock};

use crate::domain::entities::BotDefinition;

/// Immutable view of the registry at one point in time
pub type BotSet = Arc<Vec<Arc<BotDefinition>>>;

/// Registry of declarative bots, replaced wholesale on refresh
pub struct BotRegistry {
    bots: RwLock<BotSet>,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self {
            bots: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn with_bots(bots: Vec<BotDefinition>) -> Self {
        let registry = Self::new();
        registry.replace(bots);
        registry
    }

    /// Swap in a new set; callers holding a snapshot keep the old one
    pub fn replace(&self, bots: Vec<BotDefinition>) {
        let next: BotSet = Arc::new(bots.into_iter().map(Arc::new).collect());
        let mut current = self.bots.write().unwrap_or_else(|e| e.into_inner());
        tracing::info!("Bot registry refreshed: {} -> {} bots", current.len(), next.len());
        *current = next;
    }

    /// Current set, in load order
    pub fn snapshot(&self) -> BotSet {
        self.bots.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get a bot by name
    pub fn get(&self, name: &str) -> Option<Arc<BotDefinition>> {
        self.snapshot().iter().find(|bot| bot.name == name).cloned()
    }

    /// Get all bot names
    pub fn names(&self) -> Vec<String> {
        self.snapshot().iter().map(|bot| bot.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BotRegistry {
    fn default() -> Self {
        Self::new()
    }
}
