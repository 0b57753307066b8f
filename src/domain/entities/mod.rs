//! Domain entities - Core business objects with no external dependencies

pub mod author;
pub mod bot;
pub mod condition;
pub mod message;
pub mod outcome;

pub use author::Author;
pub use bot::{BotDefinition, IdentitySpec, ResponseSet, TriggerSpec};
pub use condition::{Combinator, ConditionNode, Literal};
pub use message::{MessageContext, ReferencedMessage};
pub use outcome::{BotIdentity, FilterDecision, TriggerResult};
