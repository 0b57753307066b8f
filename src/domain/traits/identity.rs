use async_trait::async_trait;
use crate::application::errors::CapabilityError;
use crate::domain::entities::{BotIdentity, IdentitySpec, MessageContext};

/// Member lookups needed to resolve `mimic` and `random` identities
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity of a specific member
    async fn member(&self, member_id: &str, ctx: &MessageContext) -> Result<BotIdentity, CapabilityError>;

    /// Identity of an arbitrary eligible member
    async fn random_member(&self, ctx: &MessageContext) -> Result<BotIdentity, CapabilityError>;
}

/// Resolve an identity spec, consulting the provider only when needed
pub async fn resolve_identity(
    provider: &dyn IdentityProvider,
    spec: &IdentitySpec,
    ctx: &MessageContext,
) -> Result<BotIdentity, CapabilityError> {
    match spec {
        IdentitySpec::Static { bot_name, avatar_url } => {
            Ok(BotIdentity::new(bot_name.clone(), avatar_url.clone()))
        }
        IdentitySpec::Mimic { as_member } => provider.member(as_member, ctx).await,
        IdentitySpec::Random => provider.random_member(ctx).await,
    }
}
