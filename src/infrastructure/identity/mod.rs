//! In-memory member directory used to resolve mimic and random identities

use std::collections::HashMap;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::application::errors::CapabilityError;
use crate::domain::entities::{BotIdentity, MessageContext};
use crate::domain::traits::IdentityProvider;

/// A known server member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub is_bot: bool,
}

impl Member {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: avatar_url.into(),
            is_bot: false,
        }
    }

    pub fn bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    fn identity(&self) -> BotIdentity {
        BotIdentity::new(self.display_name.clone(), self.avatar_url.clone())
    }
}

/// Members keyed by id
#[derive(Default)]
pub struct MemberDirectory {
    members: RwLock<HashMap<String, Member>>,
}

impl MemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: impl IntoIterator<Item = Member>) -> Self {
        let members = members.into_iter().map(|m| (m.id.clone(), m)).collect();
        Self {
            members: RwLock::new(members),
        }
    }

    /// Add or replace a member
    pub async fn upsert(&self, member: Member) {
        self.members.write().await.insert(member.id.clone(), member);
    }

    pub async fn remove(&self, id: &str) -> Option<Member> {
        self.members.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }
}

#[async_trait]
impl IdentityProvider for MemberDirectory {
    async fn member(&self, member_id: &str, _ctx: &MessageContext) -> Result<BotIdentity, CapabilityError> {
        self.members
            .read()
            .await
            .get(member_id)
            .map(Member::identity)
            .ok_or_else(|| CapabilityError::MemberNotFound(member_id.to_string()))
    }

    async fn random_member(&self, _ctx: &MessageContext) -> Result<BotIdentity, CapabilityError> {
        let members = self.members.read().await;
        let humans: Vec<&Member> = members.values().filter(|m| !m.is_bot).collect();
        humans
            .choose(&mut rand::thread_rng())
            .map(|m| m.identity())
            .ok_or(CapabilityError::NoEligibleMember)
    }
}
