use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Member;

/// Latest member list pushed by a client, kept in process memory.
///
/// Writers replace the whole list; there is no consistency guarantee across
/// concurrent requests beyond last write wins.
#[derive(Debug, Clone, Default)]
pub struct MemberStore {
    members: Arc<RwLock<Vec<Member>>>,
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the retained list and return how many members it now holds.
    pub async fn replace(&self, members: Vec<Member>) -> usize {
        let count = members.len();
        *self.members.write().await = members;
        tracing::info!(count, "Retained family members updated");
        count
    }

    pub async fn members(&self) -> Vec<Member> {
        self.members.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }
}
