use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    conversation::ConversationState,
    error::{FlowError, Result},
};

/// A hosted dialogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: ConversationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(state: ConversationState) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), state)
    }

    pub fn with_id(id: impl Into<String>, state: ConversationState) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            state,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// True if the session was last updated before `cutoff`
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at < cutoff
    }
}

/// Oldest `updated_at` a session may have and still be kept
pub fn idle_cutoff(max_idle: Duration) -> Result<DateTime<Utc>> {
    Utc::now()
        .checked_sub_signed(max_idle)
        .ok_or_else(|| FlowError::StorageError(format!("invalid idle timeout: {max_idle}")))
}

/// Trait for storing and retrieving sessions
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, session: Session) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Session>>;
    async fn delete(&self, id: &str) -> Result<()>;
    /// Removes sessions not updated within `max_idle`, returning how many were removed
    async fn evict_idle(&self, max_idle: Duration) -> Result<usize>;
}

/// In-memory implementation of SessionStorage
#[derive(Clone, Default)]
pub struct InMemorySessionStorage {
    sessions: Arc<DashMap<String, Session>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, session: Session) -> Result<()> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn evict_idle(&self, max_idle: Duration) -> Result<usize> {
        let cutoff = idle_cutoff(max_idle)?;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| !session.is_idle_since(cutoff));
        Ok(before.saturating_sub(self.sessions.len()))
    }
}
