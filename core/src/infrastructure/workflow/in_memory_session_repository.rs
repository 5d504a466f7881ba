use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    common::{SessionConfig, entities::app_errors::CoreError},
    workflow::{entities::WorkflowSession, ports::WorkflowSessionRepository},
};

/// Process-local session store. Sessions do not survive a restart.
///
/// Idle sessions are swept whenever a new one is inserted, and the oldest
/// ones are dropped once `max_sessions` is exceeded.
#[derive(Debug, Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, WorkflowSession>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl InMemorySessionRepository {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::seconds(
                i64::try_from(config.idle_timeout_secs)
                    .unwrap_or(i64::MAX)
                    .min(i64::from(u32::MAX)),
            ),
            max_sessions: config.max_sessions.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn evict(&self, sessions: &mut HashMap<Uuid, WorkflowSession>, keep: Uuid) {
        let before = sessions.len();
        let cutoff = Utc::now() - self.idle_timeout;
        sessions.retain(|id, session| *id == keep || session.updated_at >= cutoff);

        if sessions.len() > self.max_sessions {
            let mut by_age = sessions
                .values()
                .filter(|session| session.id != keep)
                .map(|session| (session.updated_at, session.id))
                .collect::<Vec<_>>();
            by_age.sort();

            let excess = sessions.len() - self.max_sessions;
            for (_, id) in by_age.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), remaining = sessions.len(), "Evicted sessions");
        }
    }
}

impl WorkflowSessionRepository for InMemorySessionRepository {
    async fn get(&self, id: Uuid) -> Result<Option<WorkflowSession>, CoreError> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn save(&self, mut session: WorkflowSession) -> Result<(), CoreError> {
        session.updated_at = Utc::now();

        let mut sessions = self.sessions.write().await;
        let id = session.id;
        if sessions.insert(id, session).is_none() {
            self.evict(&mut sessions, id);
        }

        Ok(())
    }

    async fn update<F>(&self, id: Uuid, change: F) -> Result<WorkflowSession, CoreError>
    where
        F: FnOnce(&mut WorkflowSession) -> Result<(), CoreError> + Send,
    {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&id).ok_or(CoreError::SessionNotFound)?;

        let mut next = stored.clone();
        change(&mut next)?;
        next.updated_at = Utc::now();
        *stored = next.clone();

        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CoreError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }
}
