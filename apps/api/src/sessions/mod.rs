//! In-memory browser sessions, one submission coordinator each.
//!
//! The store lock is held only while mutating a coordinator, never across the
//! outbound request, so a session stays readable (and shows `busy`) while its
//! submission is in flight.

pub mod handlers;
pub mod models;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::processing::ProcessingClient;
use crate::sessions::models::SessionView;
use crate::submission::coordinator::{submit, Coordinator, PendingSubmission};

pub struct Session {
    pub id: Uuid,
    pub coordinator: Coordinator,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            coordinator: Coordinator::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
        }
    }

    /// Fails with `Conflict` once `max_sessions` are live.
    pub async fn create(&self) -> Result<SessionView, AppError> {
        let mut sessions = self.inner.write().await;
        if sessions.len() >= self.max_sessions {
            warn!("Session limit of {} reached", self.max_sessions);
            return Err(AppError::Conflict(
                "Too many active sessions, try again later".to_string(),
            ));
        }
        let session = Session::new();
        let view = SessionView::from(&session);
        info!("Session {} created", session.id);
        sessions.insert(session.id, session);
        Ok(view)
    }

    pub async fn view(&self, id: Uuid) -> Option<SessionView> {
        self.inner.read().await.get(&id).map(SessionView::from)
    }

    /// Applies `f` to the session's coordinator and returns the updated view.
    pub async fn mutate<F>(&self, id: Uuid, f: F) -> Option<SessionView>
    where
        F: FnOnce(&mut Coordinator),
    {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        f(&mut session.coordinator);
        session.updated_at = Utc::now();
        Some(SessionView::from(&*session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.inner.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} discarded");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops sessions untouched for at least `idle_ttl` as of `now`. Sessions
    /// with a submission in flight are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, idle_ttl: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.coordinator.state().is_busy()
                || (now - session.updated_at)
                    .to_std()
                    .map(|idle| idle < idle_ttl)
                    .unwrap_or(true)
        });
        before - sessions.len()
    }

    async fn begin(&self, id: Uuid) -> Option<(PendingSubmission, SessionView)> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        let pending = session.coordinator.begin();
        session.updated_at = Utc::now();
        Some((pending, SessionView::from(&*session)))
    }
}

/// Evicts idle sessions every `every` until the runtime shuts down.
pub fn spawn_sweeper(store: SessionStore, idle_ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(idle_ttl, Utc::now()).await;
            if evicted > 0 {
                info!(
                    "Evicted {evicted} idle sessions ({} remain)",
                    store.len().await
                );
            }
        }
    })
}

/// Starts a submission for session `id` and sends it on a background task.
/// Returns the view as of the start (busy, no result) and the task handle.
pub async fn start_submission(
    store: &SessionStore,
    processor: Arc<dyn ProcessingClient>,
    id: Uuid,
) -> Option<(SessionView, JoinHandle<()>)> {
    let (pending, view) = store.begin(id).await?;
    let store = store.clone();

    let handle = tokio::spawn(async move {
        let result = submit(processor.as_ref(), &pending.payload).await;
        let recorded = store
            .mutate(id, |coordinator| {
                coordinator.complete(pending.ticket, result);
            })
            .await;
        if recorded.is_none() {
            debug!(
                "Session {id} was discarded before submission {} resolved",
                pending.ticket.0
            );
        }
    });

    Some((view, handle))
}
