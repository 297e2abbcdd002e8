//! Background poller for the auxiliary dashboard state: online users,
//! new-case notifications, recent activity. Independent of the case
//! workflow, owned by the screen lifecycle, cancellable on teardown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::session::User;
use crate::store::{CaseListFilter, CaseStore, StoreError};
use crate::views::{new_case_notifications, recent_activity, RECENT_ACTIVITY_LIMIT};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
pub struct PresenceSnapshot {
    pub online_users: Vec<User>,
    /// Cases created within the last day, newest first.
    pub notifications: Vec<crate::cases::Case>,
    /// Newest few cases overall.
    pub recent_activity: Vec<crate::cases::Case>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Polls the store on a fixed interval and publishes snapshots on a
/// watch channel. Dropping (or stopping) the poller aborts the task, so
/// an in-flight fetch can never update state after teardown.
pub struct PresencePoller {
    handle: JoinHandle<()>,
    rx: watch::Receiver<PresenceSnapshot>,
}

impl PresencePoller {
    /// Starts polling immediately, then on every `interval` tick.
    pub fn spawn<S>(store: Arc<S>, interval: Duration) -> Self
    where
        S: CaseStore + 'static,
    {
        let (tx, rx) = watch::channel(PresenceSnapshot::default());
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match refresh(store.as_ref()).await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).is_err() {
                            // Every receiver is gone, nothing left to feed.
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "presence refresh failed, retrying on next tick");
                    }
                }
            }
        });
        Self { handle, rx }
    }

    pub fn subscribe(&self) -> watch::Receiver<PresenceSnapshot> {
        self.rx.clone()
    }

    pub fn latest(&self) -> PresenceSnapshot {
        self.rx.borrow().clone()
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PresencePoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn refresh<S: CaseStore>(store: &S) -> Result<PresenceSnapshot, StoreError> {
    let online_users = store.online_users().await?;
    let cases = store.list_cases(&CaseListFilter::all()).await?;
    let now = Utc::now();
    Ok(PresenceSnapshot {
        online_users,
        notifications: new_case_notifications(&cases, now, crate::views::activity::notification_window()),
        recent_activity: recent_activity(&cases, RECENT_ACTIVITY_LIMIT),
        refreshed_at: Some(now),
    })
}
