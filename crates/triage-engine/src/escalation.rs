//! Emergency escalation channel.
//!
//! A Red decision is raised once per dedup key: the first `raise` for a key
//! fans the event out to every listener, later raises are suppressed until
//! the key is dismissed. Listeners run concurrently on their own tasks and a
//! failing listener never affects the others.
//!
//! Keys that are never dismissed expire after the retention period (one hour
//! unless set with [`EmergencyEscalationChannel::with_retention`]), measured
//! against the timestamp of the event being raised.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use triage_core::models::emergency::{DedupKey, EmergencyEvent};
use triage_storage::store::KeyValueStore;

use crate::audit::{EscalationAction, EscalationAudit};
use crate::error::EscalationError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Receives raised emergency events.
pub trait EscalationListener: Send + Sync {
    fn name(&self) -> &str;

    fn notify<'a>(
        &'a self,
        event: &'a EmergencyEvent,
    ) -> BoxFuture<'a, Result<(), EscalationError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListenerOutcome {
    pub listener: String,
    pub result: Result<(), EscalationError>,
}

/// Per-listener results of one fan-out, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanOutReport {
    pub outcomes: Vec<ListenerOutcome>,
}

impl FanOutReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RaiseOutcome {
    /// First raise for the key; the event went to every listener.
    Dispatched(FanOutReport),
    /// The key was already active; nothing was sent.
    Suppressed,
}

impl RaiseOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, RaiseOutcome::Suppressed)
    }
}

pub const DEFAULT_RETENTION: Duration = Duration::from_secs(60 * 60);

fn active_key(key: &DedupKey) -> String {
    format!("escalation/active/{key}")
}

pub struct EmergencyEscalationChannel {
    listeners: Vec<Arc<dyn EscalationListener>>,
    /// Active keys and the timestamp of the event that raised them.
    active: Mutex<HashMap<DedupKey, jiff::Timestamp>>,
    store: Option<Arc<dyn KeyValueStore>>,
    retention: Duration,
}

impl Default for EmergencyEscalationChannel {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            active: Mutex::new(HashMap::new()),
            store: None,
            retention: DEFAULT_RETENTION,
        }
    }
}

impl EmergencyEscalationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// How long an undismissed key stays active.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn EscalationListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Keep active keys in `store` so they survive a restart.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub async fn is_active(&self, key: &DedupKey) -> bool {
        self.active.lock().await.contains_key(key)
    }

    /// Fan `event` out unless its dedup key is already active.
    pub async fn raise(&self, event: EmergencyEvent) -> RaiseOutcome {
        let key = event.dedup_key.clone();

        {
            // Held across the store round-trip so check-and-insert stays atomic.
            let mut active = self.active.lock().await;
            self.prune_expired(&mut active, event.timestamp).await;
            if active.contains_key(&key) {
                EscalationAudit::suppressed(&event).emit();
                debug!(dedup_key = %key, "emergency already active; suppressed");
                return RaiseOutcome::Suppressed;
            }
            if self.stored_active(&key).await {
                active.insert(key.clone(), event.timestamp);
                EscalationAudit::suppressed(&event).emit();
                debug!(dedup_key = %key, "emergency active in store; suppressed");
                return RaiseOutcome::Suppressed;
            }
            active.insert(key.clone(), event.timestamp);
            self.store_active(&key).await;
        }

        info!(
            event_id = %event.id,
            actor_id = %event.actor_id,
            dedup_key = %key,
            listeners = self.listeners.len(),
            "emergency raised"
        );

        let report = self.fan_out(Arc::new(event)).await;
        if report.failed() > 0 {
            warn!(
                dedup_key = %key,
                delivered = report.delivered(),
                failed = report.failed(),
                "emergency fan-out incomplete"
            );
        }
        RaiseOutcome::Dispatched(report)
    }

    /// Clear an active key so the next raise is dispatched again. Returns
    /// whether the key was active.
    pub async fn dismiss(&self, key: &DedupKey) -> bool {
        let mut active = self.active.lock().await;
        let was_active = active.remove(key).is_some();
        self.clear_stored(key).await;
        if was_active {
            EscalationAudit::for_key(EscalationAction::Dismissed, key, jiff::Timestamp::now()).emit();
            info!(dedup_key = %key, "emergency dismissed");
        }
        was_active
    }

    async fn prune_expired(
        &self,
        active: &mut HashMap<DedupKey, jiff::Timestamp>,
        now: jiff::Timestamp,
    ) {
        let horizon = i64::try_from(self.retention.as_secs()).unwrap_or(i64::MAX);
        let expired: Vec<DedupKey> = active
            .iter()
            .filter(|(_, raised_at)| now.as_second().saturating_sub(raised_at.as_second()) > horizon)
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            active.remove(&key);
            self.clear_stored(&key).await;
            EscalationAudit::for_key(EscalationAction::Expired, &key, now).emit();
            debug!(dedup_key = %key, "emergency key expired");
        }
    }

    async fn clear_stored(&self, key: &DedupKey) {
        if let Some(store) = &self.store {
            if let Err(e) = store.remove(&active_key(key)).await {
                warn!(dedup_key = %key, error = %e, "failed to clear stored emergency key");
            }
        }
    }

    async fn fan_out(&self, event: Arc<EmergencyEvent>) -> FanOutReport {
        let tasks = self.listeners.iter().map(|listener| {
            let listener = Arc::clone(listener);
            let event = Arc::clone(&event);
            let name = listener.name().to_string();
            let handle = tokio::spawn(async move { listener.notify(&event).await });
            async move {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(EscalationError::Panicked(e.to_string())),
                };
                if let Err(e) = &result {
                    warn!(listener = %name, error = %e, "escalation listener failed");
                }
                ListenerOutcome {
                    listener: name,
                    result,
                }
            }
        });

        FanOutReport {
            outcomes: join_all(tasks).await,
        }
    }

    async fn stored_active(&self, key: &DedupKey) -> bool {
        let Some(store) = &self.store else {
            return false;
        };
        match store.get(&active_key(key)).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(dedup_key = %key, error = %e, "failed to read stored emergency key");
                false
            }
        }
    }

    async fn store_active(&self, key: &DedupKey) {
        let Some(store) = &self.store else {
            return;
        };
        let stamp = jiff::Timestamp::now().to_string().into_bytes();
        if let Err(e) = store.put(&active_key(key), stamp).await {
            warn!(dedup_key = %key, error = %e, "failed to store emergency key");
        }
    }
}
