use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

/// In-memory halt flags for live campaign workers.
///
/// Pause and stop raise the flag after their status flip is persisted; the
/// worker checks it before every recipient and while sleeping.
#[derive(Clone, Default)]
pub struct ControlSignals {
    inner: Arc<Mutex<HashMap<Uuid, (u64, watch::Sender<bool>)>>>,
    generation: Arc<AtomicU64>,
}

/// The worker's end of a campaign's halt flag
pub struct ControlHandle {
    campaign_id: Uuid,
    generation: u64,
    halted: watch::Receiver<bool>,
}

impl ControlSignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh, lowered flag for a worker starting on `campaign_id`
    pub fn register(&self, campaign_id: Uuid) -> ControlHandle {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let (sender, halted) = watch::channel(false);

        if let Ok(mut inner) = self.inner.lock() {
            inner.insert(campaign_id, (generation, sender));
        }

        ControlHandle {
            campaign_id,
            generation,
            halted,
        }
    }

    /// Raise the flag of the campaign's live worker, if any
    pub fn halt(&self, campaign_id: Uuid) -> bool {
        let Ok(inner) = self.inner.lock() else {
            return false;
        };

        match inner.get(&campaign_id) {
            Some((_, sender)) => {
                sender.send_replace(true);
                true
            }
            None => false,
        }
    }

    /// Drop the worker's flag unless a newer worker replaced it
    pub fn release(&self, handle: &ControlHandle) {
        if let Ok(mut inner) = self.inner.lock()
            && inner
                .get(&handle.campaign_id)
                .is_some_and(|(generation, _)| *generation == handle.generation)
        {
            inner.remove(&handle.campaign_id);
        }
    }

    pub fn is_registered(&self, campaign_id: Uuid) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.contains_key(&campaign_id))
            .unwrap_or(false)
    }
}

impl ControlHandle {
    pub fn is_halted(&self) -> bool {
        *self.halted.borrow()
    }

    /// Resolves once the flag is raised
    pub async fn halted(&mut self) {
        if self.halted.wait_for(|halted| *halted).await.is_err() {
            // Registry dropped the sender; nobody can halt us any more
            std::future::pending::<()>().await;
        }
    }
}
