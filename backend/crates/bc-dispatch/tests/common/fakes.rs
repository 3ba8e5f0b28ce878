use bc_core::{
    CollaboratorResult, DeliveryReceipt, MessageTransport, ProgressEvent, ProgressPublisher,
    SenderIdentity, SenderSource, TransportError,
};

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCall {
    pub sender_id: String,
    pub destination: String,
    pub text: String,
}

/// Transport that succeeds unless a rule says otherwise
#[derive(Default)]
pub struct ScriptedTransport {
    /// (sender, destination) -> error; destination "*" matches all
    failures: Mutex<HashMap<(String, String), TransportError>>,
    latency: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<SendCall>>,
    notifier: Mutex<Option<mpsc::UnboundedSender<usize>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receives the running call count at the start of every send
    pub fn with_notifier() -> (Self, mpsc::UnboundedReceiver<usize>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self::new();
        *transport.notifier.lock().unwrap() = Some(tx);
        (transport, rx)
    }

    pub fn fail(&self, sender_id: &str, destination: &str, error: TransportError) {
        self.failures
            .lock()
            .unwrap()
            .insert((sender_id.to_string(), destination.to_string()), error);
    }

    pub fn fail_all(&self, sender_id: &str, error: TransportError) {
        self.fail(sender_id, "*", error);
    }

    pub fn slow(&self, sender_id: &str, latency: Duration) {
        self.latency
            .lock()
            .unwrap()
            .insert(sender_id.to_string(), latency);
    }

    pub fn calls(&self) -> Vec<SendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, destination: &str) -> Vec<SendCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.destination == destination)
            .collect()
    }
}

#[async_trait]
impl MessageTransport for ScriptedTransport {
    async fn send(
        &self,
        sender_id: &str,
        destination: &str,
        text: &str,
    ) -> Result<DeliveryReceipt, TransportError> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(SendCall {
                sender_id: sender_id.to_string(),
                destination: destination.to_string(),
                text: text.to_string(),
            });
            calls.len()
        };
        if let Some(tx) = self.notifier.lock().unwrap().as_ref() {
            let _ = tx.send(count);
        }

        let latency = self.latency.lock().unwrap().get(sender_id).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let failure = {
            let failures = self.failures.lock().unwrap();
            failures
                .get(&(sender_id.to_string(), destination.to_string()))
                .or_else(|| failures.get(&(sender_id.to_string(), "*".to_string())))
                .cloned()
        };

        match failure {
            Some(error) => Err(error),
            None => Ok(DeliveryReceipt {
                provider_message_id: Some(format!("msg-{}", count)),
            }),
        }
    }
}

/// Sender source returning a fixed pool, optionally only for a number of calls
pub struct FakeSenderSource {
    identities: Mutex<Vec<SenderIdentity>>,
    remaining_calls: Mutex<Option<usize>>,
}

impl FakeSenderSource {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            identities: Mutex::new(
                ids.iter()
                    .map(|id| SenderIdentity::new(*id, format!("+{}", id), true))
                    .collect(),
            ),
            remaining_calls: Mutex::new(None),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn set_usable(&self, id: &str, usable: bool) {
        for identity in self.identities.lock().unwrap().iter_mut() {
            if identity.id == id {
                identity.usable = usable;
            }
        }
    }

    /// After `calls` lookups every identity reports unusable
    pub fn exhaust_after(&self, calls: usize) {
        *self.remaining_calls.lock().unwrap() = Some(calls);
    }
}

#[async_trait]
impl SenderSource for FakeSenderSource {
    async fn senders(&self, _owner_id: Uuid) -> CollaboratorResult<Vec<SenderIdentity>> {
        let mut remaining = self.remaining_calls.lock().unwrap();
        if let Some(left) = remaining.as_mut() {
            if *left == 0 {
                return Ok(Vec::new());
            }
            *left -= 1;
        }
        Ok(self.identities.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(Uuid, ProgressEvent)>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn events_for(&self, campaign_id: Uuid) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == campaign_id)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

#[async_trait]
impl ProgressPublisher for RecordingPublisher {
    async fn publish(&self, campaign_id: Uuid, event: ProgressEvent) -> usize {
        self.events.lock().unwrap().push((campaign_id, event));
        1
    }
}
