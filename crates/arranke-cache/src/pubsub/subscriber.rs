//! Pattern subscriber for the aggregate feed.
//!
//! One task owns the Redis pub/sub connection and forwards every message on
//! a broadcast channel. Patterns are re-subscribed after a reconnect.

use crate::pubsub::{PubSubChannel, PubSubEvent};
use futures_util::StreamExt;
use redis::Client;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

const BROADCAST_BUFFER: usize = 1024;
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Subscriber task is gone")]
    ChannelClosed,
}

pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// A message as it arrived on a stats channel
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub channel: PubSubChannel,
    /// `None` when the payload is not a known event
    pub event: Option<PubSubEvent>,
    pub payload: String,
}

impl ReceivedMessage {
    fn from_redis(channel_name: &str, payload: String) -> Self {
        Self {
            channel: PubSubChannel::parse(channel_name),
            event: serde_json::from_str(&payload).ok(),
            payload,
        }
    }
}

#[derive(Debug)]
enum Command {
    PSubscribe(Vec<String>),
    Shutdown,
}

/// Handle to the background pub/sub task
pub struct Subscriber {
    messages: broadcast::Sender<ReceivedMessage>,
    control: mpsc::Sender<Command>,
}

impl Subscriber {
    fn spawn(client: Client) -> Self {
        let (messages, _) = broadcast::channel(BROADCAST_BUFFER);
        let (control, control_rx) = mpsc::channel(32);
        tokio::spawn(listen(client, messages.clone(), control_rx));
        Self { messages, control }
    }

    /// Subscribe to every channel matching the glob patterns
    pub async fn psubscribe(&self, patterns: &[String]) -> SubscriberResult<()> {
        self.send(Command::PSubscribe(patterns.to_vec())).await
    }

    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.messages.subscribe()
    }

    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> SubscriberResult<()> {
        self.control
            .send(command)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

async fn listen(
    client: Client,
    messages: broadcast::Sender<ReceivedMessage>,
    mut control: mpsc::Receiver<Command>,
) {
    let mut patterns = HashSet::new();
    loop {
        match run_connection(&client, &mut patterns, &messages, &mut control).await {
            Ok(true) => {
                tracing::info!("Subscriber stopped");
                break;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Subscriber connection lost, reconnecting");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Returns `Ok(true)` once shut down, `Ok(false)` when the stream ended.
async fn run_connection(
    client: &Client,
    patterns: &mut HashSet<String>,
    messages: &broadcast::Sender<ReceivedMessage>,
    control: &mut mpsc::Receiver<Command>,
) -> SubscriberResult<bool> {
    let mut pubsub = client.get_async_pubsub().await?;
    for pattern in patterns.iter() {
        pubsub.psubscribe(pattern).await?;
    }
    tracing::info!(patterns = patterns.len(), "Subscriber connected");

    let mut stream = pubsub.on_message();
    loop {
        tokio::select! {
            msg = stream.next() => {
                let Some(msg) = msg else {
                    tracing::warn!("Pub/sub stream ended");
                    return Ok(false);
                };
                let channel = msg.get_channel_name().to_string();
                let payload: String = msg.get_payload().unwrap_or_default();
                tracing::trace!(%channel, "Stats message");
                let _ = messages.send(ReceivedMessage::from_redis(&channel, payload));
            }
            cmd = control.recv() => match cmd {
                Some(Command::PSubscribe(added)) => {
                    drop(stream);
                    for pattern in added {
                        match pubsub.psubscribe(&pattern).await {
                            Ok(()) => {
                                tracing::debug!(%pattern, "Pattern subscribed");
                                patterns.insert(pattern);
                            }
                            Err(e) => tracing::error!(%pattern, error = %e, "Pattern subscribe failed"),
                        }
                    }
                    stream = pubsub.on_message();
                }
                Some(Command::Shutdown) | None => return Ok(true),
            },
        }
    }
}

pub struct SubscriberBuilder {
    redis_url: String,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = url.into();
        self
    }

    /// Fails on a malformed URL; connection errors are retried in the background.
    pub async fn build(self) -> SubscriberResult<Subscriber> {
        let client = Client::open(self.redis_url.as_str())?;
        Ok(Subscriber::spawn(client))
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arranke_core::ListingId;

    #[test]
    fn test_received_message_parsing() {
        let payload = r#"{"event_type":"AGGREGATE_CHANGED","data":{}}"#.to_string();
        let msg = ReceivedMessage::from_redis("listing_stats:proj-1", payload.clone());

        assert_eq!(
            msg.channel,
            PubSubChannel::ListingStats(ListingId::new("proj-1"))
        );
        assert!(msg.event.is_some());
        assert_eq!(msg.payload, payload);
    }

    #[test]
    fn test_received_message_invalid_json() {
        let msg = ReceivedMessage::from_redis("listing_stats:9", "invalid".to_string());
        assert!(msg.event.is_none());
        assert_eq!(msg.payload, "invalid");
    }

    #[tokio::test]
    async fn test_malformed_url_is_rejected() {
        let result = SubscriberBuilder::new().redis_url("not a url").build().await;
        assert!(matches!(result, Err(SubscriberError::Redis(_))));
    }
}
