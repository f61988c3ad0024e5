// Copyright (c) 2025 - Cowboy AI, Inc.

//! In-process broker
//!
//! Delivers events between clients of the same [`MemoryBroker`] using MQTT
//! topic filter matching. Useful for wiring sources and agents together in
//! tests or within a single process.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::errors::{CloudEventsError, CloudEventsResult};
use crate::event::Event;
use crate::options::topics::topic_matches;
use crate::options::{require_topic, CloudEventsClient, Connector, EventStream, SendContext};

#[derive(Debug, Clone)]
struct Delivery {
    topic: String,
    event: Event,
}

/// A broadcast bus shared by every client it connects
#[derive(Debug, Clone)]
pub struct MemoryBroker {
    tx: broadcast::Sender<Delivery>,
}

impl MemoryBroker {
    /// Create a broker that buffers up to `capacity` undelivered events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Client that publishes and subscribes to `subscriptions`
    pub fn client(&self, client_id: impl Into<String>, subscriptions: Vec<String>) -> MemoryClient {
        MemoryClient {
            client_id: client_id.into(),
            subscriptions,
            tx: self.tx.clone(),
        }
    }
}

impl Default for MemoryBroker {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait::async_trait]
impl Connector for MemoryBroker {
    async fn connect(
        &self,
        client_id: &str,
        subscriptions: &[String],
    ) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        info!(client_id = %client_id, "Connected in-memory client");
        Ok(Arc::new(self.client(client_id, subscriptions.to_vec())))
    }
}

/// Client of a [`MemoryBroker`]
#[derive(Debug, Clone)]
pub struct MemoryClient {
    client_id: String,
    subscriptions: Vec<String>,
    tx: broadcast::Sender<Delivery>,
}

impl MemoryClient {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn subscriptions(&self) -> &[String] {
        &self.subscriptions
    }
}

#[async_trait::async_trait]
impl CloudEventsClient for MemoryClient {
    async fn send(&self, ctx: &SendContext, event: &Event) -> CloudEventsResult<()> {
        let topic = require_topic(ctx, event)?;
        let delivery = Delivery {
            topic: topic.to_string(),
            event: event.clone(),
        };

        match self.tx.send(delivery) {
            Ok(receivers) => debug!(topic = %topic, receivers, "Published event"),
            // Pub/sub semantics: nobody listening is not an error.
            Err(_) => debug!(topic = %topic, "Published event with no subscribers"),
        }
        Ok(())
    }

    async fn subscribe(&self) -> CloudEventsResult<EventStream> {
        if self.subscriptions.is_empty() {
            return Err(CloudEventsError::Subscribe(format!(
                "client {} has no subscriptions",
                self.client_id
            )));
        }

        let rx = self.tx.subscribe();
        let filters = self.subscriptions.clone();
        info!(client_id = %self.client_id, subscriptions = ?filters, "Subscribed in-memory client");

        let stream = futures::stream::unfold((rx, filters), |(mut rx, filters)| async move {
            loop {
                match rx.recv().await {
                    Ok(delivery) => {
                        if filters.iter().any(|f| topic_matches(f, &delivery.topic)) {
                            return Some((Ok(delivery.event), (rx, filters)));
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "In-memory subscriber lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(stream.boxed())
    }
}
