// Copyright (c) 2025 - Cowboy AI, Inc.

//! Cloud event options: addressing plus client construction per role
//!
//! A participant never talks to the transport directly. It holds a
//! [`CloudEventsOptions`] that knows, for its role and identity,
//!
//! - which topic an outgoing event goes to ([`CloudEventsOptions::with_context`]),
//! - how to obtain a publishing client ([`CloudEventsOptions::sender`]),
//! - how to obtain a client subscribed to its inbound topics
//!   ([`CloudEventsOptions::receiver`]).
//!
//! The role implementations live in [`source`] and [`agent`]; both are generic
//! over a [`Connector`], the seam through which transports are plugged in.

pub mod agent;
pub mod source;
pub mod topics;

use std::sync::Arc;

use futures::stream::BoxStream;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::errors::{CloudEventsError, CloudEventsResult};
use crate::event::Event;

pub use agent::AgentOptions;
pub use source::SourceOptions;

/// Stream of events decoded from a subscription
pub type EventStream = BoxStream<'static, CloudEventsResult<Event>>;

/// Per-send context carrying what the transport needs to deliver an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendContext {
    topic: Option<String>,
}

impl SendContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the resolved topic
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }
}

/// A transport client that sends and receives cloud events
#[async_trait::async_trait]
pub trait CloudEventsClient: Send + Sync {
    /// Send an event to the topic carried by `ctx`
    async fn send(&self, ctx: &SendContext, event: &Event) -> CloudEventsResult<()>;

    /// Subscribe to the topics this client was created for
    async fn subscribe(&self) -> CloudEventsResult<EventStream>;
}

/// Creates transport clients
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    /// Connect a client named `client_id`; `subscriptions` is empty for
    /// publish-only clients
    async fn connect(
        &self,
        client_id: &str,
        subscriptions: &[String],
    ) -> CloudEventsResult<Arc<dyn CloudEventsClient>>;
}

/// Provides cloud event clients for one participant on one transport
#[async_trait::async_trait]
pub trait CloudEventsOptions: Send + Sync {
    /// Resolve where `event` must be sent and return `ctx` augmented with it
    fn with_context(&self, ctx: SendContext, event: &Event) -> CloudEventsResult<SendContext>;

    /// Client for sending events. Created once, then shared.
    async fn sender(&self) -> CloudEventsResult<Arc<dyn CloudEventsClient>>;

    /// Client subscribed to this participant's inbound topics. Created once,
    /// then shared.
    async fn receiver(&self) -> CloudEventsResult<Arc<dyn CloudEventsClient>>;
}

/// Options a source client is built from
#[derive(Clone)]
pub struct CloudEventsSourceOptions {
    pub options: Arc<dyn CloudEventsOptions>,

    /// Unique identifier of the source, e.g. a hash of the hub URL plus the
    /// controller name
    pub source_id: String,
}

/// Options an agent client is built from
#[derive(Clone)]
pub struct CloudEventsAgentOptions {
    pub options: Arc<dyn CloudEventsOptions>,

    /// Unique identifier of the agent, e.g. cluster name plus agent name
    pub agent_id: String,

    /// Managed cluster the agent runs on
    pub cluster_name: String,
}

/// Address `event` through `options` and send it with the participant's sender
pub async fn send_event(options: &dyn CloudEventsOptions, event: &Event) -> CloudEventsResult<()> {
    let ctx = options.with_context(SendContext::new(), event)?;
    let sender = options.sender().await?;
    sender.send(&ctx, event).await
}

/// Lazily connected publish and subscribe clients of one participant
pub(crate) struct ClientCache<C> {
    connector: C,
    sender: OnceCell<Arc<dyn CloudEventsClient>>,
    receiver: OnceCell<Arc<dyn CloudEventsClient>>,
}

impl<C: Connector> ClientCache<C> {
    pub(crate) fn new(connector: C) -> Self {
        Self {
            connector,
            sender: OnceCell::new(),
            receiver: OnceCell::new(),
        }
    }

    pub(crate) async fn sender(&self, identity: &str) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        let client_id = format!("{}-pub-client", identity);
        self.sender
            .get_or_try_init(|| async {
                debug!(client_id = %client_id, "Connecting publish client");
                self.connector.connect(&client_id, &[]).await
            })
            .await
            .cloned()
    }

    pub(crate) async fn receiver(
        &self,
        identity: &str,
        subscriptions: Vec<String>,
    ) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        let client_id = format!("{}-sub-client", identity);
        self.receiver
            .get_or_try_init(|| async {
                debug!(client_id = %client_id, ?subscriptions, "Connecting subscribe client");
                self.connector.connect(&client_id, &subscriptions).await
            })
            .await
            .cloned()
    }
}

/// Require a topic on `ctx`, naming `event` in the error
pub(crate) fn require_topic<'a>(ctx: &'a SendContext, event: &Event) -> CloudEventsResult<&'a str> {
    ctx.topic()
        .ok_or_else(|| CloudEventsError::MissingTopic(event.id.clone()))
}
