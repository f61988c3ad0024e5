// Copyright (c) 2025 - Cowboy AI, Inc.

//! Source-role options
//!
//! A source pushes resource specs to individual clusters and asks every
//! cluster for a status resync. It listens for status reports addressed to it
//! and for spec resync requests from any cluster.

use std::sync::Arc;

use tracing::debug;

use super::topics::{
    validate_topic_level, SPEC_RESYNC_TOPIC, SPEC_TOPIC, STATUS_RESYNC_TOPIC, STATUS_TOPIC,
};
use super::{
    ClientCache, CloudEventsClient, CloudEventsOptions, CloudEventsSourceOptions, Connector,
    SendContext,
};
use crate::errors::{CloudEventsError, CloudEventsResult};
use crate::event::Event;
use crate::types::EXTENSION_CLUSTER_NAME;

/// Options of a source participant on a pub/sub transport
pub struct SourceOptions<C> {
    source_id: String,
    clients: ClientCache<C>,
}

impl<C: Connector> SourceOptions<C> {
    /// Create options for `source_id`, which must be usable as a topic level
    pub fn new(connector: C, source_id: impl Into<String>) -> CloudEventsResult<Self> {
        let source_id = source_id.into();
        validate_topic_level(&source_id)?;
        Ok(Self {
            source_id,
            clients: ClientCache::new(connector),
        })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Topic an outgoing event is published to
    ///
    /// A resync request goes to every cluster on the status resync topic.
    /// Anything else is a spec for the cluster named by the `clustername`
    /// extension.
    pub fn publish_topic(&self, event: &Event) -> CloudEventsResult<String> {
        let event_type = event
            .cloud_events_type()
            .map_err(|e| CloudEventsError::unsupported_event_type(&event.event_type, e))?;

        if event_type.action.is_resync_request() {
            return STATUS_RESYNC_TOPIC.resolve(&[self.source_id.as_str()]);
        }

        let cluster_name = event.required_extension(EXTENSION_CLUSTER_NAME)?.to_string();
        SPEC_TOPIC.resolve(&[self.source_id.as_str(), cluster_name.as_str()])
    }

    /// Topic filters the receiver subscribes to
    pub fn subscriptions(&self) -> Vec<String> {
        vec![
            STATUS_TOPIC.bind(&[Some(self.source_id.as_str())]),
            SPEC_RESYNC_TOPIC.as_str().to_string(),
        ]
    }

    /// Bundle these options with the source identity
    pub fn into_source_options(self) -> CloudEventsSourceOptions
    where
        C: 'static,
    {
        let source_id = self.source_id.clone();
        CloudEventsSourceOptions {
            options: Arc::new(self),
            source_id,
        }
    }
}

#[async_trait::async_trait]
impl<C: Connector> CloudEventsOptions for SourceOptions<C> {
    fn with_context(&self, ctx: SendContext, event: &Event) -> CloudEventsResult<SendContext> {
        let topic = self.publish_topic(event)?;
        debug!(
            source_id = %self.source_id,
            event_id = %event.id,
            topic = %topic,
            "Resolved source publish topic"
        );
        Ok(ctx.with_topic(topic))
    }

    async fn sender(&self) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        self.clients.sender(&self.source_id).await
    }

    async fn receiver(&self) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        self.clients
            .receiver(&self.source_id, self.subscriptions())
            .await
    }
}
