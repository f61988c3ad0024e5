// Copyright (c) 2025 - Cowboy AI, Inc.

//! Agent-role options
//!
//! An agent reports resource status back to the source that produced the
//! resource and asks every source for a spec resync. It listens for specs
//! addressed to its cluster from any source and for status resync requests
//! from any source.

use std::sync::Arc;

use tracing::debug;

use super::topics::{
    validate_topic_level, SPEC_RESYNC_TOPIC, SPEC_TOPIC, STATUS_RESYNC_TOPIC, STATUS_TOPIC,
};
use super::{
    ClientCache, CloudEventsAgentOptions, CloudEventsClient, CloudEventsOptions, Connector,
    SendContext,
};
use crate::errors::{CloudEventsError, CloudEventsResult};
use crate::event::Event;
use crate::types::EXTENSION_ORIGINAL_SOURCE;

/// Options of an agent participant on a pub/sub transport
pub struct AgentOptions<C> {
    cluster_name: String,
    agent_id: String,
    clients: ClientCache<C>,
}

impl<C: Connector> AgentOptions<C> {
    /// Create options for the agent `agent_id` running on `cluster_name`
    ///
    /// The cluster name is bound into topics and must be a valid topic level.
    pub fn new(
        connector: C,
        cluster_name: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> CloudEventsResult<Self> {
        let cluster_name = cluster_name.into();
        let agent_id = agent_id.into();
        validate_topic_level(&cluster_name)?;
        if agent_id.is_empty() {
            return Err(CloudEventsError::Configuration("agent id must not be empty".to_string()));
        }
        Ok(Self {
            cluster_name,
            agent_id,
            clients: ClientCache::new(connector),
        })
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Topic an outgoing event is published to
    ///
    /// A resync request goes to every source on the spec resync topic.
    /// Anything else is a status report for the source named by the
    /// `originalsource` extension.
    pub fn publish_topic(&self, event: &Event) -> CloudEventsResult<String> {
        let event_type = event
            .cloud_events_type()
            .map_err(|e| CloudEventsError::unsupported_event_type(&event.event_type, e))?;

        if event_type.action.is_resync_request() {
            return SPEC_RESYNC_TOPIC.resolve(&[self.cluster_name.as_str()]);
        }

        let original_source = event.required_extension(EXTENSION_ORIGINAL_SOURCE)?.to_string();
        STATUS_TOPIC.resolve(&[original_source.as_str(), self.cluster_name.as_str()])
    }

    /// Topic filters the receiver subscribes to
    pub fn subscriptions(&self) -> Vec<String> {
        vec![
            SPEC_TOPIC.bind(&[None, Some(self.cluster_name.as_str())]),
            STATUS_RESYNC_TOPIC.as_str().to_string(),
        ]
    }

    /// Bundle these options with the agent identity
    pub fn into_agent_options(self) -> CloudEventsAgentOptions
    where
        C: 'static,
    {
        let agent_id = self.agent_id.clone();
        let cluster_name = self.cluster_name.clone();
        CloudEventsAgentOptions {
            options: Arc::new(self),
            agent_id,
            cluster_name,
        }
    }
}

#[async_trait::async_trait]
impl<C: Connector> CloudEventsOptions for AgentOptions<C> {
    fn with_context(&self, ctx: SendContext, event: &Event) -> CloudEventsResult<SendContext> {
        let topic = self.publish_topic(event)?;
        debug!(
            agent_id = %self.agent_id,
            event_id = %event.id,
            topic = %topic,
            "Resolved agent publish topic"
        );
        Ok(ctx.with_topic(topic))
    }

    async fn sender(&self) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        self.clients.sender(&self.agent_id).await
    }

    async fn receiver(&self) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        self.clients
            .receiver(&self.agent_id, self.subscriptions())
            .await
    }
}
