// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resync Probe
//!
//! Joins the broker as a source or an agent, subscribes to that role's inbound
//! topics, publishes a resync request for one data type and logs whatever
//! arrives.
//!
//! Run with: cargo run --bin resync-probe
//!
//! Environment:
//! - `PROBE_ROLE`: `source` (default) or `agent`
//! - `SOURCE_ID`: source identity (source role, default `resync-probe`)
//! - `CLUSTER_NAME`, `AGENT_ID`: agent identity (agent role)
//! - `PROBE_DATA_TYPE`: `group.version.resource` to resync
//!   (default `io.open-cluster-management.works.v1alpha1.manifests`)
//! - `PROBE_DURATION_SECS`: how long to listen (default 30)
//! - `BROKER_URL` and friends: see `BrokerConfig::from_env`

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cim_cloudevents::{
    send_event, AgentOptions, BrokerConfig, CloudEventsDataType, CloudEventsOptions,
    CloudEventsType, EventAction, EventBuilder, EventSubResource, NatsConnector, SourceOptions,
};
use futures::StreamExt;
use tracing::{error, info, warn};

const DEFAULT_DATA_TYPE: &str = "io.open-cluster-management.works.v1alpha1.manifests";

/// Configuration for the probe
#[derive(Debug, Clone)]
struct ProbeConfig {
    role: Role,
    data_type: CloudEventsDataType,
    duration: Duration,
    broker: BrokerConfig,
}

#[derive(Debug, Clone)]
enum Role {
    Source { source_id: String },
    Agent { cluster_name: String, agent_id: String },
}

impl ProbeConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let role = match std::env::var("PROBE_ROLE").as_deref() {
            Ok("agent") => {
                let cluster_name = std::env::var("CLUSTER_NAME")
                    .context("CLUSTER_NAME is required for the agent role")?;
                let agent_id = std::env::var("AGENT_ID")
                    .unwrap_or_else(|_| format!("{}-resync-probe", cluster_name));
                Role::Agent {
                    cluster_name,
                    agent_id,
                }
            }
            Ok("source") | Err(_) => Role::Source {
                source_id: std::env::var("SOURCE_ID")
                    .unwrap_or_else(|_| "resync-probe".to_string()),
            },
            Ok(other) => bail!("unknown PROBE_ROLE {:?}, expected source or agent", other),
        };

        let data_type = parse_data_type(
            &std::env::var("PROBE_DATA_TYPE").unwrap_or_else(|_| DEFAULT_DATA_TYPE.to_string()),
        )?;

        let duration = std::env::var("PROBE_DURATION_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let broker = BrokerConfig::from_env().context("Invalid broker configuration")?;

        Ok(Self {
            role,
            data_type,
            duration,
            broker,
        })
    }
}

/// Split `group.version.resource`, where the group may contain dots
fn parse_data_type(s: &str) -> Result<CloudEventsDataType> {
    let mut segments = s.rsplitn(3, '.');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(resource), Some(version), Some(group)) => {
            Ok(CloudEventsDataType::new(group, version, resource))
        }
        _ => bail!("data type {:?} is not group.version.resource", s),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ProbeConfig::from_env()?;
    info!(role = ?config.role, data_type = %config.data_type, "Starting resync probe");

    let connector = NatsConnector::new(config.broker.clone());

    // A source asks agents for status; an agent asks sources for spec.
    let (options, identity, sub_resource): (Arc<dyn CloudEventsOptions>, String, EventSubResource) =
        match &config.role {
            Role::Source { source_id } => (
                SourceOptions::new(connector, source_id.clone())?
                    .into_source_options()
                    .options,
                source_id.clone(),
                EventSubResource::Status,
            ),
            Role::Agent {
                cluster_name,
                agent_id,
            } => (
                AgentOptions::new(connector, cluster_name.clone(), agent_id.clone())?
                    .into_agent_options()
                    .options,
                agent_id.clone(),
                EventSubResource::Spec,
            ),
        };

    let receiver = options
        .receiver()
        .await
        .context("Failed to create receiver")?;
    let mut events = receiver.subscribe().await.context("Failed to subscribe")?;

    let event_type = CloudEventsType::new(
        config.data_type.clone(),
        sub_resource,
        EventAction::RESYNC_REQUEST,
    );
    let request = EventBuilder::new(identity, event_type).new_event();
    send_event(options.as_ref(), &request)
        .await
        .context("Failed to publish resync request")?;
    info!(event_id = %request.id, event_type = %request.event_type, "Published resync request");

    let mut received = 0u64;
    let deadline = tokio::time::sleep(config.duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            next = events.next() => match next {
                Some(Ok(event)) => {
                    received += 1;
                    info!(
                        event_id = %event.id,
                        event_type = %event.event_type,
                        source = %event.source,
                        resource_id = ?event.resource_id(),
                        cluster_name = ?event.cluster_name(),
                        "Received event"
                    );
                }
                Some(Err(e)) => error!(error = %e, "Failed to receive event"),
                None => {
                    warn!("Event stream ended");
                    break;
                }
            },
        }
    }

    info!(received, "Resync probe finished");
    Ok(())
}
