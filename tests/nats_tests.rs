//! Tests for the NATS transport aligned with user stories

mod fixtures;

use std::time::Duration;

use futures::StreamExt;

use cim_cloudevents::nats::topic_to_subject;
use cim_cloudevents::{
    send_event, AgentOptions, BrokerConfig, CloudEventsError, Connector, NatsConnector,
    SourceOptions,
};
use fixtures::*;

/// User Story: Sources and agents exchange events through a NATS broker
///
/// As a hub operator
/// I want the source and the agents to talk over an existing NATS deployment
/// So that MQTT peers on the same server share the topic space
///
/// Acceptance Criteria:
/// - Broker configuration has usable defaults
/// - MQTT topics map onto the subjects the server's MQTT gateway uses
/// - Events published by one role arrive intact at the addressed counterpart
#[test]
fn test_broker_config_defaults() {
    let config = BrokerConfig::default();

    assert_eq!(config.servers, vec!["nats://localhost:4222".to_string()]);
    assert_eq!(config.connect_timeout, Duration::from_secs(60));
    assert!(config.validate().is_ok());
}

#[test]
fn test_subscriptions_map_to_wildcard_subjects() {
    let agent = AgentOptions::new(NatsConnector::default(), CLUSTER_1, AGENT_ID_1).unwrap();
    let subjects: Vec<String> = agent
        .subscriptions()
        .iter()
        .map(|topic| topic_to_subject(topic))
        .collect();

    assert_eq!(
        subjects,
        vec![
            "sources.*.clusters.cluster1.spec".to_string(),
            "sources.*.clusters.statusresync".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_connect_to_unreachable_broker_fails() {
    let connector = NatsConnector::new(BrokerConfig {
        servers: vec!["nats://127.0.0.1:1".to_string()],
        connect_timeout: Duration::from_secs(1),
        ..Default::default()
    });

    match connector.connect("unreachable-pub-client", &[]).await {
        Err(CloudEventsError::Connection(_)) => {}
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("connected to an unreachable broker"),
    }
}

#[tokio::test]
#[ignore = "requires NATS server"]
async fn test_spec_round_trip_over_nats() {
    // Given a source and an agent on the broker from BROKER_URL
    let config = BrokerConfig::from_env().unwrap();
    let hub = SourceOptions::new(NatsConnector::new(config.clone()), SOURCE_ID)
        .unwrap()
        .into_source_options();
    let agent = AgentOptions::new(NatsConnector::new(config), CLUSTER_1, AGENT_ID_1)
        .unwrap()
        .into_agent_options();

    let mut inbox = agent
        .options
        .receiver()
        .await
        .unwrap()
        .subscribe()
        .await
        .unwrap();

    // Let the subscription reach the server before publishing
    tokio::time::sleep(Duration::from_millis(200)).await;

    // When the source publishes a spec for cluster1
    let spec = spec_added_fixture(CLUSTER_1);
    send_event(hub.options.as_ref(), &spec).await.unwrap();

    // Then the agent receives it with every attribute intact
    let received = tokio::time::timeout(Duration::from_secs(5), inbox.next())
        .await
        .expect("timed out waiting for spec")
        .expect("stream ended")
        .unwrap();
    assert_eq!(received, spec);
}

#[tokio::test]
#[ignore = "requires NATS server"]
async fn test_status_round_trip_over_nats() {
    let config = BrokerConfig::from_env().unwrap();
    let hub = SourceOptions::new(NatsConnector::new(config.clone()), SOURCE_ID)
        .unwrap()
        .into_source_options();
    let agent = AgentOptions::new(NatsConnector::new(config), CLUSTER_1, AGENT_ID_1)
        .unwrap()
        .into_agent_options();

    let mut inbox = hub
        .options
        .receiver()
        .await
        .unwrap()
        .subscribe()
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let status = status_modified_fixture(AGENT_ID_1, SOURCE_ID);
    send_event(agent.options.as_ref(), &status).await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), inbox.next())
        .await
        .expect("timed out waiting for status")
        .expect("stream ended")
        .unwrap();
    assert_eq!(received, status);
}
