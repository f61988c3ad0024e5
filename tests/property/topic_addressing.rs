// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topic Addressing
//!
//! Whatever one role publishes must land in the subscriptions of exactly the
//! counterpart it is addressed to.

use cim_cloudevents::options::topics::topic_matches;
use cim_cloudevents::{
    AgentOptions, CloudEventsDataType, CloudEventsOptions, EventAction, EventBuilder,
    EventSubResource, MemoryBroker, ResourceAction, SendContext, SourceOptions,
};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Identities that are valid topic levels, dots included
fn identity() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9._-]{0,23}"
}

/// Two distinct identities
fn identity_pair() -> impl Strategy<Value = (String, String)> {
    (identity(), identity()).prop_filter("identities must differ", |(a, b)| a != b)
}

fn data_type() -> CloudEventsDataType {
    CloudEventsDataType::new("io.open-cluster-management.works", "v1alpha1", "manifests")
}

fn topic_of(options: &dyn CloudEventsOptions, builder: &EventBuilder) -> String {
    let ctx = options
        .with_context(SendContext::new(), &builder.new_event())
        .unwrap();
    ctx.topic().unwrap().to_string()
}

fn subscribed(filters: &[String], topic: &str) -> bool {
    filters.iter().any(|filter| topic_matches(filter, topic))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: A spec reaches the addressed cluster and no other
    #[test]
    fn prop_spec_reaches_only_addressed_cluster(
        source_id in identity(),
        (cluster, other_cluster) in identity_pair(),
    ) {
        let source = SourceOptions::new(MemoryBroker::new(1), source_id.clone()).unwrap();
        let agent = AgentOptions::new(MemoryBroker::new(1), cluster.clone(), "agent").unwrap();
        let other = AgentOptions::new(MemoryBroker::new(1), other_cluster, "agent").unwrap();

        let builder = EventBuilder::new(
            source_id,
            data_type().event_type(EventSubResource::Spec, ResourceAction::Added),
        )
        .with_cluster_name(cluster);
        let topic = topic_of(&source, &builder);

        prop_assert!(subscribed(&agent.subscriptions(), &topic));
        prop_assert!(!subscribed(&other.subscriptions(), &topic));
    }

    /// Property: A status report reaches the original source and no other
    #[test]
    fn prop_status_reaches_only_original_source(
        (source_id, other_source_id) in identity_pair(),
        cluster in identity(),
    ) {
        let source = SourceOptions::new(MemoryBroker::new(1), source_id.clone()).unwrap();
        let other = SourceOptions::new(MemoryBroker::new(1), other_source_id).unwrap();
        let agent = AgentOptions::new(MemoryBroker::new(1), cluster.clone(), "agent").unwrap();

        let builder = EventBuilder::new(
            "agent",
            data_type().event_type(EventSubResource::Status, ResourceAction::StatusModified),
        )
        .with_original_source(source_id);
        let topic = topic_of(&agent, &builder);

        prop_assert!(subscribed(&source.subscriptions(), &topic));
        prop_assert!(!subscribed(&other.subscriptions(), &topic));
    }

    /// Property: Resync requests reach every counterpart
    #[test]
    fn prop_resync_requests_are_broadcast(
        (source_id, other_source_id) in identity_pair(),
        (cluster, other_cluster) in identity_pair(),
    ) {
        let source = SourceOptions::new(MemoryBroker::new(1), source_id.clone()).unwrap();
        let other_source = SourceOptions::new(MemoryBroker::new(1), other_source_id).unwrap();
        let agent = AgentOptions::new(MemoryBroker::new(1), cluster, "agent").unwrap();
        let other_agent = AgentOptions::new(MemoryBroker::new(1), other_cluster, "agent").unwrap();

        let status_resync = EventBuilder::new(
            source_id,
            data_type().event_type(EventSubResource::Status, EventAction::RESYNC_REQUEST),
        );
        let topic = topic_of(&source, &status_resync);
        prop_assert!(subscribed(&agent.subscriptions(), &topic));
        prop_assert!(subscribed(&other_agent.subscriptions(), &topic));

        let spec_resync = EventBuilder::new(
            "agent",
            data_type().event_type(EventSubResource::Spec, EventAction::RESYNC_REQUEST),
        );
        let topic = topic_of(&agent, &spec_resync);
        prop_assert!(subscribed(&source.subscriptions(), &topic));
        prop_assert!(subscribed(&other_source.subscriptions(), &topic));
    }
}
