// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-cloudevents
//!
//! Provides deterministic identities, timestamps and events shared by the
//! integration tests. Events built here carry fixed IDs and times so that
//! assertions can compare whole envelopes.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::json;

use cim_cloudevents::types::{
    EXTENSION_CLUSTER_NAME, EXTENSION_ORIGINAL_SOURCE, EXTENSION_RESOURCE_ID,
    EXTENSION_RESOURCE_VERSION,
};
use cim_cloudevents::{
    CloudEventsDataType, CloudEventsType, Event, EventAction, EventSubResource, ResourceAction,
};

pub const SOURCE_ID: &str = "hub-work-controller";
pub const OTHER_SOURCE_ID: &str = "hub-addon-controller";

pub const CLUSTER_1: &str = "cluster1";
pub const CLUSTER_2: &str = "cluster2";

pub const AGENT_ID_1: &str = "cluster1-work-agent";
pub const AGENT_ID_2: &str = "cluster2-work-agent";

// Fixed test UUIDs (UUID v7 format, but deterministic for testing)
pub const EVENT_ID_1: &str = "01934f4a-0001-7000-8000-000000000001";
pub const EVENT_ID_2: &str = "01934f4a-0002-7000-8000-000000000002";

pub const RESOURCE_ID_1: &str = "01934f4a-1000-7000-8000-000000001000";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// The manifest work data type
pub fn manifests() -> CloudEventsDataType {
    CloudEventsDataType::new("io.open-cluster-management.works", "v1alpha1", "manifests")
}

pub fn event_type(sub_resource: EventSubResource, action: impl Into<EventAction>) -> CloudEventsType {
    manifests().event_type(sub_resource, action)
}

/// A spec created by `SOURCE_ID` for `cluster_name`
pub fn spec_added_fixture(cluster_name: &str) -> Event {
    let mut event = Event::new(
        EVENT_ID_1,
        event_type(EventSubResource::Spec, ResourceAction::Added).to_string(),
        SOURCE_ID,
    )
    .with_json_data(json!({
        "manifests": [{"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": "test"}}]
    }));
    event.time = Some(fixed_timestamp());
    event.set_extension(EXTENSION_RESOURCE_ID, RESOURCE_ID_1);
    event.set_extension(EXTENSION_RESOURCE_VERSION, 1i64);
    event.set_extension(EXTENSION_CLUSTER_NAME, cluster_name);
    event
}

/// A status report from an agent about `RESOURCE_ID_1`, addressed to `original_source`
pub fn status_modified_fixture(agent_id: &str, original_source: &str) -> Event {
    let mut event = Event::new(
        EVENT_ID_2,
        event_type(EventSubResource::Status, ResourceAction::StatusModified).to_string(),
        agent_id,
    )
    .with_json_data(json!({"conditions": [{"type": "Applied", "status": "True"}]}));
    event.time = Some(fixed_timestamp());
    event.set_extension(EXTENSION_RESOURCE_ID, RESOURCE_ID_1);
    event.set_extension(EXTENSION_RESOURCE_VERSION, 1i64);
    event.set_extension(EXTENSION_ORIGINAL_SOURCE, original_source);
    event
}
