// Copyright (c) 2025 - Cowboy AI, Inc.

//! Builder for outbound cloud events
//!
//! The builder accumulates the routing extensions once and can then stamp out
//! any number of events. Each call to [`EventBuilder::new_event`] produces a
//! fresh ID and timestamp; the accumulated fields are shared.
//!
//! ```rust
//! use cim_cloudevents::builder::EventBuilder;
//! use cim_cloudevents::types::{CloudEventsDataType, EventSubResource, ResourceAction};
//!
//! let event_type = CloudEventsDataType::new("io.open-cluster-management.works", "v1alpha1", "manifests")
//!     .event_type(EventSubResource::Spec, ResourceAction::Added);
//!
//! let builder = EventBuilder::new("hub-controller", event_type)
//!     .with_resource_id("0b8f3c")
//!     .with_resource_version(1)
//!     .with_cluster_name("cluster1");
//!
//! let first = builder.new_event();
//! let second = builder.new_event();
//! assert_ne!(first.id, second.id);
//! assert_eq!(first.cluster_name(), second.cluster_name());
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::Event;
use crate::types::{
    CloudEventsType, EXTENSION_CLUSTER_NAME, EXTENSION_DELETION_TIMESTAMP,
    EXTENSION_ORIGINAL_SOURCE, EXTENSION_RESOURCE_ID, EXTENSION_RESOURCE_VERSION,
};

/// Builder for outbound cloud events
#[derive(Debug, Clone)]
pub struct EventBuilder {
    source: String,
    event_type: CloudEventsType,
    cluster_name: String,
    original_source: String,
    resource_id: String,
    resource_version: Option<i64>,
    deletion_timestamp: Option<DateTime<Utc>>,
}

impl EventBuilder {
    /// Create a builder for events emitted by `source`
    pub fn new(source: impl Into<String>, event_type: CloudEventsType) -> Self {
        Self {
            source: source.into(),
            event_type,
            cluster_name: String::new(),
            original_source: String::new(),
            resource_id: String::new(),
            resource_version: None,
            deletion_timestamp: None,
        }
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// Set the resource version. Zero is a valid version and is emitted.
    pub fn with_resource_version(mut self, resource_version: i64) -> Self {
        self.resource_version = Some(resource_version);
        self
    }

    pub fn with_cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    pub fn with_original_source(mut self, original_source: impl Into<String>) -> Self {
        self.original_source = original_source.into();
        self
    }

    pub fn with_deletion_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.deletion_timestamp = Some(timestamp);
        self
    }

    pub fn event_type(&self) -> &CloudEventsType {
        &self.event_type
    }

    /// Build a new event
    ///
    /// Empty string fields and unset optional fields are left out of the
    /// extensions entirely.
    pub fn new_event(&self) -> Event {
        let mut event = Event::new(
            Uuid::now_v7().to_string(),
            self.event_type.to_string(),
            self.source.clone(),
        );
        event.time = Some(Utc::now());

        if !self.resource_id.is_empty() {
            event.set_extension(EXTENSION_RESOURCE_ID, self.resource_id.as_str());
        }

        if let Some(resource_version) = self.resource_version {
            event.set_extension(EXTENSION_RESOURCE_VERSION, resource_version);
        }

        if !self.cluster_name.is_empty() {
            event.set_extension(EXTENSION_CLUSTER_NAME, self.cluster_name.as_str());
        }

        if !self.original_source.is_empty() {
            event.set_extension(EXTENSION_ORIGINAL_SOURCE, self.original_source.as_str());
        }

        if let Some(deletion_timestamp) = self.deletion_timestamp {
            event.set_extension(EXTENSION_DELETION_TIMESTAMP, deletion_timestamp);
        }

        event
    }
}
