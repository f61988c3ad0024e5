// Copyright (c) 2025 - Cowboy AI, Inc.

//! Cloud event envelope
//!
//! The envelope is carried on the wire in CloudEvents 1.0 structured JSON
//! mode: context attributes and extensions are top-level members next to
//! `data`.
//!
//! ```text
//! {
//!   "specversion": "1.0",
//!   "id": "01934f4a-0001-7000-8000-000000000001",
//!   "type": "io.open-cluster-management.works.v1alpha1.manifests.spec.ADDED",
//!   "source": "hub-controller",
//!   "time": "2026-01-19T12:00:00Z",
//!   "resourceid": "0b8f...",
//!   "resourceversion": 3,
//!   "clustername": "cluster1"
//! }
//! ```
//!
//! Routing only ever reads the type and the extensions, never `data`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CloudEventsError, CloudEventsResult};
use crate::types::{
    CloudEventsType, EXTENSION_CLUSTER_NAME, EXTENSION_DELETION_TIMESTAMP,
    EXTENSION_ORIGINAL_SOURCE, EXTENSION_RESOURCE_ID, EXTENSION_RESOURCE_VERSION,
};

/// CloudEvents specification version written by this crate
pub const SPEC_VERSION: &str = "1.0";

/// Value of an event extension attribute
///
/// Timestamps are stored as RFC 3339 strings, which is how structured JSON
/// carries them anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl ExtensionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtensionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ExtensionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// Canonical stringification used when an extension value is bound into a topic
impl fmt::Display for ExtensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionValue::Boolean(b) => write!(f, "{}", b),
            ExtensionValue::Integer(i) => write!(f, "{}", i),
            ExtensionValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ExtensionValue {
    fn from(value: &str) -> Self {
        ExtensionValue::String(value.to_string())
    }
}

impl From<String> for ExtensionValue {
    fn from(value: String) -> Self {
        ExtensionValue::String(value)
    }
}

impl From<i64> for ExtensionValue {
    fn from(value: i64) -> Self {
        ExtensionValue::Integer(value)
    }
}

impl From<bool> for ExtensionValue {
    fn from(value: bool) -> Self {
        ExtensionValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for ExtensionValue {
    fn from(value: DateTime<Utc>) -> Self {
        ExtensionValue::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

/// A cloud event as exchanged between sources and agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "specversion")]
    pub spec_version: String,

    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    #[serde(
        rename = "datacontenttype",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub data_content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(flatten)]
    extensions: BTreeMap<String, ExtensionValue>,
}

impl Event {
    /// Create an event with the required context attributes and no extensions
    pub fn new(
        id: impl Into<String>,
        event_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            id: id.into(),
            event_type: event_type.into(),
            source: source.into(),
            time: None,
            data_content_type: None,
            data: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Attach a JSON payload
    pub fn with_json_data(mut self, data: serde_json::Value) -> Self {
        self.data_content_type = Some("application/json".to_string());
        self.data = Some(data);
        self
    }

    pub fn set_extension(&mut self, name: impl Into<String>, value: impl Into<ExtensionValue>) {
        self.extensions.insert(name.into(), value.into());
    }

    pub fn extension(&self, name: &str) -> Option<&ExtensionValue> {
        self.extensions.get(name)
    }

    /// Extension lookup that treats absence as an error
    pub fn required_extension(&self, name: &str) -> CloudEventsResult<&ExtensionValue> {
        self.extension(name)
            .ok_or_else(|| CloudEventsError::MissingExtension(name.to_string()))
    }

    pub fn extensions(&self) -> &BTreeMap<String, ExtensionValue> {
        &self.extensions
    }

    /// Parse the type attribute
    pub fn cloud_events_type(&self) -> CloudEventsResult<CloudEventsType> {
        CloudEventsType::parse(&self.event_type)
    }

    pub fn resource_id(&self) -> Option<String> {
        self.extension(EXTENSION_RESOURCE_ID).map(ToString::to_string)
    }

    /// Resource version, if carried
    ///
    /// Integer-valued strings are accepted since some producers stringify
    /// every extension.
    pub fn resource_version(&self) -> CloudEventsResult<Option<i64>> {
        match self.extension(EXTENSION_RESOURCE_VERSION) {
            None => Ok(None),
            Some(ExtensionValue::Integer(v)) => Ok(Some(*v)),
            Some(ExtensionValue::String(s)) => s.parse::<i64>().map(Some).map_err(|e| {
                CloudEventsError::InvalidExtension {
                    name: EXTENSION_RESOURCE_VERSION.to_string(),
                    reason: e.to_string(),
                }
            }),
            Some(other) => Err(CloudEventsError::InvalidExtension {
                name: EXTENSION_RESOURCE_VERSION.to_string(),
                reason: format!("expected an integer, got {}", other),
            }),
        }
    }

    pub fn cluster_name(&self) -> Option<String> {
        self.extension(EXTENSION_CLUSTER_NAME).map(ToString::to_string)
    }

    pub fn original_source(&self) -> Option<String> {
        self.extension(EXTENSION_ORIGINAL_SOURCE).map(ToString::to_string)
    }

    /// Deletion timestamp; its presence marks the event as a tombstone
    pub fn deletion_timestamp(&self) -> CloudEventsResult<Option<DateTime<Utc>>> {
        match self.extension(EXTENSION_DELETION_TIMESTAMP) {
            None => Ok(None),
            Some(value) => DateTime::parse_from_rfc3339(&value.to_string())
                .map(|t| Some(t.with_timezone(&Utc)))
                .map_err(|e| CloudEventsError::InvalidExtension {
                    name: EXTENSION_DELETION_TIMESTAMP.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Encode in structured JSON mode
    pub fn to_json(&self) -> CloudEventsResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from structured JSON mode
    pub fn from_json(payload: &[u8]) -> CloudEventsResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}
