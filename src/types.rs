// Copyright (c) 2025 - Cowboy AI, Inc.

//! Cloud event type grammar
//!
//! Every event exchanged between a source and its agents is typed by a dotted
//! string that names the resource data kind, the sub-resource and the action:
//!
//! ```text
//! <reverse-group-of-resource>.<resource-version>.<resource-name>.<subresource>.<action>
//! ```
//!
//! The group is a reverse-DNS style name and may itself contain dots, so the
//! last four segments are fixed and everything before them is the group.
//!
//! # Examples
//!
//! ```rust
//! use cim_cloudevents::types::{CloudEventsType, EventAction, EventSubResource};
//!
//! let event_type = CloudEventsType::parse("io.open-cluster-management.works.v1alpha1.manifests.spec.resync_request")?;
//! assert_eq!(event_type.data_type.group, "io.open-cluster-management.works");
//! assert_eq!(event_type.sub_resource, EventSubResource::Spec);
//! assert_eq!(event_type.action, EventAction::RESYNC_REQUEST);
//! # Ok::<(), cim_cloudevents::CloudEventsError>(())
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CloudEventsError, CloudEventsResult};

/// List or filter resources across all managed clusters
pub const CLUSTER_ALL: &str = "";

/// List or filter resources across all sources
pub const SOURCE_ALL: &str = "";

/// Extension key of the resource ID
pub const EXTENSION_RESOURCE_ID: &str = "resourceid";

/// Extension key of the resource version
pub const EXTENSION_RESOURCE_VERSION: &str = "resourceversion";

/// Extension key of the deletion timestamp
pub const EXTENSION_DELETION_TIMESTAMP: &str = "deletiontimestamp";

/// Extension key of the cluster name
pub const EXTENSION_CLUSTER_NAME: &str = "clustername";

/// Extension key of the original source
pub const EXTENSION_ORIGINAL_SOURCE: &str = "originalsource";

/// Sub-resource carried by an event. Only `spec` and `status` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSubResource {
    /// The event data is the resource spec
    Spec,
    /// The event data is the resource status
    Status,
}

impl EventSubResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSubResource::Spec => "spec",
            EventSubResource::Status => "status",
        }
    }
}

impl fmt::Display for EventSubResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventSubResource {
    type Err = CloudEventsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spec" => Ok(EventSubResource::Spec),
            "status" => Ok(EventSubResource::Status),
            other => Err(CloudEventsError::UnsupportedSubResource(other.to_string())),
        }
    }
}

/// Expected action of an event
///
/// Actions are an open set. Only the resync actions influence addressing; any
/// other value is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventAction(Cow<'static, str>);

impl EventAction {
    /// Request to receive the full current state
    pub const RESYNC_REQUEST: EventAction = EventAction(Cow::Borrowed("resync_request"));

    /// Response to a resync request
    pub const RESYNC_RESPONSE: EventAction = EventAction(Cow::Borrowed("resync_response"));

    pub fn new(action: impl Into<String>) -> Self {
        EventAction(Cow::Owned(action.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_resync_request(&self) -> bool {
        self.as_str() == Self::RESYNC_REQUEST.as_str()
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventAction {
    fn from(action: &str) -> Self {
        EventAction::new(action)
    }
}

impl From<String> for EventAction {
    fn from(action: String) -> Self {
        EventAction(Cow::Owned(action))
    }
}

impl From<ResourceAction> for EventAction {
    fn from(action: ResourceAction) -> Self {
        EventAction(Cow::Borrowed(action.as_str()))
    }
}

/// Action on a resource object on the source or agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceAction {
    /// A resource is added on the source
    Added,
    /// A resource is modified on the source
    Modified,
    /// The status of a resource is modified on the agent
    StatusModified,
    /// A resource is deleted from the source
    Deleted,
}

impl ResourceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::Added => "ADDED",
            ResourceAction::Modified => "MODIFIED",
            ResourceAction::StatusModified => "STATUSMODIFIED",
            ResourceAction::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query options for listing resource objects from the source or agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Restricts a source listing to one cluster. Defaults to all clusters.
    pub cluster_name: String,

    /// Restricts an agent listing to one source. Defaults to all sources.
    pub source: String,
}

impl ListOptions {
    /// Options that match every cluster and every source
    pub fn all() -> Self {
        Self {
            cluster_name: CLUSTER_ALL.to_string(),
            source: SOURCE_ALL.to_string(),
        }
    }

    pub fn with_cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Whether an object owned by `cluster_name` and `source` passes the filter
    pub fn matches(&self, cluster_name: &str, source: &str) -> bool {
        (self.cluster_name == CLUSTER_ALL || self.cluster_name == cluster_name)
            && (self.source == SOURCE_ALL || self.source == source)
    }
}

/// Uniquely identifies the type of cloud event data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CloudEventsDataType {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl CloudEventsDataType {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            resource: resource.into(),
        }
    }

    /// Type an event about this data for a sub-resource and action
    pub fn event_type(
        &self,
        sub_resource: EventSubResource,
        action: impl Into<EventAction>,
    ) -> CloudEventsType {
        CloudEventsType::new(self.clone(), sub_resource, action)
    }
}

impl fmt::Display for CloudEventsDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.group, self.version, self.resource)
    }
}

/// Type of a cloud event: the data type plus sub-resource and action
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CloudEventsType {
    pub data_type: CloudEventsDataType,
    pub sub_resource: EventSubResource,
    pub action: EventAction,
}

impl CloudEventsType {
    pub fn new(
        data_type: CloudEventsDataType,
        sub_resource: EventSubResource,
        action: impl Into<EventAction>,
    ) -> Self {
        Self {
            data_type,
            sub_resource,
            action: action.into(),
        }
    }

    /// Parse a cloud event type string
    ///
    /// Fails with [`CloudEventsError::Format`] when fewer than five segments
    /// exist and with [`CloudEventsError::UnsupportedSubResource`] when the
    /// second-to-last segment is not `spec` or `status`.
    pub fn parse(cloud_event_type: &str) -> CloudEventsResult<Self> {
        let segments: Vec<&str> = cloud_event_type.split('.').collect();
        let length = segments.len();
        if length < 5 {
            return Err(CloudEventsError::Format(cloud_event_type.to_string()));
        }

        let sub_resource = segments[length - 2].parse::<EventSubResource>()?;

        Ok(Self {
            data_type: CloudEventsDataType {
                group: segments[..length - 4].join("."),
                version: segments[length - 4].to_string(),
                resource: segments[length - 3].to_string(),
            },
            sub_resource,
            action: EventAction::new(segments[length - 1]),
        })
    }
}

impl fmt::Display for CloudEventsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.data_type, self.sub_resource, self.action)
    }
}

impl FromStr for CloudEventsType {
    type Err = CloudEventsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CloudEventsType::parse(s)
    }
}
