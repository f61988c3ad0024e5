//! Error types for cloud event addressing and transport operations

use thiserror::Error;

/// Errors that can occur while typing, addressing or transporting cloud events
#[derive(Debug, Error)]
pub enum CloudEventsError {
    /// The event type string has fewer than five dot-separated segments
    #[error("unsupported cloud event type format: {0}")]
    Format(String),

    /// The sub-resource segment is neither `spec` nor `status`
    #[error("unsupported subresource {0}")]
    UnsupportedSubResource(String),

    /// The event type could not be parsed while resolving its topic
    #[error("unsupported event type {event_type}, {source}")]
    UnsupportedEventType {
        event_type: String,
        #[source]
        source: Box<CloudEventsError>,
    },

    /// A routing extension required for addressing is absent
    #[error("event extension {0} not found")]
    MissingExtension(String),

    /// An extension is present but its value cannot be used
    #[error("invalid event extension {name}: {reason}")]
    InvalidExtension { name: String, reason: String },

    /// A value cannot occupy a single topic level
    #[error("invalid topic segment {0:?}")]
    InvalidTopicSegment(String),

    /// Send attempted with a context that carries no topic
    #[error("no topic resolved for event {0}")]
    MissingTopic(String),

    /// Broker connection error
    #[error("broker connection error: {0}")]
    Connection(String),

    /// Broker publish error
    #[error("broker publish error: {0}")]
    Publish(String),

    /// Broker subscribe error
    #[error("broker subscribe error: {0}")]
    Subscribe(String),

    /// Envelope encoding or decoding error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for cloud event operations
pub type CloudEventsResult<T> = Result<T, CloudEventsError>;

impl CloudEventsError {
    /// Wrap a parse failure with the type string that caused it
    pub fn unsupported_event_type(event_type: impl Into<String>, source: CloudEventsError) -> Self {
        CloudEventsError::UnsupportedEventType {
            event_type: event_type.into(),
            source: Box::new(source),
        }
    }
}
