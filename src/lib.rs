//! CloudEvents addressing for source/agent resource exchange
//!
//! A central source and many agents exchange resource specs and statuses as
//! cloud events over a publish/subscribe broker. This crate provides the event
//! type grammar, the routing extensions, the event builder and the per-role
//! topic derivation, plus transports to carry the events.

pub mod builder;
pub mod errors;
pub mod event;
pub mod memory;
pub mod nats;
pub mod options;
pub mod types;

// Re-export commonly used types
pub use builder::EventBuilder;
pub use errors::{CloudEventsError, CloudEventsResult};
pub use event::{Event, ExtensionValue};
pub use memory::MemoryBroker;
pub use nats::{BrokerConfig, NatsConnector};
pub use options::{
    send_event, AgentOptions, CloudEventsAgentOptions, CloudEventsClient, CloudEventsOptions,
    CloudEventsSourceOptions, Connector, SendContext, SourceOptions,
};
pub use types::{
    CloudEventsDataType, CloudEventsType, EventAction, EventSubResource, ListOptions,
    ResourceAction,
};
