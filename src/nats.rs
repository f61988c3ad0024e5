//! NATS transport for cloud events
//!
//! Topics are MQTT style throughout this crate. A NATS server with MQTT
//! enabled exposes MQTT topics to NATS clients under a fixed mapping, which
//! [`topic_to_subject`] reproduces, so NATS-connected participants and MQTT
//! peers share one topic space.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_nats::{Client, ConnectOptions};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CloudEventsError, CloudEventsResult};
use crate::event::Event;
use crate::options::{require_topic, CloudEventsClient, Connector, EventStream, SendContext};

/// Configuration for the broker connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Connection timeout
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
    /// Interval between keep-alive pings
    #[serde(with = "duration_secs")]
    pub keep_alive: Duration,
    pub username: Option<String>,
    pub password: Option<String>,
    /// CA bundle used to verify the server
    pub ca_file: Option<PathBuf>,
    /// Client certificate for mutual TLS, paired with `client_key_file`
    pub client_cert_file: Option<PathBuf>,
    pub client_key_file: Option<PathBuf>,
    pub require_tls: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            connect_timeout: Duration::from_secs(60),
            keep_alive: Duration::from_secs(60),
            username: None,
            password: None,
            ca_file: None,
            client_cert_file: None,
            client_key_file: None,
            require_tls: false,
        }
    }
}

impl BrokerConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// `BROKER_URL` may hold several comma-separated servers.
    pub fn from_env() -> CloudEventsResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("BROKER_URL") {
            config.servers = url.split(',').map(|s| s.trim().to_string()).collect();
        }
        config.username = std::env::var("BROKER_USERNAME").ok();
        config.password = std::env::var("BROKER_PASSWORD").ok();
        config.ca_file = std::env::var("BROKER_CA_FILE").ok().map(PathBuf::from);
        config.client_cert_file = std::env::var("BROKER_CLIENT_CERT_FILE").ok().map(PathBuf::from);
        config.client_key_file = std::env::var("BROKER_CLIENT_KEY_FILE").ok().map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl Into<PathBuf>) -> CloudEventsResult<Self> {
        let path = path.into();
        let raw = std::fs::read(&path).map_err(|e| {
            CloudEventsError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_slice(&raw)
            .map_err(|e| CloudEventsError::Configuration(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CloudEventsResult<()> {
        if self.servers.iter().all(|s| s.is_empty()) {
            return Err(CloudEventsError::Configuration("no broker servers configured".to_string()));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(CloudEventsError::Configuration(
                "username and password must be set together".to_string(),
            ));
        }
        if self.client_cert_file.is_some() != self.client_key_file.is_some() {
            return Err(CloudEventsError::Configuration(
                "client certificate and key must be set together".to_string(),
            ));
        }
        Ok(())
    }

    fn connect_options(&self, client_id: &str) -> ConnectOptions {
        let mut options = ConnectOptions::new()
            .name(client_id)
            .connection_timeout(self.connect_timeout)
            .ping_interval(self.keep_alive)
            .require_tls(self.require_tls);

        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            options = options.user_and_password(username.clone(), password.clone());
        }
        if let Some(ca_file) = &self.ca_file {
            options = options.add_root_certificates(ca_file.clone());
        }
        if let (Some(cert), Some(key)) = (&self.client_cert_file, &self.client_key_file) {
            options = options.add_client_certificate(cert.clone(), key.clone());
        }
        options
    }
}

/// Connector that opens one NATS connection per client
#[derive(Debug, Clone, Default)]
pub struct NatsConnector {
    config: BrokerConfig,
}

impl NatsConnector {
    pub fn new(config: BrokerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Connector for NatsConnector {
    async fn connect(
        &self,
        client_id: &str,
        subscriptions: &[String],
    ) -> CloudEventsResult<Arc<dyn CloudEventsClient>> {
        let client = async_nats::connect_with_options(
            self.config.servers.join(","),
            self.config.connect_options(client_id),
        )
        .await
        .map_err(|e| CloudEventsError::Connection(e.to_string()))?;

        info!(client_id = %client_id, servers = ?self.config.servers, "Connected to broker");

        Ok(Arc::new(NatsCloudEventsClient {
            client,
            client_id: client_id.to_string(),
            subscriptions: subscriptions.to_vec(),
        }))
    }
}

/// Cloud events client over a NATS connection
#[derive(Clone)]
pub struct NatsCloudEventsClient {
    client: Client,
    client_id: String,
    subscriptions: Vec<String>,
}

impl NatsCloudEventsClient {
    /// Get the underlying NATS client for advanced operations
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait::async_trait]
impl CloudEventsClient for NatsCloudEventsClient {
    async fn send(&self, ctx: &SendContext, event: &Event) -> CloudEventsResult<()> {
        let topic = require_topic(ctx, event)?;
        let subject = topic_to_subject(topic);
        let payload = event.to_json()?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| CloudEventsError::Publish(e.to_string()))?;

        debug!(
            client_id = %self.client_id,
            topic = %topic,
            subject = %subject,
            event_id = %event.id,
            "Published event"
        );
        Ok(())
    }

    async fn subscribe(&self) -> CloudEventsResult<EventStream> {
        if self.subscriptions.is_empty() {
            return Err(CloudEventsError::Subscribe(format!(
                "client {} has no subscriptions",
                self.client_id
            )));
        }

        let mut streams = Vec::with_capacity(self.subscriptions.len());
        for topic in &self.subscriptions {
            let subject = topic_to_subject(topic);
            let subscriber = self
                .client
                .subscribe(subject.clone())
                .await
                .map_err(|e| CloudEventsError::Subscribe(e.to_string()))?;

            info!(client_id = %self.client_id, topic = %topic, subject = %subject, "Subscribed to topic");
            streams.push(subscriber.boxed());
        }

        let events = futures::stream::select_all(streams).map(|message| {
            Event::from_json(&message.payload).map_err(|e| {
                warn!(subject = %message.subject, error = %e, "Failed to decode event");
                e
            })
        });

        Ok(events.boxed())
    }
}

/// Map an MQTT topic or filter to the equivalent NATS subject
///
/// `/` becomes `.`, `+` becomes `*`, `#` becomes `>`, and a literal `.` is
/// escaped as `//`.
pub fn topic_to_subject(topic: &str) -> String {
    let mut subject = String::with_capacity(topic.len() + 4);
    for c in topic.chars() {
        match c {
            '.' => subject.push_str("//"),
            '/' => subject.push('.'),
            '+' => subject.push('*'),
            '#' => subject.push('>'),
            other => subject.push(other),
        }
    }
    subject
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
