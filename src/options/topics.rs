// Copyright (c) 2025 - Cowboy AI, Inc.

//! Topic hierarchy for source/agent event exchange
//!
//! Topics are MQTT style: `/` separates levels, `+` matches exactly one level
//! and a trailing `#` matches any remainder.
//!
//! ```text
//! sources/{source}/clusters/{cluster}/spec      source  -> agent   resource spec
//! sources/{source}/clusters/{cluster}/status    agent   -> source  resource status
//! sources/clusters/{cluster}/specresync         agent   -> sources spec resync request
//! sources/{source}/clusters/statusresync        source  -> agents  status resync request
//! ```
//!
//! Each role binds only the wildcard levels naming itself, so one
//! subscription covers every counterpart.
//!
//! ```rust
//! use cim_cloudevents::options::topics::{topic_matches, SPEC_TOPIC};
//!
//! let published = SPEC_TOPIC.resolve(&["src1", "cluster1"])?;
//! assert_eq!(published, "sources/src1/clusters/cluster1/spec");
//!
//! let subscribed = SPEC_TOPIC.bind(&[None, Some("cluster1")]);
//! assert_eq!(subscribed, "sources/+/clusters/cluster1/spec");
//! assert!(topic_matches(&subscribed, &published));
//! # Ok::<(), cim_cloudevents::CloudEventsError>(())
//! ```

use std::fmt;

use crate::errors::{CloudEventsError, CloudEventsResult};

/// Topic level separator
pub const LEVEL_SEPARATOR: char = '/';

/// Single-level wildcard
pub const SINGLE_LEVEL_WILDCARD: &str = "+";

/// Multi-level wildcard
pub const MULTI_LEVEL_WILDCARD: &str = "#";

/// Resource spec, wildcards `{source, cluster}`
pub const SPEC_TOPIC: TopicTemplate = TopicTemplate::new("sources/+/clusters/+/spec");

/// Resource status, wildcards `{source, cluster}`
pub const STATUS_TOPIC: TopicTemplate = TopicTemplate::new("sources/+/clusters/+/status");

/// Spec resync requests from agents, wildcard `{cluster}`
pub const SPEC_RESYNC_TOPIC: TopicTemplate = TopicTemplate::new("sources/clusters/+/specresync");

/// Status resync requests from sources, wildcard `{source}`
pub const STATUS_RESYNC_TOPIC: TopicTemplate =
    TopicTemplate::new("sources/+/clusters/statusresync");

/// A topic string whose wildcard levels are bound positionally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicTemplate(&'static str);

impl TopicTemplate {
    pub const fn new(template: &'static str) -> Self {
        TopicTemplate(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Number of single-level wildcard positions
    pub fn wildcards(&self) -> usize {
        self.levels().filter(|level| *level == SINGLE_LEVEL_WILDCARD).count()
    }

    /// Bind wildcard positions in order; `None` (or a missing entry) leaves the
    /// position open. Used to build subscription filters.
    pub fn bind(&self, bindings: &[Option<&str>]) -> String {
        let mut position = 0;
        let mut levels: Vec<&str> = Vec::new();
        for level in self.levels() {
            if level == SINGLE_LEVEL_WILDCARD {
                levels.push(bindings.get(position).copied().flatten().unwrap_or(level));
                position += 1;
            } else {
                levels.push(level);
            }
        }
        levels.join("/")
    }

    /// Bind every wildcard position, yielding a concrete publish topic
    ///
    /// Fails unless exactly one valid level value is given per wildcard.
    pub fn resolve(&self, values: &[&str]) -> CloudEventsResult<String> {
        if values.len() != self.wildcards() {
            return Err(CloudEventsError::InvalidTopicSegment(format!(
                "{} expects {} values, got {}",
                self.0,
                self.wildcards(),
                values.len()
            )));
        }
        for value in values {
            validate_topic_level(value)?;
        }
        let bindings: Vec<Option<&str>> = values.iter().map(|v| Some(*v)).collect();
        Ok(self.bind(&bindings))
    }

    fn levels(&self) -> impl Iterator<Item = &'static str> {
        self.0.split(LEVEL_SEPARATOR)
    }
}

impl fmt::Display for TopicTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Check that `value` can occupy exactly one topic level
pub fn validate_topic_level(value: &str) -> CloudEventsResult<()> {
    if value.is_empty()
        || value.contains(LEVEL_SEPARATOR)
        || value.contains(SINGLE_LEVEL_WILDCARD)
        || value.contains(MULTI_LEVEL_WILDCARD)
    {
        return Err(CloudEventsError::InvalidTopicSegment(value.to_string()));
    }
    Ok(())
}

/// Whether a concrete `topic` matches a subscription `filter`
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut filter_levels = filter.split(LEVEL_SEPARATOR);
    let mut topic_levels = topic.split(LEVEL_SEPARATOR);

    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some(MULTI_LEVEL_WILDCARD), _) => return true,
            (Some(SINGLE_LEVEL_WILDCARD), Some(_)) => continue,
            (Some(f), Some(t)) if f == t => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}
