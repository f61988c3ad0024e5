// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Event Type Grammar
//!
//! `group.version.resource.subresource.action` is anchored from the end, so
//! any number of dots in the group must survive a format/parse cycle.

use cim_cloudevents::{
    CloudEventsDataType, CloudEventsError, CloudEventsType, EventAction, EventSubResource,
};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// A single dot-free, non-empty name segment
fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,11}"
}

/// A group of one to five dot-separated segments
fn group() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("."))
}

fn sub_resource() -> impl Strategy<Value = EventSubResource> {
    prop_oneof![Just(EventSubResource::Spec), Just(EventSubResource::Status)]
}

fn action() -> impl Strategy<Value = EventAction> {
    prop_oneof![
        Just(EventAction::RESYNC_REQUEST),
        Just(EventAction::RESYNC_RESPONSE),
        "[A-Z_]{1,16}".prop_map(EventAction::new),
    ]
}

fn event_type() -> impl Strategy<Value = CloudEventsType> {
    (group(), segment(), segment(), sub_resource(), action()).prop_map(
        |(group, version, resource, sub_resource, action)| {
            CloudEventsDataType::new(group, version, resource).event_type(sub_resource, action)
        },
    )
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Formatting then parsing yields the same type
    #[test]
    fn prop_event_type_round_trips(event_type in event_type()) {
        let parsed = CloudEventsType::parse(&event_type.to_string()).unwrap();

        prop_assert_eq!(parsed, event_type);
    }

    /// Property: The group keeps every leading segment
    #[test]
    fn prop_group_absorbs_leading_segments(group in group(), action in action()) {
        let raw = format!("{}.v1.manifests.spec.{}", group, action);
        let parsed = CloudEventsType::parse(&raw).unwrap();

        prop_assert_eq!(parsed.data_type.group, group);
        prop_assert_eq!(parsed.data_type.version, "v1");
        prop_assert_eq!(parsed.data_type.resource, "manifests");
    }

    /// Property: Fewer than five segments is always a format error
    #[test]
    fn prop_short_types_are_rejected(segments in prop::collection::vec(segment(), 0..5)) {
        prop_assume!(segments.len() < 5);
        let raw = segments.join(".");

        prop_assert!(matches!(
            CloudEventsType::parse(&raw),
            Err(CloudEventsError::Format(_))
        ));
    }

    /// Property: Any sub-resource other than spec or status is rejected
    #[test]
    fn prop_unknown_subresource_is_rejected(sub in segment()) {
        prop_assume!(sub != "spec" && sub != "status");
        let raw = format!("io.example.v1.widgets.{}.ADDED", sub);

        match CloudEventsType::parse(&raw) {
            Err(CloudEventsError::UnsupportedSubResource(found)) => prop_assert_eq!(found, sub),
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }
}
