// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of the event type grammar and of topic addressing that must
//! hold for every well-formed input.

mod event_types;
mod topic_addressing;
