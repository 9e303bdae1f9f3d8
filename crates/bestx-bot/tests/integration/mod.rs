//! Integration tests for bestx-bot.
//!
//! These tests run the whole application against two local mock venues:
//! - Observation pass quoting both venues
//! - Trading pass placing exactly one signed order

pub mod common;
