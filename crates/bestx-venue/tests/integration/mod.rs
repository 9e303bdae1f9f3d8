//! Integration tests for bestx-venue.
//!
//! Adapters are exercised over real HTTP against a local mock venue.

pub mod common;
