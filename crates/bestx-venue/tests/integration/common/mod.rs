//! Common test utilities.

pub mod mock_venue;
