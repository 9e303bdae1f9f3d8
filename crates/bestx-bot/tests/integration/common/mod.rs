//! Common test utilities.

#[path = "../../../../bestx-venue/tests/integration/common/mock_venue.rs"]
pub mod mock_venue;
