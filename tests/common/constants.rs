//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, catalog IDs, etc.),
//! update only this file.

// ============================================================================
// Test Users
// ============================================================================

/// Regular test user name
pub const TEST_USER: &str = "testuser";

/// Regular test user password
pub const TEST_PASS: &str = "testpass123";

/// Second user, for scenarios involving more than one reviewer
pub const OTHER_USER: &str = "otheruser";

/// Second user password
pub const OTHER_PASS: &str = "otherpass123";

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// "Paranoid Android" by Radiohead, no ratings
pub const SONG_1_ID: i64 = 1;

/// "Teardrop" by Massive Attack, no ratings
pub const SONG_2_ID: i64 = 2;

/// "Popular Song", seeded with 100 ratings averaging 4.5
pub const SEEDED_SONG_ID: i64 = 3;

/// Radiohead
pub const ARTIST_1_ID: i64 = 1;

/// Massive Attack
pub const ARTIST_2_ID: i64 = 2;

/// An id no target has
pub const MISSING_ID: i64 = 999;

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to accept requests
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Pause between readiness probes
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Timeout of a single request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
