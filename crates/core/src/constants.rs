//! Shared constants.

/// Cache TTL for slow-moving reads: jars, goals, charges, user profile.
pub const CACHE_TTL_LONG_SECS: u64 = 3600;

/// Cache TTL for volatile reads: transaction lists, summaries, insights.
pub const CACHE_TTL_SHORT_SECS: u64 = 900;

/// How long a one-time passcode stays valid.
pub const OTP_VALIDITY_MINUTES: i64 = 10;

/// Default page size for transaction listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Default category assigned to transactions created without one.
pub const DEFAULT_TRANSACTION_CATEGORY: &str = "General";
