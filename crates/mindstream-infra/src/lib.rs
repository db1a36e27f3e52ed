//! # MindStream Infrastructure
//!
//! Concrete implementations of the ports defined in `mindstream-core`:
//! JSON file storage, authentication, webhook delivery and rate limiting.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - JSON storage only
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor
//! - `webhook` - Post change notifications via reqwest

pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

#[cfg(feature = "webhook")]
pub mod notify;

pub use storage::{JsonPostRepository, JsonRecordStore, JsonVisitorRegistry};

#[cfg(feature = "auth")]
pub use auth::{AdminPassword, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "webhook")]
pub use notify::WebhookNotifier;
