//! Ports - trait definitions for external dependencies.
//! Storage, authentication and notification adapters implement these.

mod auth;
mod clock;
mod notify;
mod rate_limit;
mod repository;

pub use auth::{
    AccessDecision, AccessGate, AdminAuthenticator, AuthError, TokenClaims, TokenService,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use notify::{NotifyError, PostAction, PostEvent, PostNotifier};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{PostRepository, StorageHealth, VisitorRegistry};
