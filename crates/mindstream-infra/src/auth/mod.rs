//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{ADMIN_ROLE, JwtConfig, JwtTokenService};
pub use password::{AdminPassword, hash_password};
