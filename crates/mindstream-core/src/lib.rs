//! # MindStream Core
//!
//! The domain layer of the MindStream backend.
//! Posts, visitors, the error taxonomy and the ports that storage,
//! authentication and notification adapters implement. No I/O lives here.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::StoreError;
