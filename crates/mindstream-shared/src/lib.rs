//! # MindStream Shared
//!
//! Request and response types for the HTTP API.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
