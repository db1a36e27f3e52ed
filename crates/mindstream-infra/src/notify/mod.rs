//! Post change notification implementations.

mod webhook;

pub use webhook::WebhookNotifier;
