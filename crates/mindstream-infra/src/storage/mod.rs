//! File-backed storage - JSON collections on local disk.

mod post_repo;
mod record_store;
mod seed;
mod visitor_registry;

pub use post_repo::JsonPostRepository;
pub use record_store::JsonRecordStore;
pub use seed::seed_posts;
pub use visitor_registry::JsonVisitorRegistry;
