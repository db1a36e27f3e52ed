//! Domain entities - the core business objects.

mod post;
mod visitor;

pub use post::{Post, PostDraft, PostPatch, WORDS_PER_MINUTE, estimate_reading_time};
pub use visitor::{
    ACTIVE_WINDOW_MS, MAX_NAME_CHARS, MAX_STORED_VISITORS, Visitor, normalize_visitor_name,
};
