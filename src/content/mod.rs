//! Content module - posts, listing pagination, rich text and reading time

mod listing;
mod post;
pub mod reading_time;
pub mod richtext;

pub use listing::{load_detail, Listing};
pub use post::{Banner, ContentSection, PostDetail, PostSummary};
pub use richtext::RichText;
