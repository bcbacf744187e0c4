// src/models/mod.rs

//! Domain models for the comment pipeline.
//!
//! Wire shapes of both upstream APIs, the assembled comment tree, search
//! query parameters, and configuration.

pub mod config;
mod item;
mod post;
mod query;
mod search;

// Re-export all public types
pub use config::{ApiConfig, ClientConfig, Config, LoggingConfig};
pub use item::{HnUser, Item, ItemType, StoryCategory};
pub use post::{
    CommentNode, CommentParent, CommentPost, DELETED_AUTHOR, PostKind, PostResult, RootPost,
    StoryPost, item_url,
};
pub use query::{NumericFilter, Operator, SearchParams, SearchType, Tag, TagGroup};
pub use search::{SearchComment, SearchHit, SearchResponse, SearchStory, SearchUser};
