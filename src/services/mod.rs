//! Service layer: clients for the two upstream APIs.
//!
//! - `HackerNewsClient`: official item API (authoritative child order)
//! - `AlgoliaClient`: search index (root items and flat comment sets)
//!
//! The pipeline only talks to them through `ItemApi` and `SearchApi`.

mod algolia;
mod hacker_news;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Item, RootPost, SearchComment};

pub use algolia::AlgoliaClient;
pub use hacker_news::HackerNewsClient;

/// Lookup of single items from the official API.
#[async_trait]
pub trait ItemApi: Send + Sync {
    /// One GET, no retries.
    async fn fetch_item(&self, id: u64) -> Result<Item>;
}

/// Reads against the search index.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Story or comment by id, decoded by its `type` field.
    async fn fetch_root_item(&self, id: u64) -> Result<RootPost>;

    /// Every comment tagged with `story_<story_id>`, in no particular order.
    ///
    /// A single page is requested; threads past the page size are truncated.
    async fn fetch_comments(&self, story_id: u64) -> Result<Vec<SearchComment>>;
}
