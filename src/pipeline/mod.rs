//! Comment pipeline: flat search records in, ordered reply tree out.
//!
//! - `tree`: build the reply tree from parent pointers
//! - `order`: reorder siblings to the official child order
//! - `fan_out`: look up child order for parents with several replies
//! - `fetch`: `PostPipeline`, one complete post fetch
//! - `fetcher`: `PostFetcher`, cancellable single-slot fetch state

pub mod fan_out;
pub mod fetch;
pub mod fetcher;
pub mod order;
pub mod tree;

pub use fan_out::{FanOutOutcome, FanOutResolver};
pub use fetch::PostPipeline;
pub use fetcher::{FetchStatus, PostFetcher};
pub use order::{OrderMap, merge_order, sort_to_match};
pub use tree::{TreeAssembly, assemble, build_tree, flatten_replies};
