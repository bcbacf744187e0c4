// src/pipeline/fetch.rs

//! Post fetch orchestration: root, flat comments, and order data joined
//! into one ordered tree.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{Config, PostResult};
use crate::pipeline::fan_out::FanOutResolver;
use crate::pipeline::order::merge_order;
use crate::pipeline::tree::{build_tree, flatten_replies};
use crate::services::{AlgoliaClient, HackerNewsClient, ItemApi, SearchApi};
use crate::utils::http::create_async_client;

/// Everything needed to fetch one post. Cheap to clone.
#[derive(Clone)]
pub struct PostPipeline {
    search: Arc<dyn SearchApi>,
    items: Arc<dyn ItemApi>,
    max_concurrent: usize,
}

impl PostPipeline {
    pub fn new(search: Arc<dyn SearchApi>, items: Arc<dyn ItemApi>, max_concurrent: usize) -> Self {
        Self {
            search,
            items,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Wire both HTTP clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = create_async_client(&config.client)?;
        let search = AlgoliaClient::new(client.clone(), &config.api)?;
        let items = HackerNewsClient::new(client, &config.api)?;
        Ok(Self::new(
            Arc::new(search),
            Arc::new(items),
            config.client.max_concurrent,
        ))
    }

    /// Fetch a story or comment with its full, ordered reply tree.
    ///
    /// Fails if the root item or the comment list cannot be fetched.
    /// Missing order data only leaves the affected level in arrival order.
    pub async fn fetch_post(&self, id: u64) -> Result<PostResult> {
        let started = Instant::now();

        let root_order = async { Ok::<_, AppError>(self.items.fetch_item(id).await) };
        let (root, mut comments, root_order) = tokio::try_join!(
            self.search.fetch_root_item(id),
            self.search.fetch_comments(id),
            root_order,
        )?;

        if comments.is_empty() && !root.children().is_empty() {
            log::debug!(
                "No indexed comments for {}; using the {} replies carried by the item",
                id,
                root.children().len()
            );
            comments = flatten_replies(&root);
        }

        let children = build_tree(id, &comments);

        let fan_out = FanOutResolver::new(self.items.as_ref(), self.max_concurrent)
            .resolve(&comments, id)
            .await;
        let mut order = fan_out.order;

        match root_order {
            Ok(item) => {
                order.insert(id, item.child_ids);
            }
            Err(error) => log::warn!("Top-level order for {} unavailable: {}", id, error),
        }

        let post = merge_order(PostResult::from_root(root, children), &order);

        log::info!(
            "Fetched post {}: {} of {} comments placed, {} orders resolved ({} failed) in {:?}",
            id,
            post.comment_count(),
            comments.len(),
            order.len(),
            fan_out.failures,
            started.elapsed()
        );
        Ok(post)
    }
}
