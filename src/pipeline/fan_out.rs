// src/pipeline/fan_out.rs

//! Authoritative child order lookups for parents with several replies.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};

use crate::models::SearchComment;
use crate::pipeline::order::OrderMap;
use crate::services::ItemApi;

/// Summary of one fan-out run.
#[derive(Debug, Default)]
pub struct FanOutOutcome {
    pub order: OrderMap,
    pub requested: usize,
    pub failures: usize,
}

/// Resolves sibling order for every comment with more than one reply.
pub struct FanOutResolver<'a> {
    items: &'a dyn ItemApi,
    max_concurrent: usize,
}

impl<'a> FanOutResolver<'a> {
    pub fn new(items: &'a dyn ItemApi, max_concurrent: usize) -> Self {
        Self {
            items,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Ids of comments in `comments` that have more than one reply among them.
    ///
    /// `root_id` is left out since its order comes from the root lookup.
    /// Parents that are not in the set are left out too: their replies
    /// cannot be placed in the tree. Sorted for stable request order.
    pub fn ambiguous_parents(comments: &[SearchComment], root_id: u64) -> Vec<u64> {
        let present: HashSet<u64> = comments.iter().map(|c| c.id).collect();

        // Distinct reply ids, so a record the index returns twice counts once.
        let mut replies: HashMap<u64, HashSet<u64>> = HashMap::new();
        for comment in comments {
            if let Some(parent_id) = comment.parent_id {
                replies.entry(parent_id).or_default().insert(comment.id);
            }
        }

        let mut parents: Vec<u64> = replies
            .into_iter()
            .filter(|(id, kids)| kids.len() > 1 && *id != root_id && present.contains(id))
            .map(|(id, _)| id)
            .collect();
        parents.sort_unstable();
        parents
    }

    /// Fetch the child order of every ambiguous parent.
    ///
    /// A failed lookup leaves its parent out of the map; it never fails the run.
    pub async fn resolve(&self, comments: &[SearchComment], root_id: u64) -> FanOutOutcome {
        let parents = Self::ambiguous_parents(comments, root_id);
        let mut outcome = FanOutOutcome {
            requested: parents.len(),
            ..FanOutOutcome::default()
        };
        if parents.is_empty() {
            return outcome;
        }

        log::debug!(
            "Resolving child order for {} parents under {} (max {} in flight)",
            parents.len(),
            root_id,
            self.max_concurrent
        );

        let mut lookups = stream::iter(parents)
            .map(|id| async move { (id, self.items.fetch_item(id).await) })
            .buffer_unordered(self.max_concurrent);

        while let Some((id, result)) = lookups.next().await {
            match result {
                Ok(item) => {
                    outcome.order.insert(id, item.child_ids);
                }
                Err(error) => {
                    outcome.failures += 1;
                    log::warn!("Child order for {} unavailable: {}", id, error);
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::{AppError, Result};
    use crate::models::Item;

    #[derive(Default)]
    struct FakeItems {
        kids: HashMap<u64, Vec<u64>>,
        failing: HashSet<u64>,
        requested: Mutex<Vec<u64>>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ItemApi for FakeItems {
        async fn fetch_item(&self, id: u64) -> Result<Item> {
            self.requested.lock().unwrap().push(id);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&id) {
                return Err(AppError::HttpStatus {
                    url: format!("item/{id}.json"),
                    status: 500,
                });
            }
            Ok(Item {
                id,
                author: None,
                child_ids: self.kids.get(&id).cloned().unwrap_or_default(),
                comment_count: None,
                points: None,
                time: None,
                title: None,
                text: None,
                item_type: None,
                url: None,
                parent_id: None,
                is_deleted: None,
                is_dead: None,
            })
        }
    }

    fn make_comment(id: u64, parent: u64) -> SearchComment {
        SearchComment {
            id,
            parent_id: Some(parent),
            story_id: Some(42),
            author: Some("a".into()),
            created_at: 0,
            text: None,
            story_title: None,
            story_url: None,
        }
    }

    #[test]
    fn test_single_child_parents_are_not_ambiguous() {
        let comments = vec![
            make_comment(10, 42),
            make_comment(20, 42),
            make_comment(11, 10),
            make_comment(12, 10),
            make_comment(21, 20), // only child
            make_comment(31, 99), // parent not fetched
            make_comment(32, 99),
        ];
        assert_eq!(FanOutResolver::ambiguous_parents(&comments, 42), vec![10]);
    }

    #[test]
    fn test_repeated_record_does_not_make_parent_ambiguous() {
        let comments = vec![
            make_comment(10, 42),
            make_comment(11, 10),
            make_comment(11, 10),
        ];
        assert!(FanOutResolver::ambiguous_parents(&comments, 42).is_empty());
    }

    #[tokio::test]
    async fn test_repeated_record_triggers_no_lookup() {
        let fake = FakeItems::default();
        let comments = vec![
            make_comment(10, 42),
            make_comment(20, 42),
            make_comment(11, 10),
            make_comment(11, 10),
        ];
        let outcome = FanOutResolver::new(&fake, 8).resolve(&comments, 42).await;
        assert_eq!(outcome.requested, 0);
        assert!(fake.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_ambiguous_parents_are_requested() {
        let fake = FakeItems {
            kids: HashMap::from([(10, vec![11, 12])]),
            ..FakeItems::default()
        };
        let comments = vec![
            make_comment(10, 42),
            make_comment(20, 42),
            make_comment(12, 10),
            make_comment(11, 10),
            make_comment(21, 20),
        ];

        let outcome = FanOutResolver::new(&fake, 8).resolve(&comments, 42).await;
        assert_eq!(*fake.requested.lock().unwrap(), vec![10]);
        assert_eq!(outcome.order.get(&10), Some(&vec![11, 12]));
        assert_eq!(outcome.requested, 1);
        assert_eq!(outcome.failures, 0);
    }

    #[tokio::test]
    async fn test_failure_is_absorbed() {
        let fake = FakeItems {
            kids: HashMap::from([(10, vec![11, 12]), (20, vec![22, 21])]),
            failing: HashSet::from([10]),
            ..FakeItems::default()
        };
        let comments = vec![
            make_comment(10, 42),
            make_comment(20, 42),
            make_comment(11, 10),
            make_comment(12, 10),
            make_comment(21, 20),
            make_comment(22, 20),
        ];

        let outcome = FanOutResolver::new(&fake, 4).resolve(&comments, 42).await;
        assert_eq!(outcome.failures, 1);
        assert!(!outcome.order.contains_key(&10));
        assert_eq!(outcome.order.get(&20), Some(&vec![22, 21]));
    }

    #[tokio::test]
    async fn test_concurrency_is_capped() {
        let fake = FakeItems::default();
        // 40 parents with two replies each
        let mut comments = Vec::new();
        for parent in 1..=40u64 {
            comments.push(make_comment(parent, 42));
            comments.push(make_comment(1000 + parent * 2, parent));
            comments.push(make_comment(1001 + parent * 2, parent));
        }

        let outcome = FanOutResolver::new(&fake, 3).resolve(&comments, 42).await;
        assert_eq!(outcome.requested, 40);
        assert_eq!(outcome.order.len(), 40);
        assert!(fake.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_nothing_to_resolve() {
        let fake = FakeItems::default();
        let comments = vec![make_comment(10, 42), make_comment(11, 10)];
        let outcome = FanOutResolver::new(&fake, 8).resolve(&comments, 42).await;
        assert!(outcome.order.is_empty());
        assert!(fake.requested.lock().unwrap().is_empty());
    }
}
