//! End-to-end thread scenarios against in-memory API fakes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hn_comments::error::{AppError, Result};
use hn_comments::models::{
    CommentNode, CommentParent, Item, PostKind, RootPost, SearchComment, StoryPost,
};
use hn_comments::pipeline::PostPipeline;
use hn_comments::services::{ItemApi, SearchApi};

struct FakeSearch {
    root: Option<RootPost>,
    comments: Vec<SearchComment>,
}

#[async_trait]
impl SearchApi for FakeSearch {
    async fn fetch_root_item(&self, id: u64) -> Result<RootPost> {
        self.root.clone().ok_or(AppError::HttpStatus {
            url: format!("items/{id}"),
            status: 404,
        })
    }

    async fn fetch_comments(&self, _story_id: u64) -> Result<Vec<SearchComment>> {
        Ok(self.comments.clone())
    }
}

/// Official API fake recording every requested id.
#[derive(Default)]
struct FakeItems {
    kids: HashMap<u64, Vec<u64>>,
    failing: HashSet<u64>,
    requested: Mutex<Vec<u64>>,
}

#[async_trait]
impl ItemApi for FakeItems {
    async fn fetch_item(&self, id: u64) -> Result<Item> {
        self.requested.lock().unwrap().push(id);
        if self.failing.contains(&id) {
            return Err(AppError::network(format!("item/{id}.json"), "connection reset"));
        }
        let kids = self.kids.get(&id).cloned().ok_or(AppError::MissingItem(id))?;
        Ok(serde_json::from_value(serde_json::json!({
            "id": id,
            "type": "comment",
            "kids": kids,
        }))
        .unwrap())
    }
}

fn make_comment(id: u64, parent: u64) -> SearchComment {
    SearchComment {
        id,
        parent_id: Some(parent),
        story_id: Some(42),
        author: Some(format!("user{id}")),
        created_at: 1_700_000_000 + id as i64,
        text: Some(format!("<p>comment {id}</p>")),
        story_title: Some("Story 42".into()),
        story_url: None,
    }
}

fn make_story(id: u64) -> RootPost {
    RootPost::Story(StoryPost {
        id,
        author: "pg".into(),
        created_at: 1_700_000_000,
        title: format!("Story {id}"),
        points: Some(120),
        url: Some("https://example.com/article".into()),
        text: None,
        children: vec![],
    })
}

/// Root 42 with replies 10, 20, 30 and 10's replies 11, 12, in scrambled arrival order.
fn scenario_comments() -> Vec<SearchComment> {
    vec![
        make_comment(20, 42),
        make_comment(10, 42),
        make_comment(30, 42),
        make_comment(12, 10),
        make_comment(11, 10),
    ]
}

fn ids(nodes: &[CommentNode]) -> Vec<u64> {
    nodes.iter().map(|n| n.id).collect()
}

fn make_pipeline(search: FakeSearch, items: Arc<FakeItems>) -> PostPipeline {
    PostPipeline::new(Arc::new(search), items, 8)
}

#[tokio::test]
async fn story_thread_follows_official_order() {
    let items = Arc::new(FakeItems {
        kids: HashMap::from([(42, vec![10, 20, 30]), (10, vec![11, 12])]),
        ..FakeItems::default()
    });
    let pipeline = make_pipeline(
        FakeSearch {
            root: Some(make_story(42)),
            comments: scenario_comments(),
        },
        Arc::clone(&items),
    );

    let post = pipeline.fetch_post(42).await.unwrap();

    assert_eq!(post.kind, PostKind::Story);
    assert_eq!(post.title.as_deref(), Some("Story 42"));
    assert_eq!(ids(&post.children), vec![10, 20, 30]);
    assert_eq!(ids(&post.children[0].children), vec![11, 12]);
    assert!(post.children[1].children.is_empty());
    assert_eq!(post.comment_count(), 5);
    assert_eq!(post.flatten_ids(), vec![10, 11, 12, 20, 30]);

    // Root order lookup plus one fan-out lookup; single-reply parents are never asked.
    let mut requested = items.requested.lock().unwrap().clone();
    requested.sort_unstable();
    assert_eq!(requested, vec![10, 42]);
}

#[tokio::test]
async fn failed_fan_out_keeps_arrival_order() {
    let items = Arc::new(FakeItems {
        kids: HashMap::from([(42, vec![10, 20, 30])]),
        failing: HashSet::from([10]),
        ..FakeItems::default()
    });
    let pipeline = make_pipeline(
        FakeSearch {
            root: Some(make_story(42)),
            comments: scenario_comments(),
        },
        items,
    );

    let post = pipeline.fetch_post(42).await.unwrap();
    assert_eq!(ids(&post.children), vec![10, 20, 30]);
    assert_eq!(ids(&post.children[0].children), vec![12, 11]);
}

#[tokio::test]
async fn failed_root_order_keeps_arrival_order() {
    let items = Arc::new(FakeItems {
        kids: HashMap::from([(10, vec![11, 12])]),
        failing: HashSet::from([42]),
        ..FakeItems::default()
    });
    let pipeline = make_pipeline(
        FakeSearch {
            root: Some(make_story(42)),
            comments: scenario_comments(),
        },
        items,
    );

    let post = pipeline.fetch_post(42).await.unwrap();
    assert_eq!(ids(&post.children), vec![20, 10, 30]);
    assert_eq!(ids(&post.children[1].children), vec![11, 12]);
}

#[tokio::test]
async fn missing_root_fails_the_fetch() {
    let pipeline = make_pipeline(
        FakeSearch {
            root: None,
            comments: scenario_comments(),
        },
        Arc::new(FakeItems::default()),
    );

    let err = pipeline.fetch_post(42).await.unwrap_err();
    assert!(matches!(err, AppError::HttpStatus { status: 404, .. }));
    assert_eq!(err.reason(), "File not found.");
}

#[tokio::test]
async fn orphaned_replies_are_left_out() {
    let mut comments = scenario_comments();
    comments.push(make_comment(77, 9999));
    comments.push(make_comment(78, 77));

    let pipeline = make_pipeline(
        FakeSearch {
            root: Some(make_story(42)),
            comments,
        },
        Arc::new(FakeItems {
            kids: HashMap::from([(42, vec![10, 20, 30]), (10, vec![11, 12])]),
            ..FakeItems::default()
        }),
    );

    let post = pipeline.fetch_post(42).await.unwrap();
    assert_eq!(post.comment_count(), 5);
    assert!(!post.descendant_ids().contains(&77));
}
