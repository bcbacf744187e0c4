// src/models/post.rs

//! Comment tree types and the root post returned by a fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SearchComment;

/// Placeholder author for comments whose author field is absent.
pub const DELETED_AUTHOR: &str = "__deleted__";

const ITEM_URL_PREFIX: &str = "https://news.ycombinator.com/item?id=";

/// Link to the discussion page of an item.
pub fn item_url(id: u64) -> String {
    format!("{ITEM_URL_PREFIX}{id}")
}

fn to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Anything that owns an ordered list of replies.
pub trait CommentParent {
    fn id(&self) -> u64;
    fn children(&self) -> &[CommentNode];
    fn children_mut(&mut self) -> &mut Vec<CommentNode>;

    /// Number of nodes below this one.
    fn descendant_count(&self) -> usize {
        self.children()
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Ids of every node below this one, pre-order.
    fn descendant_ids(&self) -> Vec<u64> {
        let mut ids = Vec::new();
        let mut stack: Vec<&CommentNode> = self.children().iter().rev().collect();
        while let Some(node) = stack.pop() {
            ids.push(node.id);
            stack.extend(node.children.iter().rev());
        }
        ids
    }
}

/// A comment and its replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: u64,
    pub author: String,
    /// Unix seconds
    pub created_at: i64,
    /// HTML
    pub text: Option<String>,
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    /// Build a node from a flat search hit and its already-built replies.
    pub fn from_search(comment: &SearchComment, children: Vec<CommentNode>) -> Self {
        Self {
            id: comment.id,
            author: comment
                .author
                .clone()
                .unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            created_at: comment.created_at,
            text: comment.text.clone(),
            children,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.author == DELETED_AUTHOR
    }

    pub fn post_url(&self) -> String {
        item_url(self.id)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        to_utc(self.created_at)
    }
}

impl CommentParent for CommentNode {
    fn id(&self) -> u64 {
        self.id
    }
    fn children(&self) -> &[CommentNode] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<CommentNode> {
        &mut self.children
    }
}

/// Shape of one node of the search index's item endpoint.
#[derive(Debug, Deserialize)]
struct RawNode {
    id: u64,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(rename = "created_at_i", default)]
    created_at: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    points: Option<i64>,
    #[serde(default)]
    parent_id: Option<u64>,
    #[serde(default)]
    story_id: Option<u64>,
    #[serde(default)]
    children: Vec<RawNode>,
}

impl RawNode {
    fn into_comment_node(self) -> CommentNode {
        CommentNode {
            id: self.id,
            author: self.author.unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            created_at: self.created_at,
            text: self.text,
            children: self
                .children
                .into_iter()
                .map(RawNode::into_comment_node)
                .collect(),
        }
    }
}

/// A story as returned by the search index item endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryPost {
    pub id: u64,
    pub author: String,
    pub created_at: i64,
    pub title: String,
    pub points: Option<i64>,
    pub url: Option<String>,
    pub text: Option<String>,
    /// Replies in arrival order
    pub children: Vec<CommentNode>,
}

/// A comment opened as the root of a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentPost {
    pub id: u64,
    pub author: String,
    pub created_at: i64,
    pub text: Option<String>,
    pub parent_id: Option<u64>,
    pub story_id: Option<u64>,
    /// Replies in arrival order
    pub children: Vec<CommentNode>,
}

/// Root of a thread, discriminated by the item `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RootPost {
    Story(StoryPost),
    Comment(CommentPost),
}

impl RootPost {
    /// Decode an item payload, dispatching on its `type` discriminator.
    ///
    /// Reply chains nest as deep as the thread does, so the parser's
    /// recursion limit is lifted and the stack grows on demand.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let mut de = serde_json::Deserializer::from_slice(bytes);
        de.disable_recursion_limit();
        let raw = RawNode::deserialize(serde_stacker::Deserializer::new(&mut de))
            .and_then(|raw| de.end().map(|()| raw))
            .map_err(|e| AppError::decode("root item", e))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawNode) -> Result<Self> {
        let kind = raw.kind.clone().unwrap_or_default();
        let children = raw
            .children
            .into_iter()
            .map(RawNode::into_comment_node)
            .collect();
        let author = raw.author.unwrap_or_else(|| DELETED_AUTHOR.to_string());

        match kind.as_str() {
            "story" => Ok(RootPost::Story(StoryPost {
                id: raw.id,
                author,
                created_at: raw.created_at,
                title: raw.title.unwrap_or_default(),
                points: raw.points,
                url: raw.url,
                text: raw.text,
                children,
            })),
            "comment" => Ok(RootPost::Comment(CommentPost {
                id: raw.id,
                author,
                created_at: raw.created_at,
                text: raw.text,
                parent_id: raw.parent_id,
                story_id: raw.story_id,
                children,
            })),
            other => Err(AppError::decode(
                format!("root item {}", raw.id),
                format!("unsupported item type '{other}'"),
            )),
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            RootPost::Story(s) => s.id,
            RootPost::Comment(c) => c.id,
        }
    }

    pub fn children(&self) -> &[CommentNode] {
        match self {
            RootPost::Story(s) => &s.children,
            RootPost::Comment(c) => &c.children,
        }
    }

    pub fn kind(&self) -> PostKind {
        match self {
            RootPost::Story(_) => PostKind::Story,
            RootPost::Comment(_) => PostKind::Comment,
        }
    }

    pub fn post_url(&self) -> String {
        item_url(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Story,
    Comment,
}

/// Final result of a post fetch: root fields plus the merged comment forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResult {
    pub id: u64,
    pub kind: PostKind,
    pub author: String,
    pub created_at: i64,
    pub text: Option<String>,
    pub title: Option<String>,
    pub points: Option<i64>,
    pub url: Option<String>,
    /// Story a comment root belongs to
    pub story_id: Option<u64>,
    pub children: Vec<CommentNode>,
}

impl PostResult {
    /// Take the root's own fields and attach `children` in place of its replies.
    pub fn from_root(root: RootPost, children: Vec<CommentNode>) -> Self {
        match root {
            RootPost::Story(s) => Self {
                id: s.id,
                kind: PostKind::Story,
                author: s.author,
                created_at: s.created_at,
                text: s.text,
                title: Some(s.title),
                points: s.points,
                url: s.url,
                story_id: None,
                children,
            },
            RootPost::Comment(c) => Self {
                id: c.id,
                kind: PostKind::Comment,
                author: c.author,
                created_at: c.created_at,
                text: c.text,
                title: None,
                points: None,
                url: None,
                story_id: c.story_id,
                children,
            },
        }
    }

    pub fn comment_count(&self) -> usize {
        self.descendant_count()
    }

    /// Every comment id in display order.
    pub fn flatten_ids(&self) -> Vec<u64> {
        self.descendant_ids()
    }

    /// Discussion page link.
    pub fn post_url(&self) -> String {
        item_url(self.id)
    }

    /// Linked article if any, otherwise the discussion page.
    pub fn linked_url(&self) -> String {
        self.url.clone().unwrap_or_else(|| self.post_url())
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        to_utc(self.created_at)
    }
}

impl CommentParent for PostResult {
    fn id(&self) -> u64 {
        self.id
    }
    fn children(&self) -> &[CommentNode] {
        &self.children
    }
    fn children_mut(&mut self) -> &mut Vec<CommentNode> {
        &mut self.children
    }
}
