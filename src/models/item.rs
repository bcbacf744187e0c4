// src/models/item.rs

//! Records served by the official item API.

use serde::{Deserialize, Serialize};

/// Kind of an item as reported by the official API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Story,
    Comment,
    Job,
    Poll,
    PollOpt,
    #[serde(other)]
    Unknown,
}

/// A story or comment from the official API.
///
/// `child_ids` is the authoritative display order of the item's replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,

    #[serde(rename = "by", default)]
    pub author: Option<String>,

    #[serde(rename = "kids", default)]
    pub child_ids: Vec<u64>,

    #[serde(rename = "descendants", default)]
    pub comment_count: Option<u64>,

    #[serde(rename = "score", default)]
    pub points: Option<i64>,

    /// Unix seconds
    #[serde(default)]
    pub time: Option<i64>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(rename = "type", default)]
    pub item_type: Option<ItemType>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(rename = "parent", default)]
    pub parent_id: Option<u64>,

    #[serde(rename = "deleted", default)]
    pub is_deleted: Option<bool>,

    #[serde(rename = "dead", default)]
    pub is_dead: Option<bool>,
}

impl Item {
    pub fn is_deleted(&self) -> bool {
        self.is_deleted.unwrap_or(false)
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead.unwrap_or(false)
    }
}

/// Front-page listings exposed by the official API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryCategory {
    Top,
    New,
    Best,
    Ask,
    Show,
}

impl StoryCategory {
    pub const ALL: [StoryCategory; 5] = [
        StoryCategory::Top,
        StoryCategory::New,
        StoryCategory::Best,
        StoryCategory::Ask,
        StoryCategory::Show,
    ];

    /// Path segment prefix, e.g. `top` for `topstories.json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryCategory::Top => "top",
            StoryCategory::New => "new",
            StoryCategory::Best => "best",
            StoryCategory::Ask => "ask",
            StoryCategory::Show => "show",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoryCategory::Top => "Top Stories",
            StoryCategory::New => "New Stories",
            StoryCategory::Best => "Best Stories",
            StoryCategory::Ask => "Ask HN",
            StoryCategory::Show => "Show HN",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

/// Public profile from the official API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnUser {
    pub id: String,
    /// Unix seconds
    pub created: i64,
    pub karma: i64,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub delay: Option<i64>,
    #[serde(default)]
    pub submitted: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_story_item() {
        let json = r#"{
            "by": "dhouston", "descendants": 71, "id": 8863,
            "kids": [8952, 9224, 8917], "score": 111, "time": 1175714200,
            "title": "My YC app: Dropbox", "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 8863);
        assert_eq!(item.author.as_deref(), Some("dhouston"));
        assert_eq!(item.child_ids, vec![8952, 9224, 8917]);
        assert_eq!(item.item_type, Some(ItemType::Story));
        assert!(!item.is_deleted());
    }

    #[test]
    fn test_decode_deleted_comment_without_kids() {
        let json = r#"{"id": 5, "deleted": true, "parent": 4, "time": 1, "type": "comment"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.child_ids.is_empty());
        assert!(item.author.is_none());
        assert!(item.is_deleted());
        assert_eq!(item.parent_id, Some(4));
    }

    #[test]
    fn test_unknown_type_does_not_fail() {
        let json = r#"{"id": 7, "type": "something-new"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_type, Some(ItemType::Unknown));
    }

    #[test]
    fn test_decode_user_without_optional_fields() {
        let json = r#"{"id": "pg", "created": 1160418092, "karma": 155111}"#;
        let user: HnUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "pg");
        assert_eq!(user.created, 1160418092);
        assert!(user.about.is_none());
        assert!(user.submitted.is_empty());
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(StoryCategory::from_name("ASK"), Some(StoryCategory::Ask));
        assert_eq!(StoryCategory::from_name("jobs"), None);
        assert_eq!(StoryCategory::Show.as_str(), "show");
    }
}
