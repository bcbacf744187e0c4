// src/models/search.rs

//! Records served by the search index.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A flat comment hit. Siblings carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchComment {
    #[serde(rename = "objectID", deserialize_with = "numeric_id")]
    pub id: u64,

    #[serde(default)]
    pub parent_id: Option<u64>,

    #[serde(default)]
    pub story_id: Option<u64>,

    #[serde(default)]
    pub author: Option<String>,

    /// Unix seconds
    #[serde(rename = "created_at_i", default)]
    pub created_at: i64,

    #[serde(rename = "comment_text", default)]
    pub text: Option<String>,

    #[serde(default)]
    pub story_title: Option<String>,

    #[serde(rename = "story_url", default)]
    pub story_url: Option<String>,
}

/// A story hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStory {
    #[serde(rename = "objectID", deserialize_with = "numeric_id")]
    pub id: u64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub points: Option<i64>,

    /// Unix seconds
    #[serde(rename = "created_at_i", default)]
    pub created_at: i64,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(rename = "num_comments", default)]
    pub comment_count: Option<u64>,

    #[serde(rename = "story_text", default)]
    pub text: Option<String>,
}

/// A search hit, discriminated by its `_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchHit {
    Story(SearchStory),
    Comment(SearchComment),
}

impl SearchHit {
    pub fn id(&self) -> u64 {
        match self {
            SearchHit::Story(s) => s.id,
            SearchHit::Comment(c) => c.id,
        }
    }

    pub fn into_comment(self) -> Option<SearchComment> {
        match self {
            SearchHit::Comment(c) => Some(c),
            SearchHit::Story(_) => None,
        }
    }

    pub fn into_story(self) -> Option<SearchStory> {
        match self {
            SearchHit::Story(s) => Some(s),
            SearchHit::Comment(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for SearchHit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_story = value
            .get("_tags")
            .and_then(|tags| tags.as_array())
            .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some("story")));

        if is_story {
            SearchStory::deserialize(value)
                .map(SearchHit::Story)
                .map_err(de::Error::custom)
        } else {
            SearchComment::deserialize(value)
                .map(SearchHit::Comment)
                .map_err(de::Error::custom)
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub nb_hits: u64,
    #[serde(default)]
    pub nb_pages: u32,
    #[serde(default)]
    pub hits_per_page: u32,
}

impl SearchResponse {
    pub fn comments(self) -> Vec<SearchComment> {
        self.hits
            .into_iter()
            .filter_map(SearchHit::into_comment)
            .collect()
    }

    pub fn stories(self) -> Vec<SearchStory> {
        self.hits
            .into_iter()
            .filter_map(SearchHit::into_story)
            .collect()
    }
}

/// Profile summary from the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchUser {
    pub username: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub karma: i64,
    #[serde(rename = "created_at_i", default)]
    pub created_at: i64,
    #[serde(default)]
    pub avg: Option<f64>,
    #[serde(default)]
    pub submission_count: Option<u64>,
    #[serde(default)]
    pub comment_count: Option<u64>,
}

/// Accepts ids sent either as numbers or as numeric strings.
pub(crate) fn numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("non-numeric id '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_comment_hit() {
        let json = r#"{
            "_tags": ["comment", "author_pg", "story_42"],
            "author": "pg", "comment_text": "<p>hi</p>",
            "created_at_i": 1690000000, "objectID": "101",
            "parent_id": 42, "story_id": 42
        }"#;
        let hit: SearchHit = serde_json::from_str(json).unwrap();
        let comment = hit.into_comment().unwrap();
        assert_eq!(comment.id, 101);
        assert_eq!(comment.parent_id, Some(42));
        assert_eq!(comment.text.as_deref(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_decode_story_hit_by_tags() {
        let json = r#"{
            "_tags": ["story", "author_pg", "story_42", "front_page"],
            "author": "pg", "title": "Launch", "points": 12,
            "created_at_i": 1690000000, "objectID": "42", "num_comments": 3
        }"#;
        let hit: SearchHit = serde_json::from_str(json).unwrap();
        assert!(matches!(&hit, SearchHit::Story(s) if s.title.as_deref() == Some("Launch")));
        assert_eq!(hit.id(), 42);
    }

    #[test]
    fn test_non_numeric_object_id_is_rejected() {
        let json = r#"{"_tags": ["comment"], "objectID": "abc", "created_at_i": 1}"#;
        assert!(serde_json::from_str::<SearchHit>(json).is_err());
    }

    #[test]
    fn test_response_filters_comments() {
        let json = r#"{
            "hits": [
                {"_tags": ["story"], "objectID": "1", "created_at_i": 1},
                {"_tags": ["comment"], "objectID": "2", "parent_id": 1, "created_at_i": 2}
            ],
            "page": 0, "nbHits": 2, "nbPages": 1, "hitsPerPage": 500
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.nb_hits, 2);
        let comments = response.comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, 2);
    }

    #[test]
    fn test_decode_search_user() {
        let json = r#"{
            "username": "pg",
            "about": "Bug fixer.",
            "karma": 155111,
            "created_at": "2006-10-09T18:21:32.000Z",
            "created_at_i": 1160418092,
            "avg": 4.5,
            "submission_count": 2530,
            "comment_count": 12345
        }"#;
        let user: SearchUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "pg");
        assert_eq!(user.karma, 155111);
        assert_eq!(user.created_at, 1160418092);
        assert_eq!(user.submission_count, Some(2530));
    }

    #[test]
    fn test_decode_search_user_minimal() {
        let user: SearchUser = serde_json::from_str(r#"{"username": "new"}"#).unwrap();
        assert_eq!(user.karma, 0);
        assert!(user.about.is_none());
        assert!(user.avg.is_none());
    }
}
