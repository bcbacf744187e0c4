// src/models/query.rs

//! Search query parameters for the search index.

use std::fmt;

use crate::models::config::MAX_HITS_PER_PAGE;

/// Sort mode, which selects the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchType {
    /// Newest first (`search_by_date`)
    #[default]
    Recent,
    /// Relevance, then points (`search`)
    Best,
}

impl SearchType {
    pub fn path(&self) -> &'static str {
        match self {
            SearchType::Recent => "search_by_date",
            SearchType::Best => "search",
        }
    }
}

/// A single search tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Story,
    Comment,
    Poll,
    PollOpt,
    ShowHn,
    AskHn,
    FrontPage,
    Author(String),
    StoryId(u64),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Story => f.write_str("story"),
            Tag::Comment => f.write_str("comment"),
            Tag::Poll => f.write_str("poll"),
            Tag::PollOpt => f.write_str("pollopt"),
            Tag::ShowHn => f.write_str("show_hn"),
            Tag::AskHn => f.write_str("ask_hn"),
            Tag::FrontPage => f.write_str("front_page"),
            Tag::Author(name) => write!(f, "author_{name}"),
            Tag::StoryId(id) => write!(f, "story_{id}"),
        }
    }
}

impl Tag {
    /// Parse the textual form produced by `Display`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "story" => Some(Tag::Story),
            "comment" => Some(Tag::Comment),
            "poll" => Some(Tag::Poll),
            "pollopt" => Some(Tag::PollOpt),
            "show_hn" => Some(Tag::ShowHn),
            "ask_hn" => Some(Tag::AskHn),
            "front_page" => Some(Tag::FrontPage),
            _ => {
                if let Some(name) = s.strip_prefix("author_") {
                    (!name.is_empty()).then(|| Tag::Author(name.to_string()))
                } else {
                    s.strip_prefix("story_")
                        .and_then(|id| id.parse().ok())
                        .map(Tag::StoryId)
                }
            }
        }
    }
}

/// Tags combined with AND (comma) or OR (parenthesized).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagGroup {
    And(Vec<Tag>),
    Or(Vec<Tag>),
}

impl TagGroup {
    fn render(&self) -> Option<String> {
        let (tags, parenthesize) = match self {
            TagGroup::And(tags) => (tags, false),
            TagGroup::Or(tags) => (tags, true),
        };
        if tags.is_empty() {
            return None;
        }
        let joined = tags
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Some(if parenthesize {
            format!("({joined})")
        } else {
            joined
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    LessThan { equal: bool },
    GreaterThan { equal: bool },
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equal => f.write_str("="),
            Operator::LessThan { equal } => f.write_str(if *equal { "<=" } else { "<" }),
            Operator::GreaterThan { equal } => f.write_str(if *equal { ">=" } else { ">" }),
        }
    }
}

/// A `field<op><value>` numeric filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFilter {
    /// `created_at_i`, unix seconds
    CreatedAt(Operator, i64),
    Points(Operator, i64),
    NumComments(Operator, i64),
}

impl fmt::Display for NumericFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericFilter::CreatedAt(op, v) => write!(f, "created_at_i{op}{v}"),
            NumericFilter::Points(op, v) => write!(f, "points{op}{v}"),
            NumericFilter::NumComments(op, v) => write!(f, "num_comments{op}{v}"),
        }
    }
}

/// Parameters of one search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchParams {
    pub search_type: SearchType,
    pub query: Option<String>,
    pub tag_groups: Vec<TagGroup>,
    pub numeric_filters: Vec<NumericFilter>,
    pub hits_per_page: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_type: SearchType::default(),
            query: None,
            tag_groups: Vec::new(),
            numeric_filters: Vec::new(),
            hits_per_page: MAX_HITS_PER_PAGE,
        }
    }
}

impl SearchParams {
    /// AND of a single set of tags.
    pub fn with_tags(tags: Vec<Tag>) -> Self {
        Self {
            tag_groups: vec![TagGroup::And(tags)],
            ..Self::default()
        }
    }

    /// Every comment belonging to a story.
    pub fn comments_of(story_id: u64) -> Self {
        Self::with_tags(vec![Tag::Comment, Tag::StoryId(story_id)])
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn filter(mut self, filter: NumericFilter) -> Self {
        self.numeric_filters.push(filter);
        self
    }

    pub fn hits_per_page(mut self, hits: usize) -> Self {
        self.hits_per_page = hits;
        self
    }

    /// The `tags` expression, empty if no group has tags.
    pub fn tags_param(&self) -> String {
        self.tag_groups
            .iter()
            .filter_map(TagGroup::render)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn numeric_filters_param(&self) -> String {
        self.numeric_filters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Query string pairs; empty values are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let hits = self.hits_per_page.clamp(1, MAX_HITS_PER_PAGE);
        [
            ("query", self.query.clone().unwrap_or_default()),
            ("tags", self.tags_param()),
            ("numericFilters", self.numeric_filters_param()),
            ("hitsPerPage", hits.to_string()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}
