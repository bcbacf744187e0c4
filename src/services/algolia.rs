// src/services/algolia.rs

//! Client for the search index.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::{ApiConfig, RootPost, SearchComment, SearchParams, SearchResponse, SearchUser};
use crate::services::SearchApi;
use crate::utils::{endpoint, endpoint_with_query, http};

/// Search index client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AlgoliaClient {
    client: Client,
    base: Url,
    hits_per_page: usize,
}

impl AlgoliaClient {
    /// Create a client against `api.search_base_url`.
    pub fn new(client: Client, api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client,
            base: Url::parse(&api.search_base_url)?,
            hits_per_page: api.hits_per_page,
        })
    }

    fn search_url(&self, params: &SearchParams) -> Result<Url> {
        endpoint_with_query(&self.base, params.search_type.path(), params.query_pairs())
    }

    /// Run one search query and return its first page.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let url = self.search_url(params)?;
        http::fetch_json(&self.client, &url).await
    }

    /// Profile summary by username.
    pub async fn fetch_user(&self, username: &str) -> Result<SearchUser> {
        let url = endpoint(&self.base, &format!("users/{username}"))?;
        http::fetch_json(&self.client, &url).await
    }
}

#[async_trait]
impl SearchApi for AlgoliaClient {
    async fn fetch_root_item(&self, id: u64) -> Result<RootPost> {
        let url = endpoint(&self.base, &format!("items/{id}"))?;
        let body = http::fetch_bytes(&self.client, &url).await?;
        RootPost::from_json(&body)
    }

    async fn fetch_comments(&self, story_id: u64) -> Result<Vec<SearchComment>> {
        let params = SearchParams::comments_of(story_id).hits_per_page(self.hits_per_page);
        let response = self.search(&params).await?;

        if response.nb_hits > response.hits.len() as u64 {
            log::debug!(
                "Comment set for {} truncated: {} of {} hits",
                story_id,
                response.hits.len(),
                response.nb_hits
            );
        }
        Ok(response.comments())
    }
}
