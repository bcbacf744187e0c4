// src/services/hacker_news.rs

//! Client for the official item API.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, HnUser, Item, StoryCategory};
use crate::services::ItemApi;
use crate::utils::{endpoint, http};

/// Official API client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HackerNewsClient {
    client: Client,
    base: Url,
}

impl HackerNewsClient {
    /// Create a client against `api.item_base_url`.
    pub fn new(client: Client, api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client,
            base: Url::parse(&api.item_base_url)?,
        })
    }

    fn item_url(&self, id: u64) -> Result<Url> {
        endpoint(&self.base, &format!("item/{id}.json"))
    }

    fn listing_url(&self, category: StoryCategory) -> Result<Url> {
        endpoint(&self.base, &format!("{}stories.json", category.as_str()))
    }

    fn user_url(&self, username: &str) -> Result<Url> {
        endpoint(&self.base, &format!("user/{username}.json"))
    }

    /// Ordered story ids of a front-page listing.
    pub async fn fetch_story_ids(&self, category: StoryCategory) -> Result<Vec<u64>> {
        let url = self.listing_url(category)?;
        http::fetch_json(&self.client, &url).await
    }

    /// Public profile by username.
    pub async fn fetch_user(&self, username: &str) -> Result<HnUser> {
        let url = self.user_url(username)?;
        let body = http::fetch_bytes(&self.client, &url).await?;
        parse_user(username, url.as_str(), &body)
    }
}

/// Decode a user body. Unknown usernames come back as `null`.
fn parse_user(username: &str, context: &str, body: &[u8]) -> Result<HnUser> {
    let user: Option<HnUser> = http::decode_json(context, body)?;
    user.ok_or_else(|| AppError::MissingUser(username.to_string()))
}

/// Decode an item body. The API answers `null` for ids it does not know.
fn parse_item(id: u64, context: &str, body: &[u8]) -> Result<Item> {
    let item: Option<Item> = http::decode_json(context, body)?;
    item.ok_or(AppError::MissingItem(id))
}

#[async_trait]
impl ItemApi for HackerNewsClient {
    async fn fetch_item(&self, id: u64) -> Result<Item> {
        let url = self.item_url(id)?;
        let body = http::fetch_bytes(&self.client, &url).await?;
        parse_item(id, url.as_str(), &body)
    }
}
