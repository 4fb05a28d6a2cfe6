use crate::config::NotionConfig;
use crate::db::{Page, PageBatch, Persist};
use crate::error::Error;
use crate::transform::PageUpdate;
use crate::{ensure_success, Result};

use async_trait::async_trait;
use serde_json::json;

type Json = serde_json::Value;

const SERVICE: &str = "notion";

pub fn parse_batch(json: Json) -> Result<PageBatch> {
    let pages = json
        .get("results")
        .and_then(Json::as_array)
        .ok_or_else(|| Error::unexpected(SERVICE, "Missing results array."))?
        .iter()
        .cloned()
        .map(Page)
        .collect();

    let has_more = json.get("has_more").and_then(Json::as_bool).unwrap_or(false);
    let next_cursor = if has_more {
        json.get("next_cursor")
            .and_then(Json::as_str)
            .map(ToOwned::to_owned)
    } else {
        None
    };

    Ok(PageBatch { pages, next_cursor })
}

#[derive(Debug, Clone)]
pub struct NotionAPI<'a> {
    config: &'a NotionConfig,
    client: reqwest::Client,
}

impl NotionAPI<'_> {
    pub fn new(config: &NotionConfig) -> NotionAPI {
        NotionAPI {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.config.url, path))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", self.config.version.as_str())
    }
}

#[async_trait]
impl Persist for NotionAPI<'_> {
    async fn query_pages(&self, start_cursor: Option<String>) -> Result<PageBatch> {
        let body = match start_cursor {
            Some(cursor) => json!({ "start_cursor": cursor }),
            None => json!({}),
        };

        let path = format!("databases/{}/query", self.config.database_id);
        let response = self
            .request(reqwest::Method::POST, &path)
            .json(&body)
            .send()
            .await?;
        let json = ensure_success(SERVICE, response).await?.json::<Json>().await?;

        parse_batch(json)
    }

    async fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<()> {
        let path = format!("pages/{}", page_id);
        let response = self
            .request(reqwest::Method::PATCH, &path)
            .json(update)
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;

        Ok(())
    }
}
