pub mod notion_api;

pub use notion_api::NotionAPI;

use crate::transform::PageUpdate;
use crate::Result;

use async_trait::async_trait;
use tracing::debug;

type Json = serde_json::Value;

/// A row of the knowledge-base table, kept as the raw JSON the API returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Page(pub Json);

impl Page {
    fn property(&self, name: &str) -> &Json {
        self.0
            .get("properties")
            .and_then(|properties| properties.get(name))
            .unwrap_or(&Json::Null)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Json::as_str)
    }

    pub fn select(&self, name: &str) -> Option<&str> {
        self.property(name).pointer("/select/name").and_then(Json::as_str)
    }

    /// Positive whole numbers only; zero counts as unset.
    pub fn number(&self, name: &str) -> Option<u64> {
        let number = self.property(name).get("number")?;

        number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|value| *value > 0.0 && value.fract() == 0.0)
                    .map(|value| value as u64)
            })
            .filter(|value| *value > 0)
    }

    pub fn title(&self, name: &str) -> Option<String> {
        let title: String = self
            .property(name)
            .get("title")?
            .as_array()?
            .iter()
            .filter_map(|segment| segment.get("plain_text").and_then(Json::as_str))
            .collect();
        let title = title.trim();

        if title.is_empty() {
            None
        } else {
            Some(title.to_owned())
        }
    }
}

#[derive(Debug, Default)]
pub struct PageBatch {
    pub pages: Vec<Page>,
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait Persist: Send + Sync {
    async fn query_pages(&self, start_cursor: Option<String>) -> Result<PageBatch>;

    async fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<()>;

    async fn fetch_all_pages(&self) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        let mut cursor = None;

        loop {
            let batch = self.query_pages(cursor).await?;
            debug!(count = batch.pages.len(), "Fetched page batch.");
            pages.extend(batch.pages);

            match batch.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(pages)
    }
}
