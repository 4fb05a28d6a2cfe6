mod config;
pub mod db;
mod error;
pub mod estimate;
mod options;
pub mod sources;
mod test;
pub mod text;
pub mod transform;

pub use config::{Config, NotionConfig, PropertyNames, RawgConfig, SteamConfig, SyncConfig};
pub use error::Error;
pub use options::RunOptions;

use db::{NotionAPI, Page, Persist};
use estimate::estimate_duration;
use sources::{PlaytimeSource, RawgAPI, SteamAPI, Storefront};
use transform::{GameRecord, PageUpdate};

use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, error, info, warn};

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Platform(Option<String>),
    MissingAppId,
    MissingDetails(u64),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SkipReason::Platform(Some(platform)) => write!(f, "platform is {}", platform),
            SkipReason::Platform(None) => write!(f, "platform is not set"),
            SkipReason::MissingAppId => write!(f, "no app id"),
            SkipReason::MissingDetails(app_id) => {
                write!(f, "no storefront details for app {}", app_id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated(GameRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} updated, {} skipped, {} failed",
            self.updated, self.skipped, self.failed
        )
    }
}

pub struct Sources<'a> {
    pub storefront: Box<dyn Storefront + 'a>,
    pub playtime: Box<dyn PlaytimeSource + 'a>,
}

pub struct Synchronizer<'a> {
    config: &'a Config,
    sources: Sources<'a>,
    db: Box<dyn Persist + 'a>,
}

impl<'a> Synchronizer<'a> {
    pub fn new(config: &'a Config) -> Result<Synchronizer<'a>> {
        let sources = Sources {
            storefront: Box::new(SteamAPI::new(&config.steam)),
            playtime: Box::new(RawgAPI::new(&config.rawg)?),
        };
        let db = Box::new(NotionAPI::new(&config.notion));

        Ok(Self::with_parts(config, sources, db))
    }

    pub fn with_parts(
        config: &'a Config,
        sources: Sources<'a>,
        db: Box<dyn Persist + 'a>,
    ) -> Synchronizer<'a> {
        Synchronizer {
            config,
            sources,
            db,
        }
    }

    fn on_platform(&self, page: &Page) -> bool {
        page.select(&self.config.notion.properties.platform)
            == Some(self.config.sync.platform.as_str())
    }

    async fn resolve_app_id(&self, page: &Page) -> Result<Option<u64>> {
        let names = &self.config.notion.properties;

        if let Some(app_id) = page.number(&names.app_id) {
            return Ok(Some(app_id));
        }

        let title = match page.title(&names.name) {
            Some(title) => title,
            None => return Ok(None),
        };

        let app_id = self.sources.storefront.resolve_app_id(&title).await?;
        match app_id {
            Some(app_id) => info!(app_id, title = %title, "Found app id by name."),
            None => warn!(title = %title, "No app id found by name."),
        }

        Ok(app_id)
    }

    async fn estimate(&self, app_id: u64, details: &sources::AppDetails) -> Option<f64> {
        if !details.is_released() {
            return None;
        }
        let name = details.name.as_deref()?;

        let entry = self.sources.playtime.lookup(name, Some(app_id)).await?;
        estimate_duration(entry.playtime, &entry.genres, &entry.tags)
    }

    /// Reconciles one row and writes it back unless this is a dry run.
    pub async fn sync_page(&self, page: &Page, options: &RunOptions) -> Result<Outcome> {
        let page_id = page
            .id()
            .ok_or_else(|| Error::unexpected("notion", "Page without an id."))?;

        if !self.on_platform(page) {
            let platform = page
                .select(&self.config.notion.properties.platform)
                .map(ToOwned::to_owned);
            return Ok(Outcome::Skipped(SkipReason::Platform(platform)));
        }

        let app_id = match self.resolve_app_id(page).await? {
            Some(app_id) => app_id,
            None => return Ok(Outcome::Skipped(SkipReason::MissingAppId)),
        };

        debug!(page_id, app_id, "Fetching storefront details.");
        let details = match self.sources.storefront.fetch_app_details(app_id).await? {
            Some(details) => details,
            None => return Ok(Outcome::Skipped(SkipReason::MissingDetails(app_id))),
        };

        let estimated_duration = self.estimate(app_id, &details).await;
        let record =
            GameRecord::reconcile(app_id, &details, estimated_duration, &self.config.steam);
        let update = PageUpdate::new(&record, &self.config.notion.properties);

        if options.dry_run {
            info!(
                page_id,
                app_id,
                "Dry run, not writing: {}",
                serde_json::to_string(&update)?
            );
        } else {
            self.db.update_page(page_id, &update).await?;
            info!(page_id, app_id, "Updated page.");
        }

        Ok(Outcome::Updated(record))
    }

    pub async fn run(&self, options: &RunOptions) -> Result<RunSummary> {
        let pages = self.db.fetch_all_pages().await?;
        info!(count = pages.len(), "Fetched pages.");

        let mut summary = RunSummary::default();
        let mut eligible = 0;

        for page in &pages {
            if self.on_platform(page) {
                if options.limit.map_or(false, |limit| eligible >= limit) {
                    info!(eligible, "Reached page limit.");
                    break;
                }
                eligible += 1;
            }

            let page_id = page.id().unwrap_or("<unknown>");
            match self.sync_page(page, options).await {
                Ok(Outcome::Updated(_)) => summary.updated += 1,
                Ok(Outcome::Skipped(reason)) => {
                    info!(page_id, "Skipped page: {}.", reason);
                    summary.skipped += 1;
                }
                Err(err) => {
                    error!(page_id, "Could not sync page: {}", err);
                    summary.failed += 1;
                }
            }
        }

        info!("Finished: {}.", summary);

        Ok(summary)
    }
}
