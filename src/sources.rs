pub mod rawg_api;
pub mod steam_api;

pub use rawg_api::{PlaytimeEntry, RawgAPI};
pub use steam_api::{AppCandidate, AppDetails, SteamAPI};

use crate::Result;

use async_trait::async_trait;
use tracing::{debug, warn};

/// A storefront catalog that can find an app by name and describe it by id.
#[async_trait]
pub trait Storefront: Send + Sync {
    fn get_similarity_threshold(&self) -> f64;

    async fn search_apps(&self, term: &str) -> Result<Vec<AppCandidate>>;

    async fn fetch_app_details(&self, app_id: u64) -> Result<Option<AppDetails>>;

    async fn resolve_app_id(&self, name: &str) -> Result<Option<u64>> {
        let candidates = self.search_apps(name).await?;
        let app_id = steam_api::pick_app_id(name, &candidates, self.get_similarity_threshold());
        debug!(name, ?app_id, candidates = candidates.len(), "Resolved app id.");

        Ok(app_id)
    }
}

/// A playtime catalog searched by free text.
#[async_trait]
pub trait PlaytimeSource: Send + Sync {
    fn get_similarity_threshold(&self) -> f64;

    async fn search_games(&self, term: &str) -> Result<Vec<PlaytimeEntry>>;

    /// Tries every search term in turn and keeps the first acceptable match.
    async fn lookup(&self, name: &str, app_id: Option<u64>) -> Option<PlaytimeEntry> {
        for term in rawg_api::search_terms(name, app_id) {
            match self.search_games(&term).await {
                Ok(entries) => {
                    let threshold = self.get_similarity_threshold();
                    if let Some(entry) = rawg_api::best_match(entries, name, threshold) {
                        debug!(name, term = %term, matched = %entry.name, "Found playtime entry.");
                        return Some(entry);
                    }
                }
                Err(err) => warn!(name, term = %term, "Playtime search failed: {}", err),
            }
        }

        warn!(name, "No playtime entry found.");
        None
    }
}
