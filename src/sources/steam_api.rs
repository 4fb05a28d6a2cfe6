use crate::config::SteamConfig;
use crate::error::Error;
use crate::sources::Storefront;
use crate::text::{is_sequel, normalize, similarity};
use crate::{ensure_success, Result};

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

type Json = serde_json::Value;

const SERVICE: &str = "steam";

#[derive(Debug, Clone, PartialEq)]
pub struct AppCandidate {
    pub app_id: u64,
    pub name: String,
}

impl AppCandidate {
    /// The search endpoint sends `appid` as a string, older payloads as a number.
    fn from_json(json: &Json) -> Option<AppCandidate> {
        let app_id = json.get("appid")?;
        let app_id = app_id
            .as_u64()
            .or_else(|| app_id.as_str().and_then(|id| id.trim().parse().ok()))?;
        let name = json.get("name")?.as_str()?.to_owned();

        Some(AppCandidate { app_id, name })
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReleaseDate {
    #[serde(default)]
    pub coming_soon: bool,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PriceOverview {
    /// Cents, after discounts.
    #[serde(rename = "final")]
    pub final_price: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Genre {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Metacritic {
    pub score: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppDetails {
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: ReleaseDate,
    pub price_overview: Option<PriceOverview>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub metacritic: Option<Metacritic>,
}

impl AppDetails {
    pub fn is_released(&self) -> bool {
        !self.release_date.coming_soon
    }
}

#[derive(Debug, Deserialize)]
struct AppDetailsEnvelope {
    success: bool,
    data: Option<AppDetails>,
}

/// Search results from a raw body. Anything but a JSON array yields no candidates.
pub fn parse_candidates(body: &str) -> Vec<AppCandidate> {
    let json = match serde_json::from_str::<Json>(body) {
        Ok(json) => json,
        Err(err) => {
            warn!("Search returned a non-JSON body: {}", err);
            return Vec::new();
        }
    };

    json.as_array()
        .map(|entries| entries.iter().filter_map(AppCandidate::from_json).collect())
        .unwrap_or_default()
}

pub fn parse_app_details(app_id: u64, json: Json) -> Result<Option<AppDetails>> {
    let mut envelopes: HashMap<String, AppDetailsEnvelope> = serde_json::from_value(json)?;

    match envelopes.remove(&app_id.to_string()) {
        Some(AppDetailsEnvelope {
            success: true,
            data: Some(details),
        }) => Ok(Some(details)),
        Some(_) => Ok(None),
        None => Err(Error::unexpected(
            SERVICE,
            &format!("No entry for app {}.", app_id),
        )),
    }
}

/// Exact name, then prefix, then the closest non-sequel by similarity.
pub fn pick_app_id(name: &str, candidates: &[AppCandidate], threshold: f64) -> Option<u64> {
    if candidates.is_empty() {
        return None;
    }

    let lowered = name.to_lowercase();
    if let Some(exact) = candidates
        .iter()
        .find(|candidate| candidate.name.to_lowercase() == lowered)
    {
        return Some(exact.app_id);
    }

    // A name that normalizes to nothing prefixes every candidate.
    let name_norm = normalize(name);
    if let Some(prefixed) = candidates
        .iter()
        .find(|candidate| normalize(&candidate.name).starts_with(&name_norm))
    {
        return Some(prefixed.app_id);
    }

    let wants_sequel = is_sequel(name);
    let filtered: Vec<&AppCandidate> = candidates
        .iter()
        .filter(|candidate| wants_sequel || !is_sequel(&candidate.name))
        .filter(|candidate| {
            let title_norm = normalize(&candidate.name);
            title_norm.contains(&name_norm) || name_norm.contains(&title_norm)
        })
        .collect();
    let pool: Vec<&AppCandidate> = if filtered.is_empty() {
        candidates.iter().collect()
    } else {
        filtered
    };

    let mut best: (f64, Option<u64>) = (0.0, None);
    for candidate in pool {
        let score = similarity(&name_norm, &normalize(&candidate.name));
        if score > best.0 {
            best = (score, Some(candidate.app_id));
        }
    }

    if best.0 < threshold {
        return None;
    }

    best.1
}

pub fn cover_url(config: &SteamConfig, app_id: u64) -> String {
    format!("{}/{}/library_hero.jpg", config.asset_url, app_id)
}

pub fn icon_url(config: &SteamConfig, app_id: u64) -> String {
    format!("{}/{}/logo.png", config.asset_url, app_id)
}

#[derive(Debug, Clone)]
pub struct SteamAPI<'a> {
    config: &'a SteamConfig,
    client: reqwest::Client,
}

impl SteamAPI<'_> {
    pub fn new(config: &SteamConfig) -> SteamAPI {
        SteamAPI {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn search_url(&self, term: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.search_url)
            .map_err(|err| Error::unexpected(SERVICE, &format!("Invalid search url: {}", err)))?;
        url.path_segments_mut()
            .map_err(|_| Error::unexpected(SERVICE, "Search url cannot take a path."))?
            .pop_if_empty()
            .push(term);

        Ok(url)
    }
}

#[async_trait]
impl Storefront for SteamAPI<'_> {
    fn get_similarity_threshold(&self) -> f64 {
        self.config.similarity_threshold
    }

    async fn search_apps(&self, term: &str) -> Result<Vec<AppCandidate>> {
        let body = self
            .client
            .get(self.search_url(term)?)
            .send()
            .await?
            .text()
            .await?;

        let candidates = parse_candidates(&body);
        debug!(term, count = candidates.len(), "Searched apps.");

        Ok(candidates)
    }

    async fn fetch_app_details(&self, app_id: u64) -> Result<Option<AppDetails>> {
        let app_ids = app_id.to_string();
        let response = self
            .client
            .get(self.config.details_url.as_str())
            .query(&[
                ("appids", app_ids.as_str()),
                ("cc", self.config.country_code.as_str()),
                ("l", self.config.language.as_str()),
            ])
            .send()
            .await?;
        let json = ensure_success(SERVICE, response).await?.json::<Json>().await?;

        parse_app_details(app_id, json)
    }
}
