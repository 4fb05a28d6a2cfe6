use crate::config::{PropertyNames, SteamConfig};
use crate::sources::steam_api::{cover_url, icon_url};
use crate::sources::AppDetails;
use crate::text::steam_date_to_iso;

use serde::Serialize;
use serde_json::{json, Map};

type Json = serde_json::Value;

/// Everything written back to one row.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub app_id: u64,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub released: bool,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub estimated_duration: Option<f64>,
    pub metacritic: Option<u64>,
    pub cover_image: String,
    pub icon_image: String,
}

impl GameRecord {
    pub fn reconcile(
        app_id: u64,
        details: &AppDetails,
        estimated_duration: Option<f64>,
        config: &SteamConfig,
    ) -> GameRecord {
        let released = details.is_released();

        // Released games without a price overview are free to play.
        let price = match &details.price_overview {
            Some(overview) => Some(overview.final_price as f64 / 100.0),
            None if released => Some(0.0),
            None => None,
        };

        GameRecord {
            app_id,
            name: details.name.clone(),
            price,
            released,
            release_date: steam_date_to_iso(&details.release_date.date),
            genres: details
                .genres
                .iter()
                .map(|genre| genre.description.clone())
                .collect(),
            estimated_duration,
            metacritic: details.metacritic.as_ref().and_then(|m| m.score),
            cover_image: cover_url(config, app_id),
            icon_image: icon_url(config, app_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalFile {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub external: ExternalUrl,
}

impl ExternalFile {
    fn new(url: &str) -> ExternalFile {
        ExternalFile {
            kind: "external",
            external: ExternalUrl {
                url: url.to_owned(),
            },
        }
    }
}

/// Body of a page update: icon, cover and the mapped properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageUpdate {
    pub icon: ExternalFile,
    pub cover: ExternalFile,
    pub properties: Map<String, Json>,
}

impl PageUpdate {
    pub fn new(record: &GameRecord, names: &PropertyNames) -> PageUpdate {
        let mut properties = Map::new();

        if let Some(name) = &record.name {
            properties.insert(
                names.name.clone(),
                json!({ "title": [{ "text": { "content": name } }] }),
            );
        }
        properties.insert(names.app_id.clone(), json!({ "number": record.app_id }));
        properties.insert(names.price.clone(), json!({ "number": record.price }));
        properties.insert(names.released.clone(), json!({ "checkbox": record.released }));
        properties.insert(
            names.genres.clone(),
            json!({
                "multi_select": record
                    .genres
                    .iter()
                    .map(|genre| json!({ "name": genre }))
                    .collect::<Vec<Json>>()
            }),
        );
        properties.insert(
            names.estimated_duration.clone(),
            json!({ "number": record.estimated_duration }),
        );
        properties.insert(names.metacritic.clone(), json!({ "number": record.metacritic }));

        let release_date = match &record.release_date {
            Some(date) => json!({ "date": { "start": date } }),
            None => json!({ "date": null }),
        };
        properties.insert(names.release_date.clone(), release_date);

        PageUpdate {
            icon: ExternalFile::new(&record.icon_image),
            cover: ExternalFile::new(&record.cover_image),
            properties,
        }
    }
}
