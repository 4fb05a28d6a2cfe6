use crate::error::Error;
use crate::Result;

use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PropertyNames {
    pub name: String,
    pub app_id: String,
    pub platform: String,
    pub price: String,
    pub released: String,
    pub release_date: String,
    pub genres: String,
    pub estimated_duration: String,
    pub metacritic: String,
}

impl Default for PropertyNames {
    fn default() -> PropertyNames {
        PropertyNames {
            name: "Name".to_owned(),
            app_id: "ID".to_owned(),
            platform: "Platform".to_owned(),
            price: "Price".to_owned(),
            released: "Released".to_owned(),
            release_date: "Release date".to_owned(),
            genres: "Genres".to_owned(),
            estimated_duration: "Estimated duration".to_owned(),
            metacritic: "Metacritic".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub url: String,
    pub version: String,
    pub token: String,
    pub database_id: String,
    pub properties: PropertyNames,
}

impl Default for NotionConfig {
    fn default() -> NotionConfig {
        NotionConfig {
            url: "https://api.notion.com/v1".to_owned(),
            version: "2022-06-28".to_owned(),
            token: String::new(),
            database_id: String::new(),
            properties: PropertyNames::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SteamConfig {
    pub search_url: String,
    pub details_url: String,
    pub asset_url: String,
    pub country_code: String,
    pub language: String,
    pub similarity_threshold: f64,
}

impl Default for SteamConfig {
    fn default() -> SteamConfig {
        SteamConfig {
            search_url: "https://steamcommunity.com/actions/SearchApps".to_owned(),
            details_url: "https://store.steampowered.com/api/appdetails".to_owned(),
            asset_url: "https://shared.akamai.steamstatic.com/store_item_assets/steam/apps"
                .to_owned(),
            country_code: "fr".to_owned(),
            language: "english".to_owned(),
            similarity_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawgConfig {
    pub url: String,
    pub api_key: String,
    pub user_agent: String,
    pub timeout: u64,
    pub similarity_threshold: f64,
}

impl Default for RawgConfig {
    fn default() -> RawgConfig {
        RawgConfig {
            url: "https://api.rawg.io/api/games".to_owned(),
            api_key: String::new(),
            user_agent: "gamesync/0.1".to_owned(),
            timeout: 8,
            similarity_threshold: 0.45,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub platform: String,
}

impl Default for SyncConfig {
    fn default() -> SyncConfig {
        SyncConfig {
            platform: "Steam".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notion: NotionConfig,
    pub steam: SteamConfig,
    pub rawg: RawgConfig,
    pub sync: SyncConfig,
}

impl Config {
    pub fn from_file(filename: &str) -> Result<Config> {
        let config = fs::read_to_string(filename).map_err(|source| Error::ConfigRead {
            path: filename.to_owned(),
            source,
        })?;

        Self::from_toml(&config)
    }

    pub fn from_toml(toml: &str) -> Result<Config> {
        let config: Config = toml::from_str(toml)?;

        Ok(config)
    }

    /// Overrides secrets with `NOTION_TOKEN`, `NOTION_DATABASE_ID` and `RAWG_API_KEY`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(token) = non_empty("NOTION_TOKEN") {
            self.notion.token = token;
        }
        if let Some(database_id) = non_empty("NOTION_DATABASE_ID") {
            self.notion.database_id = database_id;
        }
        if let Some(api_key) = non_empty("RAWG_API_KEY") {
            self.rawg.api_key = api_key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.notion.token.is_empty() {
            return Err(Error::MissingConfig("notion.token"));
        }
        if self.notion.database_id.is_empty() {
            return Err(Error::MissingConfig("notion.database_id"));
        }
        if self.rawg.api_key.is_empty() {
            return Err(Error::MissingConfig("rawg.api_key"));
        }

        Ok(())
    }
}
