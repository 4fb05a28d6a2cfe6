use crate::config::RawgConfig;
use crate::error::Error;
use crate::sources::PlaytimeSource;
use crate::text::{normalize, sanitize_title, similarity};
use crate::Result;

use async_trait::async_trait;
use std::time::Duration;

type Json = serde_json::Value;

const SERVICE: &str = "rawg";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaytimeEntry {
    pub name: String,
    /// Median hours played.
    pub playtime: Option<u64>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
}

impl PlaytimeEntry {
    fn extract_value<'a>(json: &'a Json, key: &str) -> &'a Json {
        json.pointer(key).unwrap_or(&Json::Null)
    }

    fn extract_names(json: &Json, key: &str) -> Vec<String> {
        Self::extract_value(json, key)
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("name").and_then(Json::as_str))
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn from_json(json: &Json) -> PlaytimeEntry {
        PlaytimeEntry {
            name: Self::extract_value(json, "/name")
                .as_str()
                .unwrap_or_default()
                .to_owned(),
            playtime: Self::extract_value(json, "/playtime").as_u64(),
            genres: Self::extract_names(json, "/genres"),
            tags: Self::extract_names(json, "/tags"),
        }
    }
}

/// Closest entry by normalized name, first wins ties.
pub fn best_match(
    entries: Vec<PlaytimeEntry>,
    original: &str,
    threshold: f64,
) -> Option<PlaytimeEntry> {
    let original = normalize(original);

    let mut best: (f64, Option<PlaytimeEntry>) = (0.0, None);
    for entry in entries {
        let score = similarity(&original, &normalize(&entry.name));
        if score > best.0 {
            best = (score, Some(entry));
        }
    }

    if best.0 >= threshold {
        best.1
    } else {
        None
    }
}

/// Original name, sanitized name, slug, then the storefront id.
pub fn search_terms(name: &str, app_id: Option<u64>) -> Vec<String> {
    let sanitized = sanitize_title(name);
    let slug = sanitized.replace(' ', "-");

    let mut terms = vec![name.to_owned(), sanitized, slug];
    if let Some(app_id) = app_id {
        terms.push(format!("steam {}", app_id));
    }

    let mut unique: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        if !term.trim().is_empty() && !unique.contains(&term) {
            unique.push(term);
        }
    }

    unique
}

/// Entries of a search response, which must carry a `results` array.
pub fn parse_results(json: &Json) -> Result<Vec<PlaytimeEntry>> {
    let results = json
        .get("results")
        .and_then(Json::as_array)
        .ok_or_else(|| Error::unexpected(SERVICE, "Missing results array."))?;

    Ok(results.iter().map(PlaytimeEntry::from_json).collect())
}

#[derive(Debug, Clone)]
pub struct RawgAPI<'a> {
    config: &'a RawgConfig,
    client: reqwest::Client,
}

impl RawgAPI<'_> {
    pub fn new(config: &RawgConfig) -> Result<RawgAPI> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(RawgAPI { config, client })
    }
}

#[async_trait]
impl PlaytimeSource for RawgAPI<'_> {
    fn get_similarity_threshold(&self) -> f64 {
        self.config.similarity_threshold
    }

    async fn search_games(&self, term: &str) -> Result<Vec<PlaytimeEntry>> {
        let body = self
            .client
            .get(self.config.url.as_str())
            .query(&[("search", term), ("key", self.config.api_key.as_str())])
            .send()
            .await?
            .text()
            .await?;

        let json: Json = serde_json::from_str(&body)?;

        parse_results(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helpers::{entry, FakePlaytime};
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let actual = PlaytimeEntry::from_json(&json!({
            "name": "Hades",
            "playtime": 5,
            "genres": [{ "name": "Action" }, { "foo": "bar" }],
            "tags": [{ "name": "Coop" }, {}]
        }));

        assert_eq!(actual.name, "Hades");
        assert_eq!(actual.playtime, Some(5));
        assert_eq!(actual.genres, vec!["Action".to_owned()]);
        assert_eq!(actual.tags, vec!["Coop".to_owned()]);
    }

    #[test]
    fn test_from_json_empty() {
        let actual = PlaytimeEntry::from_json(&json!({ "genres": null }));
        assert_eq!(actual, PlaytimeEntry::default());
    }

    #[test]
    fn test_parse_results() {
        let json = json!({
            "count": 2,
            "results": [
                { "name": "Hades", "playtime": 12 },
                { "name": "Hades II", "playtime": 0 }
            ]
        });
        let entries = parse_results(&json).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].playtime, Some(12));
        assert_eq!(entries[1].name, "Hades II");
        assert!(parse_results(&json!({ "results": [] })).unwrap().is_empty());
    }

    #[test]
    fn test_parse_results_missing_array() {
        let err = parse_results(&json!({ "error": "The key is invalid." })).unwrap_err();
        assert!(matches!(err, Error::Unexpected { service: "rawg", .. }));

        assert!(parse_results(&json!({ "results": null })).is_err());
    }

    #[test]
    fn test_best_match_keeps_edition_suffix() {
        let entries = vec![entry("Batman: Arkham City", Some(13))];
        let actual = best_match(
            entries,
            "Batman: Arkham City - Game of the Year Edition",
            0.45,
        );

        assert_eq!(actual.map(|entry| entry.playtime), Some(Some(13)));
    }

    #[test]
    fn test_best_match() {
        let entries = vec![
            entry("Hadex", Some(1)),
            entry("Hadez", Some(2)),
            entry("Something Else", Some(3)),
        ];
        let actual = best_match(entries, "Hades", 0.45).unwrap();
        assert_eq!(actual.name, "Hadex");

        let entries = vec![entry("TotallyDifferent", Some(1))];
        assert_eq!(best_match(entries, "Hades", 0.45), None);
        assert_eq!(best_match(Vec::new(), "Hades", 0.45), None);
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(
            search_terms("Baldur's Gate", Some(24)),
            vec!["Baldur's Gate", "baldurs gate", "baldurs-gate", "steam 24"]
        );
        assert_eq!(search_terms("hades", None), vec!["hades"]);
        assert_eq!(search_terms("Hades!!!", Some(1)), vec!["Hades!!!", "hades", "steam 1"]);
    }

    #[tokio::test]
    async fn test_lookup_direct_match() {
        let source = FakePlaytime::new(vec![Some(vec![entry("Hades", Some(10))])]);
        let actual = source.lookup("Hades", Some(1145360)).await.unwrap();

        assert_eq!(actual.playtime, Some(10));
        assert_eq!(source.searched(), vec!["Hades"]);
    }

    #[tokio::test]
    async fn test_lookup_falls_back_after_failure() {
        let source = FakePlaytime::new(vec![None, Some(vec![entry("Hades", Some(9))])]);
        let actual = source.lookup("Hades!!!", Some(1145360)).await.unwrap();

        assert_eq!(actual.playtime, Some(9));
        assert_eq!(source.searched(), vec!["Hades!!!", "hades"]);
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_slug() {
        let source = FakePlaytime::new(vec![
            Some(Vec::new()),
            Some(vec![entry("Unrelated Title", Some(1))]),
            Some(vec![entry("Baldur's Gate", Some(8))]),
        ]);
        let actual = source.lookup("Baldur's Gate", Some(24)).await.unwrap();

        assert_eq!(actual.playtime, Some(8));
        assert_eq!(source.searched().last().unwrap(), "baldurs-gate");
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_app_id() {
        let source = FakePlaytime::new(vec![
            Some(Vec::new()),
            Some(Vec::new()),
            Some(Vec::new()),
            Some(vec![entry("Baldur's Gate: Enhanced", Some(12))]),
        ]);
        let actual = source.lookup("Baldur's Gate", Some(24)).await.unwrap();

        assert_eq!(actual.playtime, Some(12));
        assert_eq!(source.searched().last().unwrap(), "steam 24");
    }

    #[tokio::test]
    async fn test_lookup_exhausted() {
        let source = FakePlaytime::new(Vec::new());
        assert_eq!(source.lookup("Unknown Game", Some(123)).await, None);
        assert_eq!(source.searched().len(), 4);
    }
}
