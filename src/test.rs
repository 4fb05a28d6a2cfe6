#[cfg(test)]
pub mod helpers {
    use crate::db::{Page, PageBatch, Persist};
    use crate::error::Error;
    use crate::sources::steam_api::{Genre, PriceOverview, ReleaseDate};
    use crate::sources::{AppCandidate, AppDetails, PlaytimeEntry, PlaytimeSource, Storefront};
    use crate::transform::PageUpdate;
    use crate::Result;

    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::{Arc, Mutex};

    pub fn page(id: &str, platform: &str, app_id: Option<u64>, title: Option<&str>) -> Page {
        let title = match title {
            Some(title) => json!([{ "plain_text": title }]),
            None => json!([]),
        };

        Page(json!({
            "id": id,
            "properties": {
                "Platform": { "select": { "name": platform } },
                "ID": { "number": app_id },
                "Name": { "title": title }
            }
        }))
    }

    pub fn entry(name: &str, playtime: Option<u64>) -> PlaytimeEntry {
        PlaytimeEntry {
            name: name.to_owned(),
            playtime,
            genres: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn details(name: &str, coming_soon: bool, price: Option<u64>) -> AppDetails {
        AppDetails {
            name: Some(name.to_owned()),
            release_date: ReleaseDate {
                coming_soon,
                date: if coming_soon {
                    "Coming soon".to_owned()
                } else {
                    "17 Sep, 2020".to_owned()
                },
            },
            price_overview: price.map(|final_price| PriceOverview { final_price }),
            genres: vec![Genre {
                description: "Action".to_owned(),
            }],
            metacritic: None,
        }
    }

    /// Serves `batches` in order, chaining them with `cursor-N` cursors.
    /// Clones share recorded calls.
    #[derive(Clone, Default)]
    pub struct FakeDB {
        batches: Vec<Vec<Page>>,
        failing: bool,
        cursors: Arc<Mutex<Vec<Option<String>>>>,
        updates: Arc<Mutex<Vec<(String, PageUpdate)>>>,
    }

    impl FakeDB {
        pub fn new(batches: Vec<Vec<Page>>) -> FakeDB {
            FakeDB {
                batches,
                ..FakeDB::default()
            }
        }

        pub fn failing() -> FakeDB {
            FakeDB {
                failing: true,
                ..FakeDB::default()
            }
        }

        pub fn cursors(&self) -> Vec<Option<String>> {
            self.cursors.lock().unwrap().clone()
        }

        pub fn updates(&self) -> Vec<(String, PageUpdate)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Persist for FakeDB {
        async fn query_pages(&self, start_cursor: Option<String>) -> Result<PageBatch> {
            self.cursors.lock().unwrap().push(start_cursor.clone());

            if self.failing {
                return Err(Error::Status {
                    service: "notion",
                    status: 500,
                    body: "unavailable".to_owned(),
                });
            }

            let index = start_cursor
                .and_then(|cursor| cursor.strip_prefix("cursor-")?.parse::<usize>().ok())
                .unwrap_or(0);
            let pages = self.batches.get(index).cloned().unwrap_or_default();
            let next_cursor = if index + 1 < self.batches.len() {
                Some(format!("cursor-{}", index + 1))
            } else {
                None
            };

            Ok(PageBatch { pages, next_cursor })
        }

        async fn update_page(&self, page_id: &str, update: &PageUpdate) -> Result<()> {
            self.updates
                .lock()
                .unwrap()
                .push((page_id.to_owned(), update.clone()));

            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub struct FakeStorefront {
        pub candidates: Vec<AppCandidate>,
        pub details: HashMap<u64, AppDetails>,
        pub failing: HashSet<u64>,
        searched: Arc<Mutex<Vec<String>>>,
    }

    impl FakeStorefront {
        pub fn with_details(details: Vec<(u64, AppDetails)>) -> FakeStorefront {
            FakeStorefront {
                details: details.into_iter().collect(),
                ..FakeStorefront::default()
            }
        }

        pub fn searched(&self) -> Vec<String> {
            self.searched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Storefront for FakeStorefront {
        fn get_similarity_threshold(&self) -> f64 {
            0.3
        }

        async fn search_apps(&self, term: &str) -> Result<Vec<AppCandidate>> {
            self.searched.lock().unwrap().push(term.to_owned());

            Ok(self.candidates.clone())
        }

        async fn fetch_app_details(&self, app_id: u64) -> Result<Option<AppDetails>> {
            if self.failing.contains(&app_id) {
                return Err(Error::unexpected("steam", "scripted failure"));
            }

            Ok(self.details.get(&app_id).cloned())
        }
    }

    /// Answers searches from a script; `None` fails the search, an empty script finds nothing.
    #[derive(Clone, Default)]
    pub struct FakePlaytime {
        script: Arc<Mutex<VecDeque<Option<Vec<PlaytimeEntry>>>>>,
        searched: Arc<Mutex<Vec<String>>>,
    }

    impl FakePlaytime {
        pub fn new(script: Vec<Option<Vec<PlaytimeEntry>>>) -> FakePlaytime {
            FakePlaytime {
                script: Arc::new(Mutex::new(script.into())),
                searched: Arc::default(),
            }
        }

        pub fn searched(&self) -> Vec<String> {
            self.searched.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaytimeSource for FakePlaytime {
        fn get_similarity_threshold(&self) -> f64 {
            0.45
        }

        async fn search_games(&self, term: &str) -> Result<Vec<PlaytimeEntry>> {
            self.searched.lock().unwrap().push(term.to_owned());

            match self.script.lock().unwrap().pop_front() {
                Some(Some(entries)) => Ok(entries),
                Some(None) => Err(Error::unexpected("rawg", "scripted failure")),
                None => Ok(Vec::new()),
            }
        }
    }
}
