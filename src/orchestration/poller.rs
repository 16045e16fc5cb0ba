//! Periodic snapshot poller.
//!
//! Each cycle reads the current crafting cost and sell figures for every
//! configured recipe from the service's own JSON surface and appends one
//! history row per recipe.

use crate::db::{RepoError, Repository};
use crate::domain::fields::read_gsc;
use crate::domain::{Gsc, TimeMs};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Storage(#[from] RepoError),
}

/// Figures persisted per recipe and cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub crafting_cost: Gsc,
    pub sell: Gsc,
}

/// Where the poller reads current recipe figures from.
#[async_trait]
pub trait SnapshotFeed: Send + Sync + fmt::Debug {
    async fn fetch_snapshot(&self, recipe: &str) -> Result<Snapshot, PollError>;
}

/// Reads `<base_url>/api/<recipe>` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSnapshotFeed {
    client: Client,
    base_url: String,
}

impl HttpSnapshotFeed {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, PollError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SnapshotFeed for HttpSnapshotFeed {
    async fn fetch_snapshot(&self, recipe: &str) -> Result<Snapshot, PollError> {
        let url = format!("{}/api/{}", self.base_url, recipe);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PollError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PollError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PollError::Parse(e.to_string()))?;

        parse_snapshot(&body)
    }
}

pub(crate) fn parse_snapshot(body: &serde_json::Value) -> Result<Snapshot, PollError> {
    let map = body
        .as_object()
        .ok_or_else(|| PollError::Parse("Expected object response".to_string()))?;

    Ok(Snapshot {
        crafting_cost: read_gsc(map, "crafting_cost")
            .ok_or(PollError::MissingField("crafting_cost"))?,
        sell: read_gsc(map, "sell").ok_or(PollError::MissingField("sell"))?,
    })
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub inserted: usize,
    pub skipped: Vec<String>,
}

/// Single-flight snapshot poller.
#[derive(Debug)]
pub struct Poller {
    feed: Arc<dyn SnapshotFeed>,
    repo: Arc<Repository>,
    recipes: Vec<String>,
    in_flight: AtomicBool,
}

struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Poller {
    pub fn new(feed: Arc<dyn SnapshotFeed>, repo: Arc<Repository>, recipes: Vec<String>) -> Self {
        Self {
            feed,
            repo,
            recipes,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    /// Run one cycle.
    ///
    /// Returns `None` without doing anything if another cycle is in flight.
    /// A failure for one recipe is logged and skipped; the rest continue.
    pub async fn run_cycle(&self) -> Option<CycleReport> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Poll cycle already in flight, dropping tick");
            return None;
        }
        let _guard = FlightGuard(&self.in_flight);

        let mut report = CycleReport::default();
        for recipe in &self.recipes {
            match self.poll_recipe(recipe).await {
                Ok(id) => {
                    debug!("Stored snapshot recipe={} id={}", recipe, id);
                    report.inserted += 1;
                }
                Err(e) => {
                    warn!("Skipping recipe {} this cycle: {}", recipe, e);
                    report.skipped.push(recipe.clone());
                }
            }
        }

        info!(
            "Poll cycle complete: inserted={} skipped={}",
            report.inserted,
            report.skipped.len()
        );
        Some(report)
    }

    async fn poll_recipe(&self, recipe: &str) -> Result<i64, PollError> {
        let snapshot = self.feed.fetch_snapshot(recipe).await?;
        let id = self
            .repo
            .insert_snapshot(recipe, TimeMs::now(), snapshot.crafting_cost, snapshot.sell)
            .await?;
        Ok(id)
    }

    /// Spawn the polling loop. The first cycle runs one `period` after start.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Poller started: every {}s for {:?}",
                period.as_secs(),
                self.recipes
            );
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                self.run_cycle().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::recipes::Catalog;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct StubFeed {
        snapshots: Mutex<HashMap<String, Snapshot>>,
    }

    impl StubFeed {
        fn with(self, recipe: &str, cost: i64, sell: i64) -> Self {
            self.snapshots.lock().unwrap().insert(
                recipe.to_string(),
                Snapshot {
                    crafting_cost: Gsc::new(cost, 0, 0),
                    sell: Gsc::new(sell, 0, 0),
                },
            );
            self
        }
    }

    #[async_trait]
    impl SnapshotFeed for StubFeed {
        async fn fetch_snapshot(&self, recipe: &str) -> Result<Snapshot, PollError> {
            self.snapshots
                .lock()
                .unwrap()
                .get(recipe)
                .copied()
                .ok_or(PollError::Http {
                    status: 404,
                    body: "price unavailable".to_string(),
                })
        }
    }

    async fn setup_repo() -> (Arc<Repository>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let catalog = Catalog::builtin();
        let pool = init_db(&db_path, &catalog).await.expect("init_db failed");
        (Arc::new(Repository::new(pool, &catalog)), temp_dir)
    }

    fn recipes() -> Vec<String> {
        vec![
            "scholar_rune".to_string(),
            "relic_of_fireworks".to_string(),
            "gear_to_ecto".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_failing_recipe_is_skipped() {
        let (repo, _temp) = setup_repo().await;
        let feed = StubFeed::default()
            .with("scholar_rune", 5, 8)
            .with("gear_to_ecto", 1, 2);
        let poller = Poller::new(Arc::new(feed), repo.clone(), recipes());

        let report = poller.run_cycle().await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, vec!["relic_of_fireworks".to_string()]);

        assert_eq!(repo.count("scholar_rune").await.unwrap(), 1);
        assert_eq!(repo.count("relic_of_fireworks").await.unwrap(), 0);
        assert_eq!(repo.count("gear_to_ecto").await.unwrap(), 1);

        let rows = repo.query_history("scholar_rune", None, None).await.unwrap();
        assert_eq!(rows[0].crafting_cost, Gsc::new(5, 0, 0));
        assert_eq!(rows[0].sell, Gsc::new(8, 0, 0));
    }

    #[tokio::test]
    async fn test_storage_failure_is_skipped() {
        let (repo, _temp) = setup_repo().await;
        let feed = StubFeed::default()
            .with("scholar_rune", 5, 8)
            .with("t5_mats", 1, 1);
        let poller = Poller::new(
            Arc::new(feed),
            repo.clone(),
            vec!["t5_mats".to_string(), "scholar_rune".to_string()],
        );

        let report = poller.run_cycle().await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, vec!["t5_mats".to_string()]);
    }

    #[tokio::test]
    async fn test_cycle_in_flight_drops_tick() {
        let (repo, _temp) = setup_repo().await;
        let poller = Poller::new(Arc::new(StubFeed::default()), repo, recipes());

        poller.in_flight.store(true, Ordering::Release);
        assert!(poller.run_cycle().await.is_none());

        poller.in_flight.store(false, Ordering::Release);
        let report = poller.run_cycle().await.unwrap();
        assert_eq!(report.skipped.len(), 3);
        assert!(!poller.in_flight.load(Ordering::Acquire));
    }

    #[test]
    fn test_parse_snapshot() {
        let body = json!({
            "crafting_cost_g": 5, "crafting_cost_s": 7, "crafting_cost_c": 0,
            "sell_g": 10, "sell_s": 0, "sell_c": 0,
            "profit_g": 3, "profit_s": 43, "profit_c": 0
        });
        let snapshot = parse_snapshot(&body).unwrap();
        assert_eq!(snapshot.crafting_cost, Gsc::new(5, 7, 0));
        assert_eq!(snapshot.sell, Gsc::new(10, 0, 0));
    }

    #[test]
    fn test_parse_snapshot_missing_field() {
        let body = json!({"crafting_cost_g": 5, "crafting_cost_s": 7, "crafting_cost_c": 0});
        assert!(matches!(
            parse_snapshot(&body),
            Err(PollError::MissingField("sell"))
        ));
        assert!(matches!(
            parse_snapshot(&json!([1, 2])),
            Err(PollError::Parse(_))
        ));
    }
}
