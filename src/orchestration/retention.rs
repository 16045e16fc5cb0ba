use crate::db::{RepoError, Repository};
use crate::domain::TimeMs;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

const MS_PER_DAY: i64 = 86_400_000;

/// Deletes history rows older than the retention window.
#[derive(Debug)]
pub struct RetentionSweeper {
    repo: Arc<Repository>,
    retention_days: i64,
}

impl RetentionSweeper {
    pub fn new(repo: Arc<Repository>, retention_days: i64) -> Self {
        Self {
            repo,
            retention_days,
        }
    }

    pub fn cutoff(&self, now: TimeMs) -> TimeMs {
        now.saturating_sub_ms(self.retention_days.saturating_mul(MS_PER_DAY))
    }

    /// Sweep every recipe table relative to `now`.
    pub async fn sweep(&self, now: TimeMs) -> Result<u64, RepoError> {
        let cutoff = self.cutoff(now);
        let deleted = self.repo.delete_older_than(cutoff).await?;
        info!(
            "Retention sweep removed {} rows older than {}",
            deleted,
            cutoff.format_minutes()
        );
        Ok(deleted)
    }

    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = self.sweep(TimeMs::now()).await {
                    error!("Retention sweep failed: {}", e);
                }
            }
        })
    }
}
