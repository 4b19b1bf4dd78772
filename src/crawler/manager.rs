//! Crawl job registry
//!
//! The [`JobManager`] is the crawl trigger interface a transport layer
//! consumes: `start_crawl`, `advance_crawl`, `stop_crawl`, `remove_job`.
//! Jobs are fully independent; each lives behind its own mutex so one job is
//! advanced by at most one in-flight call at a time, while other jobs make
//! progress freely.

use crate::config::CrawlConfig;
use crate::crawler::job::{CrawlJob, JobSnapshot};
use crate::storage::PageStore;
use crate::{CrawlrankError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

struct JobHandle {
    job: Arc<Mutex<CrawlJob>>,
    cancelled: Arc<AtomicBool>,
}

/// Registry of independent crawl jobs sharing one page store
pub struct JobManager {
    store: Arc<dyn PageStore>,
    jobs: Mutex<HashMap<String, JobHandle>>,
}

impl JobManager {
    pub fn new(store: Arc<dyn PageStore>) -> Self {
        Self {
            store,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Validates the configuration and registers a new job
    ///
    /// Returns the job id, or a configuration error without creating any
    /// job state.
    pub async fn start_crawl(&self, config: CrawlConfig) -> Result<String> {
        let job = CrawlJob::new(config)?;
        let id = job.id().to_string();
        let cancelled = job.cancel_flag();

        tracing::info!("Started crawl job {}", id);
        self.jobs.lock().await.insert(
            id.clone(),
            JobHandle {
                job: Arc::new(Mutex::new(job)),
                cancelled,
            },
        );
        Ok(id)
    }

    /// Advances a job by one batch and returns its snapshot
    ///
    /// Serialized per job: a concurrent call for the same id waits its turn.
    /// Once the job is stopped or terminal this is a no-op returning the
    /// final snapshot.
    pub async fn advance_crawl(&self, job_id: &str) -> Result<JobSnapshot> {
        let handle = self.job_handle(job_id).await?;
        let mut job = handle.lock().await;
        Ok(job.advance(self.store.as_ref()).await)
    }

    /// Stops a job without discarding already-crawled nodes
    ///
    /// The cancellation flag is raised before the job lock is taken, so an
    /// in-flight `advance` abandons its remaining fetches instead of being
    /// awaited to completion.
    pub async fn stop_crawl(&self, job_id: &str) -> Result<JobSnapshot> {
        let (handle, cancelled) = {
            let jobs = self.jobs.lock().await;
            let entry = jobs
                .get(job_id)
                .ok_or_else(|| CrawlrankError::JobNotFound(job_id.to_string()))?;
            (Arc::clone(&entry.job), Arc::clone(&entry.cancelled))
        };

        cancelled.store(true, Ordering::Relaxed);

        let mut job = handle.lock().await;
        job.stop();
        tracing::info!("Stopped crawl job {}", job_id);
        Ok(job.snapshot())
    }

    /// Current snapshot without advancing
    pub async fn snapshot(&self, job_id: &str) -> Result<JobSnapshot> {
        let handle = self.job_handle(job_id).await?;
        let job = handle.lock().await;
        Ok(job.snapshot())
    }

    /// Drops a job's state entirely (client disconnect, explicit cleanup)
    pub async fn remove_job(&self, job_id: &str) -> Result<()> {
        let removed = self.jobs.lock().await.remove(job_id);
        match removed {
            Some(entry) => {
                entry.cancelled.store(true, Ordering::Relaxed);
                Ok(())
            }
            None => Err(CrawlrankError::JobNotFound(job_id.to_string())),
        }
    }

    async fn job_handle(&self, job_id: &str) -> Result<Arc<Mutex<CrawlJob>>> {
        let jobs = self.jobs.lock().await;
        jobs.get(job_id)
            .map(|entry| Arc::clone(&entry.job))
            .ok_or_else(|| CrawlrankError::JobNotFound(job_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scope;
    use crate::storage::SqliteStore;

    fn manager() -> JobManager {
        JobManager::new(Arc::new(SqliteStore::in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_without_job() {
        let manager = manager();
        let config = CrawlConfig::new("not a url", 2, 10);
        assert!(manager.start_crawl(config).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_job_id() {
        let manager = manager();
        assert!(matches!(
            manager.advance_crawl("nope").await,
            Err(CrawlrankError::JobNotFound(_))
        ));
        assert!(matches!(
            manager.stop_crawl("nope").await,
            Err(CrawlrankError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_independent_jobs() {
        let manager = manager();
        let a = manager
            .start_crawl(CrawlConfig::new("https://a.example.com/", 1, 5).with_scope(Scope::Host))
            .await
            .unwrap();
        let b = manager
            .start_crawl(CrawlConfig::new("https://b.example.com/", 1, 5).with_scope(Scope::Host))
            .await
            .unwrap();
        assert_ne!(a, b);

        let snap_a = manager.snapshot(&a).await.unwrap();
        let snap_b = manager.snapshot(&b).await.unwrap();
        assert_eq!(snap_a.nodes[0].url, "https://a.example.com/");
        assert_eq!(snap_b.nodes[0].url, "https://b.example.com/");
    }

    #[tokio::test]
    async fn test_stop_then_advance_is_noop() {
        let manager = manager();
        let id = manager
            .start_crawl(CrawlConfig::new("https://a.example.com/", 1, 5))
            .await
            .unwrap();

        let stopped = manager.stop_crawl(&id).await.unwrap();
        assert_eq!(stopped.stats.status, crate::crawler::JobStatus::Idle);

        let after = manager.advance_crawl(&id).await.unwrap();
        assert_eq!(after.stats.status, crate::crawler::JobStatus::Idle);
        assert_eq!(after.stats.completed_pages, 0);
    }

    #[tokio::test]
    async fn test_remove_job() {
        let manager = manager();
        let id = manager
            .start_crawl(CrawlConfig::new("https://a.example.com/", 1, 5))
            .await
            .unwrap();
        manager.remove_job(&id).await.unwrap();
        assert!(manager.snapshot(&id).await.is_err());
    }
}
