//! Per-job crawl state machine
//!
//! A [`CrawlJob`] owns its frontier, visited set, and node list outright;
//! nothing is shared between jobs. The job advances one bounded batch at a
//! time so a caller can poll or stream incremental state: each `advance`
//! dequeues up to [`BATCH_SIZE`] frontier entries, fetches them concurrently
//! under a worker cap, applies the results in dequeue order, and returns a
//! full snapshot.

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page, USER_AGENT};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::extract::extract;
use crate::index::tokenize;
use crate::robots::RobotsCache;
use crate::storage::{Page, PageStatus, PageStore};
use crate::{FetchError, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use url::Url;

/// Maximum frontier entries processed per `advance` call
pub const BATCH_SIZE: usize = 5;

/// Maximum concurrent fetches within one batch
const MAX_WORKERS: usize = 4;

/// Status of one discovered URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Pending,
    Crawling,
    Completed,
    Error,
}

/// Overall job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Stopped by the caller; already-crawled nodes are retained
    Idle,
    Crawling,
    Completed,
    /// Reserved for jobs that fail validation; `start` refuses to create
    /// such jobs, so a live job never carries this status
    Error,
}

/// One discovered URL as exposed to live clients
///
/// This shape is the wire contract a UI or CLI renders against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub url: String,
    pub depth: u32,
    pub status: NodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Aggregate job statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    /// Total URLs discovered (admitted to the frontier) so far
    pub total_pages: usize,

    /// Nodes fetched and extracted successfully
    pub completed_pages: usize,

    /// Frontier entries awaiting fetch
    pub queue_size: usize,

    /// Accumulated crawl time in seconds
    pub duration: f64,

    pub status: JobStatus,
}

/// Full job state returned by every `advance`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub job_id: String,
    pub stats: JobStats,
    pub nodes: Vec<NodeSnapshot>,
}

/// A single crawl: configuration, frontier, node list, and progress state
pub struct CrawlJob {
    id: String,
    seed: Url,
    frontier: Frontier,
    nodes: Vec<NodeSnapshot>,
    node_index: HashMap<String, usize>,
    client: Client,
    robots: RobotsCache,
    status: JobStatus,
    elapsed: Duration,
    cancelled: Arc<AtomicBool>,
}

impl CrawlJob {
    /// Validates the configuration and creates a job in `Crawling` state
    /// with the seed as the only frontier entry
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let seed = validate(&config)?;
        let id = derive_job_id(&seed);
        let frontier = Frontier::new(
            seed.clone(),
            config.max_depth,
            config.max_pages,
            config.scope,
        );

        let seed_node = NodeSnapshot {
            url: seed.to_string(),
            depth: 0,
            status: NodeStatus::Pending,
            title: None,
            link_count: None,
            parent: None,
        };
        let mut node_index = HashMap::new();
        node_index.insert(seed.to_string(), 0);

        Ok(Self {
            id,
            seed,
            frontier,
            nodes: vec![seed_node],
            node_index,
            client: build_http_client()?,
            robots: RobotsCache::new(USER_AGENT),
            status: JobStatus::Crawling,
            elapsed: Duration::ZERO,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Flag checked between fetches; setting it makes the current and all
    /// later `advance` calls bail out without applying results
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Stops the job without discarding already-crawled nodes
    pub fn stop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if self.status == JobStatus::Crawling {
            self.status = JobStatus::Idle;
        }
    }

    /// Renders the full state for external consumers
    pub fn snapshot(&self) -> JobSnapshot {
        let completed = self
            .nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Completed)
            .count();

        JobSnapshot {
            job_id: self.id.clone(),
            stats: JobStats {
                total_pages: self.frontier.discovered(),
                completed_pages: completed,
                queue_size: self.frontier.queue_len(),
                duration: self.elapsed.as_secs_f64(),
                status: self.status,
            },
            nodes: self.nodes.clone(),
        }
    }

    /// Processes one batch of frontier entries and returns the new snapshot
    ///
    /// No-op (returns the current snapshot) once the job is stopped or
    /// terminal. Per-node failures are absorbed into node status; they never
    /// fail the job.
    pub async fn advance(&mut self, store: &dyn PageStore) -> JobSnapshot {
        if self.cancelled.load(Ordering::Relaxed) {
            self.stop();
            return self.snapshot();
        }
        if self.status != JobStatus::Crawling {
            return self.snapshot();
        }

        let batch_started = Instant::now();

        let mut batch: Vec<QueuedUrl> = Vec::with_capacity(BATCH_SIZE);
        while batch.len() < BATCH_SIZE {
            match self.frontier.next() {
                Some(entry) => batch.push(entry),
                None => break,
            }
        }

        // Robots decisions come first (sequential, cached per host); denied
        // entries never reach the fetch pool
        let mut allowed = Vec::with_capacity(batch.len());
        for entry in &batch {
            self.set_node_status(entry.url.as_str(), NodeStatus::Crawling);
            allowed.push(self.robots.is_allowed(&self.client, &entry.url).await);
        }

        // Fetch the allowed entries concurrently, bounded by worker permits
        let semaphore = Arc::new(Semaphore::new(MAX_WORKERS));
        let mut handles = Vec::with_capacity(batch.len());
        for (entry, &ok) in batch.iter().zip(&allowed) {
            if !ok {
                handles.push(None);
                continue;
            }
            let client = self.client.clone();
            let permits = Arc::clone(&semaphore);
            let url = entry.url.clone();
            handles.push(Some(tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                fetch_page(&client, &url).await
            })));
        }

        // Apply results in dequeue order so node transitions stay FIFO
        let mut aborted = false;
        for (i, entry) in batch.iter().enumerate() {
            if self.cancelled.load(Ordering::Relaxed) {
                // Abandon in-flight fetches: results are discarded, the
                // affected nodes fall back to pending
                for handle in handles.iter().skip(i).flatten() {
                    handle.abort();
                }
                for pending in &batch[i..] {
                    self.set_node_status(pending.url.as_str(), NodeStatus::Pending);
                }
                aborted = true;
                break;
            }

            let outcome = match handles[i].take() {
                None => Err(FetchError::RobotsDenied {
                    url: entry.url.to_string(),
                }),
                Some(handle) => match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(FetchError::Other {
                        url: entry.url.to_string(),
                        message: e.to_string(),
                    }),
                },
            };

            match outcome {
                Ok(body) => self.apply_fetched(store, entry, &body),
                Err(e) => {
                    tracing::warn!("Fetch failed: {}", e);
                    self.set_node_status(entry.url.as_str(), NodeStatus::Error);
                }
            }
        }

        self.elapsed += batch_started.elapsed();

        if aborted {
            self.stop();
        } else if self.frontier.is_empty() {
            self.status = JobStatus::Completed;
            tracing::info!(
                "Crawl {} completed: {} discovered, {:.1}s",
                self.id,
                self.frontier.discovered(),
                self.elapsed.as_secs_f64()
            );
        }

        self.snapshot()
    }

    /// Extracts a fetched page, persists it, and enqueues its in-scope links
    fn apply_fetched(&mut self, store: &dyn PageStore, entry: &QueuedUrl, body: &str) {
        let extracted = extract(body, &entry.url);

        let page = Page {
            url: entry.url.to_string(),
            title: extracted.title.clone(),
            text: extracted.text.clone(),
            snippet: extracted.snippet.clone(),
            word_count: tokenize(&extracted.title).count() + tokenize(&extracted.text).count(),
            links: extracted.links.clone(),
            depth: entry.depth,
            parent: entry.parent.clone(),
            fetched_at: Utc::now(),
            status: PageStatus::Completed,
            source: self.seed.to_string(),
        };

        if let Err(e) = store.put_page(&page) {
            tracing::error!("Failed to persist {}: {}", page.url, e);
            self.set_node_status(entry.url.as_str(), NodeStatus::Error);
            return;
        }

        let node = &mut self.nodes[self.node_index[entry.url.as_str()]];
        node.status = NodeStatus::Completed;
        node.link_count = Some(extracted.links.len());
        if !extracted.title.is_empty() {
            node.title = Some(extracted.title);
        }

        // Discovered links are offered at depth+1; every admitted one gets a
        // pending node. Out-of-scope and over-budget links stay recorded on
        // the page but never enter the frontier.
        for link in &extracted.links {
            let Ok(target) = Url::parse(link) else {
                continue;
            };
            if self
                .frontier
                .enqueue(target, entry.depth + 1, Some(entry.url.to_string()))
            {
                self.node_index.insert(link.clone(), self.nodes.len());
                self.nodes.push(NodeSnapshot {
                    url: link.clone(),
                    depth: entry.depth + 1,
                    status: NodeStatus::Pending,
                    title: None,
                    link_count: None,
                    parent: Some(entry.url.to_string()),
                });
            }
        }
    }

    fn set_node_status(&mut self, url: &str, status: NodeStatus) {
        if let Some(&idx) = self.node_index.get(url) {
            self.nodes[idx].status = status;
        }
    }
}

/// Derives a short job id from the seed URL, creation time, and a
/// process-wide counter (two jobs created in the same clock tick still get
/// distinct ids)
fn derive_job_id(seed: &Url) -> String {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

    let mut hasher = Sha256::new();
    hasher.update(seed.as_str().as_bytes());
    hasher.update(
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    hasher.update(COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hex::encode(&hasher.finalize()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scope;

    #[test]
    fn test_invalid_config_creates_no_job() {
        let config = CrawlConfig::new("https://example.com/", 0, 10);
        assert!(CrawlJob::new(config).is_err());
    }

    #[tokio::test]
    async fn test_new_job_is_crawling_with_seed_pending() {
        let config = CrawlConfig::new("https://example.com/", 2, 10);
        let job = CrawlJob::new(config).unwrap();
        let snapshot = job.snapshot();

        assert_eq!(snapshot.stats.status, JobStatus::Crawling);
        assert_eq!(snapshot.stats.total_pages, 1);
        assert_eq!(snapshot.stats.queue_size, 1);
        assert_eq!(snapshot.nodes.len(), 1);
        assert_eq!(snapshot.nodes[0].status, NodeStatus::Pending);
        assert_eq!(snapshot.nodes[0].depth, 0);
    }

    #[test]
    fn test_job_ids_are_distinct() {
        let a = CrawlJob::new(CrawlConfig::new("https://example.com/", 2, 10)).unwrap();
        let b = CrawlJob::new(CrawlConfig::new("https://example.com/", 2, 10)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_stopped_job_advance_is_noop() {
        let store = crate::storage::SqliteStore::in_memory().unwrap();
        let config = CrawlConfig::new("https://example.com/", 2, 10).with_scope(Scope::Host);
        let mut job = CrawlJob::new(config).unwrap();

        job.stop();
        assert_eq!(job.status(), JobStatus::Idle);

        let snapshot = job.advance(&store).await;
        assert_eq!(snapshot.stats.status, JobStatus::Idle);
        // Nothing was fetched: the seed is still pending and enqueued
        assert_eq!(snapshot.stats.queue_size, 1);
        assert_eq!(snapshot.stats.completed_pages, 0);
    }

    #[test]
    fn test_node_snapshot_wire_shape() {
        let node = NodeSnapshot {
            url: "https://example.com/a".to_string(),
            depth: 1,
            status: NodeStatus::Completed,
            title: Some("A".to_string()),
            link_count: Some(3),
            parent: Some("https://example.com/".to_string()),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["linkCount"], 3);
        assert_eq!(json["parent"], "https://example.com/");

        let bare = NodeSnapshot {
            url: "https://example.com/".to_string(),
            depth: 0,
            status: NodeStatus::Pending,
            title: None,
            link_count: None,
            parent: None,
        };
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("linkCount").is_none());
    }

    #[test]
    fn test_stats_wire_shape() {
        let config = CrawlConfig::new("https://example.com/", 2, 10);
        let job = CrawlJob::new(config).unwrap();
        let json = serde_json::to_value(job.snapshot()).unwrap();

        assert_eq!(json["stats"]["totalPages"], 1);
        assert_eq!(json["stats"]["completedPages"], 0);
        assert_eq!(json["stats"]["queueSize"], 1);
        assert_eq!(json["stats"]["status"], "crawling");
        assert!(json["stats"]["duration"].is_number());
        assert!(json["jobId"].is_string());
    }
}
