use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy restricting which discovered links are eligible for the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Same registrable domain as the seed (subdomains included)
    Domain,

    /// Exact same host as the seed
    Host,

    /// No restriction; any discovered link may be enqueued
    Unrestricted,
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "domain" => Ok(Self::Domain),
            "host" => Ok(Self::Host),
            "unrestricted" => Ok(Self::Unrestricted),
            other => Err(ConfigError::UnknownScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::Host => write!(f, "host"),
            Self::Unrestricted => write!(f, "unrestricted"),
        }
    }
}

/// Configuration for a single crawl job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Seed URL the crawl starts from
    pub start_url: String,

    /// Maximum link depth from the seed (seed is depth 0)
    pub max_depth: u32,

    /// Maximum number of pages to discover across the whole job
    pub max_pages: usize,

    /// Link eligibility policy
    pub scope: Scope,
}

impl CrawlConfig {
    pub fn new(start_url: impl Into<String>, max_depth: u32, max_pages: usize) -> Self {
        Self {
            start_url: start_url.into(),
            max_depth,
            max_pages,
            scope: Scope::Host,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}
