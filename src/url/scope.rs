//! Host and domain comparisons backing the crawl-scope predicate
//!
//! The scope policy decides which discovered links are eligible for the
//! frontier: same exact host, same registrable domain (subdomains included),
//! or anywhere.

use url::Url;

/// Extracts the lowercase host from a URL
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the registrable domain for a host: its last two labels
///
/// This is the naive form ("docs.example.com" -> "example.com") that works
/// for the common gTLDs; hosts with fewer than two labels are returned
/// unchanged.
pub fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        host.to_string()
    }
}

/// Checks whether two URLs share the exact same host
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => ha == hb,
        _ => false,
    }
}

/// Checks whether two URLs share a registrable domain (subdomains included)
pub fn same_registrable_domain(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => registrable_domain(&ha) == registrable_domain(&hb),
        _ => false,
    }
}
