//! URL normalization and crawl-scope checks

mod normalize;
mod scope;

pub use normalize::normalize_url;
pub use scope::{extract_host, registrable_domain, same_host, same_registrable_domain};
