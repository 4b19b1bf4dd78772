//! Content extraction from fetched HTML

mod html;

pub use html::{extract, ExtractedPage};
