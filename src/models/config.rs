//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::table::page::DEFAULT_PAGE_SIZE;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Settings for the back-office console.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Page size tables start with. Must be one of the allowed sizes.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
