//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Store is loaded before listeners bind (traffic only when ready)

use std::path::Path;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::website::WebsiteStore;

/// Open the website store configured in `config`.
pub fn open_store(config: &SiteConfig) -> Result<WebsiteStore> {
    match &config.storage.path {
        Some(path) => WebsiteStore::load_from_file(Path::new(path)),
        None => {
            tracing::warn!("No storage path configured, websites are kept in memory only");
            Ok(WebsiteStore::new(None))
        }
    }
}
