//! Configuration file watcher for hot reload.
//!
//! # Responsibilities
//! - Watch the config file's directory, so editors that save through a
//!   temp file and rename still trigger a reload
//! - Load and validate the new file; keep the running config on failure
//! - Report which sections changed and forward only real changes

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::SiteConfig;

/// Sections that are read once at startup.
const RESTART_SECTIONS: &[&str] = &["listener", "admin", "security", "timeouts", "storage"];

/// Watches a config file and sends validated configs that differ from the
/// running one.
pub struct ConfigWatcher {
    path: PathBuf,
    reloader: Reloader,
}

struct Reloader {
    path: PathBuf,
    current: SiteConfig,
    update_tx: mpsc::UnboundedSender<SiteConfig>,
}

impl Reloader {
    fn reload(&mut self) {
        let next = match load_config(&self.path) {
            Ok(next) => next,
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                return;
            }
        };

        let changed = changed_sections(&self.current, &next);
        if changed.is_empty() {
            tracing::debug!(path = ?self.path, "Config file touched without changes");
            return;
        }

        let needs_restart: Vec<&str> = changed
            .iter()
            .copied()
            .filter(|s| RESTART_SECTIONS.contains(s))
            .collect();
        if !needs_restart.is_empty() {
            tracing::warn!(sections = ?needs_restart, "Changed sections apply after a restart");
        }
        tracing::info!(sections = ?changed, "Config change detected");

        self.current = next.clone();
        let _ = self.update_tx.send(next);
    }
}

impl ConfigWatcher {
    /// `current` is the config the server started with; reloads are compared
    /// against it.
    pub fn new(path: &Path, current: SiteConfig) -> (Self, mpsc::UnboundedReceiver<SiteConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            reloader: Reloader {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
        };
        (watcher, update_rx)
    }

    /// Start watching in a background thread. The returned watcher must be
    /// kept alive for updates to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name: Option<OsString> = self.path.file_name().map(ToOwned::to_owned);
        let mut reloader = self.reloader;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == file_name.as_deref());
                    if ours && (event.kind.is_modify() || event.kind.is_create()) {
                        reloader.reload();
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn section_changed<T: Serialize>(old: &T, new: &T) -> bool {
    serde_json::to_value(old).ok() != serde_json::to_value(new).ok()
}

/// Names of the top-level sections that differ between two configs.
pub fn changed_sections(old: &SiteConfig, new: &SiteConfig) -> Vec<&'static str> {
    let mut changed = Vec::new();
    macro_rules! compare {
        ($($section:ident),*) => {
            $(
                if section_changed(&old.$section, &new.$section) {
                    changed.push(stringify!($section));
                }
            )*
        };
    }
    compare!(listener, hosts, storage, timeouts, observability, admin, accounts, security);
    changed
}
