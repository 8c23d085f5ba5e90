//! Website store with JSON file persistence.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::observability::metrics;
use crate::website::domain::{domain_base, validate_domain};
use crate::website::model::{now_secs, AccountId, Website, WebsiteInput};

/// Slugs that collide with editor routes; treated as already taken.
pub const RESERVED_SLUGS: &[&str] = &[
    "new", "edit", "index", "session", "login", "logout", "users", "admin", "stylesheets",
    "assets", "javascripts", "images",
];

/// A thread-safe store of websites, keyed by id.
///
/// Reads go straight to the map. Mutations are serialized by `write_lock` so
/// uniqueness checks and the following insert see a consistent view, then the
/// whole store is written to the persistence file.
#[derive(Clone, Default)]
pub struct WebsiteStore {
    inner: Arc<DashMap<Uuid, Website>>,
    write_lock: Arc<Mutex<()>>,
    persistence_path: Option<PathBuf>,
}

impl WebsiteStore {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            write_lock: Arc::new(Mutex::new(())),
            persistence_path,
        }
    }

    /// Load from file if it exists; start empty otherwise.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let websites: Vec<Website> = serde_json::from_reader(reader)?;
            for website in websites {
                store.inner.insert(website.id, website);
            }
            tracing::info!(count = store.inner.len(), path = ?path, "Loaded websites");
        }
        metrics::record_websites(store.inner.len());
        Ok(store)
    }

    /// Write every website to the persistence file, oldest first. The data
    /// goes to a sibling temp file that is renamed over the target, so the
    /// file on disk is always a complete snapshot.
    pub fn save_to_file(&self) -> Result<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };

        let websites = self.all();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &websites)?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        tracing::debug!(count = websites.len(), path = ?path, "Saved websites");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Snapshot of all websites ordered by creation time.
    pub fn all(&self) -> Vec<Website> {
        let mut websites: Vec<Website> = self.inner.iter().map(|r| r.value().clone()).collect();
        websites.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        websites
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<Website> {
        self.inner
            .iter()
            .find(|r| r.value().slug == slug)
            .map(|r| r.value().clone())
    }

    pub fn get_for_owner(&self, owner: &AccountId) -> Option<Website> {
        self.inner
            .iter()
            .find(|r| r.value().is_owned_by(owner))
            .map(|r| r.value().clone())
    }

    /// The owner's websites: zero or one.
    pub fn list_for_owner(&self, owner: &AccountId) -> Vec<Website> {
        self.get_for_owner(owner).into_iter().collect()
    }

    /// Website at `slug`, provided `owner` owns it.
    pub fn get_owned(&self, owner: &AccountId, slug: &str) -> Result<Website> {
        let website = self
            .get_by_slug(slug)
            .ok_or_else(|| AppError::NotFound(format!("website '{}'", slug)))?;
        if !website.is_owned_by(owner) {
            return Err(AppError::Forbidden("you can only manage your own website".into()));
        }
        Ok(website)
    }

    /// Create the owner's website.
    pub fn create(&self, owner: &AccountId, input: WebsiteInput) -> Result<Website> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.get_for_owner(owner).is_some() {
            return Err(AppError::Conflict(
                "you can only have one website, edit your existing website instead".into(),
            ));
        }

        let now = now_secs();
        let mut website = Website {
            id: Uuid::new_v4(),
            owner: owner.clone(),
            name: input.name.clone().unwrap_or_default().trim().to_string(),
            domain_name: input.domain_name.clone().unwrap_or_default().trim().to_string(),
            slug: String::new(),
            published: input.published.unwrap_or(false),
            content: input.content_replacement(),
            created_at: now,
            updated_at: now,
        };

        self.validate(&website)?;
        website.slug = self.assign_slug(&website)?;

        self.commit(website.clone(), None)?;
        tracing::info!(owner = %owner, slug = %website.slug, "Website created");
        Ok(website)
    }

    /// Apply the supplied fields to the owner's website at `slug`. The slug is
    /// re-derived when the domain name changes.
    pub fn update(&self, owner: &AccountId, slug: &str, input: WebsiteInput) -> Result<Website> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = self.get_owned(owner, slug)?;
        let mut website = previous.clone();

        if let Some(name) = &input.name {
            website.name = name.trim().to_string();
        }
        if let Some(domain) = &input.domain_name {
            website.domain_name = domain.trim().to_string();
        }
        if let Some(published) = input.published {
            website.published = published;
        }
        if let Some(content) = input.content_replacement() {
            website.content = Some(content);
        }

        self.validate(&website)?;
        if website.domain_name != previous.domain_name || website.slug.is_empty() {
            website.slug = self.assign_slug(&website)?;
        }
        website.updated_at = now_secs();

        self.commit(website.clone(), Some(previous))?;
        tracing::info!(owner = %owner, slug = %website.slug, "Website updated");
        Ok(website)
    }

    pub fn delete(&self, owner: &AccountId, slug: &str) -> Result<Website> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let website = self.get_owned(owner, slug)?;
        self.inner.remove(&website.id);
        if let Err(e) = self.save_to_file() {
            self.inner.insert(website.id, website);
            return Err(e);
        }

        metrics::record_websites(self.inner.len());
        tracing::info!(owner = %owner, slug = %slug, "Website deleted");
        Ok(website)
    }

    /// Replace one page's body. Nothing is written when the page is missing.
    pub fn update_page_content(
        &self,
        owner: &AccountId,
        slug: &str,
        page_slug: &str,
        body: Option<&str>,
    ) -> Result<Website> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = self.get_owned(owner, slug)?;
        let mut document = previous.document();
        if !document.set_page_content(page_slug, body) {
            return Err(AppError::NotFound(format!("page '{}'", page_slug)));
        }

        let mut website = previous.clone();
        website.content = document.to_value();
        website.updated_at = now_secs();

        self.commit(website.clone(), Some(previous))?;
        tracing::info!(owner = %owner, slug = %slug, page = %page_slug, "Page content updated");
        Ok(website)
    }

    /// Renumber page positions 1..N in display order.
    pub fn normalize_positions(&self, owner: &AccountId, slug: &str) -> Result<Website> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = self.get_owned(owner, slug)?;
        let mut document = previous.document();
        if !document.normalize_positions() {
            return Err(AppError::validation("website content has no page list"));
        }

        let mut website = previous.clone();
        website.content = document.to_value();
        website.updated_at = now_secs();

        self.commit(website.clone(), Some(previous))?;
        Ok(website)
    }

    /// Field and uniqueness checks. Collects every failure.
    fn validate(&self, website: &Website) -> Result<()> {
        let mut errors = Vec::new();

        if website.name.is_empty() {
            errors.push("name can't be blank".to_string());
        }
        if website.domain_name.is_empty() {
            errors.push("domain_name can't be blank".to_string());
        }
        errors.extend(validate_domain(&website.domain_name));

        let name = website.name.to_lowercase();
        let domain = website.domain_name.to_lowercase();
        for other in self.inner.iter().filter(|r| r.value().id != website.id) {
            let other = other.value();
            if !name.is_empty() && other.name.to_lowercase() == name {
                errors.push("name has already been taken".to_string());
            }
            if !domain.is_empty() && other.domain_name.to_lowercase() == domain {
                errors.push("domain_name has already been taken".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// Derive a unique slug from the domain name: `acme`, then `acme-1`,
    /// `acme-2`, ... Reserved words count as taken.
    fn assign_slug(&self, website: &Website) -> Result<String> {
        let base = domain_base(&website.domain_name)
            .ok_or_else(|| AppError::validation("slug can't be blank"))?;

        let taken: HashSet<String> = self
            .inner
            .iter()
            .filter(|r| r.value().id != website.id)
            .map(|r| r.value().slug.clone())
            .collect();
        let unavailable = |candidate: &str| {
            taken.contains(candidate) || RESERVED_SLUGS.contains(&candidate)
        };

        let mut candidate = base.clone();
        let mut counter = 1;
        while unavailable(&candidate) {
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
        Ok(candidate)
    }

    /// Insert and persist; on a persistence failure the previous state is
    /// restored.
    fn commit(&self, website: Website, previous: Option<Website>) -> Result<()> {
        let id = website.id;
        self.inner.insert(id, website);

        if let Err(e) = self.save_to_file() {
            tracing::error!(error = %e, "Failed to persist websites, rolling back");
            match previous {
                Some(previous) => {
                    self.inner.insert(id, previous);
                }
                None => {
                    self.inner.remove(&id);
                }
            }
            return Err(e);
        }

        metrics::record_websites(self.inner.len());
        Ok(())
    }
}
