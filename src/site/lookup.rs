//! Request → website → page resolution.

use crate::content::{normalize_request_path, Page};
use crate::routing::HostResolver;
use crate::website::{AccountId, Website, WebsiteStore};

/// Outcome of resolving a public request.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// No tenant label: the main site.
    NoTenant,
    /// A label that no website uses.
    TenantNotFound(String),
    /// The website exists but is not published and the viewer is not its owner.
    NotPublished(Website),
    PageNotFound { website: Website, slug: String },
    Found { website: Website, page: Page },
}

impl Lookup {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Lookup::NoTenant => "main_site",
            Lookup::TenantNotFound(_) => "tenant_not_found",
            Lookup::NotPublished(_) => "not_published",
            Lookup::PageNotFound { .. } => "page_not_found",
            Lookup::Found { .. } => "found",
        }
    }
}

/// Resolve `host` and `path` to a page. `viewer` is the authenticated
/// account, if any; owners can see their own unpublished website.
pub fn locate(
    store: &WebsiteStore,
    resolver: &HostResolver,
    host: &str,
    path: Option<&str>,
    viewer: Option<&AccountId>,
) -> Lookup {
    let label = resolver.resolve(host);
    if label.is_empty() {
        return Lookup::NoTenant;
    }

    let Some(website) = store.get_by_slug(&label) else {
        tracing::debug!(host = %host, tenant = %label, "Website not found for subdomain");
        return Lookup::TenantNotFound(label);
    };

    if !website.is_visible_to(viewer) {
        tracing::debug!(tenant = %label, "Website not published");
        return Lookup::NotPublished(website);
    }

    let slug = normalize_request_path(path);
    locate_page(website, slug)
}

/// Page lookup within a known website.
pub fn locate_page(website: Website, slug: String) -> Lookup {
    let page = website.document().find_page(&slug).cloned();
    match page {
        Some(page) => {
            tracing::debug!(tenant = %website.slug, page = %page.slug, "Found page");
            Lookup::Found { website, page }
        }
        None => Lookup::PageNotFound { website, slug },
    }
}
