//! Editor API handlers.
//!
//! # Responsibilities
//! - Website CRUD for the authenticated account
//! - Page listing, detail and content edits
//! - Owner preview of published and unpublished pages
//!
//! # Design Decisions
//! - Every handler records `site_admin_requests_total` with its final status
//! - Ownership is checked by the store, handlers only map results

use std::net::SocketAddr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::content::{param_to_slug, parent_slug, slug_to_param, NavItem, Page};
use crate::error::{AppError, Result};
use crate::http::server::{AppState, InnerState};
use crate::observability::metrics;
use crate::site::render::render_page;
use crate::site::{locate_page, Lookup};
use crate::website::{AccountId, Website, WebsiteInput};

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub websites: usize,
    pub accounts: usize,
}

/// A website as the editor sees it, with the address it is served at.
#[derive(Serialize)]
pub struct WebsiteView {
    #[serde(flatten)]
    pub website: Website,
    pub public_url: String,
}

#[derive(Serialize)]
pub struct PagesView {
    pub well_formed: bool,
    pub has_pages: bool,
    pub pages: Vec<Page>,
    /// Page names in menu order.
    pub menu: Vec<String>,
    pub navigation: Vec<NavItem>,
    pub next_position: i64,
}

#[derive(Deserialize)]
pub struct PagesQuery {
    /// Only the page stored at this position.
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Serialize)]
pub struct PageView {
    pub page: Page,
    /// URL parameter naming this page (`home` for the root page).
    pub param: String,
    pub parent: Option<String>,
    pub children: Vec<Page>,
}

#[derive(Deserialize)]
pub struct PageContentUpdate {
    #[serde(default)]
    pub content: Option<String>,
}

/// Record the action's outcome and turn it into a response.
fn respond<T: IntoResponse>(action: &'static str, result: Result<T>) -> Response {
    let response = match result {
        Ok(value) => value.into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_admin_request(action, response.status().as_u16());
    response
}

fn public_url(inner: &InnerState, slug: &str) -> String {
    let suffix = &inner.config.hosts.local_suffix;
    match inner.config.listener.bind_address.parse::<SocketAddr>() {
        Ok(addr) if addr.port() != 80 => format!("http://{}.{}:{}", slug, suffix, addr.port()),
        _ => format!("http://{}.{}", slug, suffix),
    }
}

fn view(state: &AppState, website: Website) -> WebsiteView {
    let public_url = public_url(&state.inner.load(), &website.slug);
    WebsiteView { website, public_url }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        websites: state.store.len(),
        accounts: state.inner.load().accounts.len(),
    })
}

pub async fn list_websites(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
) -> Response {
    let websites: Vec<WebsiteView> = state
        .store
        .list_for_owner(&account)
        .into_iter()
        .map(|w| view(&state, w))
        .collect();
    respond("list_websites", Ok(Json(websites)))
}

pub async fn create_website(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Json(input): Json<WebsiteInput>,
) -> Response {
    let result = state
        .store
        .create(&account, input)
        .map(|w| (StatusCode::CREATED, Json(view(&state, w))));
    respond("create_website", result)
}

pub async fn show_website(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path(slug): Path<String>,
) -> Response {
    let result = state
        .store
        .get_owned(&account, &slug)
        .map(|w| Json(view(&state, w)));
    respond("show_website", result)
}

pub async fn update_website(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path(slug): Path<String>,
    Json(input): Json<WebsiteInput>,
) -> Response {
    let result = state
        .store
        .update(&account, &slug, input)
        .map(|w| Json(view(&state, w)));
    respond("update_website", result)
}

pub async fn delete_website(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path(slug): Path<String>,
) -> Response {
    let result = state
        .store
        .delete(&account, &slug)
        .map(|_| StatusCode::NO_CONTENT);
    respond("delete_website", result)
}

pub async fn list_pages(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path(slug): Path<String>,
    Query(query): Query<PagesQuery>,
) -> Response {
    let result = state.store.get_owned(&account, &slug).map(|website| {
        let document = website.document();
        let pages = match query.position {
            Some(position) => document.find_by_position(position).into_iter().cloned().collect(),
            None => document.sorted_by_position().into_iter().cloned().collect(),
        };
        Json(PagesView {
            well_formed: document.is_well_formed(),
            has_pages: document.has_pages(),
            pages,
            menu: document
                .page_names_by_position()
                .into_iter()
                .map(str::to_string)
                .collect(),
            navigation: document.navigation_items(),
            next_position: document.next_position(),
        })
    });
    respond("list_pages", result)
}

fn page_view(website: &Website, page_slug: &str) -> Result<PageView> {
    let document = website.document();
    let page = document
        .find_page(page_slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("page '{}'", page_slug)))?;

    Ok(PageView {
        param: slug_to_param(&page.slug),
        parent: parent_slug(&page.slug),
        children: document.child_pages(&page.slug).into_iter().cloned().collect(),
        page,
    })
}

pub async fn show_page(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path((slug, page)): Path<(String, String)>,
) -> Response {
    let page_slug = param_to_slug(&page);
    let result = state
        .store
        .get_owned(&account, &slug)
        .and_then(|website| page_view(&website, &page_slug))
        .map(Json);
    respond("show_page", result)
}

pub async fn update_page(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path((slug, page)): Path<(String, String)>,
    Json(update): Json<PageContentUpdate>,
) -> Response {
    let page_slug = param_to_slug(&page);
    let result = state
        .store
        .update_page_content(&account, &slug, &page_slug, update.content.as_deref())
        .and_then(|website| page_view(&website, &page_slug))
        .map(Json);
    respond("update_page", result)
}

pub async fn normalize_pages(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path(slug): Path<String>,
) -> Response {
    let result = state
        .store
        .normalize_positions(&account, &slug)
        .map(|website| Json(website.document().navigation_items()));
    respond("normalize_pages", result)
}

/// Render a page for its owner, published or not.
fn preview(state: &AppState, account: &AccountId, slug: &str, page: Option<&str>) -> Result<Html<String>> {
    let website = state.store.get_owned(account, slug)?;
    let page_slug = match page {
        Some(param) => param_to_slug(param),
        None => website
            .document()
            .homepage()
            .map(|p| p.slug.clone())
            .ok_or_else(|| AppError::NotFound("homepage".to_string()))?,
    };

    match locate_page(website, page_slug) {
        Lookup::Found { website, page } => {
            let nav = website.document().navigation_items();
            Ok(Html(render_page(&website, &page, &nav, true)))
        }
        Lookup::PageNotFound { slug, .. } => Err(AppError::NotFound(format!("page '{}'", slug))),
        _ => Err(AppError::NotFound(format!("website '{}'", slug))),
    }
}

pub async fn preview_home(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path(slug): Path<String>,
) -> Response {
    respond("preview", preview(&state, &account, &slug, None))
}

pub async fn preview_page(
    State(state): State<AppState>,
    Extension(account): Extension<AccountId>,
    Path((slug, page)): Path<(String, String)>,
) -> Response {
    respond("preview", preview(&state, &account, &slug, Some(page.as_str())))
}
