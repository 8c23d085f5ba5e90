//! Public site handlers.
//!
//! Every path on the public listener goes through `show_page`: the Host
//! header picks the website, the path picks the page. Paths reach the page
//! locator percent-decoded, so `/caf%C3%A9` finds the `/café` page.

use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::request_host;
use crate::site::render::{render_message, render_page};
use crate::site::{locate, Lookup};

/// `GET /`
pub async fn show_home(State(state): State<AppState>, headers: HeaderMap, uri: Uri) -> Response {
    show_page(state, headers, uri, None)
}

/// `GET /{*path}`; the wildcard arrives decoded and without its leading `/`.
pub async fn show_path(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    show_page(state, headers, uri, Some(path))
}

fn show_page(state: AppState, headers: HeaderMap, uri: Uri, path: Option<String>) -> Response {
    let start = Instant::now();
    let inner = state.inner.load();
    let host = request_host(&headers, &uri);
    let viewer = inner.accounts.authenticate(&headers);

    let lookup = locate(
        &state.store,
        &inner.resolver,
        &host,
        path.as_deref(),
        viewer.as_ref(),
    );

    tracing::debug!(
        request_id = %request_id(&headers),
        host = %host,
        path = %uri.path(),
        outcome = lookup.outcome(),
        "Resolved public request"
    );
    metrics::record_request(lookup.outcome(), start);

    match lookup {
        Lookup::NoTenant => landing_page(&inner.config.hosts.local_suffix).into_response(),
        Lookup::TenantNotFound(label) => (
            StatusCode::NOT_FOUND,
            Html(render_message(
                "Website not found",
                &format!("No website is served at '{}'.", label),
            )),
        )
            .into_response(),
        Lookup::NotPublished(_) => (
            StatusCode::FORBIDDEN,
            Html(render_message(
                "Website not published",
                "This website has not been published yet.",
            )),
        )
            .into_response(),
        Lookup::PageNotFound { slug, .. } => (
            StatusCode::NOT_FOUND,
            Html(render_message(
                "Page not found",
                &format!("There is no page at '{}'.", slug),
            )),
        )
            .into_response(),
        Lookup::Found { website, page } => {
            let nav = website.document().navigation_items();
            Html(render_page(&website, &page, &nav, false)).into_response()
        }
    }
}

fn landing_page(local_suffix: &str) -> Html<String> {
    Html(render_message(
        "sitehost",
        &format!(
            "Websites are served from their own subdomain, for example mysite.{}.",
            local_suffix
        ),
    ))
}

#[derive(Serialize)]
pub struct WebsiteSummary {
    pub slug: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct SubdomainDebug {
    pub full_host: String,
    pub extracted_subdomain: String,
    pub subdomain_present: bool,
    pub all_websites: Vec<WebsiteSummary>,
}

/// Host resolution diagnostics. Only routed when `hosts.debug_endpoint` is set.
pub async fn debug_subdomain(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Json<SubdomainDebug> {
    let inner = state.inner.load();
    let full_host = request_host(&headers, &uri);
    let extracted_subdomain = inner.resolver.resolve(&full_host);

    Json(SubdomainDebug {
        subdomain_present: !extracted_subdomain.is_empty(),
        all_websites: state
            .store
            .all()
            .into_iter()
            .map(|w| WebsiteSummary { slug: w.slug, name: w.name })
            .collect(),
        full_host,
        extracted_subdomain,
    })
}
