//! Public site resolution over real listeners.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::Value;

use sitehost::http::X_REQUEST_ID;

mod common;

use common::{start_site, test_config, ALICE_KEY, BOB_KEY};

#[tokio::test]
async fn test_main_site_and_unknown_tenant() {
    let site = start_site(test_config(28301, 28302)).await;

    let res = site.public_get("localhost", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("mysite.localhost"));

    let res = site.public_get("nobody.localhost", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().contains("Website not found"));

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_published_site_pages() {
    let site = start_site(test_config(28311, 28312)).await;
    site.seed("alice", "Acme", "acme.com", true);

    let res = site.public_get("acme.localhost:28311", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.text().await.unwrap();
    assert!(body.contains("<h1>Welcome</h1>"));
    assert!(body.contains("<title>Home | Acme</title>"));
    let home = body.find("href=\"/\"").unwrap();
    let about = body.find("href=\"/about\"").unwrap();
    assert!(home < about, "navigation follows page positions");

    let res = site.public_get("ACME.localhost", "/about/team").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("The team"));

    let res = site.public_get("acme.localhost", "/about/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("About us"));

    let res = site.public_get("acme.localhost", "/missing").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().contains("Page not found"));

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_unpublished_site_visible_to_owner_only() {
    let site = start_site(test_config(28321, 28322)).await;
    site.seed("alice", "Acme", "acme.com", false);

    let res = site.public_get("acme.localhost", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = site
        .public_get("acme.localhost", "/")
        .bearer_auth(BOB_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = site
        .public_get("acme.localhost", "/")
        .bearer_auth(ALICE_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_response_headers() {
    let site = start_site(test_config(28331, 28332)).await;

    let res = site.public_get("localhost", "/").send().await.unwrap();
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "SAMEORIGIN");
    assert!(res.headers().contains_key(X_REQUEST_ID));

    let res = site
        .public_get("localhost", "/")
        .header(X_REQUEST_ID, "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[X_REQUEST_ID], "trace-me");

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_debug_endpoint() {
    let mut config = test_config(28341, 28342);
    config.hosts.debug_endpoint = true;
    let site = start_site(config).await;
    site.seed("alice", "Acme", "acme.com", true);

    let res = site.public_get("acme.localhost:28341", "/debug_subdomain").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["full_host"], "acme.localhost:28341");
    assert_eq!(body["extracted_subdomain"], "acme");
    assert_eq!(body["subdomain_present"], true);
    assert_eq!(body["all_websites"][0]["slug"], "acme");
    assert_eq!(body["all_websites"][0]["name"], "Acme");

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_debug_endpoint_disabled_by_default() {
    let site = start_site(test_config(28351, 28352)).await;
    site.seed("alice", "Acme", "acme.com", true);

    let res = site.public_get("acme.localhost", "/debug_subdomain").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().contains("Page not found"));

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_config_reload_changes_host_suffix() {
    let site = start_site(test_config(28361, 28362)).await;
    site.seed("alice", "Acme", "acme.com", true);

    // Without the suffix, `acme.test` is a bare registered domain: the main site.
    let res = site.public_get("acme.test", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!res.text().await.unwrap().contains("Welcome"));

    let mut config = site.config.clone();
    config.hosts.local_suffix = "test".into();
    site.config_tx.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = site.public_get("acme.test", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Welcome"));

    site.shutdown.trigger();
}
