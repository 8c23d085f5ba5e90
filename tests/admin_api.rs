//! Editor API over real listeners.

use axum::http::StatusCode;
use reqwest::Method;
use serde_json::{json, Value};

mod common;

use common::{start_site, test_config, ALICE_KEY, BOB_KEY};

#[tokio::test]
async fn test_requires_known_token() {
    let site = start_site(test_config(28401, 28402)).await;

    let res = site.admin(Method::GET, "/admin/status", None).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");

    let res = site
        .admin(Method::GET, "/admin/status", Some("wrong"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = site
        .admin(Method::GET, "/admin/status", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "operational");
    assert_eq!(body["accounts"], 2);

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_create_website_once_per_account() {
    let site = start_site(test_config(28411, 28412)).await;

    let res = site
        .admin(Method::POST, "/admin/websites", Some(ALICE_KEY))
        .json(&json!({ "name": "Acme", "domain_name": "acme.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["slug"], "acme");
    assert_eq!(body["owner"], "alice");
    assert_eq!(body["published"], false);
    assert_eq!(body["public_url"], "http://acme.localhost:28411");

    let res = site
        .admin(Method::POST, "/admin/websites", Some(ALICE_KEY))
        .json(&json!({ "name": "Other", "domain_name": "other.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = site
        .admin(Method::GET, "/admin/websites", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let res = site
        .admin(Method::GET, "/admin/websites", Some(BOB_KEY))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!([]));

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_validation_errors() {
    let site = start_site(test_config(28421, 28422)).await;
    site.seed("alice", "Acme", "acme.com", false);

    let res = site
        .admin(Method::POST, "/admin/websites", Some(BOB_KEY))
        .json(&json!({ "name": "acme", "domain_name": "bad domain" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    let details: Vec<String> = serde_json::from_value(body["details"].clone()).unwrap();
    assert!(details.contains(&"name has already been taken".to_string()));

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_other_accounts_website_is_forbidden() {
    let site = start_site(test_config(28431, 28432)).await;
    site.seed("alice", "Acme", "acme.com", true);

    for (method, path) in [
        (Method::GET, "/admin/websites/acme"),
        (Method::DELETE, "/admin/websites/acme"),
        (Method::GET, "/admin/websites/acme/pages"),
        (Method::GET, "/admin/websites/acme/preview"),
    ] {
        let res = site.admin(method, path, Some(BOB_KEY)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", path);
    }

    let res = site
        .admin(Method::GET, "/admin/websites/nope", Some(BOB_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_page_listing_and_detail() {
    let site = start_site(test_config(28441, 28442)).await;
    site.seed("alice", "Acme", "acme.com", false);

    let res = site
        .admin(Method::GET, "/admin/websites/acme/pages", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["well_formed"], true);
    assert_eq!(body["next_position"], 4);
    let slugs: Vec<&str> = body["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["/", "/about", "/about/team"]);
    assert_eq!(body["has_pages"], true);
    assert_eq!(body["menu"], json!(["Home", "About", "Team"]));

    let res = site
        .admin(Method::GET, "/admin/websites/acme/pages?position=2", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["pages"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["pages"][0]["slug"], "/about");

    let res = site
        .admin(Method::GET, "/admin/websites/acme/pages/about", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["page"]["name"], "About");
    assert_eq!(body["parent"], "/");
    assert_eq!(body["children"][0]["slug"], "/about/team");

    let res = site
        .admin(Method::GET, "/admin/websites/acme/pages/home", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["page"]["slug"], "/");
    assert_eq!(body["param"], "home");
    assert_eq!(body["parent"], Value::Null);

    let res = site
        .admin(Method::GET, "/admin/websites/acme/pages/nope", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_edited_page_is_served_publicly() {
    let site = start_site(test_config(28451, 28452)).await;
    site.seed("alice", "Acme", "acme.com", false);

    let res = site
        .admin(Method::PATCH, "/admin/websites/acme/pages/about/team", Some(ALICE_KEY))
        .json(&json!({ "content": "<p>New team</p>" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = site
        .admin(Method::GET, "/admin/websites/acme/preview/about/team", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("preview-banner"));
    assert!(html.contains("<p>New team</p>"));

    let res = site
        .admin(Method::PUT, "/admin/websites/acme", Some(ALICE_KEY))
        .json(&json!({ "published": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = site.public_get("acme.localhost", "/about/team").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("<p>New team</p>"));
    assert!(!html.contains("preview-banner"));

    let res = site
        .admin(Method::PATCH, "/admin/websites/acme/pages/nope", Some(ALICE_KEY))
        .json(&json!({ "content": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_normalize_positions() {
    let site = start_site(test_config(28461, 28462)).await;
    site.seed("alice", "Acme", "acme.com", false);

    let res = site
        .admin(Method::PUT, "/admin/websites/acme", Some(ALICE_KEY))
        .json(&json!({ "content": {
            "pages": [
                { "name": "B", "slug": "/b", "position": 20, "content": "" },
                { "name": "A", "slug": "/", "position": 5, "content": "" },
                { "name": "C", "slug": "/c", "content": "" }
            ]
        } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = site
        .admin(Method::POST, "/admin/websites/acme/normalize", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!([
            { "name": "A", "slug": "/", "position": 1 },
            { "name": "B", "slug": "/b", "position": 2 },
            { "name": "C", "slug": "/c", "position": 3 }
        ])
    );

    site.shutdown.trigger();
}

#[tokio::test]
async fn test_delete_website() {
    let site = start_site(test_config(28471, 28472)).await;
    site.seed("alice", "Acme", "acme.com", true);

    let res = site
        .admin(Method::DELETE, "/admin/websites/acme", Some(ALICE_KEY))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = site.public_get("acme.localhost", "/").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    site.shutdown.trigger();
}
