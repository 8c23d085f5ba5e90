//! Website and account models.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::content::{Document, PageInput};

/// Identifier of an account that may own a website.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tenant website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Website {
    pub id: Uuid,
    /// Owning account; each account owns at most one website.
    pub owner: AccountId,
    pub name: String,
    pub domain_name: String,
    /// Subdomain label the site is served under.
    pub slug: String,
    #[serde(default)]
    pub published: bool,
    /// Page document, stored as opaque JSON.
    #[serde(default)]
    pub content: Option<Value>,
    /// Seconds since epoch.
    pub created_at: u64,
    pub updated_at: u64,
}

impl Website {
    /// Parsed content document.
    pub fn document(&self) -> Document {
        Document::from_value(self.content.as_ref())
    }

    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        &self.owner == account
    }

    /// Public visibility: published sites for everyone, any site for its owner.
    pub fn is_visible_to(&self, viewer: Option<&AccountId>) -> bool {
        self.published || viewer.is_some_and(|v| self.is_owned_by(v))
    }
}

/// Fields accepted when creating or updating a website. Absent fields are
/// left unchanged on update.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebsiteInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    /// Whole document, either as a JSON object or as a JSON-encoded string.
    #[serde(default)]
    pub content: Option<Value>,
    /// Page form entries; take precedence over `content`.
    #[serde(default)]
    pub pages: Option<Vec<PageInput>>,
}

impl WebsiteInput {
    /// Replacement content carried by this input, if any. Unparseable JSON
    /// strings are dropped so the existing content survives.
    pub fn content_replacement(&self) -> Option<Value> {
        if let Some(pages) = self.pages.as_ref().filter(|p| !p.is_empty()) {
            tracing::debug!(count = pages.len(), "Building content from page entries");
            return Document::from_page_inputs(pages).to_value();
        }

        match self.content.as_ref()? {
            Value::Null => None,
            Value::String(raw) if raw.trim().is_empty() => None,
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse content JSON, keeping existing content");
                    None
                }
            },
            other => Some(other.clone()),
        }
    }
}

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn website(published: bool) -> Website {
        Website {
            id: Uuid::new_v4(),
            owner: AccountId::new("alice"),
            name: "Acme".into(),
            domain_name: "acme.com".into(),
            slug: "acme".into(),
            published,
            content: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_visibility() {
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        let draft = website(false);
        assert!(!draft.is_visible_to(None));
        assert!(!draft.is_visible_to(Some(&bob)));
        assert!(draft.is_visible_to(Some(&alice)));

        assert!(website(true).is_visible_to(None));
    }

    #[test]
    fn test_missing_content_is_malformed() {
        assert_eq!(website(true).document(), Document::Malformed);
    }

    #[test]
    fn test_content_replacement_prefers_pages() {
        let input = WebsiteInput {
            content: Some(json!({ "pages": [] })),
            pages: Some(vec![PageInput {
                name: Some("Home".into()),
                slug: Some("/".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let value = input.content_replacement().unwrap();
        assert_eq!(value["pages"][0]["slug"], "/");
    }

    #[test]
    fn test_content_replacement_from_string() {
        let input = WebsiteInput {
            content: Some(json!(r#"{"pages":[{"name":"Home","slug":"/"}]}"#)),
            ..Default::default()
        };
        assert_eq!(input.content_replacement().unwrap()["pages"][0]["name"], "Home");

        let broken = WebsiteInput {
            content: Some(json!("{not json")),
            ..Default::default()
        };
        assert!(broken.content_replacement().is_none());

        assert!(WebsiteInput::default().content_replacement().is_none());
    }
}
