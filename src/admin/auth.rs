//! Bearer-token authentication for the editor API.

use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::config::AccountConfig;
use crate::error::AppError;
use crate::http::server::AppState;
use crate::website::AccountId;

/// API key → account lookup, rebuilt on every config reload.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    by_key: HashMap<String, AccountId>,
}

impl AccountRegistry {
    pub fn from_config(accounts: &[AccountConfig]) -> Self {
        let by_key = accounts
            .iter()
            .map(|a| (a.api_key.clone(), AccountId::new(a.id.clone())))
            .collect();
        Self { by_key }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Account named by the `Authorization: Bearer <key>` header.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<AccountId> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let key = value.strip_prefix("Bearer ")?.trim();
        self.by_key.get(key).cloned()
    }
}

/// Rejects requests without a known bearer token and hands the account to
/// handlers as an `Extension<AccountId>`.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let inner = state.inner.load();

    let Some(account) = inner.accounts.authenticate(request.headers()) else {
        tracing::debug!(path = %request.uri().path(), "Rejected editor request without valid token");
        return Err(AppError::Unauthorized);
    };

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}
