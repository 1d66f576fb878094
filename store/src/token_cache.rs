//! Token Client Cache (4.C). A single process-wide cached token, guarded
//! by a mutex so concurrent sync tasks can share it. Unlike the source's
//! `get_service_token()` (which reuses a cached token forever once
//! populated), this checks the token's own `exp` locally before deciding
//! to reuse it — the spec's explicit strengthening of the source.

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;
use wire::dto::{TokenRequest, TokenResponse};
use wire::token;

struct CachedToken {
    token: String,
    expires_at: i64,
}

pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Return a valid token, refreshing against central if the cache is
    /// empty or the cached token has expired.
    pub async fn get_token(
        &self,
        client: &Client,
        central_url: &str,
        service_name: &str,
        service_secret: &str,
    ) -> Result<String, anyhow::Error> {
        let mut guard = self.inner.lock().await;

        let now = Utc::now().timestamp();
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > now {
                return Ok(cached.token.clone());
            }
        }

        let response = client
            .post(format!("{central_url}/auth/token"))
            .json(&TokenRequest {
                service_name: service_name.to_string(),
                service_secret: service_secret.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        let claims = token::peek_claims_unverified(&response.access_token)?;
        *guard = Some(CachedToken {
            token: response.access_token.clone(),
            expires_at: claims.exp as i64,
        });

        Ok(response.access_token)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_cache_has_no_token() {
        let cache = TokenCache::new();
        assert!(cache.inner.lock().await.is_none());
    }
}
