//! Access/refresh token persistence and the auth endpoints.
//!
//! A non-empty stored access token is the only signal of being signed in.
//! Expiry is not checked client-side; the server answers 401 instead.

use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::storage::{KeyValueStore, StorageResult, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::util::normalize_text_option;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: Option<String>,
}

impl Tokens {
    pub fn new(access: impl Into<String>, refresh: Option<&str>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.map(str::to_string),
        }
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Tokens")
            .field("access", &"[REDACTED]")
            .field("refresh", &self.refresh.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&self) -> StorageResult<Option<Tokens>> {
        let Some(access) = self.access_token()? else {
            return Ok(None);
        };
        let refresh = normalize_text_option(self.store.get(REFRESH_TOKEN_KEY)?);
        Ok(Some(Tokens { access, refresh }))
    }

    pub fn access_token(&self) -> StorageResult<Option<String>> {
        Ok(normalize_text_option(self.store.get(ACCESS_TOKEN_KEY)?))
    }

    pub fn is_authenticated(&self) -> StorageResult<bool> {
        Ok(self.access_token()?.is_some())
    }

    pub fn save(&self, tokens: &Tokens) -> StorageResult<()> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access)?;
        match tokens.refresh.as_deref() {
            Some(refresh) => self.store.set(REFRESH_TOKEN_KEY, refresh),
            None => self.store.remove(REFRESH_TOKEN_KEY),
        }
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(ACCESS_TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    SignedIn(Tokens),
    AccountCreated,
}

#[derive(Clone)]
pub struct AuthClient<S: KeyValueStore> {
    api: ApiClient<S>,
}

impl<S: KeyValueStore> AuthClient<S> {
    pub const fn new(api: ApiClient<S>) -> Self {
        Self { api }
    }

    const fn tokens(&self) -> &TokenStore<S> {
        self.api.tokens()
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Tokens> {
        validate_credentials(username, password)?;

        let payload = serde_json::json!({
            "username": username.trim(),
            "password": password,
        });
        let request = self
            .api
            .public_request(Method::POST, "/api/auth/login/")
            .json(&payload);
        let response: TokenResponse = self.api.send_json(request).await?;
        let tokens = response.into_tokens(None).ok_or_else(|| {
            ApiError::InvalidResponse("Login response did not include an access token".to_string())
        })?;

        self.tokens().save(&tokens)?;
        tracing::info!("Signed in as {}", username.trim());
        Ok(tokens)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<RegisterOutcome> {
        validate_credentials(username, password)?;
        if email.trim().is_empty() {
            return Err(ApiError::InvalidInput("Email is required".to_string()));
        }

        let payload = serde_json::json!({
            "username": username.trim(),
            "email": email.trim(),
            "password": password,
        });
        let request = self
            .api
            .public_request(Method::POST, "/api/auth/register/")
            .json(&payload);
        let response: TokenResponse = self.api.send_json(request).await?;
        match response.into_tokens(None) {
            Some(tokens) => {
                self.tokens().save(&tokens)?;
                Ok(RegisterOutcome::SignedIn(tokens))
            }
            None => Ok(RegisterOutcome::AccountCreated),
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// An auth failure clears the stored tokens.
    pub async fn refresh(&self) -> ApiResult<Tokens> {
        let refresh_token = self
            .tokens()
            .load()?
            .and_then(|tokens| tokens.refresh)
            .ok_or(ApiError::Unauthenticated)?;

        let payload = serde_json::json!({ "refresh": refresh_token });
        let request = self
            .api
            .public_request(Method::POST, "/api/auth/refresh/")
            .json(&payload);

        let response: TokenResponse = match self.api.send_json(request).await {
            Ok(response) => response,
            Err(error) => {
                if error.is_auth_error() {
                    tracing::warn!("Refresh token rejected, clearing stored tokens: {}", error);
                    self.tokens().clear()?;
                }
                return Err(error);
            }
        };

        let tokens = response
            .into_tokens(Some(refresh_token))
            .ok_or_else(|| {
                ApiError::InvalidResponse(
                    "Refresh response did not include an access token".to_string(),
                )
            })?;
        self.tokens().save(&tokens)?;
        Ok(tokens)
    }

    /// Tell the server to revoke the refresh token, then drop local tokens.
    ///
    /// Server failures are logged; local tokens are cleared regardless.
    pub async fn logout(&self) -> ApiResult<()> {
        if let Some(tokens) = self.tokens().load()? {
            let payload = serde_json::json!({ "refresh": tokens.refresh });
            let request = self
                .api
                .public_request(Method::POST, "/api/auth/logout/")
                .bearer_auth(&tokens.access)
                .json(&payload);
            if let Err(error) = self.api.send_empty(request).await {
                tracing::warn!("Server logout failed, clearing local tokens anyway: {}", error);
            }
        }

        self.tokens().clear()?;
        Ok(())
    }
}

fn validate_credentials(username: &str, password: &str) -> ApiResult<()> {
    if username.trim().is_empty() {
        return Err(ApiError::InvalidInput("Username is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(ApiError::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(alias = "access_token")]
    access: Option<String>,
    #[serde(alias = "refresh_token")]
    refresh: Option<String>,
    tokens: Option<NestedTokens>,
}

#[derive(Debug, Deserialize)]
struct NestedTokens {
    #[serde(alias = "access_token")]
    access: Option<String>,
    #[serde(alias = "refresh_token")]
    refresh: Option<String>,
}

impl TokenResponse {
    /// Build tokens from the response, keeping `previous_refresh` when the
    /// server does not rotate the refresh token.
    fn into_tokens(self, previous_refresh: Option<String>) -> Option<Tokens> {
        let nested = self.tokens;
        let access = normalize_text_option(
            self.access
                .or_else(|| nested.as_ref().and_then(|tokens| tokens.access.clone())),
        )?;
        let refresh = normalize_text_option(
            self.refresh
                .or_else(|| nested.and_then(|tokens| tokens.refresh)),
        )
        .or(previous_refresh);
        Some(Tokens { access, refresh })
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::api::DEFAULT_REQUEST_TIMEOUT;
    use crate::storage::MemoryStore;

    fn auth_client(url: &str) -> (AuthClient<MemoryStore>, TokenStore<MemoryStore>) {
        let tokens = TokenStore::new(MemoryStore::new());
        let api = ApiClient::new(url, DEFAULT_REQUEST_TIMEOUT, tokens.clone()).unwrap();
        (AuthClient::new(api), tokens)
    }

    #[test]
    fn tokens_debug_redacts_values() {
        let tokens = Tokens::new("secret-access", Some("secret-refresh"));
        let rendered = format!("{tokens:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn blank_access_token_is_not_authenticated() {
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN_KEY, "   ").unwrap();
        let tokens = TokenStore::new(store);
        assert!(!tokens.is_authenticated().unwrap());
        assert!(tokens.load().unwrap().is_none());
    }

    #[test]
    fn save_without_refresh_removes_stale_refresh() {
        let tokens = TokenStore::new(MemoryStore::new());
        tokens.save(&Tokens::new("a", Some("r"))).unwrap();
        tokens.save(&Tokens::new("b", None)).unwrap();
        assert_eq!(tokens.load().unwrap(), Some(Tokens::new("b", None)));
    }

    #[test]
    fn token_response_reads_nested_tokens() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"user": {"id": 1}, "tokens": {"access": "a", "refresh": "r"}}"#)
                .unwrap();
        assert_eq!(
            response.into_tokens(None),
            Some(Tokens::new("a", Some("r")))
        );
    }

    #[tokio::test]
    async fn login_rejects_blank_credentials_without_request() {
        let (client, tokens) = auth_client("http://127.0.0.1:9");
        let error = client.login(" ", "pw").await.unwrap_err();
        assert!(matches!(error, ApiError::InvalidInput(_)));
        assert!(!tokens.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn login_persists_tokens() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/auth/login/")
            .match_body(Matcher::PartialJsonString(
                r#"{"username": "kim"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"access": "acc", "refresh": "ref"}"#)
            .create_async()
            .await;

        let (client, tokens) = auth_client(&server.url());
        client.login("kim", "secret").await.unwrap();

        assert_eq!(tokens.access_token().unwrap().as_deref(), Some("acc"));
        assert_eq!(
            tokens.load().unwrap().unwrap().refresh.as_deref(),
            Some("ref")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn refresh_keeps_refresh_token_when_not_rotated() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/refresh/")
            .with_status(200)
            .with_body(r#"{"access": "new-access"}"#)
            .create_async()
            .await;

        let (client, tokens) = auth_client(&server.url());
        tokens.save(&Tokens::new("old", Some("keep-me"))).unwrap();

        let refreshed = client.refresh().await.unwrap();
        assert_eq!(refreshed, Tokens::new("new-access", Some("keep-me")));
        assert_eq!(tokens.load().unwrap(), Some(refreshed));
    }

    #[tokio::test]
    async fn rejected_refresh_clears_tokens() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/auth/refresh/")
            .with_status(401)
            .with_body(r#"{"detail": "Token is invalid or expired"}"#)
            .create_async()
            .await;

        let (client, tokens) = auth_client(&server.url());
        tokens.save(&Tokens::new("old", Some("stale"))).unwrap();

        let error = client.refresh().await.unwrap_err();
        assert!(error.is_auth_error());
        assert!(!tokens.is_authenticated().unwrap());
    }

    #[tokio::test]
    async fn logout_clears_tokens_even_when_server_is_down() {
        let (client, tokens) = auth_client("http://127.0.0.1:9");
        tokens.save(&Tokens::new("acc", Some("ref"))).unwrap();

        client.logout().await.unwrap();
        assert!(tokens.load().unwrap().is_none());
    }
}
