//! REST client for the Guava backend.
//!
//! Every request carries `Authorization: Bearer <access>` when an access
//! token is stored. Non-2xx responses are mapped to [`ApiError::Status`] so
//! callers can branch on the HTTP status without inspecting transport errors.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::TokenStore;
use crate::models::{Bookmark, Card, Service, Subscription, Telecom};
use crate::storage::{KeyValueStore, StorageError};
use crate::util::{compact_text, normalize_base_url};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";
const SIGN_IN_MESSAGE: &str = "Please sign in to continue.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not signed in")]
    Unauthenticated,
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {message} ({status})")]
    Status { status: u16, message: String },
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// 401/403 from the server, or no access token at all.
    pub const fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Status {
                status: 401 | 403,
                ..
            }
        )
    }

    /// Transport failures, non-auth server errors and malformed responses.
    ///
    /// These are the only failures a local fallback may absorb.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Json(_) | Self::InvalidResponse(_) => true,
            Self::Status { status, .. } => !matches!(*status, 401 | 403),
            _ => false,
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Generic message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        if self.is_auth_error() {
            return SIGN_IN_MESSAGE.to_string();
        }
        match self {
            Self::InvalidInput(message) => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient<S: KeyValueStore> {
    base_url: String,
    client: Client,
    tokens: TokenStore<S>,
}

impl<S: KeyValueStore> ApiClient<S> {
    pub fn new(base_url: &str, timeout: Duration, tokens: TokenStore<S>) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url).map_err(ApiError::InvalidConfiguration)?;
        Ok(Self {
            base_url,
            client: Client::builder().timeout(timeout).build()?,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    /// Request without credentials, for the auth endpoints.
    pub(crate) fn public_request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, path);
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(ACCEPT, "application/json")
    }

    /// Request with the stored access token attached when there is one.
    pub(crate) fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let request = self.public_request(method, path);
        match self.tokens.access_token()? {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Ok(request),
        }
    }

    /// Request that must carry an access token.
    fn authed_request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let token = self
            .tokens
            .access_token()?
            .ok_or(ApiError::Unauthenticated)?;
        Ok(self.public_request(method, path).bearer_auth(token))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = ensure_success(request.send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        ensure_success(request.send().await?).await?;
        Ok(())
    }

    async fn fetch_list<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Vec<T>> {
        let payload: ListPayload<T> = self.send_json(request).await?;
        Ok(payload.into_items())
    }

    pub async fn list_bookmarks(&self) -> ApiResult<Vec<Bookmark>> {
        let request = self.authed_request(Method::GET, "/api/my/bookmarks/")?;
        self.fetch_list(request).await
    }

    /// Succeeds on any 2xx status; the response body is ignored.
    pub async fn create_bookmark(&self, service_id: &str, memo: Option<&str>) -> ApiResult<()> {
        let body = BookmarkBody {
            service: Some(service_id),
            memo,
        };
        let request = self
            .authed_request(Method::POST, "/api/my/bookmarks/")?
            .json(&body);
        self.send_empty(request).await
    }

    pub async fn update_bookmark_memo(&self, bookmark_id: &str, memo: &str) -> ApiResult<()> {
        let body = BookmarkBody {
            service: None,
            memo: Some(memo),
        };
        let path = format!("/api/my/bookmarks/{}/", segment(bookmark_id));
        let request = self.authed_request(Method::PATCH, &path)?.json(&body);
        self.send_empty(request).await
    }

    pub async fn delete_bookmark(&self, bookmark_id: &str) -> ApiResult<()> {
        let path = format!("/api/my/bookmarks/{}/", segment(bookmark_id));
        let request = self.authed_request(Method::DELETE, &path)?;
        self.send_empty(request).await
    }

    pub async fn list_services(&self) -> ApiResult<Vec<Service>> {
        let request = self.request(Method::GET, "/api/services/")?;
        self.fetch_list(request).await
    }

    pub async fn get_service(&self, service_id: &str) -> ApiResult<Service> {
        let path = format!("/api/services/{}/", segment(service_id));
        let request = self.request(Method::GET, &path)?;
        self.send_json(request).await
    }

    pub async fn compare_services(&self, service_ids: &[String]) -> ApiResult<Vec<Service>> {
        if service_ids.is_empty() {
            return Err(ApiError::InvalidInput(
                "Select at least one service to compare".to_string(),
            ));
        }
        let request = self
            .request(Method::GET, "/api/services/compare/")?
            .query(&[("ids", service_ids.join(","))]);
        self.fetch_list(request).await
    }

    pub async fn list_subscriptions(&self) -> ApiResult<Vec<Subscription>> {
        let request = self.authed_request(Method::GET, "/api/my/subscriptions/")?;
        self.fetch_list(request).await
    }

    pub async fn create_subscription(
        &self,
        service_id: &str,
        plan_id: Option<&str>,
    ) -> ApiResult<Subscription> {
        let body = SubscriptionBody {
            service: service_id,
            plan: plan_id,
        };
        let request = self
            .authed_request(Method::POST, "/api/my/subscriptions/")?
            .json(&body);
        self.send_json(request).await
    }

    pub async fn delete_subscription(&self, subscription_id: &str) -> ApiResult<()> {
        let path = format!("/api/my/subscriptions/{}/", segment(subscription_id));
        let request = self.authed_request(Method::DELETE, &path)?;
        self.send_empty(request).await
    }

    pub async fn list_telecoms(&self) -> ApiResult<Vec<Telecom>> {
        let request = self.request(Method::GET, "/api/telecoms/")?;
        self.fetch_list(request).await
    }

    pub async fn list_cards(&self) -> ApiResult<Vec<Card>> {
        let request = self.request(Method::GET, "/api/cards/")?;
        self.fetch_list(request).await
    }
}

#[derive(Debug, Serialize)]
struct BookmarkBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memo: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SubscriptionBody<'a> {
    service: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a str>,
}

/// List endpoints answer with either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListPayload<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paged { results: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
    message: Option<String>,
    error: Option<String>,
    #[serde(default)]
    non_field_errors: Vec<String>,
}

fn segment(id: &str) -> String {
    urlencoding::encode(id.trim()).into_owned()
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: parse_api_error(status, &body),
    })
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload
            .detail
            .or(payload.message)
            .or(payload.error)
            .or_else(|| payload.non_field_errors.into_iter().next())
        {
            return message.trim().to_string();
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        trimmed
    }
}
