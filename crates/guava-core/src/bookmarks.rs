//! Bookmark synchronisation with local fallback.
//!
//! Every operation talks to the server first. When the server cannot be
//! reached (or answers with a non-auth error) the change is applied to the
//! local [`PreferenceStore`] instead and the result is tagged
//! [`Source::Local`]. Auth failures (401/403 or no access token) are
//! always returned to the caller so a signed-out state is never masked.
//!
//! Local state is only ever consulted while an access token is present.
//! Server and local lists are never merged.

use serde::Serialize;

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{Bookmark, Source};
use crate::prefs::PreferenceStore;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookmarkOutcome {
    pub ok: bool,
    pub source: Source,
}

impl BookmarkOutcome {
    const fn server() -> Self {
        Self {
            ok: true,
            source: Source::Server,
        }
    }

    const fn local() -> Self {
        Self {
            ok: true,
            source: Source::Local,
        }
    }
}

#[derive(Clone)]
pub struct BookmarkSync<S: KeyValueStore> {
    api: ApiClient<S>,
    prefs: PreferenceStore<S>,
}

impl<S: KeyValueStore> BookmarkSync<S> {
    pub const fn new(api: ApiClient<S>, prefs: PreferenceStore<S>) -> Self {
        Self { api, prefs }
    }

    fn require_token(&self) -> ApiResult<()> {
        if self.api.tokens().is_authenticated()? {
            Ok(())
        } else {
            Err(ApiError::Unauthenticated)
        }
    }

    /// Bookmarked service ids.
    ///
    /// Empty when signed out. When the server fetch fails for any reason the
    /// local favorites are returned instead.
    pub async fn list_bookmarks(&self) -> ApiResult<Vec<String>> {
        if !self.api.tokens().is_authenticated()? {
            return Ok(Vec::new());
        }

        match self.api.list_bookmarks().await {
            Ok(bookmarks) => Ok(bookmarks
                .into_iter()
                .map(|bookmark| bookmark.service)
                .collect()),
            Err(error) => {
                tracing::warn!("Bookmark list unavailable, using local favorites: {}", error);
                Ok(self.prefs.favorites()?)
            }
        }
    }

    pub async fn add_bookmark(&self, service_id: &str) -> ApiResult<BookmarkOutcome> {
        let service_id = normalize_service_id(service_id)?;
        self.require_token()?;

        match self.api.create_bookmark(service_id, None).await {
            Ok(()) => Ok(BookmarkOutcome::server()),
            Err(error) if error.is_recoverable() => {
                tracing::warn!(
                    "Bookmark add for service {} saved locally: {}",
                    service_id,
                    error
                );
                self.prefs.add_favorite(service_id)?;
                Ok(BookmarkOutcome::local())
            }
            Err(error) => Err(error),
        }
    }

    /// Delete the server bookmark for `service_id`. A service without a
    /// server bookmark is a no-op.
    pub async fn remove_bookmark(&self, service_id: &str) -> ApiResult<BookmarkOutcome> {
        let service_id = normalize_service_id(service_id)?;
        self.require_token()?;

        match self.remove_on_server(service_id).await {
            Ok(()) => Ok(BookmarkOutcome::server()),
            Err(error) if error.is_recoverable() => {
                tracing::warn!(
                    "Bookmark removal for service {} applied locally: {}",
                    service_id,
                    error
                );
                self.prefs.remove_favorite(service_id)?;
                Ok(BookmarkOutcome::local())
            }
            Err(error) => Err(error),
        }
    }

    /// Set the memo on the bookmark for `service_id`, creating the bookmark
    /// when it does not exist yet.
    pub async fn set_bookmark_memo(
        &self,
        service_id: &str,
        memo: &str,
    ) -> ApiResult<BookmarkOutcome> {
        let service_id = normalize_service_id(service_id)?;
        self.require_token()?;

        match self.set_memo_on_server(service_id, memo).await {
            Ok(()) => Ok(BookmarkOutcome::server()),
            Err(error) if error.is_recoverable() => {
                tracing::warn!(
                    "Memo for service {} saved locally: {}",
                    service_id,
                    error
                );
                self.prefs.set_note(service_id, memo)?;
                Ok(BookmarkOutcome::local())
            }
            Err(error) => Err(error),
        }
    }

    /// Memo for `service_id`. `None` when signed out or when no memo exists.
    pub async fn get_bookmark_memo(&self, service_id: &str) -> ApiResult<Option<String>> {
        let service_id = normalize_service_id(service_id)?;
        if !self.api.tokens().is_authenticated()? {
            return Ok(None);
        }

        match self.find_server_bookmark(service_id).await {
            Ok(bookmark) => Ok(bookmark
                .as_ref()
                .and_then(Bookmark::memo_text)
                .map(str::to_string)),
            Err(error) if error.is_recoverable() => {
                tracing::warn!(
                    "Memo for service {} read from local notes: {}",
                    service_id,
                    error
                );
                Ok(self.prefs.note(service_id)?)
            }
            Err(error) => Err(error),
        }
    }

    async fn find_server_bookmark(&self, service_id: &str) -> ApiResult<Option<Bookmark>> {
        Ok(self
            .api
            .list_bookmarks()
            .await?
            .into_iter()
            .find(|bookmark| bookmark.service == service_id))
    }

    async fn remove_on_server(&self, service_id: &str) -> ApiResult<()> {
        match self.find_server_bookmark(service_id).await? {
            Some(bookmark) => self.api.delete_bookmark(&bookmark.id).await,
            None => {
                tracing::debug!("No server bookmark for service {}", service_id);
                Ok(())
            }
        }
    }

    async fn set_memo_on_server(&self, service_id: &str, memo: &str) -> ApiResult<()> {
        match self.find_server_bookmark(service_id).await? {
            Some(bookmark) => self.api.update_bookmark_memo(&bookmark.id, memo).await,
            None => self.api.create_bookmark(service_id, Some(memo)).await,
        }
    }
}

fn normalize_service_id(service_id: &str) -> ApiResult<&str> {
    let service_id = service_id.trim();
    if service_id.is_empty() {
        Err(ApiError::InvalidInput("Service id is required".to_string()))
    } else {
        Ok(service_id)
    }
}
