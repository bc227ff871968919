//! Client session wiring.
//!
//! A [`Session`] owns one store and every component built on it, so the
//! lifecycle is explicit: [`Session::init`] at start-up, [`Session::logout`]
//! to end it.

use crate::api::ApiClient;
use crate::auth::{AuthClient, TokenStore};
use crate::bookmarks::BookmarkSync;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::prefs::PreferenceStore;
use crate::storage::{FileStore, KeyValueStore};
use crate::subscriptions::SubscriptionSync;

#[derive(Clone)]
pub struct Session<S: KeyValueStore> {
    config: ClientConfig,
    tokens: TokenStore<S>,
    prefs: PreferenceStore<S>,
    api: ApiClient<S>,
    auth: AuthClient<S>,
    bookmarks: BookmarkSync<S>,
    subscriptions: SubscriptionSync<S>,
}

impl Session<FileStore> {
    /// Session over the file store named by `config`.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let path = config.storage_path()?;
        tracing::debug!("Using storage file {}", path.display());
        Self::init(config, FileStore::new(path))
    }
}

impl<S: KeyValueStore> Session<S> {
    pub fn init(mut config: ClientConfig, store: S) -> Result<Self> {
        config.validate()?;

        let tokens = TokenStore::new(store.clone());
        let prefs = PreferenceStore::new(store.clone());
        let api = ApiClient::new(&config.api_base_url, config.request_timeout(), tokens.clone())?;
        let auth = AuthClient::new(api.clone());
        let bookmarks = BookmarkSync::new(api.clone(), prefs.clone());
        let subscriptions = SubscriptionSync::new(api.clone(), store);

        tracing::debug!(
            "Session ready (api={}, signed_in={})",
            api.base_url(),
            tokens.is_authenticated()?
        );

        Ok(Self {
            config,
            tokens,
            prefs,
            api,
            auth,
            bookmarks,
            subscriptions,
        })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    pub const fn prefs(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    pub const fn api(&self) -> &ApiClient<S> {
        &self.api
    }

    pub const fn auth(&self) -> &AuthClient<S> {
        &self.auth
    }

    pub const fn bookmarks(&self) -> &BookmarkSync<S> {
        &self.bookmarks
    }

    pub const fn subscriptions(&self) -> &SubscriptionSync<S> {
        &self.subscriptions
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.tokens.is_authenticated()?)
    }

    /// Sign out and, when configured, purge client-local data.
    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        if self.config.purge_local_on_logout {
            self.prefs.clear()?;
            self.subscriptions.clear_cache()?;
            tracing::info!("Cleared local preferences after logout");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Tokens;
    use crate::storage::{MemoryStore, PREFERENCES_KEY};

    fn config(purge: bool) -> ClientConfig {
        ClientConfig {
            api_base_url: "http://127.0.0.1:9/".to_string(),
            purge_local_on_logout: purge,
            ..ClientConfig::default()
        }
    }

    #[test]
    fn init_rejects_invalid_config() {
        let bad = ClientConfig {
            api_base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(Session::init(bad, MemoryStore::new()).is_err());
    }

    #[tokio::test]
    async fn logout_purges_local_data_when_enabled() {
        let store = MemoryStore::new();
        let session = Session::init(config(true), store.clone()).unwrap();
        session.tokens().save(&Tokens::new("acc", Some("ref"))).unwrap();
        session.prefs().add_favorite("5").unwrap();

        session.logout().await.unwrap();
        assert!(!session.is_authenticated().unwrap());
        assert!(store.get(PREFERENCES_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_keeps_local_data_when_disabled() {
        let store = MemoryStore::new();
        let session = Session::init(config(false), store).unwrap();
        session.tokens().save(&Tokens::new("acc", None)).unwrap();
        session.prefs().add_favorite("5").unwrap();

        session.logout().await.unwrap();
        assert!(!session.is_authenticated().unwrap());
        assert_eq!(session.prefs().favorites().unwrap(), vec!["5"]);

        // Signed out: stale favorites stay hidden from the bookmark list.
        assert!(session.bookmarks().list_bookmarks().await.unwrap().is_empty());
    }

    #[test]
    fn open_uses_configured_storage_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let session = Session::open(ClientConfig {
            storage_path: Some(path.clone()),
            ..config(true)
        })
        .unwrap();
        session.prefs().add_favorite("1").unwrap();
        assert!(path.exists());
    }
}
