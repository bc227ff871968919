//! The user's subscriptions, with a read-only local cache.
//!
//! Successful fetches refresh the cached copy; when the server cannot be
//! reached the cached copy is served. Mutations are server-only.

use serde::Serialize;

use crate::api::{ApiClient, ApiResult};
use crate::models::{Service, Source, Subscription};
use crate::pricing::monthly_price;
use crate::storage::{KeyValueStore, StorageError, StorageResult, SUBSCRIPTIONS_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionList {
    pub subscriptions: Vec<Subscription>,
    pub source: Source,
}

#[derive(Clone)]
pub struct SubscriptionSync<S: KeyValueStore> {
    api: ApiClient<S>,
    store: S,
}

impl<S: KeyValueStore> SubscriptionSync<S> {
    pub const fn new(api: ApiClient<S>, store: S) -> Self {
        Self { api, store }
    }

    pub fn cached(&self) -> StorageResult<Vec<Subscription>> {
        match self.store.get_json(SUBSCRIPTIONS_KEY) {
            Ok(cached) => Ok(cached.unwrap_or_default()),
            Err(StorageError::Serialization(error)) => {
                tracing::warn!("Ignoring unreadable subscription cache: {}", error);
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }

    fn write_cache(&self, subscriptions: &[Subscription]) -> StorageResult<()> {
        self.store.set_json(SUBSCRIPTIONS_KEY, subscriptions)
    }

    pub fn clear_cache(&self) -> StorageResult<()> {
        self.store.remove(SUBSCRIPTIONS_KEY)
    }

    /// Empty when signed out; cached copy when the server is unreachable.
    pub async fn list(&self) -> ApiResult<SubscriptionList> {
        if !self.api.tokens().is_authenticated()? {
            return Ok(SubscriptionList {
                subscriptions: Vec::new(),
                source: Source::Local,
            });
        }

        match self.api.list_subscriptions().await {
            Ok(subscriptions) => {
                self.write_cache(&subscriptions)?;
                Ok(SubscriptionList {
                    subscriptions,
                    source: Source::Server,
                })
            }
            Err(error) if error.is_recoverable() => {
                tracing::warn!("Subscription list unavailable, using cache: {}", error);
                Ok(SubscriptionList {
                    subscriptions: self.cached()?,
                    source: Source::Local,
                })
            }
            Err(error) => Err(error),
        }
    }

    pub async fn subscribe(
        &self,
        service_id: &str,
        plan_id: Option<&str>,
    ) -> ApiResult<Subscription> {
        let created = self.api.create_subscription(service_id, plan_id).await?;
        let mut cached = self.cached()?;
        cached.retain(|subscription| subscription.id != created.id);
        cached.push(created.clone());
        self.write_cache(&cached)?;
        Ok(created)
    }

    pub async fn unsubscribe(&self, subscription_id: &str) -> ApiResult<()> {
        self.api.delete_subscription(subscription_id).await?;
        let mut cached = self.cached()?;
        cached.retain(|subscription| subscription.id != subscription_id);
        self.write_cache(&cached)?;
        Ok(())
    }
}

/// Sum of monthly-normalised plan prices, saturating at `u64::MAX`.
/// Subscriptions whose service, plan or price is unknown contribute nothing.
pub fn monthly_total(subscriptions: &[Subscription], services: &[Service]) -> u64 {
    subscriptions
        .iter()
        .filter_map(|subscription| {
            let service = services
                .iter()
                .find(|service| service.id == subscription.service)?;
            let plan = service.plan(subscription.plan.as_deref()?)?;
            monthly_price(plan)
        })
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use mockito::Server;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::DEFAULT_REQUEST_TIMEOUT;
    use crate::auth::{TokenStore, Tokens};
    use crate::models::{BillingCycle, Plan};
    use crate::storage::MemoryStore;

    fn sync_for(url: &str, signed_in: bool) -> (SubscriptionSync<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        let tokens = TokenStore::new(store.clone());
        if signed_in {
            tokens.save(&Tokens::new("access-token", None)).unwrap();
        }
        let api = ApiClient::new(url, DEFAULT_REQUEST_TIMEOUT, tokens).unwrap();
        (SubscriptionSync::new(api, store.clone()), store)
    }

    fn subscription(id: &str, service: &str, plan: Option<&str>) -> Subscription {
        Subscription {
            id: id.to_string(),
            service: service.to_string(),
            plan: plan.map(str::to_string),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn list_refreshes_cache_and_falls_back_to_it() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/my/subscriptions/")
            .with_status(200)
            .with_body(r#"[{"id": 1, "service": 5, "plan": 2}]"#)
            .create_async()
            .await;

        let (online, store) = sync_for(&server.url(), true);
        let listed = online.list().await.unwrap();
        assert_eq!(listed.source, Source::Server);
        assert_eq!(listed.subscriptions, vec![subscription("1", "5", Some("2"))]);

        let offline_api = ApiClient::new(
            "http://127.0.0.1:9",
            DEFAULT_REQUEST_TIMEOUT,
            TokenStore::new(store.clone()),
        )
        .unwrap();
        let offline = SubscriptionSync::new(offline_api, store);
        let cached = offline.list().await.unwrap();
        assert_eq!(cached.source, Source::Local);
        assert_eq!(cached.subscriptions, listed.subscriptions);
    }

    #[tokio::test]
    async fn list_is_empty_when_signed_out() {
        let (sync, store) = sync_for("http://127.0.0.1:9", false);
        store
            .set_json(SUBSCRIPTIONS_KEY, &vec![subscription("1", "5", None)])
            .unwrap();
        assert!(sync.list().await.unwrap().subscriptions.is_empty());
    }

    #[tokio::test]
    async fn unsubscribe_updates_cache() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/my/subscriptions/1/")
            .with_status(204)
            .create_async()
            .await;

        let (sync, store) = sync_for(&server.url(), true);
        store
            .set_json(
                SUBSCRIPTIONS_KEY,
                &vec![subscription("1", "5", None), subscription("2", "6", None)],
            )
            .unwrap();

        sync.unsubscribe("1").await.unwrap();
        assert_eq!(sync.cached().unwrap(), vec![subscription("2", "6", None)]);
    }

    #[tokio::test]
    async fn subscribe_surfaces_server_errors() {
        let (sync, _) = sync_for("http://127.0.0.1:9", true);
        let error = sync.subscribe("5", Some("2")).await.unwrap_err();
        assert!(error.is_recoverable());
        assert!(sync.cached().unwrap().is_empty());
    }

    #[test]
    fn monthly_total_normalises_yearly_plans() {
        let services = vec![Service {
            id: "5".to_string(),
            name: "Cloudy".to_string(),
            category: "Cloud".to_string(),
            description: String::new(),
            logo_url: None,
            plans: vec![
                Plan {
                    id: "m".to_string(),
                    name: "Monthly".to_string(),
                    price: Some("2,400원".to_string()),
                    cycle: BillingCycle::Monthly,
                },
                Plan {
                    id: "y".to_string(),
                    name: "Yearly".to_string(),
                    price: Some("24,000원".to_string()),
                    cycle: BillingCycle::Yearly,
                },
            ],
        }];
        let subscriptions = vec![
            subscription("1", "5", Some("m")),
            subscription("2", "5", Some("y")),
            subscription("3", "404", Some("m")),
            subscription("4", "5", None),
        ];
        assert_eq!(monthly_total(&subscriptions, &services), 4400);
    }

    #[test]
    fn monthly_total_saturates_instead_of_overflowing() {
        let services = vec![Service {
            id: "5".to_string(),
            name: "Pricey".to_string(),
            category: "Cloud".to_string(),
            description: String::new(),
            logo_url: None,
            plans: vec![Plan {
                id: "m".to_string(),
                name: "Monthly".to_string(),
                price: Some("18446744073709551615".to_string()),
                cycle: BillingCycle::Monthly,
            }],
        }];
        let subscriptions = vec![
            subscription("1", "5", Some("m")),
            subscription("2", "5", Some("m")),
        ];
        assert_eq!(monthly_total(&subscriptions, &services), u64::MAX);
    }
}
