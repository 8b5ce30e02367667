use crate::cache::QueryCache;
use crate::client::ConfigClient;
use shared::{ApiError, ConfigUpdateBody, UserConfig};

/// The user's budget configuration, cached under a single key.
///
/// `None` is a real cached value: the server answered 404, meaning
/// first-time setup. Updates invalidate the entry so the next read
/// returns what the server actually stored.
pub struct ConfigStore<C> {
    client: C,
    cache: QueryCache<(), Option<UserConfig>>,
}

impl<C: Clone> Clone for ConfigStore<C> {
    fn clone(&self) -> Self {
        ConfigStore {
            client: self.client.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<C: ConfigClient> ConfigStore<C> {
    pub fn new(client: C) -> Self {
        ConfigStore {
            client,
            cache: QueryCache::new(),
        }
    }

    pub async fn fetch(&self) -> Result<Option<UserConfig>, ApiError> {
        if !self.cache.needs_fetch(&()) {
            if let Some(cached) = self.cache.get(&()) {
                return Ok(cached);
            }
        }
        let token = self.cache.begin_fetch(&());
        let config = self.client.fetch_config().await?;
        self.cache.settle_fetch((), token, config.clone());
        Ok(config)
    }

    pub async fn update(&self, body: &ConfigUpdateBody) -> Result<UserConfig, ApiError> {
        let updated = self.client.update_config(body).await?;
        self.cache.invalidate(&());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeClient {
        inner: Rc<FakeInner>,
    }

    #[derive(Default)]
    struct FakeInner {
        config: RefCell<Option<UserConfig>>,
        fetch_calls: RefCell<u32>,
        fail_update: RefCell<bool>,
    }

    fn config(income: &str, savings: &str) -> UserConfig {
        UserConfig {
            monthly_income: income.to_string(),
            savings_percentage: savings.to_string(),
            updated_at: "2026-02-18T09:00:00Z".to_string(),
        }
    }

    #[async_trait(?Send)]
    impl ConfigClient for FakeClient {
        async fn fetch_config(&self) -> Result<Option<UserConfig>, ApiError> {
            *self.inner.fetch_calls.borrow_mut() += 1;
            Ok(self.inner.config.borrow().clone())
        }

        async fn update_config(&self, body: &ConfigUpdateBody) -> Result<UserConfig, ApiError> {
            if *self.inner.fail_update.borrow() {
                return Err(ApiError::network("offline"));
            }
            let updated = UserConfig {
                monthly_income: body.monthly_income.clone(),
                savings_percentage: body.savings_percentage.clone(),
                updated_at: "2026-02-19T09:00:00Z".to_string(),
            };
            *self.inner.config.borrow_mut() = Some(updated.clone());
            Ok(updated)
        }
    }

    #[tokio::test]
    async fn test_missing_config_is_cached_as_none() {
        let client = FakeClient::default();
        let store = ConfigStore::new(client.clone());

        assert_eq!(store.fetch().await.unwrap(), None);
        assert_eq!(store.fetch().await.unwrap(), None);
        // "No config yet" is a cached answer, not a repeated round trip.
        assert_eq!(*client.inner.fetch_calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_so_next_read_sees_server_state() {
        let client = FakeClient::default();
        *client.inner.config.borrow_mut() = Some(config("40000.00", "10.00"));
        let store = ConfigStore::new(client.clone());

        store.fetch().await.unwrap();

        let body = ConfigUpdateBody {
            monthly_income: "50000.00".to_string(),
            savings_percentage: "20.00".to_string(),
        };
        let updated = store.update(&body).await.unwrap();
        assert_eq!(updated.monthly_income, "50000.00");

        let refreshed = store.fetch().await.unwrap().unwrap();
        assert_eq!(refreshed.savings_percentage, "20.00");
        assert_eq!(*client.inner.fetch_calls.borrow(), 2);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_cached_config() {
        let client = FakeClient::default();
        *client.inner.config.borrow_mut() = Some(config("40000.00", "10.00"));
        let store = ConfigStore::new(client.clone());

        store.fetch().await.unwrap();
        *client.inner.fail_update.borrow_mut() = true;

        let body = ConfigUpdateBody {
            monthly_income: "50000.00".to_string(),
            savings_percentage: "20.00".to_string(),
        };
        assert!(store.update(&body).await.is_err());

        // The cached value is untouched and still served.
        let cached = store.fetch().await.unwrap().unwrap();
        assert_eq!(cached.monthly_income, "40000.00");
        assert_eq!(*client.inner.fetch_calls.borrow(), 1);
    }
}
