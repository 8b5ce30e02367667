use crate::cache::{QueryCache, Subscription};
use crate::client::ExpensesClient;
use shared::{ApiError, Expense, ExpenseCreateBody, MonthKey};

/// Month-scoped expense data: declarative fetch plus the optimistic
/// create flow.
///
/// The cache entry for a month is the only shared mutable state. Nothing
/// else writes to it: fetches replace it authoritatively, creates mutate
/// it through snapshot/set/restore/invalidate.
pub struct ExpenseStore<C> {
    client: C,
    cache: QueryCache<MonthKey, Vec<Expense>>,
}

impl<C: Clone> Clone for ExpenseStore<C> {
    fn clone(&self) -> Self {
        ExpenseStore {
            client: self.client.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<C: ExpensesClient> ExpenseStore<C> {
    pub fn new(client: C) -> Self {
        ExpenseStore {
            client,
            cache: QueryCache::new(),
        }
    }

    /// The cached list for `month`, if one exists (fresh or stale).
    pub fn cached(&self, month: &MonthKey) -> Option<Vec<Expense>> {
        self.cache.get(month)
    }

    /// Register a listener invoked after every cache mutation, so the view
    /// layer can mirror optimistic changes as they land. The listener is
    /// removed when the returned guard is dropped.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.cache.subscribe(listener)
    }

    /// All expenses for `month`, newest first. Served from the cache when
    /// fresh; otherwise one remote read, no retry. A fetch cancelled by a
    /// concurrent create still returns its result to the caller, but the
    /// cache entry keeps the optimistic state.
    pub async fn fetch_month(&self, month: &MonthKey) -> Result<Vec<Expense>, ApiError> {
        if !self.cache.needs_fetch(month) {
            if let Some(cached) = self.cache.get(month) {
                return Ok(cached);
            }
        }
        let token = self.cache.begin_fetch(month);
        let expenses = self.client.list_expenses(month).await?;
        self.cache.settle_fetch(*month, token, expenses.clone());
        Ok(expenses)
    }

    /// Create one expense against `month`'s ledger.
    ///
    /// The entry appears in the cache immediately with a pending id. On
    /// failure the entry is rolled back to the pre-attempt snapshot and
    /// the error is returned for user-facing display. Either way the
    /// month is invalidated afterwards, so the next read re-fetches
    /// authoritative server state.
    ///
    /// Callers validate the body first; this flow is never invoked with
    /// an empty, zero, or negative amount.
    pub async fn create(
        &self,
        month: &MonthKey,
        body: &ExpenseCreateBody,
    ) -> Result<Expense, ApiError> {
        // Void any in-flight read before touching the entry; a read
        // settling later must not overwrite the optimistic insert with
        // pre-create data.
        self.cache.cancel_fetches(month);

        let snapshot = self.cache.snapshot(month);

        // Prepend the provisional entry; an absent entry counts as empty.
        let provisional = Expense::provisional(body);
        let mut entries = self.cache.get(month).unwrap_or_default();
        entries.insert(0, provisional);
        let token = self.cache.set(*month, entries);

        let result = self.client.create_expense(body).await;

        if result.is_err() {
            // Full overwrite back to the snapshot. Skipped when a later
            // write owns the entry, in which case the invalidation below
            // re-synchronizes instead of clobbering it.
            self.cache.restore(month, snapshot, token);
        }

        // Success or failure, the next read goes back to the server.
        self.cache.invalidate(month);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::ExpenseId;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use tokio::sync::oneshot;
    use tokio::task::{spawn_local, yield_now, LocalSet};

    fn month() -> MonthKey {
        "2026-02".parse().unwrap()
    }

    fn body(amount: &str) -> ExpenseCreateBody {
        ExpenseCreateBody {
            amount: amount.to_string(),
            label: None,
            expense_date: "2026-02-18".to_string(),
        }
    }

    fn server_expense(id: &str, amount: &str) -> Expense {
        Expense {
            id: ExpenseId::Persisted(id.to_string()),
            amount: amount.to_string(),
            label: None,
            expense_date: "2026-02-18".to_string(),
            created_at: "2026-02-18T09:00:00Z".to_string(),
        }
    }

    /// Scripted client: pops one pre-loaded result per call.
    #[derive(Clone, Default)]
    struct FakeClient {
        inner: Rc<FakeInner>,
    }

    #[derive(Default)]
    struct FakeInner {
        list_results: RefCell<VecDeque<Result<Vec<Expense>, ApiError>>>,
        create_results: RefCell<VecDeque<Result<Expense, ApiError>>>,
        list_calls: RefCell<u32>,
        create_bodies: RefCell<Vec<ExpenseCreateBody>>,
    }

    impl FakeClient {
        fn push_list(&self, result: Result<Vec<Expense>, ApiError>) {
            self.inner.list_results.borrow_mut().push_back(result);
        }

        fn push_create(&self, result: Result<Expense, ApiError>) {
            self.inner.create_results.borrow_mut().push_back(result);
        }

        fn list_calls(&self) -> u32 {
            *self.inner.list_calls.borrow()
        }

        fn create_calls(&self) -> usize {
            self.inner.create_bodies.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl ExpensesClient for FakeClient {
        async fn list_expenses(&self, _month: &MonthKey) -> Result<Vec<Expense>, ApiError> {
            *self.inner.list_calls.borrow_mut() += 1;
            self.inner
                .list_results
                .borrow_mut()
                .pop_front()
                .expect("unexpected list call")
        }

        async fn create_expense(&self, body: &ExpenseCreateBody) -> Result<Expense, ApiError> {
            self.inner.create_bodies.borrow_mut().push(body.clone());
            self.inner
                .create_results
                .borrow_mut()
                .pop_front()
                .expect("unexpected create call")
        }
    }

    /// Client whose calls suspend until the test resolves them, for
    /// interleaving scenarios.
    #[derive(Clone, Default)]
    struct ChannelClient {
        inner: Rc<ChannelInner>,
    }

    #[derive(Default)]
    struct ChannelInner {
        list_rxs: RefCell<VecDeque<oneshot::Receiver<Result<Vec<Expense>, ApiError>>>>,
        create_rxs: RefCell<VecDeque<oneshot::Receiver<Result<Expense, ApiError>>>>,
    }

    impl ChannelClient {
        fn expect_list(&self) -> oneshot::Sender<Result<Vec<Expense>, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.inner.list_rxs.borrow_mut().push_back(rx);
            tx
        }

        fn expect_create(&self) -> oneshot::Sender<Result<Expense, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.inner.create_rxs.borrow_mut().push_back(rx);
            tx
        }
    }

    #[async_trait(?Send)]
    impl ExpensesClient for ChannelClient {
        async fn list_expenses(&self, _month: &MonthKey) -> Result<Vec<Expense>, ApiError> {
            let rx = self
                .inner
                .list_rxs
                .borrow_mut()
                .pop_front()
                .expect("unexpected list call");
            rx.await.expect("list sender dropped")
        }

        async fn create_expense(&self, _body: &ExpenseCreateBody) -> Result<Expense, ApiError> {
            let rx = self
                .inner
                .create_rxs
                .borrow_mut()
                .pop_front()
                .expect("unexpected create call");
            rx.await.expect("create sender dropped")
        }
    }

    async fn settle_tasks() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_fetch_month_caches_the_result() {
        let client = FakeClient::default();
        client.push_list(Ok(vec![server_expense("srv-1", "12.00")]));
        let store = ExpenseStore::new(client.clone());

        let first = store.fetch_month(&month()).await.unwrap();
        let second = store.fetch_month(&month()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_month_surfaces_errors() {
        let client = FakeClient::default();
        client.push_list(Err(ApiError::network("connection refused")));
        let store = ExpenseStore::new(client);

        let result = store.fetch_month(&month()).await;
        assert!(result.is_err());
        assert_eq!(store.cached(&month()), None);
    }

    #[tokio::test]
    async fn test_successful_create_shows_pending_entry_then_refetches_server_truth() {
        let client = FakeClient::default();
        client.push_list(Ok(vec![]));
        let store = ExpenseStore::new(client.clone());
        store.fetch_month(&month()).await.unwrap();
        assert_eq!(store.cached(&month()), Some(vec![]));

        // Record every cache state the UI would observe.
        let observed = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let log = observed.clone();
            let reader = store.clone();
            store.subscribe(move || log.borrow_mut().push(reader.cached(&month())))
        };

        client.push_create(Ok(server_expense("srv-1", "640.00")));
        let created = store.create(&month(), &body("640.00")).await.unwrap();
        assert_eq!(created.id, ExpenseId::Persisted("srv-1".to_string()));

        // The optimistic state was visible immediately after the apply.
        let first_observed = observed.borrow()[0].clone().unwrap();
        assert_eq!(first_observed.len(), 1);
        assert!(first_observed[0].id.is_pending());
        assert_eq!(first_observed[0].amount, "640.00");

        // Settled: the next read re-fetches and no pending ids remain.
        client.push_list(Ok(vec![server_expense("srv-1", "640.00")]));
        let refreshed = store.fetch_month(&month()).await.unwrap();
        assert_eq!(client.list_calls(), 2);
        assert!(refreshed.iter().all(|e| !e.id.is_pending()));
        assert_eq!(refreshed[0].id, ExpenseId::Persisted("srv-1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_create_rolls_back_to_exact_snapshot() {
        let client = FakeClient::default();
        client.push_list(Ok(vec![]));
        let store = ExpenseStore::new(client.clone());
        store.fetch_month(&month()).await.unwrap();

        client.push_create(Err(ApiError {
            status: 500,
            code: Some("INTERNAL_ERROR".to_string()),
            message: "boom".to_string(),
        }));
        let result = store.create(&month(), &body("640.00")).await;
        assert!(result.is_err());

        // Rolled back to the pre-attempt snapshot, and marked for re-fetch.
        assert_eq!(store.cached(&month()), Some(vec![]));

        client.push_list(Ok(vec![]));
        let refreshed = store.fetch_month(&month()).await.unwrap();
        assert_eq!(refreshed, vec![]);
        assert_eq!(client.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_create_with_absent_cache_restores_absence() {
        let client = FakeClient::default();
        client.push_create(Err(ApiError::network("offline")));
        let store = ExpenseStore::new(client.clone());

        let result = store.create(&month(), &body("5.00")).await;
        assert!(result.is_err());
        assert_eq!(store.cached(&month()), None);
        assert_eq!(client.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_prepends_to_populated_cache() {
        let client = FakeClient::default();
        client.push_list(Ok(vec![server_expense("srv-1", "12.00")]));
        let store = ExpenseStore::new(client.clone());
        store.fetch_month(&month()).await.unwrap();

        let observed = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let log = observed.clone();
            let reader = store.clone();
            store.subscribe(move || log.borrow_mut().push(reader.cached(&month())))
        };

        client.push_create(Ok(server_expense("srv-2", "8.00")));
        store.create(&month(), &body("8.00")).await.unwrap();

        let first_observed = observed.borrow()[0].clone().unwrap();
        assert_eq!(first_observed.len(), 2);
        assert!(first_observed[0].id.is_pending());
        assert_eq!(
            first_observed[1].id,
            ExpenseId::Persisted("srv-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_cancelled_read_cannot_overwrite_optimistic_entry() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let client = ChannelClient::default();
                let store = ExpenseStore::new(client.clone());

                // A read is in flight when the create starts.
                let list_tx = client.expect_list();
                let fetch_task = {
                    let store = store.clone();
                    spawn_local(async move { store.fetch_month(&month()).await })
                };
                settle_tasks().await;

                let create_tx = client.expect_create();
                let create_task = {
                    let store = store.clone();
                    spawn_local(async move { store.create(&month(), &body("640.00")).await })
                };
                settle_tasks().await;

                // The stale read settles after the optimistic apply; its
                // result must be dropped.
                list_tx.send(Ok(vec![])).unwrap();
                settle_tasks().await;

                let cached = store.cached(&month()).unwrap();
                assert_eq!(cached.len(), 1);
                assert!(cached[0].id.is_pending());

                // The fetch itself still resolves for its caller.
                let fetched = fetch_task.await.unwrap().unwrap();
                assert_eq!(fetched, vec![]);

                create_tx.send(Ok(server_expense("srv-1", "640.00"))).unwrap();
                create_task.await.unwrap().unwrap();
            })
            .await;
    }

    #[tokio::test]
    async fn test_overlapping_creates_rollback_skips_later_writer() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let client = ChannelClient::default();
                let store = ExpenseStore::new(client.clone());

                let tx_a = client.expect_create();
                let task_a = {
                    let store = store.clone();
                    spawn_local(async move { store.create(&month(), &body("10.00")).await })
                };
                settle_tasks().await;

                let tx_b = client.expect_create();
                let task_b = {
                    let store = store.clone();
                    spawn_local(async move { store.create(&month(), &body("20.00")).await })
                };
                settle_tasks().await;

                // Both optimistic entries are visible, newest first.
                let cached = store.cached(&month()).unwrap();
                assert_eq!(cached.len(), 2);
                assert_eq!(cached[0].amount, "20.00");
                assert_eq!(cached[1].amount, "10.00");

                // B settles first; A then fails. A's snapshot predates B's
                // insert, so applying it would erase B's entry; the
                // rollback is skipped and the invalidation from settle
                // re-synchronizes on the next read instead.
                tx_b.send(Ok(server_expense("srv-b", "20.00"))).unwrap();
                task_b.await.unwrap().unwrap();

                tx_a.send(Err(ApiError::network("timeout"))).unwrap();
                let result_a = task_a.await.unwrap();
                assert!(result_a.is_err());

                let cached = store.cached(&month()).unwrap();
                assert_eq!(cached.len(), 2, "rollback must not clobber B's entry");
            })
            .await;
    }
}
