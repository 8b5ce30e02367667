use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use query::ExpenseStore;
use shared::{Expense, ExpenseCreateBody, MonthKey};
use std::cell::Cell;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct ExpensesState {
    /// Newest first, including any in-flight optimistic entry.
    pub expenses: Vec<Expense>,
    pub loading: bool,
    pub load_failed: bool,
    pub creating: bool,
    pub create_error: Option<String>,
    pub create_success: bool,
}

pub struct UseExpensesResult {
    pub state: ExpensesState,
    pub actions: UseExpensesActions,
}

#[derive(Clone)]
pub struct UseExpensesActions {
    pub refresh: Callback<()>,
    pub create_expense: Callback<ExpenseCreateBody>,
}

/// Month-scoped expense list plus the create action.
///
/// The list mirrors the store's cache: the subscription below re-reads it
/// on every mutation, which is what makes an optimistic insert render
/// before the server has answered.
#[hook]
pub fn use_expenses(api_client: &ApiClient, month: MonthKey) -> UseExpensesResult {
    let store = use_memo(api_client.clone(), |client| ExpenseStore::new(client.clone()));
    let expenses = use_state(Vec::<Expense>::new);
    let loading = use_state(|| true);
    let load_failed = use_state(|| false);
    let creating = use_state(|| false);
    let create_error = use_state(|| Option::<String>::None);
    let create_success = use_state(|| false);

    // The month the cache listener reads; kept current across navigation.
    let listener_month = use_memo((), |_| Cell::new(month));
    listener_month.set(month);

    use_effect_with((), {
        let store = store.clone();
        let expenses = expenses.clone();
        let listener_month = listener_month.clone();
        move |_| {
            let reader = (*store).clone();
            let subscription = store.subscribe(move || {
                let current = listener_month.get();
                expenses.set(reader.cached(&current).unwrap_or_default());
            });
            // Unmount detaches the listener so the store can be freed.
            move || drop(subscription)
        }
    });

    let refresh = {
        let store = store.clone();
        let expenses = expenses.clone();
        let loading = loading.clone();
        let load_failed = load_failed.clone();

        use_callback(month, move |_, month| {
            let month = *month;
            let store = store.clone();
            let expenses = expenses.clone();
            let loading = loading.clone();
            let load_failed = load_failed.clone();

            spawn_local(async move {
                loading.set(true);
                match store.fetch_month(&month).await {
                    Ok(list) => {
                        load_failed.set(false);
                        expenses.set(list);
                    }
                    Err(e) => {
                        Logger::error("expenses", &format!("failed to fetch expenses: {}", e));
                        load_failed.set(true);
                    }
                }
                loading.set(false);
            });
        })
    };

    let create_expense = {
        let store = store.clone();
        let creating = creating.clone();
        let create_error = create_error.clone();
        let create_success = create_success.clone();
        let refresh = refresh.clone();

        use_callback(month, move |body: ExpenseCreateBody, month| {
            let month = *month;
            let store = store.clone();
            let creating = creating.clone();
            let create_error = create_error.clone();
            let create_success = create_success.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                creating.set(true);
                create_error.set(None);
                create_success.set(false);

                match store.create(&month, &body).await {
                    Ok(_) => {
                        create_success.set(true);
                    }
                    Err(e) => {
                        Logger::error("expenses", &format!("create failed: {}", e));
                        // Fixed low-detail message; the raw error stays in
                        // the console.
                        create_error.set(Some("couldn't save, try again".to_string()));
                    }
                }

                // The month was invalidated on settle; re-read server truth.
                refresh.emit(());
                creating.set(false);
            });
        })
    };

    // Fetch on mount and whenever the viewed month changes.
    use_effect_with(month, {
        let refresh = refresh.clone();
        move |_| {
            refresh.emit(());
            || ()
        }
    });

    let state = ExpensesState {
        expenses: (*expenses).clone(),
        loading: *loading,
        load_failed: *load_failed,
        creating: *creating,
        create_error: (*create_error).clone(),
        create_success: *create_success,
    };

    let actions = UseExpensesActions {
        refresh,
        create_expense,
    };

    UseExpensesResult { state, actions }
}
