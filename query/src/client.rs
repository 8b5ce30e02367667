use async_trait::async_trait;
use shared::{ApiError, ConfigUpdateBody, Expense, ExpenseCreateBody, MonthKey, UserConfig};

/// Remote reads and writes for the expense ledger.
///
/// Implemented by the HTTP client in the frontend and by in-memory fakes
/// in tests. `?Send` because the app is single-threaded.
#[async_trait(?Send)]
pub trait ExpensesClient {
    /// `GET /expenses?month=YYYY-MM`; the server returns the month's
    /// entries newest first.
    async fn list_expenses(&self, month: &MonthKey) -> Result<Vec<Expense>, ApiError>;

    /// `POST /expenses`; the server assigns id and created_at.
    async fn create_expense(&self, body: &ExpenseCreateBody) -> Result<Expense, ApiError>;
}

/// Remote reads and writes for the budget configuration.
#[async_trait(?Send)]
pub trait ConfigClient {
    /// `GET /config`; `None` when no config exists yet (first-time setup).
    async fn fetch_config(&self) -> Result<Option<UserConfig>, ApiError>;

    /// `PUT /config`.
    async fn update_config(&self, body: &ConfigUpdateBody) -> Result<UserConfig, ApiError>;
}
