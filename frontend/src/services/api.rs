use crate::services::auth::{AuthSession, SessionStore};
use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use query::{ConfigClient, ExpensesClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::{
    ApiError, ApiErrorBody, ConfigUpdateBody, Expense, ExpenseCreateBody, MonthKey, UserConfig,
};

const DEFAULT_BASE_URL: &str = "http://localhost:3001/api";

/// HTTP client for the backend REST API.
///
/// Attaches the bearer token from the shared session slot and normalizes
/// every non-2xx response into an `ApiError` with status and code.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        self.base_url == other.base_url && self.session == other.session
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

impl ApiClient {
    /// Create a new API client with the default base URL.
    pub fn new(session: SessionStore) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session,
        }
    }

    /// Create a new API client with a custom base URL.
    pub fn with_base_url(base_url: String, session: SessionStore) -> Self {
        Self { base_url, session }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let response: LoginResponse = self
            .post_json("/auth/login", &LoginRequest { email, password })
            .await?;
        Ok(AuthSession {
            access_token: response.access_token,
            email: email.to_string(),
        })
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.authorize(Request::post(&format!("{}/auth/logout", self.base_url)));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("network error: {}", e)))?;
        if response.ok() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorize(Request::get(&format!("{}{}", self.base_url, path)));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("network error: {}", e)))?;
        Self::parse(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(Request::post(&format!("{}{}", self.base_url, path)))
            .json(body)
            .map_err(|e| ApiError::network(format!("failed to serialize request: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("network error: {}", e)))?;
        Self::parse(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(Request::put(&format!("{}{}", self.base_url, path)))
            .json(body)
            .map_err(|e| ApiError::network(format!("failed to serialize request: {}", e)))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(format!("network error: {}", e)))?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if !response.ok() {
            return Err(Self::error_from(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::network(format!("failed to parse response: {}", e)))
    }

    async fn error_from(response: Response) -> ApiError {
        let status = response.status();
        match response.json::<ApiErrorBody>().await {
            Ok(body) => ApiError {
                status,
                code: body.error.code,
                message: body.error.message,
            },
            Err(_) => ApiError {
                status,
                code: None,
                message: response.status_text(),
            },
        }
    }
}

#[async_trait(?Send)]
impl ExpensesClient for ApiClient {
    async fn list_expenses(&self, month: &MonthKey) -> Result<Vec<Expense>, ApiError> {
        self.get_json(&format!("/expenses?month={}", month)).await
    }

    async fn create_expense(&self, body: &ExpenseCreateBody) -> Result<Expense, ApiError> {
        self.post_json("/expenses", body).await
    }
}

#[async_trait(?Send)]
impl ConfigClient for ApiClient {
    async fn fetch_config(&self) -> Result<Option<UserConfig>, ApiError> {
        match self.get_json::<UserConfig>("/config").await {
            Ok(config) => Ok(Some(config)),
            // 404 = no config yet; first-time setup, not a failure.
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn update_config(&self, body: &ConfigUpdateBody) -> Result<UserConfig, ApiError> {
        self.put_json("/config", body).await
    }
}
