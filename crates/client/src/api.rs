use api_types::{
    ErrorBody,
    expense::{Expense, ExpenseChanged, ExpenseDraft, ExpenseList},
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::ClientError;

const EXPENSES_PATH: &str = "api/expenses";

/// HTTP client for the expenses API.
///
/// Every call carries the caller's bearer token; the server derives the
/// owner from it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> Result<T, ClientError> {
        let res = request.bearer_auth(token).send().await?;

        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }

        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        let err = match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(body),
            StatusCode::BAD_REQUEST => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }

    /// Fetches every expense of the caller, newest first.
    pub async fn list(&self, token: &str) -> Result<Vec<Expense>, ClientError> {
        let list: ExpenseList = self
            .send(self.http.get(self.url(EXPENSES_PATH)), token)
            .await?;
        Ok(list.data)
    }

    pub async fn create(&self, token: &str, draft: &ExpenseDraft) -> Result<Expense, ClientError> {
        let changed: ExpenseChanged = self
            .send(self.http.post(self.url(EXPENSES_PATH)).json(draft), token)
            .await?;
        Ok(changed.data)
    }

    pub async fn update(
        &self,
        token: &str,
        id: Uuid,
        draft: &ExpenseDraft,
    ) -> Result<Expense, ClientError> {
        let url = self.url(&format!("{EXPENSES_PATH}/{id}"));
        let changed: ExpenseChanged = self.send(self.http.put(url).json(draft), token).await?;
        Ok(changed.data)
    }

    pub async fn delete(&self, token: &str, id: Uuid) -> Result<Expense, ClientError> {
        let url = self.url(&format!("{EXPENSES_PATH}/{id}"));
        let changed: ExpenseChanged = self.send(self.http.delete(url), token).await?;
        Ok(changed.data)
    }
}
