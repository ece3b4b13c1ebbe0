use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use auth::{AuthError, Caller, IdentityVerifier, JwtVerifier};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod auth;
mod expenses;
mod server;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            Category, Expense, ExpenseChanged, ExpenseDraft, ExpenseList, TransactionKind,
        };
    }

    pub mod status {
        pub use api_types::status::Status;
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Unauthenticated(String),
    BadRequest(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            db_err.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthenticated(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::BadRequest(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
