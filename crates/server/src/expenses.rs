//! Expenses API endpoints

use api_types::expense::{
    Category as ApiCategory, Expense, ExpenseChanged, ExpenseList, TransactionKind as ApiKind,
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use crate::{ServerError, auth::Caller, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_category(category: engine::Category) -> ApiCategory {
    match category {
        engine::Category::Food => ApiCategory::Food,
        engine::Category::Transport => ApiCategory::Transport,
        engine::Category::Shopping => ApiCategory::Shopping,
        engine::Category::Bills => ApiCategory::Bills,
        engine::Category::Income => ApiCategory::Income,
        engine::Category::Other => ApiCategory::Other,
    }
}

fn map_expense(expense: engine::Expense) -> Expense {
    Expense {
        id: expense.id,
        user_id: expense.user_id,
        kind: map_kind(expense.kind),
        title: expense.title,
        amount: expense.amount,
        category: map_category(expense.category),
        date: expense.date,
        notes: expense.notes,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn changed(message: &str, expense: engine::Expense) -> Json<ExpenseChanged> {
    Json(ExpenseChanged {
        success: true,
        message: message.to_string(),
        data: map_expense(expense),
    })
}

/// Unwraps the raw JSON body and runs the validation rules on it.
fn validated(payload: Result<Json<Value>, JsonRejection>) -> Result<engine::NewExpense, ServerError> {
    let Json(body) = payload.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    Ok(engine::validate(&body)?)
}

pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseList>, ServerError> {
    let data: Vec<Expense> = state
        .engine
        .list_expenses(&caller.0)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(ExpenseList {
        success: true,
        count: data.len(),
        data,
    }))
}

pub async fn create(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseChanged>), ServerError> {
    let new = validated(payload)?;
    let expense = state.engine.create_expense(&caller.0, new).await?;

    Ok((
        StatusCode::CREATED,
        changed("Expense created successfully", expense),
    ))
}

pub async fn update(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExpenseChanged>, ServerError> {
    let new = validated(payload)?;
    let expense = state.engine.update_expense(&caller.0, &id, new).await?;

    Ok(changed("Expense updated successfully", expense))
}

pub async fn delete(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseChanged>, ServerError> {
    let expense = state.engine.delete_expense(&caller.0, &id).await?;

    Ok(changed("Expense deleted successfully", expense))
}
