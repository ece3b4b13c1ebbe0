use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Expense, NewExpense, ResultEngine, expenses};

use super::{Engine, with_tx};

fn not_found() -> EngineError {
    EngineError::NotFound("Expense not found".to_string())
}

/// Ids that cannot be a stored key can never match, so they are reported as
/// missing rather than as a store failure.
fn parse_id(id: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| not_found())
}

/// Filters a query by primary key and owner at once.
fn owned_by<Q: QueryFilter>(query: Q, id: Uuid, user_id: &str) -> Q {
    query
        .filter(expenses::Column::Id.eq(id.to_string()))
        .filter(expenses::Column::UserId.eq(user_id))
}

impl Engine {
    /// Lists every expense owned by `user_id`, newest `date` first.
    ///
    /// Records sharing a `date` are ordered by creation time, newest first.
    pub async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    /// Stores a new expense owned by `user_id`.
    pub async fn create_expense(&self, user_id: &str, new: NewExpense) -> ResultEngine<Expense> {
        new.check_constraints()?;

        let now = Utc::now();
        let mut model = expenses::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };
        model.set_fields(user_id, &new, now);

        let model = model.insert(&self.database).await?;
        tracing::debug!(expense_id = %model.id, "expense created");
        Expense::try_from(model)
    }

    /// Replaces the mutable fields of the expense `id` owned by `user_id`.
    ///
    /// `id` and `created_at` never change. Fails with
    /// [`EngineError::NotFound`] when no such expense exists for the caller,
    /// whether or not it exists for someone else.
    pub async fn update_expense(
        &self,
        user_id: &str,
        id: &str,
        new: NewExpense,
    ) -> ResultEngine<Expense> {
        let id = parse_id(id)?;
        new.check_constraints()?;

        with_tx!(self, |db_tx| {
            let mut changes = <expenses::ActiveModel as Default>::default();
            changes.set_fields(user_id, &new, Utc::now());

            let result = owned_by(expenses::Entity::update_many(), id, user_id)
                .set(changes)
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(not_found());
            }

            let model = owned_by(expenses::Entity::find(), id, user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;
            Expense::try_from(model)
        })
    }

    /// Removes the expense `id` owned by `user_id` and returns it.
    pub async fn delete_expense(&self, user_id: &str, id: &str) -> ResultEngine<Expense> {
        let id = parse_id(id)?;

        with_tx!(self, |db_tx| {
            let model = owned_by(expenses::Entity::find(), id, user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(not_found)?;

            let result = owned_by(expenses::Entity::delete_many(), id, user_id)
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(not_found());
            }

            Expense::try_from(model)
        })
    }
}
