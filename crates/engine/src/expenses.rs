//! Expense primitives.
//!
//! An `Expense` is a single income or expense record owned by exactly one
//! user. The direction of money is carried by `kind`; `amount` is always
//! strictly positive.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) const TITLE_MAX_CHARS: usize = 100;
pub(crate) const NOTES_MAX_CHARS: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: [Self; 2] = [Self::Income, Self::Expense];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid transaction kind: {value}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Income,
    Other,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Food,
        Self::Transport,
        Self::Shopping,
        Self::Bills,
        Self::Income,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Bills => "Bills",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid category: {value}")))
    }
}

/// The mutable fields of an expense, already checked by
/// [`validate`](crate::validate).
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub kind: TransactionKind,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewExpense {
    /// Constraints enforced by the storage layer regardless of how the
    /// payload was produced.
    pub(crate) fn check_constraints(&self) -> ResultEngine<()> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(EngineError::InvalidInput(
                "amount must be greater than 0".to_string(),
            ));
        }
        let title_len = self.title.trim().chars().count();
        if title_len == 0 || title_len > TITLE_MAX_CHARS {
            return Err(EngineError::InvalidInput(format!(
                "title must be between 1 and {TITLE_MAX_CHARS} characters"
            )));
        }
        if let Some(notes) = &self.notes
            && notes.trim().chars().count() > NOTES_MAX_CHARS
        {
            return Err(EngineError::InvalidInput(format!(
                "notes must be at most {NOTES_MAX_CHARS} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTimeUtc,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Sets every mutable column from `new`. The owner is always re-forced to
    /// `user_id`.
    pub(crate) fn set_fields(&mut self, user_id: &str, new: &NewExpense, now: DateTime<Utc>) {
        self.user_id = ActiveValue::Set(user_id.to_string());
        self.kind = ActiveValue::Set(new.kind.as_str().to_string());
        self.title = ActiveValue::Set(new.title.trim().to_string());
        self.amount = ActiveValue::Set(new.amount);
        self.category = ActiveValue::Set(new.category.as_str().to_string());
        self.date = ActiveValue::Set(new.date);
        self.notes = ActiveValue::Set(new.notes.as_deref().map(|n| n.trim().to_string()));
        self.updated_at = ActiveValue::Set(now);
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("Expense not found".to_string()))?,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            title: model.title,
            amount: model.amount,
            category: Category::try_from(model.category.as_str())?,
            date: model.date,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
