//! Core of the expense tracker: payload validation and owner-scoped storage.

pub use error::EngineError;
pub use expenses::{Category, Expense, NewExpense, TransactionKind};
pub use ops::{Engine, EngineBuilder};
pub use validation::{parse_date, validate};

mod error;
mod expenses;
mod ops;
mod validation;

type ResultEngine<T> = Result<T, EngineError>;
