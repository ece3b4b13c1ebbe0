use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod status {
    use super::*;

    /// Body of the unauthenticated root probe.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Status {
        pub message: String,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TransactionKind {
        Income,
        Expense,
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

    /// A stored transaction as seen over the wire.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Expense {
        pub id: Uuid,
        pub user_id: String,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub title: String,
        /// Always > 0; the direction is given by `kind`.
        pub amount: f64,
        pub category: Category,
        /// RFC3339 timestamp in UTC.
        pub date: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Request body for creating or replacing an expense.
    ///
    /// The server does not deserialize into this type: it validates the raw
    /// JSON so it can report which rule failed. Clients use it to build
    /// well-formed bodies.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseDraft {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub title: String,
        pub amount: f64,
        pub category: Category,
        pub date: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
    }

    /// Response body for `GET /api/expenses`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub success: bool,
        pub count: usize,
        pub data: Vec<Expense>,
    }

    /// Response body for create, update and delete.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseChanged {
        pub success: bool,
        pub message: String,
        pub data: Expense,
    }
}
