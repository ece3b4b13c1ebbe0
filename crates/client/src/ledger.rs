use api_types::expense::Expense;
use uuid::Uuid;

use crate::{ApiClient, ClientError, ExpenseCache, Summary};

/// The signed-in user's expense list as held by the client.
///
/// The server is authoritative: a successful fetch replaces the list
/// wholesale. Local changes after create/delete are applied optimistically
/// without re-fetching.
#[derive(Debug)]
pub struct Ledger<C: ExpenseCache> {
    user_id: String,
    expenses: Vec<Expense>,
    cache: C,
}

impl<C: ExpenseCache> Ledger<C> {
    /// Opens the ledger for `user_id`, seeded from the cache when an entry
    /// exists. An unreadable cache is treated as empty.
    pub fn open(user_id: impl Into<String>, cache: C) -> Self {
        let user_id = user_id.into();
        let expenses = match cache.load(&user_id) {
            Ok(cached) => cached.unwrap_or_default(),
            Err(err) => {
                tracing::warn!("ignoring unreadable expense cache: {err}");
                Vec::new()
            }
        };

        Self {
            user_id,
            expenses,
            cache,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn summary(&self) -> Summary {
        Summary::from_expenses(&self.expenses)
    }

    /// Fetches the list from the server and applies the outcome.
    ///
    /// No retry is attempted; on failure the error is returned so the caller
    /// can tell the user.
    pub async fn refresh(&mut self, api: &ApiClient, token: &str) -> Result<(), ClientError> {
        let fetched = api.list(token).await;
        self.apply_fetched(fetched)
    }

    /// Applies a fetch outcome: on success the list and the cache are
    /// overwritten, on failure the current list is kept as is.
    pub fn apply_fetched(
        &mut self,
        fetched: Result<Vec<Expense>, ClientError>,
    ) -> Result<(), ClientError> {
        match fetched {
            Ok(expenses) => {
                self.expenses = expenses;
                self.write_cache();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("failed to fetch expenses: {err}");
                Err(err)
            }
        }
    }

    /// Appends a record the server just created.
    pub fn record_created(&mut self, expense: Expense) -> Result<(), ClientError> {
        if expense.title.trim().is_empty() || !(expense.amount > 0.0) {
            return Err(ClientError::Validation("Invalid expense data".to_string()));
        }
        self.expenses.push(expense);
        self.write_cache();
        Ok(())
    }

    /// Drops the record with `id` after the server deleted it. Returns whether
    /// a record was removed.
    pub fn record_deleted(&mut self, id: Uuid) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        let removed = self.expenses.len() != before;
        if removed && !self.expenses.is_empty() {
            self.write_cache();
        }
        removed
    }

    fn write_cache(&mut self) {
        if let Err(err) = self.cache.store(&self.user_id, &self.expenses) {
            tracing::warn!("failed to write expense cache: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use api_types::expense::{Category, TransactionKind};
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{FileCache, MemoryCache};

    fn entry(title: &str, amount: f64) -> Expense {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Expense {
            id: Uuid::new_v4(),
            user_id: "abc".to_string(),
            kind: TransactionKind::Expense,
            title: title.to_string(),
            amount,
            category: Category::Food,
            date: at,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn cached(entries: &[Expense]) -> MemoryCache {
        let mut cache = MemoryCache::default();
        cache.store("abc", entries).unwrap();
        cache
    }

    #[test]
    fn opens_from_cache_for_the_same_user_only() {
        let cache = cached(&[entry("Coffee", 4.5)]);
        let ledger = Ledger::open("abc", cache);
        assert_eq!(ledger.expenses().len(), 1);

        let ledger = Ledger::open("xyz", cached(&[entry("Coffee", 4.5)]));
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn successful_fetch_overwrites_list_and_cache() {
        let mut ledger = Ledger::open("abc", cached(&[entry("Stale", 1.0)]));
        let fresh = vec![entry("Fresh", 2.0), entry("Newer", 3.0)];

        ledger.apply_fetched(Ok(fresh.clone())).unwrap();

        assert_eq!(ledger.expenses(), fresh.as_slice());
        assert_eq!(ledger.cache().load("abc").unwrap(), Some(fresh));
    }

    #[test]
    fn empty_fetch_is_written_to_cache() {
        let mut ledger = Ledger::open("abc", cached(&[entry("Stale", 1.0)]));
        ledger.apply_fetched(Ok(Vec::new())).unwrap();
        assert!(ledger.expenses().is_empty());
        assert_eq!(ledger.cache().load("abc").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn failed_fetch_keeps_cached_list() {
        let stale = vec![entry("Stale", 1.0)];
        let mut ledger = Ledger::open("abc", cached(&stale));

        let result = ledger.apply_fetched(Err(ClientError::Server("boom".to_string())));

        assert!(result.is_err());
        assert_eq!(ledger.expenses(), stale.as_slice());
    }

    #[test]
    fn created_records_are_appended() {
        let mut ledger = Ledger::open("abc", MemoryCache::default());
        ledger.apply_fetched(Ok(vec![entry("First", 1.0)])).unwrap();

        ledger.record_created(entry("Second", 2.0)).unwrap();

        let titles: Vec<&str> = ledger.expenses().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second"]);
        assert_eq!(ledger.cache().load("abc").unwrap().unwrap().len(), 2);
    }

    #[test]
    fn invalid_created_records_are_refused() {
        let mut ledger = Ledger::open("abc", MemoryCache::default());
        assert!(ledger.record_created(entry("", 2.0)).is_err());
        assert!(ledger.record_created(entry("Free", 0.0)).is_err());
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn deleted_records_are_removed_by_id() {
        let keep = entry("Keep", 1.0);
        let drop = entry("Drop", 2.0);
        let mut ledger = Ledger::open("abc", cached(&[keep.clone(), drop.clone()]));

        assert!(ledger.record_deleted(drop.id));
        assert!(!ledger.record_deleted(drop.id));
        assert_eq!(ledger.expenses(), [keep.clone()].as_slice());
        assert_eq!(ledger.cache().load("abc").unwrap(), Some(vec![keep]));
    }

    #[test]
    fn successful_fetch_repairs_corrupt_file_cache() {
        let path = std::env::temp_dir()
            .join("expense_cache_tests")
            .join(format!("{}.json", Uuid::new_v4()));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let mut ledger = Ledger::open("abc", FileCache::new(&path));
        assert!(ledger.expenses().is_empty());

        let fresh = vec![entry("Fresh", 2.0)];
        ledger.apply_fetched(Ok(fresh.clone())).unwrap();

        assert_eq!(FileCache::new(&path).load("abc").unwrap(), Some(fresh));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn summary_follows_the_current_list() {
        let mut ledger = Ledger::open("abc", MemoryCache::default());
        ledger.record_created(entry("Lunch", 12.0)).unwrap();
        assert_eq!(ledger.summary().total_expenses, 12.0);
    }
}
