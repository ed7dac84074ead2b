use std::path::{Path, PathBuf};

use rusqlite::backup::Backup;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::db::{get_connection, init_db};
use crate::error::{Result, TallyError};
use crate::models::{CategorySummary, SortKey, Transaction};

const SELECT_COLUMNS: &str = "SELECT rowid, amount, category, date, \"desc\" FROM transactions";

/// CRUD and sorted retrieval over the `transactions` table of one database
/// file.
///
/// The store holds no connection between calls. Every method opens its own
/// connection, runs a single auto-committed statement and lets the
/// connection drop on the way out, whether the statement succeeded or not.
#[derive(Debug, Clone)]
pub struct TransactionStore {
    db_path: PathBuf,
}

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    // Columns are untyped text; rows written by other tools may hold NULLs.
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(Transaction {
        item_number: Some(row.get(0)?),
        amount: text(1)?,
        category: text(2)?,
        date: text(3)?,
        desc: text(4)?,
    })
}

impl TransactionStore {
    /// Open the store at `db_path`, creating the file, its parent directory
    /// and the table as needed. Existing rows are left alone.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = get_connection(&db_path)?;
        init_db(&conn)?;
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connection(&self) -> Result<Connection> {
        get_connection(&self.db_path)
    }

    /// All records in storage order.
    pub fn list_all(&self) -> Result<Vec<Transaction>> {
        self.sort_by(SortKey::None)
    }

    pub fn get(&self, item_number: i64) -> Result<Transaction> {
        let conn = self.connection()?;
        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE rowid = ?1"),
            [item_number],
            row_to_transaction,
        )
        .optional()?
        .ok_or(TallyError::NotFound(item_number))
    }

    pub fn sort_by(&self, key: SortKey) -> Result<Vec<Transaction>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY {}", key.order_by()))?;
        let rows = stmt
            .query_map([], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn sort_by_month(&self) -> Result<Vec<Transaction>> {
        self.sort_by(SortKey::Month)
    }

    pub fn sort_by_category(&self) -> Result<Vec<Transaction>> {
        self.sort_by(SortKey::Category)
    }

    pub fn sort_by_date(&self) -> Result<Vec<Transaction>> {
        self.sort_by(SortKey::Date)
    }

    pub fn sort_by_year(&self) -> Result<Vec<Transaction>> {
        self.sort_by(SortKey::Year)
    }

    pub fn sort_by_amount(&self) -> Result<Vec<Transaction>> {
        self.sort_by(SortKey::Amount)
    }

    /// Insert the record's four fields and return the assigned item number.
    /// Any `item_number` already set on `txn` is ignored.
    pub fn add(&self, txn: &Transaction) -> Result<i64> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO transactions (amount, category, date, \"desc\") VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![txn.amount, txn.category, txn.date, txn.desc],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace all four fields of the record `item_number`.
    pub fn update(&self, item_number: i64, txn: &Transaction) -> Result<()> {
        let conn = self.connection()?;
        let changed = conn.execute(
            "UPDATE transactions SET amount = ?1, category = ?2, date = ?3, \"desc\" = ?4 WHERE rowid = ?5",
            rusqlite::params![txn.amount, txn.category, txn.date, txn.desc, item_number],
        )?;
        if changed == 0 {
            return Err(TallyError::NotFound(item_number));
        }
        Ok(())
    }

    pub fn delete(&self, item_number: i64) -> Result<()> {
        let conn = self.connection()?;
        let changed = conn.execute("DELETE FROM transactions WHERE rowid = ?1", [item_number])?;
        if changed == 0 {
            return Err(TallyError::NotFound(item_number));
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.connection()?;
        let count = conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        Ok(count)
    }

    /// Record count and numeric amount total per category, by category name.
    pub fn summarize_by_category(&self) -> Result<Vec<CategorySummary>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT category, count(*), COALESCE(SUM(CAST(amount AS REAL)), 0) \
             FROM transactions GROUP BY category ORDER BY category",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CategorySummary {
                    category: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    count: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Copy the whole database into `dest` with SQLite's online backup.
    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        let conn = self.connection()?;
        let mut dest_conn = Connection::open(dest)?;
        let backup = Backup::new(&conn, &mut dest_conn)?;
        backup.run_to_completion(100, std::time::Duration::from_millis(10), None)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, TransactionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    fn seed(store: &TransactionStore, rows: &[(&str, &str, &str, &str)]) -> Vec<i64> {
        rows.iter()
            .map(|&(amount, category, date, desc)| {
                store.add(&Transaction::new(amount, category, date, desc)).unwrap()
            })
            .collect()
    }

    fn descs(rows: &[Transaction]) -> Vec<&str> {
        rows.iter().map(|t| t.desc.as_str()).collect()
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let (_dir, store) = test_store();
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_add_then_get_returns_same_fields() {
        let (_dir, store) = test_store();
        let txn = Transaction::new("12.50", "food", "03012024", "lunch");
        let id = store.add(&txn).unwrap();
        let got = store.get(id).unwrap();
        assert_eq!(got.item_number, Some(id));
        assert_eq!(got.amount, "12.50");
        assert_eq!(got.category, "food");
        assert_eq!(got.date, "03012024");
        assert_eq!(got.desc, "lunch");
    }

    #[test]
    fn test_list_all_has_one_row_per_add_with_unique_ids() {
        let (_dir, store) = test_store();
        let ids = seed(&store, &[
            ("1", "a", "01012024", "one"),
            ("2", "b", "01022024", "two"),
            ("3", "c", "01032024", "three"),
            ("4", "d", "01042024", "four"),
        ]);
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 4);
        let mut seen: Vec<i64> = all.iter().map(|t| t.item_number.unwrap()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4);
        assert_eq!(descs(&all), vec!["one", "two", "three", "four"]);
        assert_eq!(seen, ids);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_dir, store) = test_store();
        assert!(matches!(store.get(42), Err(TallyError::NotFound(42))));
    }

    #[test]
    fn test_update_changes_only_target_row() {
        let (_dir, store) = test_store();
        let ids = seed(&store, &[
            ("10.00", "food", "01012024", "first"),
            ("20.00", "rent", "01022024", "second"),
            ("30.00", "fun", "01032024", "third"),
        ]);
        let before_first = store.get(ids[0]).unwrap();
        let before_third = store.get(ids[2]).unwrap();

        store
            .update(ids[1], &Transaction::new("25.00", "housing", "02022024", "second v2"))
            .unwrap();

        let updated = store.get(ids[1]).unwrap();
        assert_eq!(updated.item_number, Some(ids[1]));
        assert_eq!(updated.amount, "25.00");
        assert_eq!(updated.category, "housing");
        assert_eq!(updated.date, "02022024");
        assert_eq!(updated.desc, "second v2");
        assert_eq!(store.get(ids[0]).unwrap(), before_first);
        assert_eq!(store.get(ids[2]).unwrap(), before_third);
    }

    #[test]
    fn test_update_missing_is_not_found_and_changes_nothing() {
        let (_dir, store) = test_store();
        seed(&store, &[("1.00", "misc", "01012024", "keep")]);
        let before = store.list_all().unwrap();
        let err = store.update(99, &Transaction::new("9", "x", "x", "x")).unwrap_err();
        assert!(matches!(err, TallyError::NotFound(99)));
        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn test_delete_removes_only_target_row() {
        let (_dir, store) = test_store();
        let ids = seed(&store, &[
            ("1", "a", "01012024", "one"),
            ("2", "b", "01022024", "two"),
            ("3", "c", "01032024", "three"),
        ]);
        store.delete(ids[1]).unwrap();
        assert!(matches!(store.get(ids[1]), Err(TallyError::NotFound(_))));
        assert_eq!(descs(&store.list_all().unwrap()), vec!["one", "three"]);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let (_dir, store) = test_store();
        seed(&store, &[("1", "a", "01012024", "one")]);
        assert!(matches!(store.delete(7), Err(TallyError::NotFound(7))));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_item_numbers_are_not_reassigned_after_delete() {
        let (_dir, store) = test_store();
        let ids = seed(&store, &[("1", "a", "01012024", "one"), ("2", "b", "01022024", "two")]);
        store.delete(ids[0]).unwrap();
        let next = store.add(&Transaction::new("3", "c", "01032024", "three")).unwrap();
        assert!(!ids.contains(&next));
    }

    #[test]
    fn test_sort_by_category_is_non_decreasing_and_stable() {
        let (_dir, store) = test_store();
        seed(&store, &[
            ("1", "travel", "01012024", "t1"),
            ("2", "food", "01022024", "f1"),
            ("3", "rent", "01032024", "r1"),
            ("4", "food", "01042024", "f2"),
        ]);
        let sorted = store.sort_by_category().unwrap();
        let cats: Vec<&str> = sorted.iter().map(|t| t.category.as_str()).collect();
        assert!(cats.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(descs(&sorted), vec!["f1", "f2", "r1", "t1"]);
        assert_eq!(descs(&store.sort_by_category().unwrap()), descs(&sorted));
    }

    #[test]
    fn test_sort_by_month_day_and_year_read_mmddyyyy() {
        let (_dir, store) = test_store();
        seed(&store, &[
            ("1", "x", "12052023", "dec-05-2023"),
            ("2", "x", "01202025", "jan-20-2025"),
            ("3", "x", "07012024", "jul-01-2024"),
        ]);
        assert_eq!(
            descs(&store.sort_by_month().unwrap()),
            vec!["jan-20-2025", "jul-01-2024", "dec-05-2023"]
        );
        assert_eq!(
            descs(&store.sort_by_date().unwrap()),
            vec!["jul-01-2024", "dec-05-2023", "jan-20-2025"]
        );
        assert_eq!(
            descs(&store.sort_by_year().unwrap()),
            vec!["dec-05-2023", "jul-01-2024", "jan-20-2025"]
        );
    }

    #[test]
    fn test_sort_by_amount_is_numeric() {
        let (_dir, store) = test_store();
        seed(&store, &[
            ("100.00", "x", "01012024", "hundred"),
            ("9.99", "x", "01012024", "nine"),
            ("-5", "x", "01012024", "refund"),
            ("20", "x", "01012024", "twenty"),
        ]);
        assert_eq!(
            descs(&store.sort_by_amount().unwrap()),
            vec!["refund", "nine", "twenty", "hundred"]
        );
    }

    #[test]
    fn test_reopen_keeps_existing_rows() {
        let (dir, store) = test_store();
        seed(&store, &[("1", "a", "01012024", "one"), ("2", "b", "01022024", "two")]);
        let reopened = TransactionStore::open(dir.path().join("test.db")).unwrap();
        assert_eq!(reopened.count().unwrap(), 2);
        assert_eq!(reopened.list_all().unwrap(), store.list_all().unwrap());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("t.db");
        let store = TransactionStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_reads_null_columns_as_empty_text() {
        let (_dir, store) = test_store();
        let conn = get_connection(store.path()).unwrap();
        conn.execute("INSERT INTO transactions (amount) VALUES ('3.00')", []).unwrap();
        let id = conn.last_insert_rowid();
        let got = store.get(id).unwrap();
        assert_eq!(got.amount, "3.00");
        assert_eq!(got.category, "");
        assert_eq!(got.desc, "");
    }

    #[test]
    fn test_summarize_by_category() {
        let (_dir, store) = test_store();
        seed(&store, &[
            ("12.50", "food", "01012024", "lunch"),
            ("7.50", "food", "01022024", "coffee"),
            ("900", "rent", "01032024", "march"),
            ("n/a", "rent", "01042024", "garbled"),
        ]);
        let summary = store.summarize_by_category().unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].category, "food");
        assert_eq!(summary[0].count, 2);
        assert!((summary[0].total - 20.0).abs() < 1e-9);
        assert_eq!(summary[1].category, "rent");
        assert_eq!(summary[1].count, 2);
        assert!((summary[1].total - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_backup_copies_rows() {
        let (dir, store) = test_store();
        seed(&store, &[("1", "a", "01012024", "one")]);
        let dest = dir.path().join("backup.db");
        store.backup_to(&dest).unwrap();
        let copy = TransactionStore::open(&dest).unwrap();
        assert_eq!(copy.list_all().unwrap(), store.list_all().unwrap());
    }

    #[test]
    fn test_end_to_end_lifecycle() {
        let (_dir, store) = test_store();
        let id = store
            .add(&Transaction::new("12.50", "food", "2024-03-01", "lunch"))
            .unwrap();
        assert_eq!(id, 1);

        let got = store.get(1).unwrap();
        assert_eq!(got, Transaction {
            item_number: Some(1),
            amount: "12.50".to_string(),
            category: "food".to_string(),
            date: "2024-03-01".to_string(),
            desc: "lunch".to_string(),
        });

        store
            .update(1, &Transaction::new("15.00", "food", "2024-03-01", "lunch"))
            .unwrap();
        assert_eq!(store.get(1).unwrap().amount, "15.00");

        store.delete(1).unwrap();
        assert!(matches!(store.get(1), Err(TallyError::NotFound(1))));
        assert!(store.list_all().unwrap().is_empty());
    }
}
