use serde::{Deserialize, Serialize};

/// One row of the `transactions` table. `item_number` is the SQLite rowid
/// and is `None` until the record has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "item #")]
    pub item_number: Option<i64>,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub desc: String,
}

impl Transaction {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            item_number: None,
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
            desc: desc.into(),
        }
    }
}

/// Orderings offered by the store. Date-derived keys read fixed character
/// ranges of the raw `date` text, laid out as `MMDDYYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Natural storage order.
    #[default]
    None,
    /// Characters 0..2 of `date`.
    Month,
    Category,
    /// Characters 2..4 of `date` (day of month).
    Date,
    /// Characters 4..8 of `date`.
    Year,
    /// `amount` compared as a number; non-numeric text sorts as 0.
    Amount,
}

impl SortKey {
    /// Name as written in settings and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::Month => "month",
            SortKey::Category => "category",
            SortKey::Date => "date",
            SortKey::Year => "year",
            SortKey::Amount => "amount",
        }
    }

    /// SQL ordering expression. Every key ends on the rowid so ties come
    /// back in insertion order.
    pub fn order_by(self) -> &'static str {
        match self {
            SortKey::None => "rowid",
            SortKey::Month => "substr(date, 1, 2), rowid",
            SortKey::Category => "category, rowid",
            SortKey::Date => "substr(date, 3, 2), rowid",
            SortKey::Year => "substr(date, 5, 4), rowid",
            SortKey::Amount => "CAST(amount AS REAL), rowid",
        }
    }
}

pub struct CategorySummary {
    pub category: String,
    pub count: i64,
    pub total: f64,
}
