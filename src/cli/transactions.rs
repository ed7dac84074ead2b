use comfy_table::{Cell, Table};
use tracing::debug;

use crate::cli::open_store;
use crate::error::Result;
use crate::models::{SortKey, Transaction};
use crate::settings::load_settings;

fn print_table(title: &str, rows: &[Transaction]) {
    let mut table = Table::new();
    table.set_header(vec!["Item #", "Amount", "Category", "Date", "Description"]);
    for txn in rows {
        table.add_row(vec![
            Cell::new(txn.item_number.map(|n| n.to_string()).unwrap_or_default()),
            Cell::new(&txn.amount),
            Cell::new(&txn.category),
            Cell::new(&txn.date),
            Cell::new(&txn.desc),
        ]);
    }
    println!("{title}\n{table}");
}

pub fn list(sort: Option<SortKey>, json: bool) -> Result<()> {
    let store = open_store()?;
    let key = sort.unwrap_or_else(|| load_settings().default_sort);
    debug!(?key, "listing transactions");
    let rows = match key {
        SortKey::None => store.list_all()?,
        SortKey::Month => store.sort_by_month()?,
        SortKey::Category => store.sort_by_category()?,
        SortKey::Date => store.sort_by_date()?,
        SortKey::Year => store.sort_by_year()?,
        SortKey::Amount => store.sort_by_amount()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else if rows.is_empty() {
        println!("No transactions.");
    } else {
        print_table("Transactions", &rows);
    }
    Ok(())
}

pub fn show(item: i64, json: bool) -> Result<()> {
    let txn = open_store()?.get(item)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&txn)?);
    } else {
        print_table(&format!("Transaction {item}"), std::slice::from_ref(&txn));
    }
    Ok(())
}

pub fn add(txn: Transaction) -> Result<()> {
    let item = open_store()?.add(&txn)?;
    debug!(item, "inserted transaction");
    println!("Added transaction {item}: {} {} on {}", txn.amount, txn.category, txn.date);
    Ok(())
}

pub fn update(item: i64, txn: Transaction) -> Result<()> {
    open_store()?.update(item, &txn)?;
    debug!(item, "updated transaction");
    println!("Updated transaction {item}");
    Ok(())
}

pub fn delete(item: i64) -> Result<()> {
    open_store()?.delete(item)?;
    debug!(item, "deleted transaction");
    println!("Deleted transaction {item}");
    Ok(())
}
