use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::open_store;
use crate::error::Result;
use crate::fmt::money;

pub fn run() -> Result<()> {
    let summary = open_store()?.summarize_by_category()?;
    if summary.is_empty() {
        println!("No transactions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Count", "Total"]);
    for row in &summary {
        let category = if row.category.is_empty() { "(none)" } else { row.category.as_str() };
        table.add_row(vec![
            Cell::new(category),
            Cell::new(row.count),
            Cell::new(money(row.total)),
        ]);
    }
    let count: i64 = summary.iter().map(|r| r.count).sum();
    let total: f64 = summary.iter().map(|r| r.total).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(count),
        Cell::new(money(total).bold()),
    ]);
    println!("Summary by category\n{table}");
    Ok(())
}
