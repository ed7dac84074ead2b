use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::cli::open_store;
use crate::error::Result;
use crate::models::Transaction;

const HEADER: [&str; 5] = ["item #", "amount", "category", "date", "desc"];

fn write_csv<W: Write>(rows: &[Transaction], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)?;
    for txn in rows {
        let item = txn.item_number.map(|n| n.to_string()).unwrap_or_default();
        wtr.write_record([
            item.as_str(),
            txn.amount.as_str(),
            txn.category.as_str(),
            txn.date.as_str(),
            txn.desc.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(output: Option<String>) -> Result<()> {
    let rows = open_store()?.list_all()?;
    match output {
        Some(p) => {
            let path = PathBuf::from(p);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            write_csv(&rows, std::fs::File::create(&path)?)?;
            debug!(count = rows.len(), "exported transactions");
            println!("Wrote {} transactions to {}", rows.len(), path.display());
        }
        None => write_csv(&rows, std::io::stdout().lock())?,
    }
    Ok(())
}
