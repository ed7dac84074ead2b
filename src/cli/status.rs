use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{load_settings, resolve_db_path};
use crate::store::TransactionStore;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = resolve_db_path()?;

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Sort:       {}", settings.default_sort.name());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let count = TransactionStore::open(&db_path)?.count()?;
        println!();
        println!("Transactions:  {count}");
    } else {
        println!();
        println!("Database not found. Run `tally init` to set up.");
    }

    Ok(())
}
