use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::settings::{load_settings, resolve_db_path, save_settings, shellexpand_path};
use crate::store::TransactionStore;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    // Same resolution as every other command, so `$TALLY_DB` wins here too.
    let store = TransactionStore::open(resolve_db_path()?)?;
    debug!(path = %store.path().display(), "initialized store");

    println!("Initialized tally at {}", resolved.display());
    println!("Database:   {}", store.path().display());
    Ok(())
}
