use std::path::PathBuf;

use tracing::debug;

use crate::cli::open_store;
use crate::error::Result;
use crate::fmt::format_bytes;

pub fn run(output: Option<String>) -> Result<()> {
    let store = open_store()?;

    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let backups_dir = store
                .path()
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default()
                .join("backups");
            std::fs::create_dir_all(&backups_dir)?;
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            backups_dir.join(format!("tally-{stamp}.db"))
        }
    };

    debug!(dest = %dest_path.display(), "backing up database");
    store.backup_to(&dest_path)?;

    let size = std::fs::metadata(&dest_path)?.len();
    println!("Backup saved to {}", dest_path.display());
    println!("Size: {}", format_bytes(size));
    Ok(())
}
