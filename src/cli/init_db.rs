use std::path::Path;

use crate::cli::ensure_parent_dir;
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path};

/// Create the schema. With `remember`, the path also becomes the default
/// database for later commands.
pub fn run(db_path: &Path, remember: bool) -> Result<()> {
    ensure_parent_dir(db_path)?;
    let conn = get_connection(db_path)?;
    init_db(&conn)?;
    println!("Initialized database at {}", db_path.display());

    if remember {
        let resolved = std::fs::canonicalize(db_path).unwrap_or_else(|_| db_path.to_path_buf());
        let mut settings = load_settings();
        settings.db_path = resolved.to_string_lossy().to_string();
        save_settings(&settings)?;
        println!("Saved as default database in {}", settings_path().display());
    }
    Ok(())
}
