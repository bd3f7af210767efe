use std::path::Path;

use crate::{error::Result, io::remove_dir_if_exists};

/// Remove the checkout, and with it every build output.
pub fn clean(repo_dir: &Path) -> Result<()> {
    if remove_dir_if_exists(repo_dir)? {
        println!("Removed {}", repo_dir.display());
    } else {
        println!("Skipped {} (not found)", repo_dir.display());
    }
    Ok(())
}
