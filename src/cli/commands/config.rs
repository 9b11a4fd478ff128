//! Config Command
//!
//! Shows and initializes configuration files.

use crate::cli::output::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init(force: bool) -> Result<()> {
    let out = Output::new();
    let path = ConfigLoader::init_project(force)?;
    out.success(&format!("Created {}", path.display()));
    Ok(())
}
