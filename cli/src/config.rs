use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub data_dir: PathBuf,
    pub recipes_path: PathBuf,
    pub views_path: PathBuf,
    pub inventory_path: PathBuf,
    pub schema_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "larder").context("Could not determine home directory")?;
        Self::at(proj_dirs.data_dir().to_path_buf())
    }

    /// Anchor all conventional file locations at `data_dir`, creating it if
    /// needed.
    pub fn at(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Config {
            recipes_path: data_dir.join("recipes.json"),
            views_path: data_dir.join("recipe_views.json"),
            inventory_path: data_dir.join("inventory.json"),
            schema_path: data_dir.join("recipes.schema.json"),
            data_dir,
        })
    }
}
