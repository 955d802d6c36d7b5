mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    cmd_merge_recipes, cmd_merge_views, cmd_plan, cmd_validate_recipes, cmd_validate_views,
};
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "A simple meal-planning CLI",
    long_about = "Maintain recipe catalogs as flat JSON files, validate them,\nand plan meals with a shopping list diffed against your inventory."
)]
struct Cli {
    /// Override the data directory (default: the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge incoming records into a catalog
    Merge {
        #[command(subcommand)]
        command: MergeCommands,
    },
    /// Check catalogs for structural conformance
    Validate {
        #[command(subcommand)]
        command: ValidateCommands,
    },
    /// Plan meals for a period and derive a shopping list
    Plan {
        /// Number of days to plan for
        #[arg(short, long, default_value = "4")]
        days: u32,
        /// Meals per day
        #[arg(short, long, default_value = "1")]
        meals_per_day: u32,
        /// Theme hint biasing recipe selection (e.g. "korean")
        #[arg(short, long)]
        theme: Option<String>,
        /// Output the plan document as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MergeCommands {
    /// Merge a recipe batch into the recipe catalog
    Recipes {
        /// Incoming batch: a {"recipes": [...]} object, a bare list, or a single record
        file: PathBuf,
        /// Destination catalog (default: recipes.json in the data dir)
        dest: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge a view batch into the views file
    Views {
        /// Incoming batch: a {"views": [...]} object, a bare list, or a single record
        file: PathBuf,
        /// Destination views file (default: recipe_views.json in the data dir)
        dest: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ValidateCommands {
    /// Check the recipe catalog against the JSON Schema document
    Recipes,
    /// Check the views file against its record model
    Views,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.data_dir {
        Some(dir) => Config::at(dir)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Merge { command } => match command {
            MergeCommands::Recipes { file, dest, json } => {
                cmd_merge_recipes(&file, &dest.unwrap_or(config.recipes_path), json)
            }
            MergeCommands::Views { file, dest, json } => {
                cmd_merge_views(&file, &dest.unwrap_or(config.views_path), json)
            }
        },
        Commands::Validate { command } => match command {
            ValidateCommands::Recipes => {
                cmd_validate_recipes(&config.recipes_path, &config.schema_path)
            }
            ValidateCommands::Views => cmd_validate_views(&config.views_path),
        },
        Commands::Plan {
            days,
            meals_per_day,
            theme,
            json,
        } => cmd_plan(&config, days, meals_per_day, theme.as_deref(), json),
    }
}
