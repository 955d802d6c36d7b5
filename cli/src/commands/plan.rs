use anyhow::Result;
use chrono::Local;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::catalog::load_recipe_catalog;
use larder_core::planner::{build_plan, load_inventory, write_plan_files};

use super::helpers::truncate;
use crate::config::Config;

pub(crate) fn cmd_plan(
    config: &Config,
    days: u32,
    meals_per_day: u32,
    theme: Option<&str>,
    json: bool,
) -> Result<()> {
    let inventory = load_inventory(&config.inventory_path)?;
    let catalog = load_recipe_catalog(&config.recipes_path)?;

    let today = Local::now().date_naive();
    let (plan, shopping) = build_plan(&catalog.recipes, &inventory, today, days, meals_per_day, theme);
    let (plan_path, list_path) = write_plan_files(&config.data_dir, &plan, &shopping)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let meal_count = plan.recipes.len();
    println!("Planned {meal_count} meal(s) for {days} day(s):");
    for recipe in &plan.recipes {
        let title = &recipe.title;
        let id = &recipe.recipe_id;
        let servings = recipe.servings;
        println!("  {title} ({id}, serves {servings})");
    }

    if shopping.is_empty() {
        println!("\nNothing to buy; inventory covers the plan.");
    } else {
        #[derive(Tabled)]
        struct ShoppingRow {
            #[tabled(rename = "Item")]
            item: String,
            #[tabled(rename = "Needed")]
            needed: String,
            #[tabled(rename = "Unit")]
            unit: String,
        }

        let rows: Vec<ShoppingRow> = shopping
            .iter()
            .map(|row| ShoppingRow {
                item: truncate(&row.item, 35),
                needed: format!("{:.2}", row.quantity_needed),
                unit: row.unit.clone(),
            })
            .collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
            .to_string();
        println!("\n{table}");
    }

    println!("\nPlan: {}", plan_path.display());
    println!("Shopping list: {}", list_path.display());

    Ok(())
}
