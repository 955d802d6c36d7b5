use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{Inventory, Plan, PlanRecipe, Recipe, ShoppingItem};

#[derive(Debug, Clone, PartialEq)]
pub struct OnHand {
    pub quantity: f64,
    pub unit: String,
}

/// Flatten inventory categories into one item-name lookup. Later categories
/// overwrite earlier ones on collision.
#[must_use]
pub fn fold_inventory(inventory: &Inventory) -> HashMap<String, OnHand> {
    let mut folded = HashMap::new();
    for row in inventory.meats.iter().chain(&inventory.pantry) {
        folded.insert(
            row.item.clone(),
            OnHand {
                quantity: row.quantity,
                unit: row.unit.clone(),
            },
        );
    }
    folded
}

/// Count of "extra" shared ingredient occurrences across a set of recipes:
/// for every item appearing n > 1 times, n - 1 is added to the score.
#[must_use]
pub fn overlap_score(recipes: &[&Recipe]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for recipe in recipes {
        for ingredient in &recipe.ingredients {
            *counts.entry(ingredient.item.as_str()).or_insert(0) += 1;
        }
    }
    counts.values().filter(|&&n| n > 1).map(|&n| n - 1).sum()
}

/// Greedy selection preferring recipes that reuse already-needed
/// ingredients. Deterministic for a given input order: the popularity sort
/// is stable and overlap ties keep the earliest remaining candidate.
#[must_use]
pub fn choose_recipes(
    all_recipes: &[Recipe],
    target_meals: usize,
    theme_hint: Option<&str>,
) -> Vec<Recipe> {
    let mut candidates: Vec<&Recipe> = all_recipes.iter().collect();
    if let Some(hint) = theme_hint {
        let hint = hint.to_lowercase();
        let themed: Vec<&Recipe> = all_recipes
            .iter()
            .filter(|r| r.theme_tags.iter().any(|t| t.to_lowercase().contains(&hint)))
            .collect();
        // A hint matching nothing falls back to the full set.
        if !themed.is_empty() {
            candidates = themed;
        }
    }

    let mut popularity: HashMap<&str, usize> = HashMap::new();
    for recipe in &candidates {
        for ingredient in &recipe.ingredients {
            *popularity.entry(ingredient.item.as_str()).or_insert(0) += 1;
        }
    }

    let mut remaining = candidates;
    remaining.sort_by_key(|recipe| {
        let score: usize = recipe
            .ingredients
            .iter()
            .map(|i| popularity.get(i.item.as_str()).copied().unwrap_or(0))
            .sum();
        std::cmp::Reverse(score)
    });

    let mut chosen: Vec<&Recipe> = Vec::new();
    while !remaining.is_empty() && chosen.len() < target_meals {
        if chosen.is_empty() {
            chosen.push(remaining.remove(0));
            continue;
        }
        let mut best_index = 0;
        let mut best_score = None;
        for (index, candidate) in remaining.iter().enumerate() {
            let mut trial = chosen.clone();
            trial.push(*candidate);
            let score = overlap_score(&trial);
            if best_score.is_none_or(|best| score > best) {
                best_score = Some(score);
                best_index = index;
            }
        }
        chosen.push(remaining.remove(best_index));
    }

    chosen.into_iter().cloned().collect()
}

/// Sum required quantities per (item, unit) pair across the chosen recipes,
/// subtract on-hand stock matched by item name only (unit is ignored; a
/// recipe asking for an item in a different unit than the inventory records
/// is still treated as covered), and keep the strictly positive nets
/// rounded to two decimals. Rows come out in first-occurrence order.
#[must_use]
pub fn consolidate_needs(
    chosen: &[Recipe],
    on_hand: &HashMap<String, OnHand>,
) -> Vec<ShoppingItem> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut needed: HashMap<(String, String), f64> = HashMap::new();
    for recipe in chosen {
        for ingredient in &recipe.ingredients {
            let key = (ingredient.item.clone(), ingredient.unit.clone());
            if !needed.contains_key(&key) {
                order.push(key.clone());
            }
            *needed.entry(key).or_insert(0.0) += ingredient.quantity;
        }
    }

    let mut rows = Vec::new();
    for (item, unit) in order {
        let required = needed[&(item.clone(), unit.clone())];
        let have = on_hand.get(&item).map_or(0.0, |h| h.quantity);
        let net = required - have;
        if net > 0.0 {
            rows.push(ShoppingItem {
                item,
                quantity_needed: (net * 100.0).round() / 100.0,
                unit,
            });
        }
    }
    rows
}

/// Select recipes for the period and derive the shopping list.
#[must_use]
pub fn build_plan(
    all_recipes: &[Recipe],
    inventory: &Inventory,
    date: NaiveDate,
    period_days: u32,
    meals_per_day: u32,
    theme_hint: Option<&str>,
) -> (Plan, Vec<ShoppingItem>) {
    let on_hand = fold_inventory(inventory);
    let target_meals = (period_days * meals_per_day) as usize;
    let chosen = choose_recipes(all_recipes, target_meals, theme_hint);
    let shopping = consolidate_needs(&chosen, &on_hand);

    let plan = Plan {
        date: date.format("%Y-%m-%d").to_string(),
        period_days,
        meals_per_day,
        theme_hint: theme_hint.map(str::to_string),
        recipes: chosen
            .into_iter()
            .map(|recipe| PlanRecipe {
                recipe_id: recipe.recipe_id,
                title: recipe.title,
                servings: recipe.servings,
                ingredients: recipe.ingredients,
                instructions: recipe.instructions.unwrap_or_default(),
            })
            .collect(),
    };
    (plan, shopping)
}

pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid inventory file in {}", path.display()))
}

/// Write the dated plan document and shopping-list CSV into `data_dir`.
/// Reruns on the same day overwrite; different days get fresh files.
pub fn write_plan_files(
    data_dir: &Path,
    plan: &Plan,
    shopping: &[ShoppingItem],
) -> Result<(PathBuf, PathBuf)> {
    let plan_path = data_dir.join(format!("plan_{}.json", plan.date));
    let list_path = data_dir.join(format!("shopping_list_{}.csv", plan.date));

    let text = serde_json::to_string_pretty(plan)?;
    fs::write(&plan_path, text)
        .with_context(|| format!("Failed to write {}", plan_path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&list_path)
        .with_context(|| format!("Failed to write {}", list_path.display()))?;
    // Header goes out even for an empty list.
    writer.write_record(["item", "quantity_needed", "unit"])?;
    for row in shopping {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", list_path.display()))?;

    Ok((plan_path, list_path))
}
