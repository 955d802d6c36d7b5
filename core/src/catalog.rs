use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{
    Recipe, RecipeCatalog, RecipeView, ViewsFile, validate_recipe, validate_view,
};

/// Summary of what a catalog merge did.
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub total: usize,
}

/// A record that can live in an on-disk catalog, unique by identifier.
pub trait CatalogRecord: DeserializeOwned + Serialize + Clone {
    /// Property holding the record list in a wrapped incoming file.
    const LIST_KEY: &'static str;

    fn id(&self) -> &str;
    fn validate(&self) -> Result<()>;
}

impl CatalogRecord for Recipe {
    const LIST_KEY: &'static str = "recipes";

    fn id(&self) -> &str {
        &self.recipe_id
    }

    fn validate(&self) -> Result<()> {
        validate_recipe(self)
    }
}

impl CatalogRecord for RecipeView {
    const LIST_KEY: &'static str = "views";

    fn id(&self) -> &str {
        &self.recipe_id
    }

    fn validate(&self) -> Result<()> {
        validate_view(self)
    }
}

pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed JSON in {}", path.display()))
}

/// Serialize as indented JSON. `serde_json` leaves non-ASCII characters
/// unescaped, so aliases like "닭갈비" survive literally.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Shape an incoming file into a validated record batch. Accepts a wrapped
/// object (`{"recipes": [...]}` / `{"views": [...]}`), a bare list, or a
/// single record object. Any invalid record fails the whole batch.
pub fn normalize_incoming<T: CatalogRecord>(raw: Value) -> Result<Vec<T>> {
    let items = match raw {
        Value::Object(mut map) if map.contains_key(T::LIST_KEY) => {
            match map.remove(T::LIST_KEY) {
                Some(Value::Array(list)) => list,
                _ => bail!("Expected '{}' to hold a list of records", T::LIST_KEY),
            }
        }
        Value::Array(list) => list,
        single => vec![single],
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let record: T = serde_json::from_value(item)
            .with_context(|| format!("Record at position {position} does not match the schema"))?;
        record
            .validate()
            .with_context(|| format!("Record at position {position} failed validation"))?;
        records.push(record);
    }
    Ok(records)
}

/// Union by identifier. Incoming records fully replace existing ones with
/// the same id; within one batch, a later duplicate overwrites an earlier
/// one. Output keeps the destination's original id order, then appends
/// genuinely new ids in incoming order. Duplicate ids in the destination
/// collapse to a single record here.
#[must_use]
pub fn merge_records<T: CatalogRecord>(existing: Vec<T>, incoming: Vec<T>) -> (Vec<T>, MergeSummary) {
    let original_ids: Vec<String> = existing.iter().map(|r| r.id().to_string()).collect();
    let mut by_id: HashMap<String, T> = existing
        .into_iter()
        .map(|r| (r.id().to_string(), r))
        .collect();

    let mut added = 0;
    let mut updated = 0;
    let mut appended_ids: Vec<String> = Vec::new();
    for record in incoming {
        let id = record.id().to_string();
        if by_id.contains_key(&id) {
            updated += 1;
        } else {
            added += 1;
            appended_ids.push(id.clone());
        }
        by_id.insert(id, record);
    }

    let mut merged = Vec::with_capacity(by_id.len());
    for id in &original_ids {
        if let Some(record) = by_id.remove(id) {
            merged.push(record);
        }
    }
    for id in &appended_ids {
        if let Some(record) = by_id.remove(id) {
            merged.push(record);
        }
    }

    let total = merged.len();
    (merged, MergeSummary { added, updated, total })
}

pub fn load_recipe_catalog(path: &Path) -> Result<RecipeCatalog> {
    let catalog: RecipeCatalog = serde_json::from_value(read_json(path)?)
        .with_context(|| format!("Invalid recipe catalog in {}", path.display()))?;
    for (position, recipe) in catalog.recipes.iter().enumerate() {
        validate_recipe(recipe).with_context(|| {
            format!("Invalid recipe at position {position} in {}", path.display())
        })?;
    }
    Ok(catalog)
}

pub fn load_views_file(path: &Path) -> Result<ViewsFile> {
    let views: ViewsFile = serde_json::from_value(read_json(path)?)
        .with_context(|| format!("Invalid views file in {}", path.display()))?;
    for (position, view) in views.views.iter().enumerate() {
        validate_view(view).with_context(|| {
            format!("Invalid view at position {position} in {}", path.display())
        })?;
    }
    Ok(views)
}

/// Merge an incoming recipe batch into the destination catalog file.
/// Everything is validated before the destination is rewritten; a failure
/// leaves the file untouched.
pub fn merge_recipes_file(incoming_path: &Path, dest_path: &Path) -> Result<MergeSummary> {
    let batch: Vec<Recipe> = normalize_incoming(read_json(incoming_path)?)
        .with_context(|| format!("Invalid incoming batch in {}", incoming_path.display()))?;
    let catalog = load_recipe_catalog(dest_path)?;
    let (recipes, summary) = merge_records(catalog.recipes, batch);
    write_json_pretty(dest_path, &RecipeCatalog { recipes })?;
    Ok(summary)
}

/// Same contract as [`merge_recipes_file`], for the views file.
pub fn merge_views_file(incoming_path: &Path, dest_path: &Path) -> Result<MergeSummary> {
    let batch: Vec<RecipeView> = normalize_incoming(read_json(incoming_path)?)
        .with_context(|| format!("Invalid incoming batch in {}", incoming_path.display()))?;
    let views = load_views_file(dest_path)?;
    let (views, summary) = merge_records(views.views, batch);
    write_json_pretty(dest_path, &ViewsFile { views })?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, IngredientCategory, StorageKind};
    use serde_json::json;

    fn recipe(id: &str, items: &[&str]) -> Recipe {
        Recipe {
            recipe_id: id.to_string(),
            title: id.to_uppercase(),
            servings: 2,
            theme_tags: vec![],
            ingredients: items
                .iter()
                .map(|item| Ingredient {
                    item: (*item).to_string(),
                    quantity: 100.0,
                    unit: "g".to_string(),
                    category: IngredientCategory::Other,
                    storage: StorageKind::Pantry,
                })
                .collect(),
            source: None,
            instructions: None,
        }
    }

    fn ids<T: CatalogRecord>(records: &[T]) -> Vec<&str> {
        records.iter().map(CatalogRecord::id).collect()
    }

    #[test]
    fn test_normalize_wrapped_object() {
        let raw = json!({"recipes": [
            {"recipe_id": "a", "title": "A", "servings": 1, "theme_tags": [], "ingredients": []}
        ]});
        let batch: Vec<Recipe> = normalize_incoming(raw).unwrap();
        assert_eq!(ids(&batch), vec!["a"]);
    }

    #[test]
    fn test_normalize_bare_list() {
        let raw = json!([
            {"recipe_id": "a", "title": "A", "servings": 1, "theme_tags": [], "ingredients": []},
            {"recipe_id": "b", "title": "B", "servings": 1, "theme_tags": [], "ingredients": []}
        ]);
        let batch: Vec<Recipe> = normalize_incoming(raw).unwrap();
        assert_eq!(ids(&batch), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_single_record() {
        let raw = json!(
            {"recipe_id": "solo", "title": "Solo", "servings": 1, "theme_tags": [], "ingredients": []}
        );
        let batch: Vec<Recipe> = normalize_incoming(raw).unwrap();
        assert_eq!(ids(&batch), vec!["solo"]);
    }

    #[test]
    fn test_normalize_rejects_invalid_record() {
        let raw = json!({"recipes": [
            {"recipe_id": "ok", "title": "Ok", "servings": 1, "theme_tags": [], "ingredients": []},
            {"recipe_id": "BAD ID", "title": "Bad", "servings": 1, "theme_tags": [], "ingredients": []}
        ]});
        assert!(normalize_incoming::<Recipe>(raw).is_err());
    }

    #[test]
    fn test_normalize_rejects_wrapped_non_list() {
        let raw = json!({"recipes": {"recipe_id": "a"}});
        assert!(normalize_incoming::<Recipe>(raw).is_err());
    }

    #[test]
    fn test_merge_empty_batch_is_noop() {
        let existing = vec![recipe("a", &[]), recipe("b", &[])];
        let (merged, summary) = merge_records(existing, vec![]);
        assert_eq!(ids(&merged), vec!["a", "b"]);
        assert_eq!(summary.added, 0);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_merge_update_keeps_position_and_count() {
        let existing = vec![recipe("a", &[]), recipe("b", &[]), recipe("c", &[])];
        let mut replacement = recipe("b", &["new ingredient"]);
        replacement.title = "Replaced".to_string();
        let (merged, summary) = merge_records(existing, vec![replacement]);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged[1].title, "Replaced");
        assert_eq!(merged[1].ingredients.len(), 1);
        assert_eq!(summary.added, 0);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn test_merge_new_id_appends_after_originals() {
        let existing = vec![recipe("a", &[]), recipe("b", &[])];
        let (merged, summary) = merge_records(existing, vec![recipe("z", &[])]);
        assert_eq!(ids(&merged), vec!["a", "b", "z"]);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn test_merge_batch_duplicate_last_wins() {
        let existing = vec![recipe("a", &[])];
        let mut first = recipe("z", &[]);
        first.title = "First".to_string();
        let mut second = recipe("z", &[]);
        second.title = "Second".to_string();
        let (merged, summary) = merge_records(existing, vec![first, second]);
        assert_eq!(ids(&merged), vec!["a", "z"]);
        assert_eq!(merged[1].title, "Second");
        // Mapping-overwrite counting: the second occurrence lands as an update.
        assert_eq!(summary.added, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_merge_self_preserves_order_and_counts_updates() {
        let existing = vec![recipe("a", &["x"]), recipe("b", &["y"])];
        let (merged, summary) = merge_records(existing.clone(), existing);
        assert_eq!(ids(&merged), vec!["a", "b"]);
        assert_eq!(summary.added, 0);
        assert_eq!(summary.updated, 2);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_merge_collapses_duplicate_destination_ids() {
        // Uniqueness is enforced at merge time, not load time.
        let existing = vec![recipe("a", &[]), recipe("a", &["late"]), recipe("b", &[])];
        let (merged, summary) = merge_records(existing, vec![]);
        assert_eq!(ids(&merged), vec!["a", "b"]);
        assert_eq!(merged[0].ingredients.len(), 1);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_views_merge_uses_views_key() {
        let raw = json!({"views": [{
            "recipe_id": "a",
            "ingredient_sections": [],
            "instruction_sections": []
        }]});
        let batch: Vec<RecipeView> = normalize_incoming(raw).unwrap();
        assert_eq!(ids(&batch), vec!["a"]);
    }
}
