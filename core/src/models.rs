use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Meat,
    Produce,
    Dairy,
    GrainLegume,
    SpiceHerb,
    Condiment,
    OilFat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Pantry,
    Refrigerated,
    Frozen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub category: IngredientCategory,
    pub storage: StorageKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: String,
    pub title: String,
    pub servings: u32,
    pub theme_tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCatalog {
    pub recipes: Vec<Recipe>,
}

/// Display-oriented ingredient reference inside a view section. Every field
/// is optional; entries usually carry at least one of `item` or `label`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewItem {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientSection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rank: Option<i64>,
    pub items: Vec<ViewItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionSection {
    pub name: String,
    pub steps: Vec<String>,
}

/// Display decomposition of a recipe, keyed by the same identifier as the
/// raw `Recipe` record. The link is by convention, not checked at merge time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeView {
    pub recipe_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aliases: Option<Vec<String>>,
    pub ingredient_sections: Vec<IngredientSection>,
    pub instruction_sections: Vec<InstructionSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsFile {
    pub views: Vec<RecipeView>,
}

// --- Inventory ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item: String,
    pub quantity: f64,
    pub unit: String,
}

/// On-hand stock, grouped by category. Categories fold into a single lookup
/// in declaration order; later categories win on item-name collision.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub meats: Vec<InventoryItem>,
    #[serde(default)]
    pub pantry: Vec<InventoryItem>,
}

// --- Plan output types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecipe {
    pub recipe_id: String,
    pub title: String,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub date: String,
    pub period_days: u32,
    pub meals_per_day: u32,
    pub theme_hint: Option<String>,
    pub recipes: Vec<PlanRecipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub item: String,
    pub quantity_needed: f64,
    pub unit: String,
}

// --- Field-level validation ---

/// Catalog identifiers are lowercase alphanumeric plus underscore/hyphen.
pub fn validate_recipe_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("Recipe id must not be empty");
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        bail!("Invalid recipe id '{id}'. Use lowercase letters, digits, '_' or '-'");
    }
    Ok(())
}

pub fn validate_ingredient(ingredient: &Ingredient) -> Result<()> {
    if ingredient.item.trim().is_empty() {
        bail!("Ingredient item must not be empty");
    }
    if ingredient.quantity <= 0.0 {
        let item = &ingredient.item;
        bail!("Ingredient '{item}' quantity must be greater than 0");
    }
    Ok(())
}

pub fn validate_recipe(recipe: &Recipe) -> Result<()> {
    validate_recipe_id(&recipe.recipe_id)?;
    if recipe.title.trim().is_empty() {
        let id = &recipe.recipe_id;
        bail!("Recipe '{id}' title must not be empty");
    }
    if recipe.servings == 0 {
        let id = &recipe.recipe_id;
        bail!("Recipe '{id}' servings must be at least 1");
    }
    for ingredient in &recipe.ingredients {
        validate_ingredient(ingredient)?;
    }
    Ok(())
}

/// Views carry no quantity constraints; an entry without `item` and `label`
/// is tolerated.
pub fn validate_view(view: &RecipeView) -> Result<()> {
    validate_recipe_id(&view.recipe_id)?;
    for section in &view.ingredient_sections {
        if section.name.trim().is_empty() {
            let id = &view.recipe_id;
            bail!("View '{id}' has an ingredient section with an empty name");
        }
    }
    for section in &view.instruction_sections {
        if section.name.trim().is_empty() {
            let id = &view.recipe_id;
            bail!("View '{id}' has an instruction section with an empty name");
        }
    }
    Ok(())
}
