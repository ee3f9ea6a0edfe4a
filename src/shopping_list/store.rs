use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use super::storage::ListStorage;
use super::ShoppingListError;
use crate::mealdb::RecipeSource;
use crate::recipe::Recipe;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub ingredient: String,
    pub measure: String,
    pub checked: bool,
}

/// Items of one recipe, in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeGroup<'a> {
    pub recipe_id: &'a str,
    pub recipe_name: &'a str,
    pub items: Vec<&'a ShoppingListItem>,
}

/// The shopping list. Every mutation rewrites the whole list to `storage`.
pub struct ShoppingListStore<S: ListStorage> {
    items: Vec<ShoppingListItem>,
    storage: S,
}

fn same_ingredient(item: &ShoppingListItem, recipe_id: &str, ingredient: &str) -> bool {
    item.recipe_id == recipe_id && item.ingredient.to_lowercase() == ingredient.to_lowercase()
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

impl<S: ListStorage> ShoppingListStore<S> {
    /// Rehydrates from `storage`. A missing or unreadable slot yields an empty list.
    pub fn open(storage: S) -> Self {
        let items = match storage.load() {
            Ok(Some(contents)) => match serde_json::from_str::<Vec<ShoppingListItem>>(&contents) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "stored shopping list is unparseable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read stored shopping list, starting empty");
                Vec::new()
            }
        };
        debug!(count = items.len(), "shopping list loaded");
        Self { items, storage }
    }

    /// Hands the storage slot back, e.g. to reopen it.
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&self) -> Result<(), ShoppingListError> {
        let contents = serde_json::to_string(&self.items)?;
        self.storage.save(&contents)
    }

    fn next_id(&self, recipe_id: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        loop {
            let id = format!("{}-{}-{}", recipe_id, millis, random_suffix());
            if !self.items.iter().any(|item| item.id == id) {
                return id;
            }
        }
    }

    fn push_new(&mut self, recipe_id: &str, recipe_name: &str, ingredient: &str, measure: &str) -> bool {
        if self.is_in_shopping_list(recipe_id, ingredient) {
            return false;
        }
        let id = self.next_id(recipe_id);
        self.items.push(ShoppingListItem {
            id,
            recipe_id: recipe_id.to_string(),
            recipe_name: recipe_name.to_string(),
            ingredient: ingredient.to_string(),
            measure: measure.to_string(),
            checked: false,
        });
        true
    }

    /// Returns `false` when the recipe already lists this ingredient (any case).
    pub fn add_ingredient(
        &mut self,
        recipe_id: &str,
        recipe_name: &str,
        ingredient: &str,
        measure: &str,
    ) -> Result<bool, ShoppingListError> {
        let added = self.push_new(recipe_id, recipe_name, ingredient, measure);
        if added {
            self.persist()?;
        }
        Ok(added)
    }

    /// Adds every ingredient of `recipe` not already listed for it. Returns how many were added.
    pub fn add_all_ingredients(&mut self, recipe: &Recipe) -> Result<usize, ShoppingListError> {
        let mut added = 0;
        for item in &recipe.ingredients {
            if self.push_new(&recipe.id, &recipe.name, &item.ingredient, &item.measure) {
                added += 1;
            }
        }
        if added > 0 {
            self.persist()?;
        }
        Ok(added)
    }

    /// Fetches the full recipe and adds all of its ingredients.
    pub async fn add_ingredients_by_recipe_id(
        &mut self,
        source: &dyn RecipeSource,
        recipe_id: &str,
    ) -> Result<usize, ShoppingListError> {
        let recipe = source
            .lookup_by_id(recipe_id)
            .await
            .ok_or_else(|| ShoppingListError::RecipeNotFound(recipe_id.to_string()))?;
        self.add_all_ingredients(&recipe)
    }

    pub fn remove_ingredient(&mut self, id: &str) -> Result<bool, ShoppingListError> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        self.persist()?;
        Ok(removed)
    }

    pub fn remove_all_from_recipe(&mut self, recipe_id: &str) -> Result<usize, ShoppingListError> {
        let before = self.items.len();
        self.items.retain(|item| item.recipe_id != recipe_id);
        let removed = before - self.items.len();
        self.persist()?;
        Ok(removed)
    }

    /// Returns the new checked state, or `None` when no item has this id.
    pub fn toggle_checked(&mut self, id: &str) -> Result<Option<bool>, ShoppingListError> {
        let state = self.items.iter_mut().find(|item| item.id == id).map(|item| {
            item.checked = !item.checked;
            item.checked
        });
        self.persist()?;
        Ok(state)
    }

    pub fn clear_checked(&mut self) -> Result<usize, ShoppingListError> {
        let before = self.items.len();
        self.items.retain(|item| !item.checked);
        let removed = before - self.items.len();
        self.persist()?;
        Ok(removed)
    }

    pub fn clear_list(&mut self) -> Result<(), ShoppingListError> {
        self.items.clear();
        self.persist()
    }

    pub fn is_in_shopping_list(&self, recipe_id: &str, ingredient: &str) -> bool {
        self.items
            .iter()
            .any(|item| same_ingredient(item, recipe_id, ingredient))
    }

    pub fn is_recipe_in_shopping_list(&self, recipe_id: &str) -> bool {
        self.items.iter().any(|item| item.recipe_id == recipe_id)
    }

    /// Groups items by recipe in order of first appearance.
    pub fn grouped_by_recipe(&self) -> Vec<RecipeGroup<'_>> {
        let mut groups: Vec<RecipeGroup<'_>> = Vec::new();
        for item in &self.items {
            match groups.iter().position(|g| g.recipe_id == item.recipe_id) {
                Some(index) => groups[index].items.push(item),
                None => groups.push(RecipeGroup {
                    recipe_id: &item.recipe_id,
                    recipe_name: &item.recipe_name,
                    items: vec![item],
                }),
            }
        }
        groups
    }

    /// Groups matching `term`, case-insensitively. A group is kept when its recipe
    /// name or any of its items matches; its items are then narrowed to those whose
    /// ingredient or measure matches. A blank term keeps everything.
    pub fn filtered_groups(&self, term: &str) -> Vec<RecipeGroup<'_>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.grouped_by_recipe();
        }
        let item_matches = |item: &ShoppingListItem| {
            item.ingredient.to_lowercase().contains(&term)
                || item.measure.to_lowercase().contains(&term)
        };

        self.grouped_by_recipe()
            .into_iter()
            .filter(|group| {
                group.recipe_name.to_lowercase().contains(&term)
                    || group.items.iter().any(|item| item_matches(*item))
            })
            .map(|mut group| {
                group.items.retain(|item| item_matches(*item));
                group
            })
            .collect()
    }

    /// `(checked, total)` item counts.
    pub fn progress(&self) -> (usize, usize) {
        let checked = self.items.iter().filter(|item| item.checked).count();
        (checked, self.items.len())
    }
}
