use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meal_finder::assistant::planner::MealPlan;
use meal_finder::assistant::{
    AssistantBackend, DisabledAssistant, RecipeSuggestion, Suggestion, SuggestionEngine,
};
use meal_finder::cli::{parse_args, Command, ListCommand};
use meal_finder::config::AppConfig;
use meal_finder::mealdb::{Category, RecipeSource, RecipeSummary};
use meal_finder::recipe::Recipe;
use meal_finder::shopping_list::{FileStorage, ShoppingListItem, ShoppingListStore};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    println!("{} [{}] ({} / {})", recipe.name, recipe.id, recipe.category, recipe.area);
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }
    println!("\nIngredients:");
    for item in &recipe.ingredients {
        println!("  - {} {}", item.measure, item.ingredient);
    }
    println!("\nInstructions:");
    for (i, step) in recipe.instruction_steps().iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    if let Some(video) = &recipe.video_link {
        println!("\nVideo: {}", video);
    }
}

fn print_summaries(summaries: &[RecipeSummary]) {
    for summary in summaries {
        println!("{:>8}  {}", summary.id, summary.name);
    }
}

fn print_categories(categories: &[Category]) {
    for category in categories {
        println!("{:>4}  {}", category.id, category.name);
    }
}

fn print_suggestion(suggestion: &RecipeSuggestion) {
    println!(
        "{} [{}] ({} / {})",
        suggestion.recipe_name, suggestion.recipe_id, suggestion.category, suggestion.area
    );
    if let Some(calories) = suggestion.calories {
        println!("~{} kcal per serving", calories);
    }
    if let Some(dietary) = &suggestion.dietary_info {
        let flags: Vec<&str> = [
            (dietary.vegan, "vegan"),
            (dietary.keto, "keto"),
            (dietary.gluten_free, "gluten-free"),
            (dietary.dairy_free, "dairy-free"),
        ]
        .iter()
        .filter(|(flag, _)| *flag == Some(true))
        .map(|(_, name)| *name)
        .collect();
        if !flags.is_empty() {
            println!("Suitable for: {}", flags.join(", "));
        }
    }
    if let Some(allergens) = suggestion.allergens.as_ref().filter(|a| !a.is_empty()) {
        println!("Allergens: {}", allergens.join(", "));
    }
    println!("\nIngredients:");
    for item in &suggestion.ingredients {
        println!("  - {} {}", item.amount, item.name);
    }
    println!("\nInstructions:");
    for (i, step) in suggestion.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    if let Some(substitutions) = &suggestion.substitutions {
        println!("\nSubstitutions:");
        for sub in substitutions {
            println!("  - {} -> {}", sub.ingredient, sub.alternative);
        }
    }
    if let Some(tips) = &suggestion.tips {
        println!("\nChef tips:");
        for tip in tips {
            println!("  - {}", tip);
        }
    }
    if let Some(video) = &suggestion.video_link {
        println!("\nVideo: {}", video);
    }
}

fn print_plan(plan: &MealPlan) {
    for day in &plan.meal_plan {
        println!("{} ({} kcal)", day.day, day.calories);
        println!("  Breakfast: {}", day.breakfast);
        println!("  Lunch:     {}", day.lunch);
        println!("  Dinner:    {}", day.dinner);
    }
    println!("\nShopping list:");
    for item in &plan.shopping_list {
        println!("  - {}", item);
    }
}

fn print_list(store: &ShoppingListStore<FileStorage>, search: &str) {
    if store.is_empty() {
        println!("Your shopping list is empty.");
        return;
    }
    let (checked, total) = store.progress();
    println!("Shopping list [{}/{}]\n", checked, total);
    let groups = store.filtered_groups(search);
    if groups.is_empty() {
        println!("Nothing matches '{}'.", search);
        return;
    }
    for group in groups {
        println!("{} [{}]", group.recipe_name, group.recipe_id);
        for item in group.items {
            let mark = if item.checked { "x" } else { " " };
            println!("  [{}] {} {}  ({})", mark, item.measure, item.ingredient, item.id);
        }
    }
}

async fn run_list_command(
    command: ListCommand,
    config: &AppConfig,
    recipes: &dyn RecipeSource,
    json: bool,
) -> Result<()> {
    let storage = config.shopping_list_storage();
    let mut store = ShoppingListStore::open(storage);
    let mut search = String::new();

    match command {
        ListCommand::Show { search: term } => search = term.unwrap_or_default(),
        ListCommand::Add { recipe_id } => {
            let added = store
                .add_ingredients_by_recipe_id(recipes, &recipe_id)
                .await
                .with_context(|| format!("Failed to add ingredients of recipe '{}'", recipe_id))?;
            info!(recipe_id = %recipe_id, added, "ingredients added");
        }
        ListCommand::AddOne {
            recipe_id,
            recipe_name,
            ingredient,
            measure,
        } => {
            if !store.add_ingredient(&recipe_id, &recipe_name, &ingredient, &measure)? {
                println!("'{}' is already on the list for this recipe.", ingredient);
            }
        }
        ListCommand::Remove { id } => {
            if !store.remove_ingredient(&id)? {
                println!("No item with id '{}'.", id);
            }
        }
        ListCommand::RemoveRecipe { recipe_id } => {
            store.remove_all_from_recipe(&recipe_id)?;
        }
        ListCommand::Toggle { id } => {
            if store.toggle_checked(&id)?.is_none() {
                println!("No item with id '{}'.", id);
            }
        }
        ListCommand::ClearChecked => {
            store.clear_checked()?;
        }
        ListCommand::Clear => store.clear_list()?,
    }

    if json {
        let items: Vec<&ShoppingListItem> = store
            .filtered_groups(&search)
            .into_iter()
            .flat_map(|group| group.items)
            .collect();
        print_json(&items)
    } else {
        print_list(&store, &search);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let recipes = Arc::new(config.recipe_client());
    let json = cli.json;

    match cli.command {
        Command::Ask { query } => {
            let query = query.join(" ");
            anyhow::ensure!(!query.trim().is_empty(), "Tell me what you're craving first.");
            let assistant: Arc<dyn AssistantBackend> = if cli.offline {
                Arc::new(DisabledAssistant)
            } else {
                config.assistant()
            };
            let engine = SuggestionEngine::new(recipes, assistant);
            match engine.get_suggestion(&query).await {
                Some(suggestion) if json => print_json(&suggestion)?,
                Some(Suggestion::Recipe(recipe)) => print_suggestion(&recipe),
                Some(Suggestion::Plan(plan)) => print_plan(&plan),
                None => println!("I couldn't find a matching recipe. Try asking for something else!"),
            }
        }
        Command::Random => match recipes.random_recipe().await {
            Some(recipe) if json => print_json(&recipe)?,
            Some(recipe) => print_recipe(&recipe),
            None => println!("No recipe found."),
        },
        Command::Search { name } => {
            let results = recipes.search_by_name(&name).await;
            if json {
                print_json(&results)?;
            } else if results.is_empty() {
                println!("No recipes found for '{}'.", name);
            } else {
                for recipe in &results {
                    println!("{:>8}  {}", recipe.id, recipe.name);
                }
            }
        }
        Command::Categories => {
            let categories = recipes.categories().await;
            if json {
                print_json(&categories)?;
            } else {
                print_categories(&categories);
            }
        }
        Command::Category { name } => {
            let summaries = recipes.filter_by_category(&name).await;
            if json {
                print_json(&summaries)?;
            } else if summaries.is_empty() {
                println!("No recipes found in '{}'.", name);
            } else {
                print_summaries(&summaries);
            }
        }
        Command::Recipe { id } => match recipes.lookup_by_id(&id).await {
            Some(recipe) if json => print_json(&recipe)?,
            Some(recipe) => print_recipe(&recipe),
            None => println!("No recipe with id '{}'.", id),
        },
        Command::Home { categories } => {
            let (featured, categories) = recipes.featured(categories).await;
            if json {
                print_json(&serde_json::json!({ "featured": featured, "categories": categories }))?;
            } else {
                match &featured {
                    Some(recipe) => println!("Featured: {} [{}]\n", recipe.name, recipe.id),
                    None => println!("No featured recipe today.\n"),
                }
                print_categories(&categories);
            }
        }
        Command::List(command) => {
            run_list_command(command, &config, recipes.as_ref(), json).await?;
        }
    }

    Ok(())
}
