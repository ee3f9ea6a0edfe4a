use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find recipes, plan meals and keep a shopping list", long_about = None)]
pub struct Cli {
    /// Skip the remote assistant and use local heuristics only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask the assistant for a recipe or a meal plan
    Ask {
        /// What you are craving, e.g. "something with chicken" or "weekly keto plan"
        query: Vec<String>,
    },
    /// Show a random recipe
    Random,
    /// Search recipes by name
    Search { name: String },
    /// List recipe categories
    Categories,
    /// List recipes in a category
    Category { name: String },
    /// Show a recipe by id
    Recipe { id: String },
    /// Featured recipe and the first few categories
    Home {
        #[arg(long, default_value_t = 8)]
        categories: usize,
    },
    /// Manage the shopping list
    #[command(subcommand)]
    List(ListCommand),
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Show the list grouped by recipe
    Show {
        /// Only show recipes and items matching this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Add every ingredient of a recipe
    Add { recipe_id: String },
    /// Add a single ingredient
    AddOne {
        recipe_id: String,
        recipe_name: String,
        ingredient: String,
        #[arg(default_value = "")]
        measure: String,
    },
    /// Remove one item by its id
    Remove { id: String },
    /// Remove all items of a recipe
    RemoveRecipe { recipe_id: String },
    /// Toggle the checked state of an item
    Toggle { id: String },
    /// Remove checked items
    ClearChecked,
    /// Empty the list
    Clear,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
