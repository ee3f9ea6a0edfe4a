pub mod api_connection;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod mealdb;
pub mod recipe;
pub mod shopping_list;
