pub mod storage;
pub mod store;

pub use storage::{FileStorage, ListStorage, MemoryStorage};
pub use store::{RecipeGroup, ShoppingListItem, ShoppingListStore};

#[derive(Debug, thiserror::Error)]
pub enum ShoppingListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),
}
