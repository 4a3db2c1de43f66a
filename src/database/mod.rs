pub mod manager;
pub mod memory;
pub mod models;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDrinkStore;
pub use models::drink::{Drink, DrinkPatch, Ingredient, LongDrink, NewDrink, RecipeInput, ShortDrink};
pub use store::{DrinkStore, PgDrinkStore};
