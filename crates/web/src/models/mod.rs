//! Domain models for the shopping list site.

pub mod session;
pub mod shopping;

pub use session::{CurrentUser, keys as session_keys};
pub use shopping::{NewProduct, Product, ShoppingList, User};
