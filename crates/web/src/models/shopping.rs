//! Shopping domain types.
//!
//! Rows of the `shopping` schema. User names and quantities are validated on
//! decode.

use chrono::{DateTime, Utc};

use shopping_list_core::{ProductId, Quantity, ShoppingListId, UserId, UserName};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub name: UserName,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// A named shopping list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShoppingList {
    /// Unique list ID.
    pub id: ShoppingListId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
}

/// A product on a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// List this product belongs to.
    pub shopping_list_id: ShoppingListId,
    /// Display name.
    pub name: String,
    /// How many to buy.
    pub quantity: Quantity,
    /// Image shown next to the product.
    pub image_url: String,
    /// When the product was added.
    pub created_at: DateTime<Utc>,
}

/// Validated input for adding a product to a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub quantity: Quantity,
    pub image_url: String,
}
