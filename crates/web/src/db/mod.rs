//! Persistence for users, shopping lists and products.
//!
//! # Database: `shopping`
//!
//! ## Tables
//!
//! - `shopping.user` - Registered users (unique name)
//! - `shopping.shopping_list` - Lists, each owned by one user
//! - `shopping.product` - Products, each on one list
//! - `tower_sessions.session` - Session storage (tower-sessions)
//!
//! Ownership is a foreign key with `ON DELETE CASCADE`, so removing a list
//! removes its products and no dangling references remain.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p shopping-list-cli -- migrate
//! ```
//!
//! # Backends
//!
//! - [`PgStore`] - `PostgreSQL`, used by the server and CLI
//! - [`InMemoryStore`] - process-local, used by tests and local experiments

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopping_list_core::{ProductId, Quantity, ShoppingListId, UserId, UserName};

use crate::models::{NewProduct, Product, ShoppingList, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found (or is not owned by the caller).
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate user name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Store for the user → shopping list → product hierarchy.
///
/// Every list and product operation takes the acting user's id and only
/// touches rows that user owns. Lists and products are returned in creation
/// order.
#[async_trait]
pub trait ShoppingStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Get a user by id.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user by their login name.
    async fn user_by_name(&self, name: &UserName) -> Result<Option<User>, RepositoryError>;

    /// Register a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    async fn create_user(&self, name: &UserName) -> Result<User, RepositoryError>;

    /// All users in registration order.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// The user's shopping lists.
    async fn shopping_lists(&self, user_id: UserId) -> Result<Vec<ShoppingList>, RepositoryError>;

    /// One of the user's shopping lists.
    async fn shopping_list(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<Option<ShoppingList>, RepositoryError>;

    /// Append a new list to the user's lists.
    async fn create_shopping_list(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<ShoppingList, RepositoryError>;

    /// Delete one of the user's lists together with its products.
    ///
    /// Returns `false` if the list does not exist or belongs to someone else.
    async fn delete_shopping_list(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<bool, RepositoryError>;

    /// Products on one of the user's lists.
    async fn products(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Append a product to one of the user's lists.
    ///
    /// Returns `RepositoryError::NotFound` if the list is not the user's.
    async fn add_product(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError>;

    /// Replace the quantity of a product on one of the user's lists.
    ///
    /// Returns `RepositoryError::NotFound` if the product is not the user's.
    async fn update_product_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Product, RepositoryError>;

    /// Delete a product from one of the user's lists.
    ///
    /// Returns `false` if the product does not exist or belongs to someone else.
    async fn delete_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
