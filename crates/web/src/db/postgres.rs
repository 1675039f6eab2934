//! `PostgreSQL` implementation of [`ShoppingStore`].
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database.

use async_trait::async_trait;
use sqlx::PgPool;

use shopping_list_core::{ProductId, Quantity, ShoppingListId, UserId, UserName};

use super::{RepositoryError, ShoppingStore};
use crate::models::{NewProduct, Product, ShoppingList, User};

/// Store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique violation to `RepositoryError::Conflict`.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Decode errors surface when a stored value fails validation (e.g. a
/// negative quantity written outside the application).
fn classify(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::ColumnDecode { index, source } => {
            RepositoryError::DataCorruption(format!("column {index}: {source}"))
        }
        other => RepositoryError::Database(other),
    }
}

#[async_trait]
impl ShoppingStore for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, created_at
            FROM shopping."user"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn user_by_name(&self, name: &UserName) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, created_at
            FROM shopping."user"
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn create_user(&self, name: &UserName) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO shopping."user" (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "user name"))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, created_at
            FROM shopping."user"
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)
    }

    async fn shopping_lists(&self, user_id: UserId) -> Result<Vec<ShoppingList>, RepositoryError> {
        sqlx::query_as::<_, ShoppingList>(
            r"
            SELECT id, user_id, name, created_at
            FROM shopping.shopping_list
            WHERE user_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)
    }

    async fn shopping_list(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        sqlx::query_as::<_, ShoppingList>(
            r"
            SELECT id, user_id, name, created_at
            FROM shopping.shopping_list
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn create_shopping_list(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<ShoppingList, RepositoryError> {
        sqlx::query_as::<_, ShoppingList>(
            r"
            INSERT INTO shopping.shopping_list (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            ",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn delete_shopping_list(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shopping.shopping_list
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(list_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn products(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<Vec<Product>, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            SELECT p.id, p.shopping_list_id, p.name, p.quantity, p.image_url, p.created_at
            FROM shopping.product p
            JOIN shopping.shopping_list l ON l.id = p.shopping_list_id
            WHERE p.shopping_list_id = $1 AND l.user_id = $2
            ORDER BY p.id ASC
            ",
        )
        .bind(list_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)
    }

    async fn add_product(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        // Insert only when the list is owned by the user
        sqlx::query_as::<_, Product>(
            r"
            INSERT INTO shopping.product (shopping_list_id, name, quantity, image_url)
            SELECT l.id, $3, $4, $5
            FROM shopping.shopping_list l
            WHERE l.id = $1 AND l.user_id = $2
            RETURNING id, shopping_list_id, name, quantity, image_url, created_at
            ",
        )
        .bind(list_id)
        .bind(user_id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(&product.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or(RepositoryError::NotFound)
    }

    async fn update_product_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE shopping.product p
            SET quantity = $1
            FROM shopping.shopping_list l
            WHERE p.id = $2 AND l.id = p.shopping_list_id AND l.user_id = $3
            RETURNING p.id, p.shopping_list_id, p.name, p.quantity, p.image_url, p.created_at
            ",
        )
        .bind(quantity)
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM shopping.product p
            USING shopping.shopping_list l
            WHERE p.id = $1 AND l.id = p.shopping_list_id AND l.user_id = $2
            ",
        )
        .bind(product_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
