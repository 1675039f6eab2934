//! In-memory implementation of [`ShoppingStore`].
//!
//! Mirrors the `PostgreSQL` semantics: unique user names, owner-scoped list
//! and product access, cascading list deletion and creation-ordered results.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shopping_list_core::{ProductId, Quantity, ShoppingListId, UserId, UserName};

use super::{RepositoryError, ShoppingStore};
use crate::models::{NewProduct, Product, ShoppingList, User};

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<UserId, User>,
    lists: BTreeMap<ShoppingListId, ShoppingList>,
    products: BTreeMap<ProductId, Product>,
}

impl Tables {
    /// Ids are shared across tables, like a single sequence.
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn owns_list(&self, user_id: UserId, list_id: ShoppingListId) -> bool {
        self.lists
            .get(&list_id)
            .is_some_and(|list| list.user_id == user_id)
    }

    fn owns_product(&self, user_id: UserId, product_id: ProductId) -> bool {
        self.products
            .get(&product_id)
            .is_some_and(|product| self.owns_list(user_id, product.shopping_list_id))
    }
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShoppingStore for InMemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_name(&self, name: &UserName) -> Result<Option<User>, RepositoryError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| &u.name == name).cloned())
    }

    async fn create_user(&self, name: &UserName) -> Result<User, RepositoryError> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|u| &u.name == name) {
            return Err(RepositoryError::Conflict(
                "user name already exists".to_owned(),
            ));
        }

        let user = User {
            id: UserId::new(tables.allocate_id()),
            name: name.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn shopping_lists(&self, user_id: UserId) -> Result<Vec<ShoppingList>, RepositoryError> {
        let tables = self.inner.read().await;
        Ok(tables
            .lists
            .values()
            .filter(|list| list.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn shopping_list(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let tables = self.inner.read().await;
        Ok(tables
            .lists
            .get(&list_id)
            .filter(|list| list.user_id == user_id)
            .cloned())
    }

    async fn create_shopping_list(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<ShoppingList, RepositoryError> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(RepositoryError::NotFound);
        }

        let list = ShoppingList {
            id: ShoppingListId::new(tables.allocate_id()),
            user_id,
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        tables.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn delete_shopping_list(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.inner.write().await;
        if !tables.owns_list(user_id, list_id) {
            return Ok(false);
        }

        tables.lists.remove(&list_id);
        tables
            .products
            .retain(|_, product| product.shopping_list_id != list_id);
        Ok(true)
    }

    async fn products(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let tables = self.inner.read().await;
        if !tables.owns_list(user_id, list_id) {
            return Ok(Vec::new());
        }

        Ok(tables
            .products
            .values()
            .filter(|product| product.shopping_list_id == list_id)
            .cloned()
            .collect())
    }

    async fn add_product(
        &self,
        user_id: UserId,
        list_id: ShoppingListId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.inner.write().await;
        if !tables.owns_list(user_id, list_id) {
            return Err(RepositoryError::NotFound);
        }

        let product = Product {
            id: ProductId::new(tables.allocate_id()),
            shopping_list_id: list_id,
            name: product.name.clone(),
            quantity: product.quantity,
            image_url: product.image_url.clone(),
            created_at: Utc::now(),
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.inner.write().await;
        if !tables.owns_product(user_id, product_id) {
            return Err(RepositoryError::NotFound);
        }

        let product = tables
            .products
            .get_mut(&product_id)
            .ok_or(RepositoryError::NotFound)?;
        product.quantity = quantity;
        Ok(product.clone())
    }

    async fn delete_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.inner.write().await;
        if !tables.owns_product(user_id, product_id) {
            return Ok(false);
        }

        Ok(tables.products.remove(&product_id).is_some())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn name(s: &str) -> UserName {
        UserName::parse(s).unwrap()
    }

    fn milk() -> NewProduct {
        NewProduct {
            name: "Milk".to_string(),
            quantity: Quantity::new(2).unwrap(),
            image_url: "https://example.com/milk.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_user_name_conflicts() {
        let store = InMemoryStore::new();
        store.create_user(&name("alice")).await.unwrap();

        let err = store.create_user(&name("alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lists_are_scoped_to_owner_in_creation_order() {
        let store = InMemoryStore::new();
        let alice = store.create_user(&name("alice")).await.unwrap();
        let bob = store.create_user(&name("bob")).await.unwrap();

        let first = store.create_shopping_list(alice.id, "Groceries").await.unwrap();
        store.create_shopping_list(bob.id, "Hardware").await.unwrap();
        let second = store.create_shopping_list(alice.id, "Party").await.unwrap();

        let lists = store.shopping_lists(alice.id).await.unwrap();
        assert_eq!(lists, vec![first.clone(), second]);

        assert!(store.shopping_list(bob.id, first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_list_cascades_products() {
        let store = InMemoryStore::new();
        let alice = store.create_user(&name("alice")).await.unwrap();
        let list = store.create_shopping_list(alice.id, "Groceries").await.unwrap();
        let product = store.add_product(alice.id, list.id, &milk()).await.unwrap();

        assert!(store.delete_shopping_list(alice.id, list.id).await.unwrap());
        assert!(store.shopping_lists(alice.id).await.unwrap().is_empty());
        assert!(!store.delete_product(alice.id, product.id).await.unwrap());

        // Second delete is a no-op
        assert!(!store.delete_shopping_list(alice.id, list.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_users_cannot_touch_products() {
        let store = InMemoryStore::new();
        let alice = store.create_user(&name("alice")).await.unwrap();
        let mallory = store.create_user(&name("mallory")).await.unwrap();
        let list = store.create_shopping_list(alice.id, "Groceries").await.unwrap();

        let err = store.add_product(mallory.id, list.id, &milk()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let product = store.add_product(alice.id, list.id, &milk()).await.unwrap();
        let err = store
            .update_product_quantity(mallory.id, product.id, Quantity::new(9).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert!(!store.delete_product(mallory.id, product.id).await.unwrap());
        assert!(store.products(mallory.id, list.id).await.unwrap().is_empty());

        let products = store.products(alice.id, list.id).await.unwrap();
        assert_eq!(products, vec![product]);
    }

    #[tokio::test]
    async fn test_products_are_appended_in_creation_order() {
        let store = InMemoryStore::new();
        let alice = store.create_user(&name("alice")).await.unwrap();
        let list = store.create_shopping_list(alice.id, "Groceries").await.unwrap();
        let other = store.create_shopping_list(alice.id, "Party").await.unwrap();

        for item in ["Milk", "Bread", "Eggs"] {
            let product = NewProduct {
                name: item.to_string(),
                ..milk()
            };
            store.add_product(alice.id, list.id, &product).await.unwrap();
            store.add_product(alice.id, other.id, &milk()).await.unwrap();
        }

        let names: Vec<String> = store
            .products(alice.id, list.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Milk", "Bread", "Eggs"]);
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let store = InMemoryStore::new();
        let alice = store.create_user(&name("alice")).await.unwrap();
        let list = store.create_shopping_list(alice.id, "Groceries").await.unwrap();
        let product = store.add_product(alice.id, list.id, &milk()).await.unwrap();

        let updated = store
            .update_product_quantity(alice.id, product.id, Quantity::new(5).unwrap())
            .await
            .unwrap();
        assert_eq!(updated.quantity.get(), 5);

        let products = store.products(alice.id, list.id).await.unwrap();
        assert_eq!(products[0].quantity.get(), 5);
    }
}
