//! Shopping list route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use serde::Deserialize;

use shopping_list_core::ShoppingListId;

use super::required_text;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ValidForm, ValidPath};
use crate::middleware::RequireAuth;
use crate::models::{Product, ShoppingList};
use crate::state::AppState;

/// Maximum length of a list name, in characters.
pub const MAX_LIST_NAME_CHARS: usize = 100;

/// Image pre-filled in the add-product form.
pub const DEFAULT_IMAGE_URL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn%3AANd9GcR3CC6a9Je41GSKvu8C9L5xL3oS5EuPoCFTU6JU-FZHk6PoddIh";

/// New list form data.
#[derive(Debug, Deserialize)]
pub struct CreateListForm {
    pub name: String,
}

/// Delete list form data.
#[derive(Debug, Deserialize)]
pub struct DeleteListForm {
    pub shopping_list_id: ShoppingListId,
}

/// Home page: the user's lists.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_name: String,
    pub lists: Vec<ShoppingList>,
}

/// List detail page.
#[derive(Template, WebTemplate)]
#[template(path = "shopping_list.html")]
pub struct ShoppingListTemplate {
    pub list: ShoppingList,
    pub products: Vec<Product>,
    pub default_image_url: &'static str,
}

/// Display the logged-in user's shopping lists.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<HomeTemplate> {
    let lists = state.store().shopping_lists(user.id).await?;

    Ok(HomeTemplate {
        user_name: user.name.into_inner(),
        lists,
    })
}

/// Display one list with its products.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidPath(list_id): ValidPath<ShoppingListId>,
) -> Result<ShoppingListTemplate> {
    let list = state
        .store()
        .shopping_list(user.id, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("shopping list {list_id}")))?;
    let products = state.store().products(user.id, list.id).await?;

    Ok(ShoppingListTemplate {
        list,
        products,
        default_image_url: DEFAULT_IMAGE_URL,
    })
}

/// Create a list and append it to the user's lists.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidForm(form): ValidForm<CreateListForm>,
) -> Result<Redirect> {
    let name = required_text("shopping list name", &form.name, MAX_LIST_NAME_CHARS)?;
    let list = state.store().create_shopping_list(user.id, &name).await?;

    tracing::info!(user_id = %user.id, list_id = %list.id, "Shopping list created");
    add_breadcrumb(
        "shopping_list",
        "Created shopping list",
        &[("list_id", list.id.to_string())],
    );

    Ok(Redirect::to("/"))
}

/// Delete a list. Deleting a list that is already gone is a no-op.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidForm(form): ValidForm<DeleteListForm>,
) -> Result<Redirect> {
    let deleted = state
        .store()
        .delete_shopping_list(user.id, form.shopping_list_id)
        .await?;

    if deleted {
        tracing::info!(user_id = %user.id, list_id = %form.shopping_list_id, "Shopping list deleted");
    } else {
        tracing::debug!(user_id = %user.id, list_id = %form.shopping_list_id, "Shopping list already gone");
    }

    Ok(Redirect::to("/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shopping_list_core::UserId;

    fn list(id: i32, name: &str) -> ShoppingList {
        ShoppingList {
            id: ShoppingListId::new(id),
            user_id: UserId::new(1),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_home_template_links_each_list() {
        let html = HomeTemplate {
            user_name: "alice".to_string(),
            lists: vec![list(3, "Groceries"), list(4, "Party")],
        }
        .render()
        .unwrap();

        assert!(html.contains("Logged in as user: alice"));
        assert!(html.contains(r#"href="/shopping_list/3""#));
        assert!(html.contains(r#"href="/shopping_list/4""#));
        assert!(!html.contains("No shopping lists yet."));
    }

    #[test]
    fn test_home_template_empty_state() {
        let html = HomeTemplate {
            user_name: "alice".to_string(),
            lists: Vec::new(),
        }
        .render()
        .unwrap();
        assert!(html.contains("No shopping lists yet."));
    }

    #[test]
    fn test_shopping_list_template_prefills_image() {
        let html = ShoppingListTemplate {
            list: list(3, "Groceries"),
            products: Vec::new(),
            default_image_url: "https://example.com/default.png",
        }
        .render()
        .unwrap();
        assert!(html.contains("Shopping list name: Groceries"));
        assert!(html.contains(r#"value="https://example.com/default.png""#));
    }
}
