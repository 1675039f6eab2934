//! Product route handlers.
//!
//! These routes require authentication. Each one redirects back to the list
//! named in the form.

use axum::{extract::State, response::Redirect};
use serde::Deserialize;

use shopping_list_core::{ProductId, Quantity, ShoppingListId};

use super::required_text;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::ValidForm;
use crate::middleware::RequireAuth;
use crate::models::NewProduct;
use crate::state::AppState;

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_CHARS: usize = 100;

/// Maximum length of an image URL.
pub const MAX_IMAGE_URL_CHARS: usize = 2048;

/// Add product form data.
#[derive(Debug, Deserialize)]
pub struct CreateProductForm {
    pub shopping_list_id: ShoppingListId,
    pub name: String,
    pub quantity: String,
    pub image_url: String,
}

/// Delete product form data.
#[derive(Debug, Deserialize)]
pub struct DeleteProductForm {
    pub product_id: ProductId,
    pub shopping_list_id: ShoppingListId,
}

/// Quantity update form data.
#[derive(Debug, Deserialize)]
pub struct ProductQuantityForm {
    pub product_id: ProductId,
    pub quantity: String,
    pub shopping_list_id: ShoppingListId,
}

fn list_redirect(list_id: ShoppingListId) -> Redirect {
    Redirect::to(&format!("/shopping_list/{list_id}"))
}

fn parse_quantity(raw: &str) -> Result<Quantity> {
    Quantity::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_image_url(raw: &str) -> Result<String> {
    let url = required_text("image url", raw, MAX_IMAGE_URL_CHARS)?;
    // The CSP only lets pages load images over https
    if !url.starts_with("https://") {
        return Err(AppError::BadRequest(
            "image url must start with https://".to_string(),
        ));
    }
    Ok(url)
}

impl CreateProductForm {
    fn validate(&self) -> Result<NewProduct> {
        Ok(NewProduct {
            name: required_text("product name", &self.name, MAX_PRODUCT_NAME_CHARS)?,
            quantity: parse_quantity(&self.quantity)?,
            image_url: parse_image_url(&self.image_url)?,
        })
    }
}

/// Add a product to one of the user's lists.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidForm(form): ValidForm<CreateProductForm>,
) -> Result<Redirect> {
    let new_product = form.validate()?;
    let product = state
        .store()
        .add_product(user.id, form.shopping_list_id, &new_product)
        .await?;

    tracing::info!(
        user_id = %user.id,
        list_id = %form.shopping_list_id,
        product_id = %product.id,
        "Product added"
    );
    add_breadcrumb(
        "product",
        "Added product",
        &[("product_id", product.id.to_string())],
    );

    Ok(list_redirect(form.shopping_list_id))
}

/// Remove a product. Removing a product that is already gone is a no-op.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidForm(form): ValidForm<DeleteProductForm>,
) -> Result<Redirect> {
    if state.store().delete_product(user.id, form.product_id).await? {
        tracing::info!(user_id = %user.id, product_id = %form.product_id, "Product deleted");
    }

    Ok(list_redirect(form.shopping_list_id))
}

/// Replace a product's quantity.
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidForm(form): ValidForm<ProductQuantityForm>,
) -> Result<Redirect> {
    let quantity = parse_quantity(&form.quantity)?;
    state
        .store()
        .update_product_quantity(user.id, form.product_id, quantity)
        .await?;

    tracing::debug!(product_id = %form.product_id, %quantity, "Product quantity updated");

    Ok(list_redirect(form.shopping_list_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, quantity: &str, image_url: &str) -> CreateProductForm {
        CreateProductForm {
            shopping_list_id: ShoppingListId::new(1),
            name: name.to_string(),
            quantity: quantity.to_string(),
            image_url: image_url.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_good_input() {
        let product = form(" Eggs ", "12", "https://example.com/eggs.png")
            .validate()
            .unwrap();
        assert_eq!(product.name, "Eggs");
        assert_eq!(product.quantity.get(), 12);
    }

    #[test]
    fn test_validate_rejects_bad_quantity() {
        assert!(form("Eggs", "", "https://example.com/e.png").validate().is_err());
        assert!(form("Eggs", "-2", "https://example.com/e.png").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_plain_http_image() {
        let err = form("Eggs", "1", "http://example.com/e.png").validate().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_validate_rejects_non_http_image() {
        let err = form("Eggs", "1", "javascript:alert(1)").validate().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
