//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! sl-cli user create -n alice
//! sl-cli user list
//! ```

use shopping_list_core::{UserName, UserNameError};
use shopping_list_web::db::{PgStore, RepositoryError, ShoppingStore};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Invalid user name.
    #[error("Invalid user name: {0}")]
    InvalidName(#[from] UserNameError),

    /// User already exists.
    #[error("User already exists with name: {0}")]
    UserExists(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Register a new user.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(name: &str) -> Result<i32, UserError> {
    let name = UserName::parse(name)?;
    let store = PgStore::new(connect().await?);

    let user = match store.create_user(&name).await {
        Ok(user) => user,
        Err(RepositoryError::Conflict(_)) => return Err(UserError::UserExists(name.into_inner())),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("User created successfully! ID: {}, Name: {}", user.id, user.name);
    Ok(user.id.as_i32())
}

/// Print all registered users.
pub async fn list() -> Result<(), UserError> {
    let store = PgStore::new(connect().await?);
    let users = store.list_users().await?;

    #[allow(clippy::print_stdout)]
    {
        for user in &users {
            println!("{:>6}  {:<32}  {}", user.id, user.name, user.created_at);
        }
        println!("{} user(s)", users.len());
    }

    Ok(())
}
