//! Typed row ids.
//!
//! Each table gets its own id type so a list id can never be passed where a
//! product id is expected.

/// Define an `i32`-backed id newtype.
///
/// The generated type is `Copy`, ordered, hashable, serializes as a bare
/// number, parses from a decimal string (path segments and form fields) and,
/// with the `postgres` feature, binds as an `INTEGER` column.
///
/// ```rust
/// # use shopping_list_core::define_id;
/// define_id!(
///     /// Id of a recipe.
///     RecipeId
/// );
///
/// let id: RecipeId = "12".parse().unwrap();
/// assert_eq!(id.as_i32(), 12);
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Id of a registered user.
    UserId
);
define_id!(
    /// Id of a shopping list.
    ShoppingListId
);
define_id!(
    /// Id of a product on a shopping list.
    ProductId
);
