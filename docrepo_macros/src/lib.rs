mod entity;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Entity)]
// ============================================================================

/// Derive macro implementing `docrepo::Entity` for a struct.
///
/// # Usage
///
/// Embedding the id/active pair:
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Entity)]
/// #[entity(collection = "menus")]
/// struct Menu {
///     #[serde(flatten)]
///     #[entity(base)]
///     base: EntityBase,
///     name: String,
/// }
/// ```
///
/// With explicit fields:
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Entity)]
/// struct Customer {
///     #[serde(skip)]
///     #[entity(id)]
///     key: String,
///     #[entity(active)]
///     active: bool,
///     email: String,
/// }
/// ```
///
/// The collection defaults to the snake_case struct name plus `s`. Unmarked
/// fields literally named `id` and `active` are used when no field carries
/// `#[entity(id)]` / `#[entity(active)]`.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
