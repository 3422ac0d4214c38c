use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr};

/// Where the id/active pair lives on the struct.
enum Layout {
    Base(Ident),
    Fields { id: Ident, active: Ident },
}

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let collection = match collection_name(&input) {
        Ok(collection) => collection,
        Err(err) => return err.to_compile_error().into(),
    };

    let layout = match extract_layout(&input) {
        Ok(layout) => layout,
        Err(err) => return err.to_compile_error().into(),
    };

    let body = match layout {
        Layout::Base(base) => quote! {
            fn id(&self) -> &str {
                self.#base.id()
            }

            fn set_id(&mut self, id: String) {
                self.#base.set_id(id);
            }

            fn is_active(&self) -> bool {
                self.#base.is_active()
            }

            fn set_active(&mut self, active: bool) {
                self.#base.set_active(active);
            }
        },
        Layout::Fields { id, active } => quote! {
            fn id(&self) -> &str {
                &self.#id
            }

            fn set_id(&mut self, id: String) {
                self.#id = id;
            }

            fn is_active(&self) -> bool {
                self.#active
            }

            fn set_active(&mut self, active: bool) {
                self.#active = active;
            }
        },
    };

    let expanded = quote! {
        impl #impl_generics docrepo::Entity for #name #ty_generics #where_clause {
            const COLLECTION: &'static str = #collection;

            #body
        }
    };

    TokenStream::from(expanded)
}

/// Everything written inside `#[entity(...)]` attributes on one item.
#[derive(Default)]
struct EntityArgs {
    flags: Vec<String>,
    collection: Option<String>,
}

impl EntityArgs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("entity")) {
            attr.parse_nested_meta(|meta| {
                let Some(key) = meta.path.get_ident().map(Ident::to_string) else {
                    return Err(meta.error("expected a bare identifier"));
                };
                if key == "collection" {
                    args.collection = Some(meta.value()?.parse::<LitStr>()?.value());
                } else {
                    args.flags.push(key);
                }
                Ok(())
            })?;
        }
        Ok(args)
    }

    fn has(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

fn collection_name(input: &DeriveInput) -> syn::Result<String> {
    let args = EntityArgs::parse(&input.attrs)?;
    Ok(args
        .collection
        .unwrap_or_else(|| pluralize(&snake_case(&input.ident.to_string()))))
}

fn extract_layout(input: &DeriveInput) -> syn::Result<Layout> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Entity derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Entity derive: only structs are supported",
            ))
        }
    };

    if let Some(base) = fields.iter().find(|f| has_marker(f, "base")) {
        return Ok(Layout::Base(field_ident(base)));
    }

    let id = fields
        .iter()
        .find(|f| has_marker(f, "id"))
        .or_else(|| fields.iter().find(|f| is_named(f, "id")))
        .map(field_ident);
    let active = fields
        .iter()
        .find(|f| has_marker(f, "active"))
        .or_else(|| fields.iter().find(|f| is_named(f, "active")))
        .map(field_ident);

    match (id, active) {
        (Some(id), Some(active)) => Ok(Layout::Fields { id, active }),
        (None, _) => Err(syn::Error::new_spanned(
            &input.ident,
            "Entity derive: no #[entity(base)] field, no field marked #[entity(id)] and no field named `id`",
        )),
        (_, None) => Err(syn::Error::new_spanned(
            &input.ident,
            "Entity derive: no field marked #[entity(active)] and no field named `active`",
        )),
    }
}

fn has_marker(field: &Field, marker: &str) -> bool {
    EntityArgs::parse(&field.attrs)
        .map(|args| args.has(marker))
        .unwrap_or(false)
}

fn is_named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

fn field_ident(field: &Field) -> Ident {
    // Named fields always carry an ident.
    field
        .ident
        .clone()
        .unwrap_or_else(|| Ident::new("_", proc_macro2::Span::call_site()))
}

/// `MenuItem` -> `menu_item`.
fn snake_case(ident: &str) -> String {
    ident
        .char_indices()
        .flat_map(|(pos, ch)| {
            let sep = (pos > 0 && ch.is_uppercase()).then_some('_');
            sep.into_iter().chain(ch.to_lowercase())
        })
        .collect()
}

fn pluralize(name: &str) -> String {
    format!("{name}s")
}
