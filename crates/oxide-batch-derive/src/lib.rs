//! Derive macro describing batch update targets.
//!
//! This crate provides `#[derive(BatchModel)]`, which implements
//! `oxide_batch_core::schema::BatchModel` from a struct definition.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, Ident, Lit, Meta};

const DEFAULT_UPDATED_AT: &str = "updated_at";

/// Derives `BatchModel` for a struct with named fields.
///
/// # Attributes
///
/// - `#[model(table = "table_name")]` - SQL table name (optional, defaults
///   to snake_case of the struct name)
/// - `#[model(timestamps)]` - Inject the current time into `updated_at`
/// - `#[model(updated_at = "column")]` - Inject into another column
/// - `#[model(date_format = "%s")]` - `chrono` format of injected times
///
/// # Field Attributes
///
/// - `#[column(primary_key)]` - Marks the lookup column (defaults to `id`)
/// - `#[column(name = "column_name")]` - SQL column name (optional, defaults
///   to the field name; keep it in line with any `serde` rename)
/// - `#[column(json)]` - The column stores a serialized structure
///
/// # Example
///
/// ```ignore
/// #[derive(BatchModel)]
/// #[model(table = "posts", timestamps)]
/// struct Post {
///     #[column(primary_key)]
///     uuid: String,
///     title: String,
///     #[column(json)]
///     meta: serde_json::Value,
/// }
/// ```
#[proc_macro_derive(BatchModel, attributes(model, column))]
pub fn derive_batch_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_batch_model_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_batch_model_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let model = parse_model_attrs(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "BatchModel derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "BatchModel derive only supports structs",
            ));
        }
    };

    let mut columns: Vec<String> = Vec::new();
    let mut castable: Vec<String> = Vec::new();
    let mut primary_key: Option<String> = None;

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_column_attrs(&field.attrs)?;
        let column = attrs.name.unwrap_or_else(|| field_name.to_string());

        if attrs.primary_key {
            if primary_key.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "BatchModel supports a single #[column(primary_key)]",
                ));
            }
            primary_key = Some(column.clone());
        }
        if attrs.json {
            castable.push(column.clone());
        }
        columns.push(column);
    }

    let primary_key = primary_key.unwrap_or_else(|| String::from("id"));
    if let Some(updated_at) = &model.updated_at {
        if !columns.contains(updated_at) {
            columns.push(updated_at.clone());
        }
    }

    let table = &model.table;
    let updated_at_impl = match &model.updated_at {
        Some(column) => quote! {
            const UPDATED_AT: Option<&'static str> = Some(#column);
        },
        None => quote! {},
    };
    let date_format_impl = match &model.date_format {
        Some(format) => quote! {
            const DATE_FORMAT: &'static str = #format;
        },
        None => quote! {},
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxide_batch_core::schema::BatchModel
            for #struct_name #ty_generics #where_clause
        {
            const TABLE: &'static str = #table;
            const PRIMARY_KEY: &'static str = #primary_key;
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];
            const CASTABLE: &'static [&'static str] = &[#(#castable),*];
            #updated_at_impl
            #date_format_impl
        }
    })
}

struct ModelAttrs {
    table: String,
    updated_at: Option<String>,
    date_format: Option<String>,
}

#[derive(Default)]
struct ColumnAttrs {
    name: Option<String>,
    primary_key: bool,
    json: bool,
}

fn parse_model_attrs(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<ModelAttrs> {
    let mut result = ModelAttrs {
        table: to_snake_case(&struct_name.to_string()),
        updated_at: None,
        date_format: None,
    };

    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                result.table = parse_str_value(&meta)?;
            } else if meta.path.is_ident("timestamps") {
                result
                    .updated_at
                    .get_or_insert_with(|| String::from(DEFAULT_UPDATED_AT));
            } else if meta.path.is_ident("updated_at") {
                result.updated_at = Some(parse_str_value(&meta)?);
            } else if meta.path.is_ident("date_format") {
                result.date_format = Some(parse_str_value(&meta)?);
            } else {
                return Err(meta.error("unknown model attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }
        // Handle empty attribute like #[column]
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                result.primary_key = true;
            } else if meta.path.is_ident("json") {
                result.json = true;
            } else if meta.path.is_ident("name") {
                result.name = Some(parse_str_value(&meta)?);
            } else {
                return Err(meta.error("unknown column attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_str_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<String> {
    let value: Expr = meta.value()?.parse()?;
    if let Expr::Lit(lit) = &value {
        if let Lit::Str(s) = &lit.lit {
            return Ok(s.value());
        }
    }
    Err(syn::Error::new_spanned(value, "expected a string literal"))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
