//! Derive macros for `fieldmask`.
//!
//! This crate generates the schema description behind `#[derive(MaskSchema)]`.
//! It:
//! - reads `#[mask(...)]` field attributes
//! - reads the serde attributes that change serialized names
//! - emits a `MaskSchema` implementation listing every overridden field
//!
//! It does **not** mask anything. Styles, policies and the masking serializer
//! live in the main `fieldmask` crate and are applied at runtime.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput, Result};

mod container;
mod derive_enum;
mod derive_struct;
mod field;
mod rename;
use container::{parse_container_options, ContainerOptions};
use derive_enum::derive_enum;
use derive_struct::derive_struct;
use field::FieldMask;
use rename::parse_serde_attrs;

/// Derives `fieldmask::MaskSchema` for structs and enums.
///
/// # Container Attributes
///
/// - `#[mask(name = "Wire")]` - Registers the schema under `Wire` instead of the
///   name serde reports for the type. Without it, `#[serde(rename = "..")]` and
///   then the Rust ident are used.
///
/// # Field Attributes
///
/// - **No annotation**: The field is not listed. It is still masked at runtime
///   when its name is in the policy's sensitive field set.
/// - `#[mask]`: Always mask the field with the `Partial` style and the policy's
///   default mask character.
/// - `#[mask(style = ShowLast, mask_char = '#')]`: Explicit style (`Full`,
///   `Partial`, `ShowLast`; `"SHOW_LAST"` is accepted too) and/or character.
///
/// Field names follow `#[serde(rename)]`, `rename_all` and `rename_all_fields`
/// so they match what serde emits. Fields of struct-like enum variants are
/// scoped the way the enum's serde tagging reports them: to their variant for
/// externally tagged enums, to the whole enum for `tag = ".."`, and to the
/// variant name for `untagged` and adjacently tagged enums.
///
/// `#[mask]` on tuple fields, on variants, on unions, or next to a
/// `#[serde(flatten)]` field is rejected at compile time. Overrides of a type
/// that is itself flattened into another are not seen either; list such
/// fields in the policy's sensitive field set instead.
#[proc_macro_derive(MaskSchema, attributes(mask))]
pub fn derive_mask_schema(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Returns the token stream to reference the fieldmask crate root.
///
/// Handles crate renaming (e.g., `masking = { package = "fieldmask", ... }`).
/// Inside `fieldmask` itself the crate is reachable as `::fieldmask` through
/// `extern crate self as fieldmask`, which also covers its doctests.
fn crate_root() -> TokenStream {
    match crate_name("fieldmask") {
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::fieldmask },
    }
}

/// Builds the `FieldMaskOverride` expression for one field.
fn mask_override(mask: &FieldMask) -> TokenStream {
    let root = crate_root();
    let style = &mask.style;
    let mask_char = match mask.mask_char {
        Some(c) => quote! { #root::MaskChar::Char(#c) },
        None => quote! { #root::MaskChar::Inherit },
    };
    quote! {
        #root::FieldMaskOverride {
            style: #root::MaskStyle::#style,
            mask_char: #mask_char,
        }
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        generics,
        data,
        attrs,
        ..
    } = input;

    let ContainerOptions { name } = parse_container_options(&attrs)?;
    let serde_attrs = parse_serde_attrs(&attrs)?;
    let type_name = name
        .or_else(|| serde_attrs.rename.clone())
        .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_owned());

    let entries = match &data {
        Data::Struct(data) => derive_struct(data, serde_attrs.rename_all)?,
        Data::Enum(data) => derive_enum(data, &serde_attrs)?,
        Data::Union(u) => {
            return Err(syn::Error::new(
                u.union_token.span(),
                "`MaskSchema` cannot be derived for unions",
            ));
        }
    };

    let crate_root = crate_root();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #crate_root::MaskSchema for #ident #ty_generics #where_clause {
            fn mask_schema() -> #crate_root::TypeSchema {
                #crate_root::TypeSchema::new(#type_name)
                    #(#entries)*
            }
        }
    })
}
