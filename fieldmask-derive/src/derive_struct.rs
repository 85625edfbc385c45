//! Struct-specific `MaskSchema` derivation.
//!
//! Named fields carrying `#[mask]` become `.field(..)` entries keyed by their
//! serialized name. `#[mask]` is rejected on structs with a flattened field.

use proc_macro2::TokenStream;
use quote::quote_spanned;
use syn::{spanned::Spanned, DataStruct, Fields, Result};

use crate::{
    field::{parse_field_mask, reject_mask, reject_mask_beside_flatten},
    mask_override,
    rename::{parse_serde_attrs, RenameRule},
};

pub(crate) fn derive_struct(
    data: &DataStruct,
    rename_all: Option<RenameRule>,
) -> Result<Vec<TokenStream>> {
    match &data.fields {
        Fields::Named(fields) => {
            reject_mask_beside_flatten(fields)?;
            let mut entries = Vec::new();
            for field in &fields.named {
                let Some(mask) = parse_field_mask(&field.attrs)? else {
                    continue;
                };
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let name = serialized_field_name(&ident.to_string(), &field.attrs, rename_all)?;
                let mask = mask_override(&mask);
                entries.push(quote_spanned! { field.span() =>
                    .field(#name, #mask)
                });
            }
            Ok(entries)
        }
        Fields::Unnamed(fields) => {
            for field in &fields.unnamed {
                reject_mask(
                    &field.attrs,
                    "#[mask] is not supported on tuple fields; they have no field name",
                )?;
            }
            Ok(Vec::new())
        }
        Fields::Unit => Ok(Vec::new()),
    }
}

/// Serialized name of a named field: `#[serde(rename)]`, then the container's
/// rename rule, then the ident with any raw prefix removed.
pub(crate) fn serialized_field_name(
    ident: &str,
    attrs: &[syn::Attribute],
    rename_all: Option<RenameRule>,
) -> Result<String> {
    let ident = ident.trim_start_matches("r#");
    if let Some(rename) = parse_serde_attrs(attrs)?.rename {
        return Ok(rename);
    }
    Ok(rename_all.map_or_else(|| ident.to_owned(), |rule| rule.apply_to_field(ident)))
}
