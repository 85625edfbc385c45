//! Enum-specific `MaskSchema` derivation.
//!
//! Fields of struct-like variants register under the names serde reports for
//! them, which depend on the enum's tagging:
//!
//! | Tagging | Serde reports | Entry |
//! |---------|---------------|-------|
//! | external (default) | enum name and variant name | `.variant_field(variant, ..)` |
//! | `tag = ".."` | enum name only | `.field(..)` |
//! | `tag` + `content`, `untagged` | variant name as a struct name | `.struct_field(variant, ..)` |
//!
//! Internally tagged fields are therefore shared by every variant of the enum.
//! Tuple and unit variants have no field names and contribute nothing.

use proc_macro2::TokenStream;
use quote::quote_spanned;
use syn::{spanned::Spanned, DataEnum, Fields, Result};

use crate::{
    derive_struct::serialized_field_name,
    field::{parse_field_mask, reject_mask, reject_mask_beside_flatten},
    mask_override,
    rename::{parse_serde_attrs, SerdeAttrs},
};

/// Serde's enum representations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tagging {
    External,
    Internal,
    Adjacent,
    Untagged,
}

impl Tagging {
    fn of(attrs: &SerdeAttrs) -> Self {
        match (attrs.untagged, &attrs.tag, &attrs.content) {
            (true, _, _) => Tagging::Untagged,
            (false, Some(_), Some(_)) => Tagging::Adjacent,
            (false, Some(_), None) => Tagging::Internal,
            (false, None, _) => Tagging::External,
        }
    }
}

pub(crate) fn derive_enum(data: &DataEnum, container: &SerdeAttrs) -> Result<Vec<TokenStream>> {
    let container_tagging = Tagging::of(container);
    let mut entries = Vec::new();

    for variant in &data.variants {
        reject_mask(
            &variant.attrs,
            "#[mask] is not supported on enum variants; mark the variant's fields instead",
        )?;

        let variant_attrs = parse_serde_attrs(&variant.attrs)?;
        let variant_name = match &variant_attrs.rename {
            Some(rename) => rename.clone(),
            None => {
                let ident = variant.ident.to_string();
                container
                    .rename_all
                    .map_or(ident.clone(), |rule| rule.apply_to_variant(&ident))
            }
        };
        let field_rule = variant_attrs.rename_all.or(container.rename_all_fields);
        // `#[serde(untagged)]` on a single variant.
        let tagging = if variant_attrs.untagged {
            Tagging::Untagged
        } else {
            container_tagging
        };

        match &variant.fields {
            Fields::Named(fields) => {
                reject_mask_beside_flatten(fields)?;
                for field in &fields.named {
                    let Some(mask) = parse_field_mask(&field.attrs)? else {
                        continue;
                    };
                    let Some(ident) = field.ident.as_ref() else {
                        continue;
                    };
                    let name =
                        serialized_field_name(&ident.to_string(), &field.attrs, field_rule)?;
                    let mask = mask_override(&mask);
                    entries.push(match tagging {
                        Tagging::External => quote_spanned! { field.span() =>
                            .variant_field(#variant_name, #name, #mask)
                        },
                        Tagging::Internal => quote_spanned! { field.span() =>
                            .field(#name, #mask)
                        },
                        Tagging::Adjacent | Tagging::Untagged => quote_spanned! { field.span() =>
                            .struct_field(#variant_name, #name, #mask)
                        },
                    });
                }
            }
            Fields::Unnamed(fields) => {
                for field in &fields.unnamed {
                    reject_mask(
                        &field.attrs,
                        "#[mask] is not supported on tuple variant fields; they have no field name",
                    )?;
                }
            }
            Fields::Unit => {}
        }
    }

    Ok(entries)
}
