//! Parsing of `#[mask(...)]` field attributes.
//!
//! | Attribute | Result |
//! |-----------|--------|
//! | None | field not listed in the schema |
//! | `#[mask]` | `Partial` style, inherited mask character |
//! | `#[mask(style = ShowLast)]` | explicit style |
//! | `#[mask(mask_char = '#')]` | explicit character |

use proc_macro2::{Ident, Span};
use syn::{spanned::Spanned, Attribute, FieldsNamed, Lit, Meta, Result};

use crate::rename::parse_serde_attrs;

/// Override parsed from a field's `#[mask]` attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldMask {
    /// `MaskStyle` variant name.
    pub(crate) style: Ident,
    pub(crate) mask_char: Option<char>,
}

impl Default for FieldMask {
    fn default() -> Self {
        Self {
            style: Ident::new("Partial", Span::call_site()),
            mask_char: None,
        }
    }
}

fn style_variant(name: &str, span: Span) -> Result<Ident> {
    let normalized = name.replace('-', "_").to_ascii_uppercase();
    let variant = match normalized.as_str() {
        "FULL" => "Full",
        "PARTIAL" => "Partial",
        "SHOW_LAST" | "SHOWLAST" => "ShowLast",
        _ => {
            return Err(syn::Error::new(
                span,
                format!("unknown mask style `{name}`; expected `Full`, `Partial` or `ShowLast`"),
            ))
        }
    };
    Ok(Ident::new(variant, span))
}

fn single_char(lit: &Lit) -> Result<char> {
    let value = match lit {
        Lit::Char(c) => return Ok(c.value()),
        Lit::Str(s) => s.value(),
        _ => return Err(syn::Error::new(lit.span(), "expected a character literal")),
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(syn::Error::new(
            lit.span(),
            "mask_char must be exactly one character",
        )),
    }
}

fn parse_options(list: &syn::MetaList) -> Result<FieldMask> {
    let mut style: Option<Ident> = None;
    let mut mask_char: Option<char> = None;

    list.parse_nested_meta(|meta| {
        if meta.path.is_ident("style") {
            if style.is_some() {
                return Err(meta.error("duplicate `style` option"));
            }
            let value = meta.value()?;
            let parsed = if value.peek(syn::LitStr) {
                let lit: syn::LitStr = value.parse()?;
                style_variant(&lit.value(), lit.span())?
            } else {
                let ident: Ident = value.parse()?;
                style_variant(&ident.to_string(), ident.span())?
            };
            style = Some(parsed);
            Ok(())
        } else if meta.path.is_ident("mask_char") {
            if mask_char.is_some() {
                return Err(meta.error("duplicate `mask_char` option"));
            }
            let lit: Lit = meta.value()?.parse()?;
            mask_char = Some(single_char(&lit)?);
            Ok(())
        } else {
            Err(meta.error(format!(
                "unknown mask option `{}`; expected `style` or `mask_char`",
                meta.path
                    .get_ident()
                    .map_or_else(|| "?".to_string(), ToString::to_string)
            )))
        }
    })?;

    let mut mask = FieldMask::default();
    if let Some(style) = style {
        mask.style = style;
    }
    mask.mask_char = mask_char;
    Ok(mask)
}

/// Returns the field's override, or `None` when it carries no `#[mask]`.
pub(crate) fn parse_field_mask(attrs: &[Attribute]) -> Result<Option<FieldMask>> {
    let mut mask: Option<FieldMask> = None;

    for attr in attrs {
        if !attr.path().is_ident("mask") {
            continue;
        }
        if mask.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "multiple #[mask] attributes specified on the same field",
            ));
        }

        mask = Some(match &attr.meta {
            Meta::Path(_) => FieldMask::default(),
            Meta::List(list) => parse_options(list)?,
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported for #[mask]",
                ));
            }
        });
    }

    Ok(mask)
}

/// Returns an error if any attribute is `#[mask]`; used where masking has no
/// meaning (tuple fields, enum variants).
pub(crate) fn reject_mask(attrs: &[Attribute], message: &str) -> Result<()> {
    match attrs.iter().find(|attr| attr.path().is_ident("mask")) {
        Some(attr) => Err(syn::Error::new_spanned(attr, message)),
        None => Ok(()),
    }
}

/// Rejects `#[mask]` next to a `#[serde(flatten)]` field.
///
/// Serde writes such a struct or variant as a map, which reports no type name,
/// so the override could never be looked up.
pub(crate) fn reject_mask_beside_flatten(fields: &FieldsNamed) -> Result<()> {
    let mut flattened = false;
    for field in &fields.named {
        flattened |= parse_serde_attrs(&field.attrs)?.flatten;
    }
    if !flattened {
        return Ok(());
    }
    for field in &fields.named {
        reject_mask(
            &field.attrs,
            "#[mask] cannot be combined with #[serde(flatten)]; serde serializes the type as a map",
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    #[test]
    fn no_attribute_returns_none() {
        let attrs = parse_attrs(quote! { #[serde(rename = "x")] });
        assert_eq!(parse_field_mask(&attrs).unwrap(), None);
    }

    #[test]
    fn bare_mask_is_partial_with_inherited_char() {
        let attrs = parse_attrs(quote! { #[mask] });
        let mask = parse_field_mask(&attrs).unwrap().unwrap();
        assert_eq!(mask.style, "Partial");
        assert_eq!(mask.mask_char, None);
    }

    #[test]
    fn style_and_char_are_parsed() {
        let attrs = parse_attrs(quote! { #[mask(style = ShowLast, mask_char = '#')] });
        let mask = parse_field_mask(&attrs).unwrap().unwrap();
        assert_eq!(mask.style, "ShowLast");
        assert_eq!(mask.mask_char, Some('#'));
    }

    #[test]
    fn style_accepts_config_spelling() {
        let attrs = parse_attrs(quote! { #[mask(style = "SHOW_LAST", mask_char = "x")] });
        let mask = parse_field_mask(&attrs).unwrap().unwrap();
        assert_eq!(mask.style, "ShowLast");
        assert_eq!(mask.mask_char, Some('x'));

        let attrs = parse_attrs(quote! { #[mask(style = FULL)] });
        assert_eq!(parse_field_mask(&attrs).unwrap().unwrap().style, "Full");
    }

    #[test]
    fn unknown_style_errors() {
        let attrs = parse_attrs(quote! { #[mask(style = Middle)] });
        let err = parse_field_mask(&attrs).unwrap_err();
        assert!(err.to_string().contains("unknown mask style `Middle`"));
    }

    #[test]
    fn unknown_option_errors() {
        let attrs = parse_attrs(quote! { #[mask(colour = "red")] });
        let err = parse_field_mask(&attrs).unwrap_err();
        assert!(err.to_string().contains("unknown mask option `colour`"));
    }

    #[test]
    fn multi_char_mask_errors() {
        let attrs = parse_attrs(quote! { #[mask(mask_char = "##")] });
        let err = parse_field_mask(&attrs).unwrap_err();
        assert!(err.to_string().contains("exactly one character"));
    }

    #[test]
    fn duplicate_options_error() {
        let attrs = parse_attrs(quote! { #[mask(style = Full, style = Partial)] });
        let err = parse_field_mask(&attrs).unwrap_err();
        assert!(err.to_string().contains("duplicate `style` option"));
    }

    #[test]
    fn multiple_mask_attributes_error() {
        let attrs = parse_attrs(quote! {
            #[mask]
            #[mask(style = Full)]
        });
        let err = parse_field_mask(&attrs).unwrap_err();
        assert!(err.to_string().contains("multiple #[mask] attributes"));
    }

    #[test]
    fn name_value_syntax_error() {
        let attrs = parse_attrs(quote! { #[mask = "Full"] });
        let err = parse_field_mask(&attrs).unwrap_err();
        assert!(err.to_string().contains("name-value syntax is not supported"));
    }

    #[test]
    fn reject_mask_reports_message() {
        let attrs = parse_attrs(quote! { #[mask] });
        let err = reject_mask(&attrs, "not here").unwrap_err();
        assert_eq!(err.to_string(), "not here");
        assert!(reject_mask(&[], "not here").is_ok());
    }

    fn named_fields(tokens: proc_macro2::TokenStream) -> FieldsNamed {
        let input: DeriveInput = syn::parse2(tokens).expect("should parse as DeriveInput");
        match input.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(fields),
                ..
            }) => fields,
            _ => panic!("expected a struct with named fields"),
        }
    }

    #[test]
    fn mask_beside_flatten_errors() {
        let fields = named_fields(quote! {
            struct User {
                #[mask(style = Full)]
                ssn: String,
                #[serde(flatten)]
                meta: Meta,
            }
        });
        let err = reject_mask_beside_flatten(&fields).unwrap_err();
        assert!(err.to_string().contains("cannot be combined with #[serde(flatten)]"));
    }

    #[test]
    fn flatten_without_mask_is_accepted() {
        let fields = named_fields(quote! {
            struct User {
                ssn: String,
                #[serde(flatten)]
                meta: Meta,
            }
        });
        assert!(reject_mask_beside_flatten(&fields).is_ok());

        let fields = named_fields(quote! {
            struct User {
                #[mask]
                ssn: String,
            }
        });
        assert!(reject_mask_beside_flatten(&fields).is_ok());
    }
}
