//! Serialized names and layout from `#[serde(...)]` attributes.
//!
//! Registered names must match what serde reports at serialization time, so
//! the derive reads the subset of serde attributes that change names or
//! layout: `rename`, `rename(serialize = "..")`, `rename_all`,
//! `rename_all_fields`, the enum tagging options (`tag`, `content`,
//! `untagged`) and `flatten`. Every other serde option is skipped.

use syn::{parenthesized, Attribute, LitStr, Result, Token};

/// Case conversion rules accepted by `rename_all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_str(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            _ => return None,
        })
    }

    /// Applies the rule to a `snake_case` field ident.
    pub(crate) fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_owned(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::Camel => lower_first(&RenameRule::Pascal.apply_to_field(field)),
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Applies the rule to a `PascalCase` variant ident.
    pub(crate) fn apply_to_variant(self, variant: &str) -> String {
        match self {
            RenameRule::Pascal => variant.to_owned(),
            RenameRule::Lower => variant.to_ascii_lowercase(),
            RenameRule::Upper => variant.to_ascii_uppercase(),
            RenameRule::Camel => lower_first(variant),
            RenameRule::Snake => {
                let mut snake = String::with_capacity(variant.len() + 4);
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            RenameRule::ScreamingSnake => RenameRule::Snake
                .apply_to_variant(variant)
                .to_ascii_uppercase(),
            RenameRule::Kebab => RenameRule::Snake.apply_to_variant(variant).replace('_', "-"),
            RenameRule::ScreamingKebab => RenameRule::ScreamingSnake
                .apply_to_variant(variant)
                .replace('_', "-"),
        }
    }
}

fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_lowercase().to_string() + chars.as_str()
    })
}

/// Serde options found on one item that affect the names serde reports.
#[derive(Clone, Debug, Default)]
pub(crate) struct SerdeAttrs {
    pub(crate) rename: Option<String>,
    pub(crate) rename_all: Option<RenameRule>,
    pub(crate) rename_all_fields: Option<RenameRule>,
    pub(crate) tag: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) untagged: bool,
    pub(crate) flatten: bool,
}

pub(crate) fn parse_serde_attrs(attrs: &[Attribute]) -> Result<SerdeAttrs> {
    let mut names = SerdeAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(name) = parse_serialize_value(&meta)? {
                    names.rename = Some(name.value());
                }
            } else if meta.path.is_ident("rename_all") || meta.path.is_ident("rename_all_fields") {
                if let Some(rule) = parse_serialize_value(&meta)? {
                    let parsed = RenameRule::from_str(&rule.value()).ok_or_else(|| {
                        syn::Error::new(rule.span(), "unknown serde rename rule")
                    })?;
                    if meta.path.is_ident("rename_all") {
                        names.rename_all = Some(parsed);
                    } else {
                        names.rename_all_fields = Some(parsed);
                    }
                }
            } else if meta.path.is_ident("tag") {
                names.tag = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("content") {
                names.content = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("untagged") {
                names.untagged = true;
            } else if meta.path.is_ident("flatten") {
                names.flatten = true;
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<syn::Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                parenthesized!(content in meta.input);
                content.parse::<proc_macro2::TokenStream>()?;
            }
            Ok(())
        })?;
    }

    Ok(names)
}

/// Reads `key = "x"` or the `serialize` half of `key(serialize = "x", ..)`.
fn parse_serialize_value(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse()?));
    }
    let mut serialized = None;
    meta.parse_nested_meta(|nested| {
        let value: LitStr = nested.value()?.parse()?;
        if nested.path.is_ident("serialize") {
            serialized = Some(value);
        }
        Ok(())
    })?;
    Ok(serialized)
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
    fn rename_is_read() {
        let attrs = parse_attrs(quote! { #[serde(rename = "mail")] });
        let names = parse_serde_attrs(&attrs).unwrap();
        assert_eq!(names.rename.as_deref(), Some("mail"));
    }

    #[test]
    fn rename_serialize_half_is_read() {
        let attrs = parse_attrs(quote! { #[serde(rename(serialize = "out", deserialize = "in"))] });
        let names = parse_serde_attrs(&attrs).unwrap();
        assert_eq!(names.rename.as_deref(), Some("out"));
    }

    #[test]
    fn unrelated_options_are_skipped() {
        let attrs = parse_attrs(quote! {
            #[serde(default, skip_serializing_if = "Option::is_none", bound(serialize = "T: X"))]
            #[serde(rename_all = "camelCase")]
        });
        let names = parse_serde_attrs(&attrs).unwrap();
        assert_eq!(names.rename, None);
        assert_eq!(names.rename_all, Some(RenameRule::Camel));
    }

    #[test]
    fn tagging_and_flatten_are_read() {
        let attrs = parse_attrs(quote! { #[serde(tag = "kind", content = "data")] });
        let parsed = parse_serde_attrs(&attrs).unwrap();
        assert_eq!(parsed.tag.as_deref(), Some("kind"));
        assert_eq!(parsed.content.as_deref(), Some("data"));
        assert!(!parsed.untagged);

        let attrs = parse_attrs(quote! { #[serde(untagged)] #[serde(flatten)] });
        let parsed = parse_serde_attrs(&attrs).unwrap();
        assert!(parsed.untagged);
        assert!(parsed.flatten);
        assert_eq!(parsed.tag, None);
    }

    #[test]
    fn unknown_rule_errors() {
        let attrs = parse_attrs(quote! { #[serde(rename_all = "sPoNgEcAsE")] });
        let err = parse_serde_attrs(&attrs).unwrap_err();
        assert!(err.to_string().contains("unknown serde rename rule"));
    }

    #[test]
    fn field_rules() {
        let field = "home_email";
        assert_eq!(RenameRule::Camel.apply_to_field(field), "homeEmail");
        assert_eq!(RenameRule::Pascal.apply_to_field(field), "HomeEmail");
        assert_eq!(RenameRule::Kebab.apply_to_field(field), "home-email");
        assert_eq!(RenameRule::ScreamingSnake.apply_to_field(field), "HOME_EMAIL");
        assert_eq!(RenameRule::ScreamingKebab.apply_to_field(field), "HOME-EMAIL");
        assert_eq!(RenameRule::Lower.apply_to_field(field), "home_email");
    }

    #[test]
    fn variant_rules() {
        let variant = "HomePhone";
        assert_eq!(RenameRule::Snake.apply_to_variant(variant), "home_phone");
        assert_eq!(RenameRule::Camel.apply_to_variant(variant), "homePhone");
        assert_eq!(RenameRule::Kebab.apply_to_variant(variant), "home-phone");
        assert_eq!(RenameRule::ScreamingSnake.apply_to_variant(variant), "HOME_PHONE");
        assert_eq!(RenameRule::Lower.apply_to_variant(variant), "homephone");
    }
}
