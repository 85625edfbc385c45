//! Explicit schema descriptions for per-field overrides.
//!
//! A schema maps the fields of one type to their [`FieldMaskOverride`]. Schemas
//! are produced by `#[derive(MaskSchema)]` or written by hand, then registered
//! once in a [`SchemaRegistry`]. The masked serializer looks overrides up by the
//! names serde reports, so there is no runtime reflection.
//!
//! Fields without an override are not listed; they are still masked when their
//! name is in the policy's sensitive field set.

use std::collections::HashMap;

use crate::policy::FieldMaskOverride;

/// Types that describe their own masking overrides.
///
/// Implemented by `#[derive(MaskSchema)]`:
///
/// ```rust
/// use fieldmask::{MaskSchema, MaskStyle};
///
/// #[derive(MaskSchema)]
/// struct Account {
///     owner: String,
///     #[mask(style = ShowLast)]
///     iban: String,
/// }
///
/// let schema = Account::mask_schema();
/// assert_eq!(schema.name(), "Account");
/// assert_eq!(schema.fields()[0].mask.style, MaskStyle::ShowLast);
/// ```
pub trait MaskSchema {
    /// Returns the schema description for this type.
    fn mask_schema() -> TypeSchema;
}

/// One overridden field of a [`TypeSchema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    /// Struct name serde reports for the field when it is not the type's
    /// name, as for fields of untagged and adjacently tagged variants.
    pub struct_name: Option<&'static str>,
    /// Enum variant owning the field, `None` for structs.
    pub variant: Option<&'static str>,
    /// Serialized field name.
    pub name: &'static str,
    /// Override applied to the field.
    pub mask: FieldMaskOverride,
}

/// Masking description of a single type.
///
/// `name` must match the name the type reports to serde (the Rust ident unless
/// the type is renamed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSchema {
    name: &'static str,
    fields: Vec<FieldSchema>,
}

impl TypeSchema {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Adds an override for a struct field.
    #[must_use]
    pub fn field(mut self, name: &'static str, mask: FieldMaskOverride) -> Self {
        self.fields.push(FieldSchema {
            struct_name: None,
            variant: None,
            name,
            mask,
        });
        self
    }

    /// Adds an override for a field that serde reports under `struct_name`
    /// rather than under this type's name.
    ///
    /// Untagged and adjacently tagged enums serialize a struct-like variant
    /// as a struct named after the variant.
    #[must_use]
    pub fn struct_field(
        mut self,
        struct_name: &'static str,
        name: &'static str,
        mask: FieldMaskOverride,
    ) -> Self {
        self.fields.push(FieldSchema {
            struct_name: Some(struct_name),
            variant: None,
            name,
            mask,
        });
        self
    }

    /// Adds an override for a field of a struct-like enum variant.
    #[must_use]
    pub fn variant_field(
        mut self,
        variant: &'static str,
        name: &'static str,
        mask: FieldMaskOverride,
    ) -> Self {
        self.fields.push(FieldSchema {
            struct_name: None,
            variant: Some(variant),
            name,
            mask,
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SchemaKey {
    type_name: &'static str,
    variant: Option<&'static str>,
}

/// Registered schemas, indexed by type (and variant) name.
///
/// Built once at startup and read-only afterwards. Keys are the bare names
/// serde reports, without module paths: two registered types with the same
/// name (`a::User` and `b::User`) share one entry and their overrides merge.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    types: HashMap<SchemaKey, HashMap<&'static str, FieldMaskOverride>>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the schema of `T`.
    #[must_use]
    pub fn register<T: MaskSchema>(self) -> Self {
        self.register_schema(T::mask_schema())
    }

    /// Registers a hand-written schema.
    ///
    /// Registering the same type twice merges the field lists; later entries
    /// replace earlier ones for the same field.
    #[must_use]
    pub fn register_schema(mut self, schema: TypeSchema) -> Self {
        let type_name = schema.name;
        // Keep the type known even without overrides so lookups stay cheap.
        self.types
            .entry(SchemaKey {
                type_name,
                variant: None,
            })
            .or_default();
        for field in schema.fields {
            self.types
                .entry(SchemaKey {
                    type_name: field.struct_name.unwrap_or(type_name),
                    variant: field.variant,
                })
                .or_default()
                .insert(field.name, field.mask);
        }
        self
    }

    /// Looks up the override of `field` on `type_name` (and `variant`).
    #[must_use]
    pub fn field_override(
        &self,
        type_name: &'static str,
        variant: Option<&'static str>,
        field: &str,
    ) -> Option<FieldMaskOverride> {
        self.types
            .get(&SchemaKey { type_name, variant })
            .and_then(|fields| fields.get(field))
            .copied()
    }

    /// Returns `true` if `type_name` has been registered.
    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.keys().any(|key| key.type_name == type_name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{SchemaRegistry, TypeSchema};
    use crate::{FieldMaskOverride, MaskStyle};

    #[test]
    fn registered_field_override_is_found() {
        let registry = SchemaRegistry::new().register_schema(
            TypeSchema::new("Book").field("email", FieldMaskOverride::new(MaskStyle::Partial)),
        );
        assert_eq!(
            registry.field_override("Book", None, "email"),
            Some(FieldMaskOverride::new(MaskStyle::Partial))
        );
        assert_eq!(registry.field_override("Book", None, "title"), None);
        assert_eq!(registry.field_override("Author", None, "email"), None);
    }

    #[test]
    fn variant_fields_are_scoped_to_their_variant() {
        let registry = SchemaRegistry::new().register_schema(TypeSchema::new("Contact").variant_field(
            "Phone",
            "number",
            FieldMaskOverride::new(MaskStyle::ShowLast),
        ));
        assert!(registry
            .field_override("Contact", Some("Phone"), "number")
            .is_some());
        assert!(registry.field_override("Contact", None, "number").is_none());
        assert!(registry
            .field_override("Contact", Some("Email"), "number")
            .is_none());
    }

    #[test]
    fn struct_fields_register_under_their_struct_name() {
        let registry = SchemaRegistry::new().register_schema(TypeSchema::new("Card").struct_field(
            "Visa",
            "pan",
            FieldMaskOverride::new(MaskStyle::Full),
        ));
        assert!(registry.field_override("Visa", None, "pan").is_some());
        assert!(registry.field_override("Card", None, "pan").is_none());
        assert!(registry.contains_type("Card"));
    }

    #[test]
    fn same_named_types_merge() {
        let registry = SchemaRegistry::new()
            .register_schema(
                TypeSchema::new("User").field("ssn", FieldMaskOverride::new(MaskStyle::Full)),
            )
            .register_schema(
                TypeSchema::new("User")
                    .field("email", FieldMaskOverride::new(MaskStyle::Partial)),
            );
        assert!(registry.field_override("User", None, "ssn").is_some());
        assert!(registry.field_override("User", None, "email").is_some());
    }

    #[test]
    fn later_registration_replaces_field_override() {
        let registry = SchemaRegistry::new()
            .register_schema(
                TypeSchema::new("Card").field("pan", FieldMaskOverride::new(MaskStyle::Partial)),
            )
            .register_schema(
                TypeSchema::new("Card").field(
                    "pan",
                    FieldMaskOverride::new(MaskStyle::ShowLast).with_mask_char('#'),
                ),
            );
        assert_eq!(
            registry.field_override("Card", None, "pan"),
            Some(FieldMaskOverride::new(MaskStyle::ShowLast).with_mask_char('#'))
        );
    }

    #[test]
    fn schema_without_overrides_is_still_registered() {
        let registry = SchemaRegistry::new().register_schema(TypeSchema::new("Plain"));
        assert!(registry.contains_type("Plain"));
        assert!(!registry.is_empty());
        assert!(SchemaRegistry::new().is_empty());
    }
}
