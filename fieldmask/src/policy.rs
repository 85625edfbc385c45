//! Global masking policy and the per-field resolver.
//!
//! The policy is built once at startup and only read afterwards. Resolution is
//! cheap and is re-evaluated for every field on every pass, so decisions always
//! reflect the policy's `enabled` flag.

use std::collections::HashSet;

use crate::style::{MaskStyle, DEFAULT_MASK_CHAR};

/// Replacement character carried by a per-field override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaskChar {
    /// Use the policy's default mask character.
    #[default]
    Inherit,
    /// Use this character.
    Char(char),
}

impl MaskChar {
    /// Resolves to a concrete character, falling back to `default` for [`MaskChar::Inherit`].
    #[must_use]
    pub fn or(self, default: char) -> char {
        match self {
            MaskChar::Inherit => default,
            MaskChar::Char(c) => c,
        }
    }
}

impl From<char> for MaskChar {
    fn from(c: char) -> Self {
        MaskChar::Char(c)
    }
}

/// Explicit masking instruction attached to a field of a registered schema.
///
/// Overrides are serialization-time annotations; they never touch stored data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldMaskOverride {
    /// Style applied to the field.
    pub style: MaskStyle,
    /// Character applied to the field.
    pub mask_char: MaskChar,
}

impl FieldMaskOverride {
    /// Override with `style` and the inherited mask character.
    #[must_use]
    pub const fn new(style: MaskStyle) -> Self {
        Self {
            style,
            mask_char: MaskChar::Inherit,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = MaskChar::Char(mask_char);
        self
    }
}

/// Outcome of resolving a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskDecision {
    /// Serialize the value normally.
    Unmasked,
    /// Replace the value with its masked text.
    Mask {
        /// Style to apply.
        style: MaskStyle,
        /// Concrete replacement character.
        mask_char: char,
    },
}

impl MaskDecision {
    /// Returns `true` when the field must be masked.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        matches!(self, MaskDecision::Mask { .. })
    }

    /// Applies the decision to `value`, borrowing it when unmasked.
    #[must_use]
    pub fn apply<'a>(&self, value: &'a str) -> std::borrow::Cow<'a, str> {
        match *self {
            MaskDecision::Unmasked => std::borrow::Cow::Borrowed(value),
            MaskDecision::Mask { style, mask_char } => {
                std::borrow::Cow::Owned(style.apply(value, mask_char))
            }
        }
    }
}

/// Immutable global masking configuration.
///
/// Field names are matched exactly but case-insensitively; they are stored
/// lower-cased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskingPolicy {
    enabled: bool,
    sensitive_fields: HashSet<String>,
    default_style: MaskStyle,
    default_mask_char: char,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitive_fields: HashSet::new(),
            default_style: MaskStyle::default(),
            default_mask_char: DEFAULT_MASK_CHAR,
        }
    }
}

impl MaskingPolicy {
    /// Enabled policy with no sensitive fields, `PARTIAL` style and `*`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the global kill switch.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Adds field names to the sensitive set.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sensitive_fields
            .extend(fields.into_iter().map(|name| normalize(name.as_ref())));
        self
    }

    /// Sets the default style.
    #[must_use]
    pub fn with_style(mut self, style: MaskStyle) -> Self {
        self.default_style = style;
        self
    }

    /// Sets the default replacement character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.default_mask_char = mask_char;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_style(&self) -> MaskStyle {
        self.default_style
    }

    pub fn default_mask_char(&self) -> char {
        self.default_mask_char
    }

    /// Lower-cased sensitive field names.
    pub fn sensitive_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.sensitive_fields.iter().map(String::as_str)
    }

    /// Returns `true` if `field_name` is configured as sensitive, ignoring case.
    #[must_use]
    pub fn is_sensitive_field(&self, field_name: &str) -> bool {
        if self.sensitive_fields.is_empty() {
            return false;
        }
        if self.sensitive_fields.contains(field_name) {
            return true;
        }
        self.sensitive_fields.contains(&field_name.to_lowercase())
    }

    /// Decides whether and how a field is masked.
    ///
    /// The kill switch wins over everything, then an explicit override, then
    /// membership in the sensitive field set.
    #[must_use]
    pub fn resolve(
        &self,
        field_name: &str,
        field_override: Option<FieldMaskOverride>,
    ) -> MaskDecision {
        if !self.enabled {
            return MaskDecision::Unmasked;
        }
        if let Some(field_override) = field_override {
            return MaskDecision::Mask {
                style: field_override.style,
                mask_char: field_override.mask_char.or(self.default_mask_char),
            };
        }
        if self.is_sensitive_field(field_name) {
            return MaskDecision::Mask {
                style: self.default_style,
                mask_char: self.default_mask_char,
            };
        }
        MaskDecision::Unmasked
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{FieldMaskOverride, MaskChar, MaskDecision, MaskingPolicy};
    use crate::MaskStyle;

    fn policy() -> MaskingPolicy {
        MaskingPolicy::new()
            .with_fields(["email", "phoneNumber"])
            .with_style(MaskStyle::Partial)
            .with_mask_char('*')
    }

    #[test]
    fn disabled_policy_never_masks() {
        let policy = policy().with_enabled(false);
        assert_eq!(policy.resolve("email", None), MaskDecision::Unmasked);
        let field_override = FieldMaskOverride::new(MaskStyle::Full);
        assert_eq!(
            policy.resolve("title", Some(field_override)),
            MaskDecision::Unmasked
        );
        assert_eq!(
            policy.resolve("email", Some(field_override)),
            MaskDecision::Unmasked
        );
    }

    #[test]
    fn field_names_match_case_insensitively() {
        let policy = policy();
        let expected = MaskDecision::Mask {
            style: MaskStyle::Partial,
            mask_char: '*',
        };
        assert_eq!(policy.resolve("Email", None), expected);
        assert_eq!(policy.resolve("email", None), expected);
        assert_eq!(policy.resolve("EMAIL", None), expected);
        assert_eq!(policy.resolve("phonenumber", None), expected);
    }

    #[test]
    fn field_names_match_exactly() {
        let policy = policy();
        assert_eq!(policy.resolve("emails", None), MaskDecision::Unmasked);
        assert_eq!(policy.resolve("user_email", None), MaskDecision::Unmasked);
        assert_eq!(policy.resolve("mail", None), MaskDecision::Unmasked);
    }

    #[test]
    fn override_wins_over_field_set() {
        let policy = policy();
        let field_override = FieldMaskOverride::new(MaskStyle::ShowLast).with_mask_char('#');
        assert_eq!(
            policy.resolve("email", Some(field_override)),
            MaskDecision::Mask {
                style: MaskStyle::ShowLast,
                mask_char: '#',
            }
        );
    }

    #[test]
    fn override_masks_fields_outside_the_set() {
        let policy = policy();
        let field_override = FieldMaskOverride::new(MaskStyle::Full);
        assert_eq!(
            policy.resolve("iban", Some(field_override)),
            MaskDecision::Mask {
                style: MaskStyle::Full,
                mask_char: '*',
            }
        );
    }

    #[test]
    fn inherited_mask_char_uses_policy_default() {
        let policy = policy().with_mask_char('x');
        let field_override = FieldMaskOverride {
            style: MaskStyle::Full,
            mask_char: MaskChar::Inherit,
        };
        assert_eq!(
            policy.resolve("anything", Some(field_override)),
            MaskDecision::Mask {
                style: MaskStyle::Full,
                mask_char: 'x',
            }
        );
    }

    #[test]
    fn unknown_field_without_override_is_unmasked() {
        assert_eq!(policy().resolve("title", None), MaskDecision::Unmasked);
        assert!(!MaskingPolicy::new().is_sensitive_field("email"));
    }

    #[test]
    fn decision_apply_borrows_when_unmasked() {
        let value = "plain";
        assert!(matches!(
            MaskDecision::Unmasked.apply(value),
            std::borrow::Cow::Borrowed("plain")
        ));
        let masked = MaskDecision::Mask {
            style: MaskStyle::Full,
            mask_char: '#',
        };
        assert_eq!(masked.apply(value), "#####");
        assert!(masked.is_masked());
    }

    #[test]
    fn configured_names_are_trimmed_and_lowercased() {
        let policy = MaskingPolicy::new().with_fields(["  Email "]);
        assert_eq!(policy.sensitive_fields().collect::<Vec<_>>(), vec!["email"]);
        assert!(policy.is_sensitive_field("EMAIL"));
    }
}
