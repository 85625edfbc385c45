//! Masking algorithms for string values.
//!
//! Styles are pure string transformations. They do not traverse structures,
//! look at field names, or consult the global policy.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Default replacement character.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Number of trailing characters [`MaskStyle::ShowLast`] keeps visible.
const SHOW_LAST_VISIBLE: usize = 4;

/// Inputs at or below this length are fully masked by [`MaskStyle::Partial`].
const PARTIAL_FULL_MASK_MAX: usize = 2;

/// Algorithm that decides which characters of a value stay visible.
///
/// All styles operate on Unicode scalar values and preserve the input length
/// (measured in `char`s). Empty input is returned unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaskStyle {
    /// Every character is replaced.
    Full,
    /// The leading quarter (at least one character) stays visible.
    ///
    /// Values of two characters or fewer are fully masked.
    #[default]
    Partial,
    /// Only the last four characters stay visible.
    ///
    /// Values of four characters or fewer are returned unchanged.
    ShowLast,
}

impl MaskStyle {
    /// Every style, in declaration order.
    pub const ALL: [MaskStyle; 3] = [MaskStyle::Full, MaskStyle::Partial, MaskStyle::ShowLast];

    /// Applies the style to `value`.
    ///
    /// This method is total (it does not return errors).
    #[must_use]
    pub fn apply(self, value: &str, mask_char: char) -> String {
        let total = value.chars().count();
        if total == 0 {
            return String::new();
        }

        match self {
            MaskStyle::Full => mask_run(total, mask_char),
            MaskStyle::Partial => {
                if total <= PARTIAL_FULL_MASK_MAX {
                    return mask_run(total, mask_char);
                }
                let visible = (total / 4).max(1);
                let mut out = String::with_capacity(value.len());
                out.extend(value.chars().take(visible));
                out.extend(std::iter::repeat(mask_char).take(total - visible));
                out
            }
            MaskStyle::ShowLast => {
                let show = SHOW_LAST_VISIBLE.min(total);
                let hidden = total - show;
                let mut out = String::with_capacity(value.len());
                out.extend(std::iter::repeat(mask_char).take(hidden));
                out.extend(value.chars().skip(hidden));
                out
            }
        }
    }

    /// Applies the style to an optional value, keeping `None` as `None`.
    #[must_use]
    pub fn apply_option(self, value: Option<&str>, mask_char: char) -> Option<String> {
        value.map(|value| self.apply(value, mask_char))
    }

    /// Canonical configuration name (`FULL`, `PARTIAL`, `SHOW_LAST`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MaskStyle::Full => "FULL",
            MaskStyle::Partial => "PARTIAL",
            MaskStyle::ShowLast => "SHOW_LAST",
        }
    }
}

fn mask_run(len: usize, mask_char: char) -> String {
    std::iter::repeat(mask_char).take(len).collect()
}

impl fmt::Display for MaskStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskStyle {
    type Err = ConfigError;

    /// Parses `FULL`, `PARTIAL` or `SHOW_LAST`, ignoring case and accepting `-`
    /// in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        match normalized.as_str() {
            "FULL" => Ok(MaskStyle::Full),
            "PARTIAL" => Ok(MaskStyle::Partial),
            "SHOW_LAST" | "SHOWLAST" => Ok(MaskStyle::ShowLast),
            _ => Err(ConfigError::UnknownStyle(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for MaskStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{MaskStyle, DEFAULT_MASK_CHAR};

    #[test]
    fn empty_and_none_pass_through_for_every_style() {
        for style in MaskStyle::ALL {
            assert_eq!(style.apply("", '*'), "");
            assert_eq!(style.apply_option(None, '*'), None);
            assert_eq!(style.apply_option(Some(""), '*').as_deref(), Some(""));
        }
    }

    #[test]
    fn full_replaces_every_character() {
        assert_eq!(MaskStyle::Full.apply("secret123", '*'), "*********");
        assert_eq!(MaskStyle::Full.apply("x", '#'), "#");
    }

    #[test]
    fn partial_keeps_leading_quarter() {
        let result = MaskStyle::Partial.apply("alice@example.com", '*');
        assert_eq!(result, "alic*************");
        assert_eq!(result.chars().count(), 17);
    }

    #[test]
    fn partial_keeps_at_least_one_character() {
        assert_eq!(MaskStyle::Partial.apply("abc", '*'), "a**");
        assert_eq!(MaskStyle::Partial.apply("abcdefg", '*'), "a******");
        assert_eq!(MaskStyle::Partial.apply("abcdefgh", '*'), "ab******");
    }

    #[test]
    fn partial_fully_masks_short_values() {
        assert_eq!(MaskStyle::Partial.apply("ab", '*'), "**");
        assert_eq!(MaskStyle::Partial.apply("a", '*'), "*");
    }

    #[test]
    fn show_last_keeps_four_trailing_characters() {
        assert_eq!(
            MaskStyle::ShowLast.apply("4111111111111111", '*'),
            "************1111"
        );
        assert_eq!(MaskStyle::ShowLast.apply("12345", '-'), "-2345");
    }

    #[test]
    fn show_last_leaves_short_values_unchanged() {
        assert_eq!(MaskStyle::ShowLast.apply("abc", '*'), "abc");
        assert_eq!(MaskStyle::ShowLast.apply("abcd", '*'), "abcd");
    }

    #[test]
    fn parses_configuration_names() {
        assert_eq!("FULL".parse::<MaskStyle>().unwrap(), MaskStyle::Full);
        assert_eq!("partial".parse::<MaskStyle>().unwrap(), MaskStyle::Partial);
        assert_eq!("show-last".parse::<MaskStyle>().unwrap(), MaskStyle::ShowLast);
        assert_eq!(" SHOW_LAST ".parse::<MaskStyle>().unwrap(), MaskStyle::ShowLast);
        assert!("middle".parse::<MaskStyle>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for style in MaskStyle::ALL {
            assert_eq!(style.to_string().parse::<MaskStyle>().unwrap(), style);
        }
    }

    #[test]
    fn defaults_match_configuration_defaults() {
        assert_eq!(MaskStyle::default(), MaskStyle::Partial);
        assert_eq!(DEFAULT_MASK_CHAR, '*');
    }
}
